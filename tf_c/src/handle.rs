//! Buffer handle management
//!
//! Every buffer instance lives in a process-wide registry keyed by an opaque
//! handle. Operations resolve the handle on every call, so a destroyed or
//! never-issued handle is reported as an invalid argument instead of
//! touching freed state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tf_core::{BufferCore, TfError, TfResult};

/// Opaque reference to one live buffer instance. `0` is the null handle.
pub type TfBufferHandle = u64;

// Handle 0 is reserved as the null handle returned on creation failure.
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

lazy_static::lazy_static! {
    static ref BUFFERS: Mutex<HashMap<TfBufferHandle, BufferCore>> = Mutex::new(HashMap::new());
}

/// Create a new buffer instance and return its handle.
pub(crate) fn create_buffer() -> TfBufferHandle {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    BUFFERS.lock().unwrap().insert(handle, BufferCore::new());
    handle
}

/// Destroy the buffer behind `handle`, releasing its storage.
///
/// Destroying a handle that is not live (never issued, or already
/// destroyed) is an invalid-argument error.
pub(crate) fn destroy_buffer(handle: TfBufferHandle) -> TfResult<()> {
    match BUFFERS.lock().unwrap().remove(&handle) {
        Some(_) => Ok(()),
        None => Err(invalid_handle(handle)),
    }
}

/// Run `f` against the buffer behind `handle`.
pub(crate) fn with_buffer<R>(
    handle: TfBufferHandle,
    f: impl FnOnce(&mut BufferCore) -> TfResult<R>,
) -> TfResult<R> {
    let mut buffers = BUFFERS.lock().unwrap();
    let buffer = buffers
        .get_mut(&handle)
        .ok_or_else(|| invalid_handle(handle))?;
    f(buffer)
}

/// Number of live buffer instances, for resource accounting in tests.
pub fn live_buffer_count() -> usize {
    BUFFERS.lock().unwrap().len()
}

fn invalid_handle(handle: TfBufferHandle) -> TfError {
    TfError::InvalidArgument(format!("buffer handle {} is not live", handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let a = create_buffer();
        let b = create_buffer();
        assert_ne!(a, b);
        assert_ne!(a, 0);
        destroy_buffer(a).unwrap();
        destroy_buffer(b).unwrap();
    }

    #[test]
    fn test_destroy_is_not_idempotent() {
        let handle = create_buffer();
        assert!(destroy_buffer(handle).is_ok());
        assert!(matches!(
            destroy_buffer(handle),
            Err(TfError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_with_buffer_on_dead_handle() {
        let handle = create_buffer();
        destroy_buffer(handle).unwrap();
        let result = with_buffer(handle, |_| Ok(()));
        assert!(matches!(result, Err(TfError::InvalidArgument(_))));
    }

    #[test]
    fn test_null_handle_is_never_live() {
        let result = with_buffer(0, |_| Ok(()));
        assert!(matches!(result, Err(TfError::InvalidArgument(_))));
    }
}
