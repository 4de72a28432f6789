//! The exported C call surface
//!
//! Four flat functions: create, destroy, set-transform, lookup-transform.
//! Each one resolves its handle, forwards into the engine, and reports the
//! outcome through the exception out-parameters. Panics are caught at the
//! boundary and reported like any other failure; nothing unwinds into the
//! caller.

use std::ffi::CStr;
use std::panic::catch_unwind;

use libc::c_char;
use tf_core::{TfError, TfResult, TfTime};

use crate::exception::{self, TfExceptionCode};
use crate::handle::{self, TfBufferHandle};
use crate::record::{self, TfTransformRecord};

/// Read a required string argument from the caller.
unsafe fn text_arg(ptr: *const c_char, name: &str) -> TfResult<String> {
    if ptr.is_null() {
        return Err(TfError::InvalidArgument(format!(
            "{} must not be null",
            name
        )));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(str::to_owned)
        .map_err(|_| TfError::InvalidArgument(format!("{} is not valid UTF-8", name)))
}

/// Write the exception out-parameters and unwrap the call outcome.
fn finish<T>(
    outcome: std::thread::Result<TfResult<T>>,
    failure: T,
    exception: *mut TfExceptionCode,
    exception_message: *mut c_char,
) -> T {
    match outcome {
        Ok(Ok(value)) => {
            unsafe { exception::write_success(exception, exception_message) };
            value
        }
        Ok(Err(error)) => {
            unsafe { exception::write_error(exception, exception_message, &error) };
            failure
        }
        Err(payload) => {
            unsafe { exception::write_panic(exception, exception_message, payload.as_ref()) };
            failure
        }
    }
}

/// Create a new transform buffer.
///
/// Returns the buffer's handle, or the null handle (0) on failure.
/// `exception_message` must point to a writable 256-byte buffer (or be
/// null, in which case only the code is reported).
#[no_mangle]
pub extern "C" fn tf_buffer_create(
    exception: *mut TfExceptionCode,
    exception_message: *mut c_char,
) -> TfBufferHandle {
    let outcome = catch_unwind(|| Ok(handle::create_buffer()));
    finish(outcome, 0, exception, exception_message)
}

/// Destroy the transform buffer behind `buffer`.
///
/// The handle is dead afterwards; destroying it again reports
/// `InvalidArgumentException`.
#[no_mangle]
pub extern "C" fn tf_buffer_destroy(
    buffer: TfBufferHandle,
    exception: *mut TfExceptionCode,
    exception_message: *mut c_char,
) {
    let outcome = catch_unwind(move || handle::destroy_buffer(buffer));
    finish(outcome, (), exception, exception_message)
}

/// Insert a transform into the buffer.
///
/// Returns the engine's acceptance result (1 accepted, 0 rejected); forced
/// to 0 whenever an exception is reported. `is_static` is a boolean flag,
/// any non-zero value marks the transform as time-invariant.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn tf_buffer_set_transform(
    buffer: TfBufferHandle,
    sec: i32,
    nanosec: u32,
    frame_id: *const c_char,
    child_frame_id: *const c_char,
    translation_x: f64,
    translation_y: f64,
    translation_z: f64,
    rotation_x: f64,
    rotation_y: f64,
    rotation_z: f64,
    rotation_w: f64,
    authority: *const c_char,
    is_static: i32,
    exception: *mut TfExceptionCode,
    exception_message: *mut c_char,
) -> i32 {
    let outcome = catch_unwind(|| -> TfResult<i32> {
        let frame_id = unsafe { text_arg(frame_id, "frame_id")? };
        let child_frame_id = unsafe { text_arg(child_frame_id, "child_frame_id")? };
        let authority = unsafe { text_arg(authority, "authority")? };

        let stamped = record::decode(
            sec,
            nanosec,
            &frame_id,
            &child_frame_id,
            [translation_x, translation_y, translation_z],
            [rotation_x, rotation_y, rotation_z, rotation_w],
        );
        handle::with_buffer(buffer, |core| {
            Ok(core.set_transform(&stamped, &authority, is_static != 0) as i32)
        })
    });
    finish(outcome, 0, exception, exception_message)
}

/// Look up the transform mapping `source_frame` into `target_frame`.
///
/// `(sec, nanosec) == (0, 0)` means "latest available". On failure the
/// returned record is zeroed and must not be interpreted.
#[no_mangle]
pub extern "C" fn tf_buffer_lookup_transform(
    buffer: TfBufferHandle,
    target_frame: *const c_char,
    source_frame: *const c_char,
    sec: i32,
    nanosec: u32,
    exception: *mut TfExceptionCode,
    exception_message: *mut c_char,
) -> TfTransformRecord {
    let outcome = catch_unwind(|| -> TfResult<TfTransformRecord> {
        let target = unsafe { text_arg(target_frame, "target_frame")? };
        let source = unsafe { text_arg(source_frame, "source_frame")? };
        let stamped = handle::with_buffer(buffer, |core| {
            core.lookup_transform(&target, &source, TfTime::new(sec, nanosec))
        })?;
        Ok(record::encode(&stamped))
    });
    finish(outcome, TfTransformRecord::default(), exception, exception_message)
}
