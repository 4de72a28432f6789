//! # tf_c
//!
//! C API for the [`tf_core`] transform buffer.
//!
//! The boundary never lets a Rust error or panic escape: every exported
//! function reports its outcome through a caller-supplied exception code and
//! a fixed 256-byte message buffer, and refers to its buffer instance through
//! an opaque handle issued by [`tf_buffer_create`](api::tf_buffer_create).
//!
//! Callers must inspect the exception code before trusting any returned
//! value; failure paths return zeroed records, `0` results and the null
//! handle.

pub mod api;
pub mod exception;
pub mod handle;
pub mod record;

pub use api::{
    tf_buffer_create, tf_buffer_destroy, tf_buffer_lookup_transform, tf_buffer_set_transform,
};
pub use exception::{classify_error, TfExceptionCode, EXCEPTION_MESSAGE_BUFFER_LENGTH};
pub use handle::TfBufferHandle;
pub use record::TfTransformRecord;
