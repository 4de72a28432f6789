//! Error-to-exception-code translation
//!
//! Engine errors never cross the C boundary as Rust values. Each call site
//! converts them into an enumerated code plus a bounded message written into
//! a caller-supplied 256-byte buffer.

use std::any::Any;

use libc::c_char;
use tf_core::TfError;

/// Size of the caller-supplied exception message buffer, in bytes.
///
/// The managed side mirrors this constant; keep them in sync.
pub const EXCEPTION_MESSAGE_BUFFER_LENGTH: usize = 256;

/// Exception codes reported across the boundary.
///
/// The discriminants are part of the wire contract and mirror the managed
/// side's enumeration byte for byte.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfExceptionCode {
    NoException = 0,
    LookupException = 1,
    ConnectivityException = 2,
    ExtrapolationException = 3,
    InvalidArgumentException = 4,
    TimeoutException = 5,
    TransformException = 6,
    /// Generic runtime failure unrelated to transforms.
    Exception = 1000,
    /// Any failure that carries no usable description.
    UnknownException = 1001,
}

/// Map an engine error to its exception code.
///
/// Pure function of the error value: the specific categories map one to one,
/// the generic `Transform` variant is the fallback for transform errors with
/// no more specific category.
pub fn classify_error(error: &TfError) -> TfExceptionCode {
    match error {
        TfError::Lookup(_) => TfExceptionCode::LookupException,
        TfError::Connectivity(_) => TfExceptionCode::ConnectivityException,
        TfError::Extrapolation(_) => TfExceptionCode::ExtrapolationException,
        TfError::InvalidArgument(_) => TfExceptionCode::InvalidArgumentException,
        TfError::Timeout(_) => TfExceptionCode::TimeoutException,
        TfError::Transform(_) => TfExceptionCode::TransformException,
    }
}

/// Zero the buffer, then copy at most its capacity from `text`.
///
/// Never reads past `text` and never forces a NUL terminator; the managed
/// side trims trailing zero bytes.
pub(crate) fn fill_message(buffer: &mut [u8; EXCEPTION_MESSAGE_BUFFER_LENGTH], text: &str) {
    buffer.fill(0);
    let bytes = text.as_bytes();
    let len = bytes.len().min(EXCEPTION_MESSAGE_BUFFER_LENGTH);
    buffer[..len].copy_from_slice(&bytes[..len]);
}

/// View the caller's message pointer as a fixed-size byte buffer.
unsafe fn message_buffer<'a>(
    message: *mut c_char,
) -> Option<&'a mut [u8; EXCEPTION_MESSAGE_BUFFER_LENGTH]> {
    if message.is_null() {
        None
    } else {
        Some(&mut *(message as *mut [u8; EXCEPTION_MESSAGE_BUFFER_LENGTH]))
    }
}

/// Report a successful call: `NoException` and an empty message.
pub(crate) unsafe fn write_success(code: *mut TfExceptionCode, message: *mut c_char) {
    if !code.is_null() {
        *code = TfExceptionCode::NoException;
    }
    if let Some(buffer) = message_buffer(message) {
        buffer.fill(0);
    }
}

/// Report an engine error: classified code plus its display text, truncated
/// at the buffer capacity.
pub(crate) unsafe fn write_error(
    code: *mut TfExceptionCode,
    message: *mut c_char,
    error: &TfError,
) {
    if !code.is_null() {
        *code = classify_error(error);
    }
    if let Some(buffer) = message_buffer(message) {
        fill_message(buffer, &error.to_string());
    }
}

/// Report a caught panic.
///
/// A string payload is a generic runtime failure and its text is reported;
/// any other payload has no usable description, so the code is
/// `UnknownException` and the message buffer is left entirely zero-filled.
pub(crate) unsafe fn write_panic(
    code: *mut TfExceptionCode,
    message: *mut c_char,
    payload: &(dyn Any + Send),
) {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str));

    if !code.is_null() {
        *code = match text {
            Some(_) => TfExceptionCode::Exception,
            None => TfExceptionCode::UnknownException,
        };
    }
    if let Some(buffer) = message_buffer(message) {
        match text {
            Some(text) => fill_message(buffer, text),
            None => buffer.fill(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values_are_stable() {
        assert_eq!(TfExceptionCode::NoException as i32, 0);
        assert_eq!(TfExceptionCode::LookupException as i32, 1);
        assert_eq!(TfExceptionCode::ConnectivityException as i32, 2);
        assert_eq!(TfExceptionCode::ExtrapolationException as i32, 3);
        assert_eq!(TfExceptionCode::InvalidArgumentException as i32, 4);
        assert_eq!(TfExceptionCode::TimeoutException as i32, 5);
        assert_eq!(TfExceptionCode::TransformException as i32, 6);
        assert_eq!(TfExceptionCode::Exception as i32, 1000);
        assert_eq!(TfExceptionCode::UnknownException as i32, 1001);
    }

    #[test]
    fn test_classify_each_variant() {
        let cases = [
            (TfError::Lookup(String::new()), TfExceptionCode::LookupException),
            (
                TfError::Connectivity(String::new()),
                TfExceptionCode::ConnectivityException,
            ),
            (
                TfError::Extrapolation(String::new()),
                TfExceptionCode::ExtrapolationException,
            ),
            (
                TfError::InvalidArgument(String::new()),
                TfExceptionCode::InvalidArgumentException,
            ),
            (TfError::Timeout(String::new()), TfExceptionCode::TimeoutException),
            (
                TfError::Transform(String::new()),
                TfExceptionCode::TransformException,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(classify_error(&error), expected);
        }
    }

    #[test]
    fn test_fill_message_truncates() {
        let mut buffer = [0xAAu8; EXCEPTION_MESSAGE_BUFFER_LENGTH];
        let long = "x".repeat(400);
        fill_message(&mut buffer, &long);
        assert!(buffer.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_fill_message_zero_pads() {
        let mut buffer = [0xAAu8; EXCEPTION_MESSAGE_BUFFER_LENGTH];
        fill_message(&mut buffer, "short");
        assert_eq!(&buffer[..5], b"short");
        assert!(buffer[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_message_exact_capacity() {
        let mut buffer = [0u8; EXCEPTION_MESSAGE_BUFFER_LENGTH];
        let exact = "y".repeat(EXCEPTION_MESSAGE_BUFFER_LENGTH);
        fill_message(&mut buffer, &exact);
        assert!(buffer.iter().all(|&b| b == b'y'));
    }

    #[test]
    fn test_panic_with_string_payload_is_generic_exception() {
        for payload in [
            Box::new("engine failure") as Box<dyn Any + Send>,
            Box::new("engine failure".to_string()) as Box<dyn Any + Send>,
        ] {
            let mut code = TfExceptionCode::NoException;
            let mut buffer = [0xAAu8; EXCEPTION_MESSAGE_BUFFER_LENGTH];
            unsafe {
                write_panic(
                    &mut code,
                    buffer.as_mut_ptr() as *mut c_char,
                    payload.as_ref(),
                )
            };
            assert_eq!(code, TfExceptionCode::Exception);
            assert_eq!(&buffer[..14], b"engine failure");
            assert!(buffer[14..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_panic_without_text_is_unknown_with_zeroed_buffer() {
        let payload: Box<dyn Any + Send> = Box::new(42u32);
        let mut code = TfExceptionCode::NoException;
        let mut buffer = [0xAAu8; EXCEPTION_MESSAGE_BUFFER_LENGTH];
        unsafe {
            write_panic(
                &mut code,
                buffer.as_mut_ptr() as *mut c_char,
                payload.as_ref(),
            )
        };
        assert_eq!(code, TfExceptionCode::UnknownException);
        assert!(buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_helpers_tolerate_null_pointers() {
        unsafe {
            write_success(std::ptr::null_mut(), std::ptr::null_mut());
            write_error(
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                &TfError::Lookup("x".into()),
            );
        }
    }
}
