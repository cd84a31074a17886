// Path: crates/execution/src/util.rs

use std::any::Any;
use weft_types::error::TransactionError;

/// Converts a caught unwind payload into a structured failure.
///
/// A payload that already is a `TransactionError` (raised with
/// `std::panic::panic_any`) is returned as-is; string payloads become
/// [`TransactionError::Internal`].
pub(crate) fn fault_to_error(payload: Box<dyn Any + Send>) -> TransactionError {
    match payload.downcast::<TransactionError>() {
        Ok(err) => *err,
        Err(payload) => TransactionError::Internal(fault_message(payload.as_ref())),
    }
}

/// Best-effort description of an unwind payload.
pub(crate) fn fault_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown runtime fault".to_string()
    }
}
