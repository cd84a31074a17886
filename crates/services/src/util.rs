// Path: crates/services/src/util.rs

use parity_scale_codec::{Decode, Encode};
use weft_api::state::StateAccess;
use weft_api::transaction::Tx;
use weft_tx::model::{Msg, SignedTx};
use weft_types::codec::{decode_record, to_bytes_canonical};
use weft_types::error::TransactionError;

/// Downcasts `tx` to the canonical [`SignedTx`] and returns its message.
pub(crate) fn signed_msg(tx: &dyn Tx) -> Result<&Msg, TransactionError> {
    let signed = tx.downcast_ref::<SignedTx>().ok_or_else(|| {
        TransactionError::InvalidInput(format!(
            "route '{}' expects a signed transaction",
            tx.route()
        ))
    })?;
    Ok(&signed.msg)
}

pub(crate) fn wrong_message(route: &str) -> TransactionError {
    TransactionError::InvalidInput(format!("message does not belong to route '{route}'"))
}

pub(crate) fn read<T: Decode, S: StateAccess + ?Sized>(
    state: &S,
    key: &[u8],
) -> Result<Option<T>, TransactionError> {
    match state.get(key)? {
        Some(b) => Ok(Some(decode_record(&b)?)),
        None => Ok(None),
    }
}

pub(crate) fn write<T: Encode, S: StateAccess + ?Sized>(
    state: &mut S,
    key: &[u8],
    value: &T,
) -> Result<(), TransactionError> {
    state.insert(key, &to_bytes_canonical(value))?;
    Ok(())
}
