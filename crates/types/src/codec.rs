// Path: crates/types/src/codec.rs

//! The canonical, deterministic binary codec for consensus-critical data.
//!
//! Every node must encode the same value to the same bytes, so all stored
//! records, transaction wire bytes and query payloads go through the
//! `parity-scale-codec` (SCALE) wrappers in this module rather than through an
//! ad hoc serializer.

use crate::error::StateError;
use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Vec<u8> {
    v.encode()
}

/// Decodes a value from its canonical SCALE representation.
///
/// Trailing bytes are an error: a record either decodes exactly or not at all.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

/// Decodes a record read back from state, mapping failures into [`StateError::Decode`].
pub fn decode_record<T: Decode>(b: &[u8]) -> Result<T, StateError> {
    from_bytes_canonical(b).map_err(StateError::Decode)
}
