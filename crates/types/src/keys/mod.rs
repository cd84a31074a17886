// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys.
//!
//! Keys under the `_weft::` namespace are reserved for the harness and its
//! standard decorators. Business modules namespace their own records as
//! `<module>::<record>::`.

/// The reserved key under which the chain identifier is persisted at genesis.
pub const CHAIN_ID_KEY: &[u8] = b"_weft::chain_id";

/// The reserved key holding the header time of the last block begun, so a
/// restarted harness can derive the `CheckTx` context before the next block.
pub const LAST_BLOCK_TIME_KEY: &[u8] = b"_weft::last_block_time";

/// The reserved key prefix for per-signer replay-protection nonces.
pub const NONCE_PREFIX: &[u8] = b"_weft::nonce::";

/// The state key prefix for bank balances, keyed by address bytes.
pub const BANK_BALANCE_PREFIX: &[u8] = b"bank::balance::";

/// The state key for the validators module's admin address.
pub const VALIDATORS_ADMIN_KEY: &[u8] = b"validators::admin";

/// The state key prefix for validator powers, keyed by public key bytes.
pub const VALIDATORS_POWER_PREFIX: &[u8] = b"validators::power::";

/// Concatenates a prefix and a suffix into a single state key.
pub fn prefixed(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    [prefix, suffix].concat()
}

/// The nonce key for one signer.
pub fn nonce_key(address: &[u8]) -> Vec<u8> {
    prefixed(NONCE_PREFIX, address)
}
