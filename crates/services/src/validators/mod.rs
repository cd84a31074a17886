// Path: crates/services/src/validators/mod.rs
//! The validators module: admin-gated validator power updates.

use crate::util::{read, signed_msg, write, wrong_message};
use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;
use weft_api::genesis::GenesisInitializer;
use weft_api::query::{QueryHandler, QueryRequest, QueryResult};
use weft_api::state::StateAccess;
use weft_api::transaction::context::Context;
use weft_api::transaction::decorator::Handler;
use weft_api::transaction::Tx;
use weft_tx::model::{Msg, UpdateValidatorsMsg, VALIDATORS_UPDATE_ROUTE};
use weft_types::app::{Address, CheckResult, DeliverResult, ValidatorUpdate};
use weft_types::codec::to_bytes_canonical;
use weft_types::error::TransactionError;
use weft_types::genesis::{GenesisOptions, GenesisParams};
use weft_types::keys::{prefixed, VALIDATORS_ADMIN_KEY, VALIDATORS_POWER_PREFIX};

/// The module name used for error codes and the genesis section.
pub const MODULE: &str = "validators";
/// The flat gas charge of one update message.
pub const UPDATE_GAS: u64 = 100;
/// The longest accepted validator public key, in bytes.
pub const MAX_PUB_KEY_BYTES: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorsError {
    #[error("update carries no validators")]
    NoUpdates,
    #[error("validator public key is empty")]
    EmptyPubKey,
    #[error("validator public key is {0} bytes; at most 64 are allowed")]
    PubKeyTooLong(usize),
    #[error("validator {0} is listed twice in one update")]
    DuplicatePubKey(String),
    #[error("no validators admin was set at genesis")]
    NoAdmin,
}

impl ValidatorsError {
    pub fn local_code(&self) -> u32 {
        match self {
            Self::NoUpdates => 1,
            Self::EmptyPubKey => 2,
            Self::PubKeyTooLong(_) => 3,
            Self::DuplicatePubKey(_) => 4,
            Self::NoAdmin => 5,
        }
    }
}

impl From<ValidatorsError> for TransactionError {
    fn from(e: ValidatorsError) -> Self {
        TransactionError::module(MODULE, e.local_code(), e.to_string())
    }
}

pub fn power_key(pub_key: &[u8]) -> Vec<u8> {
    prefixed(VALIDATORS_POWER_PREFIX, pub_key)
}

/// The admin address recorded at genesis, if any.
pub fn admin<S: StateAccess + ?Sized>(state: &S) -> Result<Option<Address>, TransactionError> {
    read(state, VALIDATORS_ADMIN_KEY)
}

/// The stored power of a validator. Unknown validators have power 0.
pub fn power_of<S: StateAccess + ?Sized>(
    state: &S,
    pub_key: &[u8],
) -> Result<u64, TransactionError> {
    Ok(read::<u64, _>(state, &power_key(pub_key))?.unwrap_or(0))
}

fn store_powers<S: StateAccess + ?Sized>(
    state: &mut S,
    updates: &[ValidatorUpdate],
) -> Result<(), TransactionError> {
    for u in updates {
        if u.power == 0 {
            state.delete(&power_key(&u.pub_key))?;
        } else {
            write(state, &power_key(&u.pub_key), &u.power)?;
        }
    }
    Ok(())
}

fn validate(msg: &UpdateValidatorsMsg) -> Result<(), ValidatorsError> {
    if msg.updates.is_empty() {
        return Err(ValidatorsError::NoUpdates);
    }
    let mut seen = BTreeSet::new();
    for u in &msg.updates {
        if u.pub_key.is_empty() {
            return Err(ValidatorsError::EmptyPubKey);
        }
        if u.pub_key.len() > MAX_PUB_KEY_BYTES {
            return Err(ValidatorsError::PubKeyTooLong(u.pub_key.len()));
        }
        if !seen.insert(u.pub_key.as_slice()) {
            return Err(ValidatorsError::DuplicatePubKey(hex::encode(&u.pub_key)));
        }
    }
    Ok(())
}

fn update_msg(tx: &dyn Tx) -> Result<&UpdateValidatorsMsg, TransactionError> {
    match signed_msg(tx)? {
        Msg::UpdateValidators(m) => Ok(m),
        _ => Err(wrong_message(VALIDATORS_UPDATE_ROUTE)),
    }
}

fn authorize(ctx: &Context, state: &dyn StateAccess) -> Result<(), TransactionError> {
    let admin = admin(state)?.ok_or(ValidatorsError::NoAdmin)?;
    if !ctx.is_signer(&admin) {
        return Err(TransactionError::Unauthorized(
            "only the validators admin may update validator powers".into(),
        ));
    }
    Ok(())
}

/// The terminal handler of `validators/update`.
///
/// Delivery persists the new powers and hands the updates to the harness as
/// the transaction's validator diff.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorsHandler;

impl Handler for ValidatorsHandler {
    fn check(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<CheckResult, TransactionError> {
        let msg = update_msg(tx)?;
        validate(msg)?;
        authorize(ctx, state)?;
        Ok(CheckResult {
            gas_wanted: UPDATE_GAS,
            ..Default::default()
        })
    }

    fn deliver(
        &self,
        ctx: &Context,
        state: &mut dyn StateAccess,
        tx: &dyn Tx,
    ) -> Result<DeliverResult, TransactionError> {
        let msg = update_msg(tx)?;
        validate(msg)?;
        authorize(ctx, state)?;
        store_powers(state, &msg.updates)?;
        tracing::info!(
            target: "validators",
            height = ctx.height(),
            updates = msg.updates.len(),
            earlier_in_block = ctx.pending_validator_updates().len(),
            "validator powers updated"
        );
        Ok(DeliverResult {
            diff: msg.updates.clone(),
            gas_used: UPDATE_GAS,
            log: format!("updated {} validators", msg.updates.len()),
            ..Default::default()
        })
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ValidatorsSection {
    admin: Address,
}

/// Records the admin from `{"validators": {"admin": hex}}` and the powers of
/// the initial validator set.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorsGenesis;

impl GenesisInitializer for ValidatorsGenesis {
    fn name(&self) -> &str {
        MODULE
    }

    fn from_genesis(
        &self,
        options: &GenesisOptions,
        params: &GenesisParams,
        state: &mut dyn StateAccess,
    ) -> Result<(), TransactionError> {
        if let Some(section) = options.section::<ValidatorsSection>(MODULE)? {
            write(state, VALIDATORS_ADMIN_KEY, &section.admin)?;
            tracing::info!(target: "genesis", module = MODULE, admin = %section.admin, "Validators admin set");
        }
        validate(&UpdateValidatorsMsg {
            updates: params.validators.clone(),
        })
        .or_else(|e| match e {
            ValidatorsError::NoUpdates => Ok(()),
            other => Err(other),
        })?;
        store_powers(state, &params.validators)
    }
}

/// Serves `/validators`: every stored power, or one validator's when the
/// path remainder names a hex public key. Values are SCALE-encoded `u64`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorsQuery;

impl QueryHandler for ValidatorsQuery {
    fn query(
        &self,
        req: &QueryRequest<'_>,
        state: &dyn StateAccess,
    ) -> Result<QueryResult, TransactionError> {
        let mut out = QueryResult::default();
        if !req.rest.is_empty() {
            let pub_key = hex::decode(req.rest).map_err(|e| {
                TransactionError::InvalidInput(format!("public key '{}': {e}", req.rest))
            })?;
            let power = power_of(state, &pub_key)?;
            out.push(pub_key, to_bytes_canonical(&power));
            return Ok(out);
        }
        for item in state.prefix_scan(VALIDATORS_POWER_PREFIX)? {
            let (key, value) = item?;
            let pub_key = key.get(VALIDATORS_POWER_PREFIX.len()..).unwrap_or_default();
            out.push(pub_key.to_vec(), value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{alice, bob, ctx, update, Scratch};
    use weft_types::codec::from_bytes_canonical;
    use weft_types::error::MODULE_CODE_BASE;

    fn with_admin(s: &mut Scratch) {
        let opts = GenesisOptions::from_json_bytes(
            format!(r#"{{"validators":{{"admin":"{}"}}}}"#, alice()).as_bytes(),
        )
        .unwrap();
        let params = GenesisParams {
            validators: vec![ValidatorUpdate::new(b"genesis-val".to_vec(), 10)],
            ..Default::default()
        };
        ValidatorsGenesis
            .from_genesis(&opts, &params, &mut s.ws())
            .unwrap();
    }

    #[test]
    fn genesis_records_admin_and_initial_powers() {
        let mut s = Scratch::default();
        with_admin(&mut s);
        let ws = s.ws();
        assert_eq!(admin(&ws).unwrap(), Some(alice()));
        assert_eq!(power_of(&ws, b"genesis-val").unwrap(), 10);
    }

    #[test]
    fn admin_delivery_returns_the_diff_and_persists_powers() {
        let mut s = Scratch::default();
        with_admin(&mut s);
        let mut ws = s.ws();
        let updates = vec![
            ValidatorUpdate::new(b"A".to_vec(), 10),
            ValidatorUpdate::new(b"genesis-val".to_vec(), 0),
        ];
        let res = ValidatorsHandler
            .deliver(&ctx().with_signers([alice()]), &mut ws, &update(alice(), updates.clone()))
            .unwrap();
        assert_eq!(res.diff, updates);
        assert_eq!(res.gas_used, UPDATE_GAS);
        assert_eq!(power_of(&ws, b"A").unwrap(), 10);
        assert_eq!(power_of(&ws, b"genesis-val").unwrap(), 0);

        let q = ValidatorsQuery
            .query(
                &QueryRequest {
                    path: "/validators",
                    rest: "",
                    modifier: None,
                    data: b"",
                    height: 1,
                },
                &ws,
            )
            .unwrap();
        assert_eq!(q.keys, vec![b"A".to_vec()]);
        assert_eq!(from_bytes_canonical::<u64>(&q.values[0]).unwrap(), 10);
    }

    #[test]
    fn non_admin_is_unauthorized() {
        let mut s = Scratch::default();
        with_admin(&mut s);
        let mut ws = s.ws();
        let tx = update(bob(), vec![ValidatorUpdate::new(b"A".to_vec(), 1)]);
        let err = ValidatorsHandler
            .check(&ctx().with_signers([bob()]), &mut ws, &tx)
            .unwrap_err();
        assert!(matches!(err, TransactionError::Unauthorized(_)));
    }

    #[test]
    fn without_admin_updates_are_refused() {
        let mut s = Scratch::default();
        let mut ws = s.ws();
        let tx = update(alice(), vec![ValidatorUpdate::new(b"A".to_vec(), 1)]);
        let err = ValidatorsHandler
            .check(&ctx().with_signers([alice()]), &mut ws, &tx)
            .unwrap_err();
        assert_eq!(err.abci_code(), MODULE_CODE_BASE + 5);
    }

    #[test]
    fn malformed_updates_carry_module_codes() {
        let mut s = Scratch::default();
        with_admin(&mut s);
        let mut ws = s.ws();
        let ctx = ctx().with_signers([alice()]);
        let cases = [
            (vec![], 1),
            (vec![ValidatorUpdate::new(Vec::new(), 1)], 2),
            (vec![ValidatorUpdate::new(vec![7; 65], 1)], 3),
            (
                vec![ValidatorUpdate::new(b"A".to_vec(), 1), ValidatorUpdate::new(b"A".to_vec(), 2)],
                4,
            ),
        ];
        for (updates, local) in cases {
            let err = ValidatorsHandler
                .deliver(&ctx, &mut ws, &update(alice(), updates))
                .unwrap_err();
            assert_eq!(err.abci_code(), MODULE_CODE_BASE + local, "{err}");
        }
    }
}
