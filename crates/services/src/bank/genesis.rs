// Path: crates/services/src/bank/genesis.rs

use super::{set_balance, MODULE};
use serde::Deserialize;
use std::collections::BTreeSet;
use weft_api::genesis::GenesisInitializer;
use weft_api::state::StateAccess;
use weft_types::app::Address;
use weft_types::error::TransactionError;
use weft_types::genesis::{GenesisOptions, GenesisParams};

/// One funded account in the `bank` genesis section.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct GenesisBalance {
    pub address: Address,
    pub amount: u64,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct BankSection {
    #[serde(default)]
    balances: Vec<GenesisBalance>,
}

/// Seeds balances from `{"bank": {"balances": [{"address": hex, "amount": n}]}}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BankGenesis;

impl GenesisInitializer for BankGenesis {
    fn name(&self) -> &str {
        MODULE
    }

    fn from_genesis(
        &self,
        options: &GenesisOptions,
        _params: &GenesisParams,
        state: &mut dyn StateAccess,
    ) -> Result<(), TransactionError> {
        let Some(section) = options.section::<BankSection>(MODULE)? else {
            return Ok(());
        };
        let mut seen = BTreeSet::new();
        let mut supply: u64 = 0;
        for entry in &section.balances {
            if !seen.insert(entry.address) {
                return Err(TransactionError::Duplicate(format!(
                    "genesis balance for {} listed twice",
                    entry.address
                )));
            }
            supply = supply.checked_add(entry.amount).ok_or_else(|| {
                TransactionError::InvalidInput("genesis supply overflows u64".into())
            })?;
            if entry.amount > 0 {
                set_balance(state, &entry.address, entry.amount)?;
            }
        }
        tracing::info!(
            target: "genesis",
            module = MODULE,
            accounts = seen.len(),
            supply,
            "Seeded bank balances"
        );
        Ok(())
    }
}
