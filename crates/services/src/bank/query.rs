// Path: crates/services/src/bank/query.rs

use super::balance_of;
use weft_api::query::{QueryHandler, QueryRequest, QueryResult};
use weft_api::state::StateAccess;
use weft_types::app::{Address, ADDRESS_LEN};
use weft_types::codec::to_bytes_canonical;
use weft_types::error::TransactionError;
use weft_types::keys::{prefixed, BANK_BALANCE_PREFIX};

/// Serves `/balances`.
///
/// The address comes from the path remainder as hex (`/balances/<hex>`) or,
/// when the remainder is empty, from the raw query data. Keys in the result
/// are address bytes and values SCALE-encoded `u64` balances.
///
/// - no modifier: the balance of exactly that address (zero when unfunded);
/// - `?prefix`: every non-zero balance whose address starts with the given bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct BalancesQuery;

fn target(req: &QueryRequest<'_>) -> Result<Vec<u8>, TransactionError> {
    if req.rest.is_empty() {
        return Ok(req.data.to_vec());
    }
    hex::decode(req.rest)
        .map_err(|e| TransactionError::InvalidInput(format!("address '{}': {e}", req.rest)))
}

impl QueryHandler for BalancesQuery {
    fn query(
        &self,
        req: &QueryRequest<'_>,
        state: &dyn StateAccess,
    ) -> Result<QueryResult, TransactionError> {
        let target = target(req)?;
        let mut out = QueryResult::default();
        match req.modifier {
            None => {
                let bytes: [u8; ADDRESS_LEN] = target.as_slice().try_into().map_err(|_| {
                    TransactionError::InvalidInput(format!(
                        "address must be {ADDRESS_LEN} bytes, got {}",
                        target.len()
                    ))
                })?;
                let address = Address(bytes);
                let balance = balance_of(state, &address)?;
                out.push(address.as_ref().to_vec(), to_bytes_canonical(&balance));
            }
            Some("prefix") => {
                let scan_prefix = prefixed(BANK_BALANCE_PREFIX, &target);
                for item in state.prefix_scan(&scan_prefix)? {
                    let (key, value) = item?;
                    let address = key.get(BANK_BALANCE_PREFIX.len()..).unwrap_or_default();
                    out.push(address.to_vec(), value);
                }
            }
            Some(other) => {
                return Err(TransactionError::InvalidInput(format!(
                    "unsupported modifier '{other}'"
                )))
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::set_balance;
    use crate::testing::{alice, bob, Scratch};
    use weft_types::codec::from_bytes_canonical;

    fn ask<'a>(
        rest: &'a str,
        modifier: Option<&'a str>,
        data: &'a [u8],
    ) -> QueryRequest<'a> {
        QueryRequest {
            path: "/balances",
            rest,
            modifier,
            data,
            height: 1,
        }
    }

    fn seeded(s: &mut Scratch) {
        let mut ws = s.ws();
        set_balance(&mut ws, &alice(), 70).unwrap();
        set_balance(&mut ws, &bob(), 30).unwrap();
    }

    #[test]
    fn exact_lookup_by_hex_or_data() {
        let mut s = Scratch::default();
        seeded(&mut s);
        let ws = s.ws();

        let hex_addr = alice().to_string();
        let res = BalancesQuery.query(&ask(&hex_addr, None, b""), &ws).unwrap();
        assert_eq!(res.keys, vec![alice().as_ref().to_vec()]);
        assert_eq!(from_bytes_canonical::<u64>(&res.values[0]).unwrap(), 70);

        let res = BalancesQuery.query(&ask("", None, bob().as_ref()), &ws).unwrap();
        assert_eq!(from_bytes_canonical::<u64>(&res.values[0]).unwrap(), 30);

        let unfunded = Address([0x77; 20]);
        let res = BalancesQuery.query(&ask("", None, unfunded.as_ref()), &ws).unwrap();
        assert_eq!(from_bytes_canonical::<u64>(&res.values[0]).unwrap(), 0);
    }

    #[test]
    fn prefix_lists_matching_accounts_in_key_order() {
        let mut s = Scratch::default();
        seeded(&mut s);
        let ws = s.ws();

        let res = BalancesQuery.query(&ask("", Some("prefix"), b""), &ws).unwrap();
        assert_eq!(res.keys, vec![alice().as_ref().to_vec(), bob().as_ref().to_vec()]);

        let res = BalancesQuery
            .query(&ask("", Some("prefix"), &alice().as_ref()[..1]), &ws)
            .unwrap();
        assert_eq!(res.keys, vec![alice().as_ref().to_vec()]);
    }

    #[test]
    fn bad_requests_are_invalid_input() {
        let mut s = Scratch::default();
        let ws = s.ws();
        for req in [ask("zz", None, b""), ask("", None, b"short"), ask("", Some("all"), b"")] {
            assert!(matches!(
                BalancesQuery.query(&req, &ws),
                Err(TransactionError::InvalidInput(_))
            ));
        }
    }
}
