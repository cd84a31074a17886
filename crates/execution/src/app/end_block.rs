// Path: crates/execution/src/app/end_block.rs

//! The per-block validator-update accumulator.

use std::collections::BTreeMap;
use weft_types::app::ValidatorUpdate;

/// Collects validator power changes from the deliveries of one block.
///
/// Later updates for the same public key replace earlier ones. The flushed
/// diff is ordered by public key, so every node emits the same bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidatorUpdates {
    pending: BTreeMap<Vec<u8>, u64>,
}

impl ValidatorUpdates {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `updates`; the last write per key wins.
    pub fn merge(&mut self, updates: impl IntoIterator<Item = ValidatorUpdate>) {
        for u in updates {
            self.pending.insert(u.pub_key, u.power);
        }
    }

    /// Number of distinct public keys pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when no update is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The current de-duplicated diff, leaving the accumulator as is.
    pub fn snapshot(&self) -> Vec<ValidatorUpdate> {
        self.pending
            .iter()
            .map(|(k, p)| ValidatorUpdate::new(k.clone(), *p))
            .collect()
    }

    /// Drains the accumulator into the block's validator diff.
    pub fn take(&mut self) -> Vec<ValidatorUpdate> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(k, p)| ValidatorUpdate::new(k, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_per_key_wins() {
        let mut acc = ValidatorUpdates::new();
        acc.merge([ValidatorUpdate::new(b"A".to_vec(), 10), ValidatorUpdate::new(b"B".to_vec(), 15)]);
        acc.merge([ValidatorUpdate::new(b"A".to_vec(), 1)]);
        acc.merge([ValidatorUpdate::new(b"B".to_vec(), 2)]);
        assert_eq!(acc.len(), 2);
        assert_eq!(
            acc.take(),
            vec![ValidatorUpdate::new(b"A".to_vec(), 1), ValidatorUpdate::new(b"B".to_vec(), 2)]
        );
        assert!(acc.is_empty());
        assert!(acc.take().is_empty());
    }

    #[test]
    fn zero_power_is_kept_as_a_removal() {
        let mut acc = ValidatorUpdates::new();
        acc.merge([ValidatorUpdate::new(b"A".to_vec(), 5), ValidatorUpdate::new(b"A".to_vec(), 0)]);
        assert_eq!(acc.snapshot(), vec![ValidatorUpdate::new(b"A".to_vec(), 0)]);
        assert_eq!(acc.len(), 1);
    }
}
