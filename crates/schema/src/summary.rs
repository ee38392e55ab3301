//! Aggregate statistics over a batch of enhanced transactions.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::enhanced_tx::EnhancedTransaction;

/// Transaction type → count, keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCounts(Vec<(String, u64)>);

impl TypeCounts {
    pub fn increment(&mut self, tx_type: &str) {
        match self.0.iter_mut().find(|(t, _)| t == tx_type) {
            Some((_, n)) => *n += 1,
            None => self.0.push((tx_type.to_string(), 1)),
        }
    }

    pub fn get(&self, tx_type: &str) -> Option<u64> {
        self.0.iter().find(|(t, _)| t == tx_type).map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(t, n)| (t.as_str(), *n))
    }
}

impl Serialize for TypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (t, n) in &self.0 {
            map.serialize_entry(t, n)?;
        }
        map.end()
    }
}

/// Earliest and latest block time seen. Both are `None` for an empty batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub earliest: Option<i64>,
    pub latest: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub successful: u64,
    pub failed: u64,
    pub total_fees: u64,
    pub total_compute_units: u64,
    pub transaction_types: TypeCounts,
    pub time_range: TimeRange,
}

impl Summary {
    /// Single pass over `txs`.
    ///
    /// A transaction without a block time counts as time 0 for the range, so
    /// one such record pulls `earliest` down to 0.
    pub fn from_transactions(txs: &[EnhancedTransaction]) -> Self {
        let mut s = Summary::default();

        for tx in txs {
            if tx.success {
                s.successful += 1;
            } else {
                s.failed += 1;
            }

            s.total_fees = s.total_fees.saturating_add(tx.fee);
            s.total_compute_units = s
                .total_compute_units
                .saturating_add(tx.compute_units_consumed.unwrap_or(0));
            s.transaction_types.increment(&tx.tx_type);

            let t = tx.block_time.unwrap_or(0);
            s.time_range.earliest = Some(s.time_range.earliest.map_or(t, |e| e.min(t)));
            s.time_range.latest = Some(s.time_range.latest.map_or(t, |l| l.max(t)));
        }

        s
    }

    pub fn total(&self) -> u64 {
        self.successful + self.failed
    }
}
