// Dashboard Summaries - single-pass group-by over the dataset
// Model and brand groupings; malformed prices contribute 0 to values
// Value sums saturate at the i64 bounds instead of overflowing

use crate::dataset::Record;
use serde::Serialize;
use std::collections::BTreeMap;

/// Count and summed price for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStat {
    pub count: usize,
    pub value: i64,
}

impl GroupStat {
    fn add(&mut self, price: i64) {
        self.count += 1;
        self.value = self.value.saturating_add(price);
    }
}

pub type GroupSummary = BTreeMap<String, GroupStat>;

/// Model → { count, value }
pub fn car_summary(records: &[Record]) -> GroupSummary {
    let mut summary = GroupSummary::new();
    for record in records {
        summary
            .entry(record.model.clone())
            .or_default()
            .add(record.price_or_zero());
    }
    summary
}

/// Brand → { count, value }
pub fn brand_summary(records: &[Record]) -> GroupSummary {
    let mut summary = GroupSummary::new();
    for record in records {
        summary
            .entry(record.brand())
            .or_default()
            .add(record.price_or_zero());
    }
    summary
}

/// Model → summed value
pub fn car_values(records: &[Record]) -> BTreeMap<String, i64> {
    let mut values = BTreeMap::new();
    for record in records {
        let value = values.entry(record.model.clone()).or_insert(0i64);
        *value = value.saturating_add(record.price_or_zero());
    }
    values
}

/// Brand → Model → count
pub fn car_counts(records: &[Record]) -> BTreeMap<String, BTreeMap<String, usize>> {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for record in records {
        *counts
            .entry(record.brand())
            .or_default()
            .entry(record.model.clone())
            .or_insert(0) += 1;
    }
    counts
}
