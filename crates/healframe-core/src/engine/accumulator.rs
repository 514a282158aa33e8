//! Result accumulation during validation.
//!
//! `ResultAccumulator` counts violations per (column, rule) while columns are
//! evaluated on parallel workers.
use dashmap::DashMap;
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::RuleResult;

/// Thread-safe violation counter.
///
/// Every rule of every evaluated column is registered, so rules that found
/// nothing still show up with a zero count.
pub struct ResultAccumulator {
    column_results: DashMap<(String, String), AtomicUsize>, // (column_name, rule_name) -> error_count
    total_rows: AtomicUsize,
}

impl Default for ResultAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self {
            column_results: DashMap::new(),
            total_rows: AtomicUsize::new(0),
        }
    }

    /// Must be called before `to_results()` to get correct percentages.
    pub fn set_total_rows(&self, total_rows: usize) {
        self.total_rows.store(total_rows, Ordering::Relaxed);
    }

    pub fn record_column_result(&self, column_name: &str, rule_name: &str, error_count: usize) {
        self.column_results
            .entry((column_name.to_string(), rule_name.to_string()))
            .or_insert_with(|| AtomicUsize::new(0))
            .fetch_add(error_count, Ordering::Relaxed);
    }

    /// Rule results per column, sorted by column then rule name.
    pub fn to_results(&self) -> BTreeMap<String, Vec<RuleResult>> {
        let mut column_results: BTreeMap<String, Vec<RuleResult>> = BTreeMap::new();
        let total_rows = self.total_rows.load(Ordering::Relaxed);

        let mut sorted: Vec<_> = self.column_results.iter().collect();
        sorted.sort_by(|a, b| a.key().cmp(b.key()));

        for entry in sorted {
            let (column_name, rule_name) = entry.key();
            let error_count = entry.value().load(Ordering::Relaxed);
            let error_percentage = if total_rows > 0 {
                (error_count as f64 / total_rows as f64) * 100.
            } else {
                0.0
            };

            column_results
                .entry(column_name.clone())
                .or_default()
                .push(RuleResult::new(rule_name.clone(), error_count, error_percentage));
        }
        column_results
    }
}
