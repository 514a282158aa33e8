use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// One broken rule on one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 0-based position in the validated table
    pub row: usize,
    pub column: String,
    /// `type`, `nullable` or a check kind such as `greater-or-equal`
    pub rule: String,
    /// Display of the raw cell, `None` for null
    pub value: Option<String>,
}

impl Violation {
    pub fn new(row: usize, column: &str, rule: &str, value: Option<String>) -> Self {
        Self {
            row,
            column: column.to_string(),
            rule: rule.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    AllValid,
    /// Rows with at least one violation were dropped
    Healed {
        removed_row_count: usize,
        violations: Vec<Violation>,
    },
}

impl ValidationOutcome {
    pub fn is_healed(&self) -> bool {
        matches!(self, ValidationOutcome::Healed { .. })
    }

    pub fn removed_row_count(&self) -> usize {
        match self {
            ValidationOutcome::AllValid => 0,
            ValidationOutcome::Healed {
                removed_row_count, ..
            } => *removed_row_count,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationOutcome::AllValid => &[],
            ValidationOutcome::Healed { violations, .. } => violations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub rule_name: String,
    pub error_count: usize,
    pub error_percentage: f64,
}

impl RuleResult {
    pub fn new(rule_name: String, error_count: usize, error_percentage: f64) -> Self {
        Self {
            rule_name,
            error_count,
            error_percentage,
        }
    }
}

/// Per column, per rule counts of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_rows: usize,
    pub removed_rows: usize,
    pub column_results: BTreeMap<String, Vec<RuleResult>>,
}

impl ValidationSummary {
    pub fn kept_rows(&self) -> usize {
        self.total_rows - self.removed_rows
    }

    pub fn total_errors(&self) -> usize {
        self.column_results
            .values()
            .flatten()
            .map(|r| r.error_count)
            .sum()
    }
}

/// Result of one `validate` call: the outcome and the table to hand on.
#[derive(Debug, Clone)]
pub struct Validated {
    pub outcome: ValidationOutcome,
    pub table: Table,
    pub summary: ValidationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_valid_helpers() {
        let outcome = ValidationOutcome::AllValid;
        assert!(!outcome.is_healed());
        assert_eq!(outcome.removed_row_count(), 0);
        assert!(outcome.violations().is_empty());
    }

    #[test]
    fn test_healed_serializes_with_status() {
        let outcome = ValidationOutcome::Healed {
            removed_row_count: 1,
            violations: vec![Violation::new(2, "age_years", "greater-or-equal", Some("-1".into()))],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "healed");
        assert_eq!(json["removed_row_count"], 1);
        assert_eq!(json["violations"][0]["rule"], "greater-or-equal");
        assert_eq!(json["violations"][0]["value"], "-1");
    }

    #[test]
    fn test_summary_totals() {
        let mut summary = ValidationSummary {
            total_rows: 5,
            removed_rows: 1,
            ..Default::default()
        };
        summary.column_results.insert(
            "age_years".into(),
            vec![
                RuleResult::new("greater-or-equal".into(), 1, 20.0),
                RuleResult::new("less-or-equal".into(), 0, 0.0),
            ],
        );
        assert_eq!(summary.kept_rows(), 4);
        assert_eq!(summary.total_errors(), 1);
    }
}
