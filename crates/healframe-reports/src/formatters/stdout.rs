use std::fmt::Write;

use healframe_core::{Validated, ValidationOutcome, Violation};
use prettytable::{format, Cell, Row, Table};

use crate::{
    utils::numbers::{format_numbers, format_percent},
    Reporter,
};

pub struct StdOutFormatter {
    intro: String,
    intro_len: usize,
}

impl StdOutFormatter {
    pub fn new(version: String) -> Self {
        let s = format!("HealFrame v{} - Validation Report", version);
        let n = s.len();
        Self {
            intro: s,
            intro_len: n,
        }
    }

    /// Full text report of one run.
    pub fn render(&self, validated: &Validated) -> String {
        let summary = &validated.summary;
        let mut out = String::new();
        let status = match validated.outcome {
            ValidationOutcome::AllValid => "ALL VALID",
            ValidationOutcome::Healed { .. } => "HEALED",
        };
        let _ = writeln!(
            out,
            "\n{} rows checked - {}",
            format_numbers(summary.total_rows),
            status
        );

        for (column_name, rule_results) in &summary.column_results {
            let _ = writeln!(out, "  {}:", column_name);

            let max_len = rule_results
                .iter()
                .map(|r| r.rule_name.len())
                .max()
                .unwrap_or(0);

            for rule in rule_results {
                let dots = ".".repeat(max_len - rule.rule_name.len() + 10);
                let _ = writeln!(
                    out,
                    "    {} {} {:>6} ({})",
                    rule.rule_name,
                    dots,
                    format_numbers(rule.error_count),
                    format_percent(rule.error_percentage, summary.total_rows)
                );
            }
        }

        let violations = validated.outcome.violations();
        if !violations.is_empty() {
            let _ = writeln!(out, "\nRemoved rows:");
            let _ = write!(out, "{}", violation_table(violations));
        }

        let _ = writeln!(out, "\n===================================");
        let _ = writeln!(
            out,
            "Result: {} kept, {} removed, {} violations",
            format_numbers(summary.kept_rows()),
            format_numbers(summary.removed_rows),
            format_numbers(violations.len())
        );
        out
    }
}

fn violation_table(violations: &[Violation]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        Cell::new("Row"),
        Cell::new("Column"),
        Cell::new("Rule"),
        Cell::new("Value"),
    ]));
    for violation in violations {
        table.add_row(Row::new(vec![
            Cell::new(&violation.row.to_string()),
            Cell::new(&violation.column),
            Cell::new(&violation.rule),
            Cell::new(violation.value.as_deref().unwrap_or("null")),
        ]));
    }
    table.to_string()
}

impl Reporter for StdOutFormatter {
    fn on_start(&self) {
        println!("{}", self.intro);
        println!("{}", "=".repeat(self.intro_len));
    }

    fn on_loading(&self, path: &str) {
        println!("Loading {}...", path);
    }

    fn on_validation_start(&self) {
        println!("Validating...");
    }

    fn on_result(&mut self, validated: &Validated) {
        print!("{}", self.render(validated));
    }

    fn on_complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use healframe_core::{RuleResult, Table, ValidationSummary};

    fn healed() -> Validated {
        let mut summary = ValidationSummary {
            total_rows: 5,
            removed_rows: 1,
            ..Default::default()
        };
        summary.column_results.insert(
            "age_years".to_string(),
            vec![RuleResult::new("greater-or-equal".to_string(), 1, 20.0)],
        );
        Validated {
            outcome: ValidationOutcome::Healed {
                removed_row_count: 1,
                violations: vec![
                    Violation::new(2, "age_years", "greater-or-equal", Some("-1".to_string())),
                    Violation::new(2, "billing_cost", "nullable", None),
                ],
            },
            table: Table::try_from_columns(vec![]).unwrap(),
            summary,
        }
    }

    #[test]
    fn test_render_healed() {
        let text = StdOutFormatter::new("0.1.0".to_string()).render(&healed());
        assert!(text.contains("5 rows checked - HEALED"));
        assert!(text.contains("age_years:"));
        assert!(text.contains("(20.00%)"));
        assert!(text.contains("greater-or-equal"));
        assert!(text.contains("null"));
        assert!(text.contains("Result: 4 kept, 1 removed, 2 violations"));
    }

    #[test]
    fn test_render_all_valid_has_no_table() {
        let validated = Validated {
            outcome: ValidationOutcome::AllValid,
            table: Table::try_from_columns(vec![]).unwrap(),
            summary: ValidationSummary {
                total_rows: 3,
                ..Default::default()
            },
        };
        let text = StdOutFormatter::new("0.1.0".to_string()).render(&validated);
        assert!(text.contains("ALL VALID"));
        assert!(!text.contains("Removed rows"));
    }
}
