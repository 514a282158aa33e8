use chrono::Local;
use healframe_core::{Validated, ValidationOutcome, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Error;

use crate::Reporter;

#[derive(Serialize, Deserialize)]
pub struct JsonFormatter {
    version: String,
    timestamp: String,
    input: Option<String>,
    result: Option<RunFormatter>,
}

#[derive(Serialize, Deserialize)]
struct RunFormatter {
    outcome: String,
    total_rows: usize,
    kept_rows: usize,
    removed_rows: usize,
    columns: Vec<ColumnFormatter>,
    violations: Vec<Violation>,
}

#[derive(Serialize, Deserialize)]
struct ColumnFormatter {
    name: String,
    rules: Vec<RuleFormatter>,
}

#[derive(Serialize, Deserialize)]
struct RuleFormatter {
    name: String,
    errors: usize,
    error_percent: f64,
}

impl JsonFormatter {
    pub fn new(version: String) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self {
            version,
            timestamp,
            input: None,
            result: None,
        }
    }

    pub fn with_input(mut self, path: &str) -> Self {
        self.input = Some(path.to_string());
        self
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Reporter for JsonFormatter {
    fn on_start(&self) {}

    fn on_loading(&self, _path: &str) {}

    fn on_validation_start(&self) {}

    fn on_result(&mut self, validated: &Validated) {
        let summary = &validated.summary;
        let outcome = match validated.outcome {
            ValidationOutcome::AllValid => "all_valid",
            ValidationOutcome::Healed { .. } => "healed",
        };
        let columns = summary
            .column_results
            .iter()
            .map(|(name, results)| ColumnFormatter {
                name: name.clone(),
                rules: results
                    .iter()
                    .map(|r| RuleFormatter {
                        name: r.rule_name.clone(),
                        errors: r.error_count,
                        error_percent: r.error_percentage,
                    })
                    .collect(),
            })
            .collect();
        self.result = Some(RunFormatter {
            outcome: outcome.to_string(),
            total_rows: summary.total_rows,
            kept_rows: summary.kept_rows(),
            removed_rows: summary.removed_rows,
            columns,
            violations: validated.outcome.violations().to_vec(),
        });
    }

    fn on_complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use healframe_core::{RuleResult, Table, ValidationSummary};
    use serde_json::Value;

    #[test]
    fn test_json_report_shape() {
        let mut summary = ValidationSummary {
            total_rows: 5,
            removed_rows: 1,
            ..Default::default()
        };
        summary.column_results.insert(
            "age_years".to_string(),
            vec![RuleResult::new("greater-or-equal".to_string(), 1, 20.0)],
        );
        let validated = Validated {
            outcome: ValidationOutcome::Healed {
                removed_row_count: 1,
                violations: vec![Violation::new(
                    2,
                    "age_years",
                    "greater-or-equal",
                    Some("-1".to_string()),
                )],
            },
            table: Table::try_from_columns(vec![]).unwrap(),
            summary,
        };

        let mut formatter = JsonFormatter::new("0.1.0".to_string()).with_input("raw.csv");
        formatter.on_result(&validated);
        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();

        assert_eq!(json["version"], "0.1.0");
        assert_eq!(json["input"], "raw.csv");
        assert_eq!(json["result"]["outcome"], "healed");
        assert_eq!(json["result"]["kept_rows"], 4);
        assert_eq!(json["result"]["columns"][0]["name"], "age_years");
        assert_eq!(json["result"]["columns"][0]["rules"][0]["errors"], 1);
        assert_eq!(json["result"]["violations"][0]["row"], 2);
        assert_eq!(json["result"]["violations"][0]["value"], "-1");
    }

    #[test]
    fn test_json_before_result() {
        let formatter = JsonFormatter::new("0.1.0".to_string());
        let json: Value = serde_json::from_str(&formatter.to_json().unwrap()).unwrap();
        assert!(json["result"].is_null());
        assert!(json["timestamp"].is_string());
    }
}
