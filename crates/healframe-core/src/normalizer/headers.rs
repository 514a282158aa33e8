use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{Field, Schema};

use crate::errors::FrameError;
use crate::table::Table;

/// Canonical form of a raw header.
///
/// Lowercase, whitespace runs become a single `_`, and anything outside
/// `[a-z0-9_]` is dropped: `"Billing Cost"` -> `"billing_cost"`.
pub fn canonicalize_header(raw: &str) -> String {
    let mut canonical = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            continue;
        }
        if pending_separator && !canonical.is_empty() {
            canonical.push('_');
        }
        pending_separator = false;
        canonical.push(c);
    }
    canonical
}

/// Rename every column of `table` to its canonical header.
///
/// # Errors
///
/// - `FrameError::HeaderCollision` if two raw headers share a canonical form
/// - `FrameError::InvalidHeader` if a header has no valid character
pub fn normalize_headers(table: &Table) -> Result<Table, FrameError> {
    let schema = table.schema();
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(schema.fields().len());
    let mut fields = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let raw = field.name().as_str();
        let canonical = canonicalize_header(raw);
        if canonical.is_empty() {
            return Err(FrameError::InvalidHeader {
                raw: raw.to_string(),
            });
        }
        if let Some(first) = seen.get(&canonical) {
            return Err(FrameError::HeaderCollision {
                first: first.to_string(),
                second: raw.to_string(),
                canonical,
            });
        }
        fields.push(Field::new(
            canonical.as_str(),
            field.data_type().clone(),
            field.is_nullable(),
        ));
        seen.insert(canonical, raw);
    }

    Table::try_from_parts(
        Arc::new(Schema::new(fields)),
        table.batch().columns().to_vec(),
        table.num_rows(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array};

    fn table_with_headers(headers: &[&str]) -> Table {
        let columns = headers
            .iter()
            .map(|h| (*h, Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef))
            .collect();
        Table::try_from_columns(columns).unwrap()
    }

    #[test]
    fn test_canonicalize_examples() {
        assert_eq!(canonicalize_header("CUSTOMER_ID"), "customer_id");
        assert_eq!(canonicalize_header("Billing Cost"), "billing_cost");
        assert_eq!(canonicalize_header("Age_Years"), "age_years");
        assert_eq!(canonicalize_header("Label_Class"), "label_class");
    }

    #[test]
    fn test_canonicalize_collapses_whitespace_runs() {
        assert_eq!(canonicalize_header("  Billing \t  Cost  "), "billing_cost");
        assert_eq!(canonicalize_header("Total Cost ($)"), "total_cost");
        assert_eq!(canonicalize_header("a - b"), "a_b");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for raw in ["Billing Cost", "  X  Y ", "Total Cost ($)", "already_ok", "A__B"] {
            let once = canonicalize_header(raw);
            assert_eq!(canonicalize_header(&once), once);
        }
    }

    #[test]
    fn test_normalize_headers_scenario() {
        let table = table_with_headers(&["CUSTOMER_ID", "Billing Cost", "Age_Years", "Label_Class"]);
        let normalized = normalize_headers(&table).unwrap();
        assert_eq!(
            normalized.column_names(),
            vec!["customer_id", "billing_cost", "age_years", "label_class"]
        );
        assert_eq!(normalized.num_rows(), 2);
    }

    #[test]
    fn test_normalize_headers_idempotent() {
        let table = table_with_headers(&["First Name", "AGE"]);
        let once = normalize_headers(&table).unwrap();
        let twice = normalize_headers(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_headers_collision_reports_both() {
        let table = table_with_headers(&["Billing Cost", "billing_cost"]);
        match normalize_headers(&table) {
            Err(FrameError::HeaderCollision {
                first,
                second,
                canonical,
            }) => {
                assert_eq!(first, "Billing Cost");
                assert_eq!(second, "billing_cost");
                assert_eq!(canonical, "billing_cost");
            }
            other => panic!("Expected HeaderCollision, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_headers_empty_canonical() {
        let table = table_with_headers(&["id", "$$$"]);
        assert!(matches!(
            normalize_headers(&table),
            Err(FrameError::InvalidHeader { .. })
        ));
    }
}
