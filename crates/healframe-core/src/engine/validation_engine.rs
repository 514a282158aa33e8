use std::collections::BTreeSet;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{ArrowPrimitiveType, Float64Type, Int64Type};
use arrow_array::{PrimitiveArray, StringArray};
use num_traits::ToPrimitive;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use super::{accumulator::ResultAccumulator, healing::remove_rows};
use crate::{
    compiler::{compile_schema, BoundColumn},
    errors::FrameError,
    rules::{NumericRule, StringRule, NULLABLE_RULE, TYPE_RULE},
    schema::Schema,
    table::{display_cell, Table},
    validator::ExecutableColumn,
    Validated, ValidationOutcome, ValidationSummary, Violation,
};

/// A violation with its ordering key: (row, schema position, rule position).
type Keyed = ((usize, usize, usize), Violation);

/// Evaluates bound columns against one table.
///
/// Every rule of every column runs over every row; nothing stops at the first
/// failure. Columns are independent so they are evaluated on the rayon pool,
/// and their violation lists are merged before anything is removed.
pub struct ValidationEngine<'a> {
    columns: &'a [BoundColumn],
}

impl<'a> ValidationEngine<'a> {
    pub fn new(columns: &'a [BoundColumn]) -> Self {
        Self { columns }
    }

    /// All violations ordered by row, then schema column order, then rule order.
    pub fn evaluate(&self, report: &ResultAccumulator) -> Result<Vec<Violation>, FrameError> {
        let per_column = self
            .columns
            .par_iter()
            .enumerate()
            .map(|(position, bound)| evaluate_column(position, bound, report))
            .collect::<Result<Vec<Vec<Keyed>>, FrameError>>()?;

        let mut merged: Vec<Keyed> = per_column.into_iter().flatten().collect();
        merged.sort_by_key(|(key, _)| *key);
        Ok(merged.into_iter().map(|(_, v)| v).collect())
    }
}

/// Validate `table` against `schema` and remove every row with a violation.
///
/// Surviving rows keep their input values; coercion only feeds the checks.
///
/// # Errors
///
/// - `FrameError::InvalidSchema` for checks that do not fit their column
/// - `FrameError::SchemaMismatch` for a missing required column
/// - `FrameError::TypeMismatch` for a non-coerced column of the wrong type
pub fn validate(table: &Table, schema: &Schema) -> Result<Validated, FrameError> {
    let span = info_span!("validate", rows = table.num_rows(), columns = schema.len());
    let _enter = span.enter();

    let bound = compile_schema(schema, table)?;
    let report = ResultAccumulator::new();
    report.set_total_rows(table.num_rows());

    let violations = ValidationEngine::new(&bound).evaluate(&report)?;
    let rows: BTreeSet<usize> = violations.iter().map(|v| v.row).collect();

    let summary = ValidationSummary {
        total_rows: table.num_rows(),
        removed_rows: rows.len(),
        column_results: report.to_results(),
    };

    if rows.is_empty() {
        info!("all rows valid");
        return Ok(Validated {
            outcome: ValidationOutcome::AllValid,
            table: table.clone(),
            summary,
        });
    }

    let healed = remove_rows(table, &rows)?;
    warn!(
        removed = rows.len(),
        violations = violations.len(),
        kept = healed.num_rows(),
        "removed rows violating the schema"
    );
    Ok(Validated {
        outcome: ValidationOutcome::Healed {
            removed_row_count: rows.len(),
            violations,
        },
        table: healed,
        summary,
    })
}

fn evaluate_column(
    position: usize,
    bound: &BoundColumn,
    report: &ResultAccumulator,
) -> Result<Vec<Keyed>, FrameError> {
    let column = &bound.column;
    let name = column.get_name();
    let type_check = column.type_check();

    // Failed rows are null in `typed`, so neither the null check nor the
    // value checks see them again.
    let (typed, failed) = if column.coerces() {
        let coerced = type_check.coerce(&bound.array)?;
        report.record_column_result(name, TYPE_RULE, coerced.failed.len());
        (coerced.array, coerced.failed)
    } else {
        (type_check.conform(&bound.array)?, Vec::new())
    };

    let mut hits: Vec<(usize, &str, Vec<usize>)> = vec![(0, TYPE_RULE, failed)];

    if let Some(null_check) = column.null_check() {
        let nulls = null_check.validate(typed.as_ref(), &hits[0].2);
        report.record_column_result(name, NULLABLE_RULE, nulls.len());
        hits.push((1, NULLABLE_RULE, nulls));
    }

    let checked = match column {
        ExecutableColumn::Integer { rules, .. } => run_numeric::<Int64Type>(name, rules, &typed)?,
        ExecutableColumn::Float { rules, .. } => run_numeric::<Float64Type>(name, rules, &typed)?,
        ExecutableColumn::String { rules, .. } => run_string(name, rules, &typed)?,
    };
    for (index, (rule_name, rows)) in checked.into_iter().enumerate() {
        report.record_column_result(name, rule_name, rows.len());
        hits.push((index + 2, rule_name, rows));
    }

    let found: Vec<Keyed> = hits
        .into_iter()
        .flat_map(|(rule_position, rule_name, rows)| {
            rows.into_iter().map(move |row| {
                let value = display_cell(&bound.array, row);
                (
                    (row, position, rule_position),
                    Violation::new(row, name, rule_name, value),
                )
            })
        })
        .collect();
    debug!(column = %name, violations = found.len(), "column evaluated");
    Ok(found)
}

fn run_numeric<'r, T>(
    name: &str,
    rules: &'r [Box<dyn NumericRule<T>>],
    typed: &ArrayRef,
) -> Result<Vec<(&'r str, Vec<usize>)>, FrameError>
where
    T: ArrowPrimitiveType,
    T::Native: ToPrimitive,
{
    let array = typed
        .as_any()
        .downcast_ref::<PrimitiveArray<T>>()
        .ok_or_else(|| unexpected_type(name, typed))?;
    Ok(rules
        .iter()
        .map(|rule| (rule.name(), rule.validate(array)))
        .collect())
}

fn run_string<'r>(
    name: &str,
    rules: &'r [Box<dyn StringRule>],
    typed: &ArrayRef,
) -> Result<Vec<(&'r str, Vec<usize>)>, FrameError> {
    let array = typed
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| unexpected_type(name, typed))?;
    Ok(rules
        .iter()
        .map(|rule| (rule.name(), rule.validate(array)))
        .collect())
}

fn unexpected_type(name: &str, typed: &ArrayRef) -> FrameError {
    FrameError::TypeMismatch {
        column: name.to_string(),
        expected: "a column converted by its type check".to_string(),
        found: typed.data_type().to_string(),
    }
}
