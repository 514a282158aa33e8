use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::FrameError;
use crate::table::Table;

/// Currency symbols and thousands separators.
pub const DEFAULT_CURRENCY_PATTERN: &str = r"[$€£¥,]";

static DEFAULT_CURRENCY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_CURRENCY_PATTERN).expect("default currency pattern is a valid regex")
});

pub(crate) fn compile_strip_pattern(pattern: &str) -> Result<Regex, FrameError> {
    if pattern == DEFAULT_CURRENCY_PATTERN {
        return Ok(DEFAULT_CURRENCY_REGEX.clone());
    }
    Regex::new(pattern).map_err(|source| FrameError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Strip every match of `strip_pattern` from `column` and parse the rest as f64.
///
/// Values that still do not parse, or parse to a non-finite number, become null.
/// Malformed text is never an error here. An absent column leaves the table as is.
///
/// # Errors
///
/// - `FrameError::InvalidPattern` if `strip_pattern` is not a valid regex
pub fn coerce_numeric_column(
    table: &Table,
    column: &str,
    strip_pattern: &str,
) -> Result<Table, FrameError> {
    let pattern = compile_strip_pattern(strip_pattern)?;
    coerce_numeric_column_with(table, column, &pattern)
}

/// Same as [`coerce_numeric_column`] with an already compiled pattern.
pub fn coerce_numeric_column_with(
    table: &Table,
    column: &str,
    pattern: &Regex,
) -> Result<Table, FrameError> {
    let Some(array) = table.column(column) else {
        debug!(column, "numeric coercion skipped, column not present");
        return Ok(table.clone());
    };

    let coerced = strip_and_parse(array, pattern)?;
    debug!(column, nulls = coerced.null_count(), "coerced column to float");
    table.with_column(column, Arc::new(coerced))
}

fn strip_and_parse(array: &ArrayRef, pattern: &Regex) -> Result<Float64Array, FrameError> {
    if array.data_type().is_numeric() {
        let floats = cast(array, &DataType::Float64)?;
        return Ok(floats
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|f| f.is_finite()))
            .collect());
    }

    let strings = match array.data_type() {
        DataType::Utf8 => array.clone(),
        _ => cast(array, &DataType::Utf8)?,
    };
    Ok(strings
        .as_string::<i32>()
        .iter()
        .map(|v| v.and_then(|s| parse_stripped(s, pattern)))
        .collect())
}

fn parse_stripped(value: &str, pattern: &Regex) -> Option<f64> {
    let stripped = pattern.replace_all(value, "");
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}
