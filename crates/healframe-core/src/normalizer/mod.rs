//! Header canonicalization and numeric coercion.
//!
//! The normalizer never fails because of a bad cell: malformed numbers become
//! nulls and are judged later by the validator.

mod headers;
mod numeric;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use headers::{canonicalize_header, normalize_headers};
pub use numeric::{coerce_numeric_column, coerce_numeric_column_with, DEFAULT_CURRENCY_PATTERN};

use crate::errors::FrameError;
use crate::table::Table;

fn default_strip_pattern() -> String {
    DEFAULT_CURRENCY_PATTERN.to_string()
}

/// A column to turn into Float64 after stripping `strip_pattern`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericCoercion {
    /// Canonical column name
    pub column: String,
    #[serde(default = "default_strip_pattern")]
    pub strip_pattern: String,
}

impl NumericCoercion {
    pub fn new(column: impl Into<String>, strip_pattern: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            strip_pattern: strip_pattern.into(),
        }
    }

    /// Coerce with [`DEFAULT_CURRENCY_PATTERN`].
    pub fn currency(column: impl Into<String>) -> Self {
        Self::new(column, DEFAULT_CURRENCY_PATTERN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    #[serde(default)]
    pub numeric: Vec<NumericCoercion>,
}

impl NormalizeConfig {
    pub fn with_numeric(mut self, coercion: NumericCoercion) -> Self {
        self.numeric.push(coercion);
        self
    }
}

/// Canonicalize headers, then apply every numeric coercion in order.
///
/// Coercion column names refer to canonical headers. Patterns are compiled
/// before any column is touched so a bad pattern fails the whole call.
pub fn normalize(table: &Table, config: &NormalizeConfig) -> Result<Table, FrameError> {
    let patterns = config
        .numeric
        .iter()
        .map(|c| numeric::compile_strip_pattern(&c.strip_pattern))
        .collect::<Result<Vec<_>, _>>()?;

    let mut normalized = normalize_headers(table)?;
    for (coercion, pattern) in config.numeric.iter().zip(&patterns) {
        normalized = coerce_numeric_column_with(&normalized, &coercion.column, pattern)?;
    }
    debug!(
        columns = normalized.num_columns(),
        coerced = config.numeric.len(),
        "normalized table"
    );
    Ok(normalized)
}
