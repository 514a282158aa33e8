//! Declarative table schema.
//!
//! A [`Schema`] is plain data: an ordered list of [`ColumnSchema`] that can be
//! built in code, read from TOML/JSON, and handed explicitly to the validator.

mod check;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use check::{Check, Scalar};

use crate::errors::FrameError;

/// Expected value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    Integer,
    Float,
    String,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpectedType::Integer => "integer",
            ExpectedType::Float => "float",
            ExpectedType::String => "string",
        };
        write!(f, "{}", s)
    }
}

fn default_required() -> bool {
    true
}

/// Rule set for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Canonical column name
    pub name: String,
    pub dtype: ExpectedType,
    /// Null cells are accepted and skip every check
    #[serde(default)]
    pub nullable: bool,
    /// Convert each cell to `dtype` before the checks run
    #[serde(default)]
    pub coerce: bool,
    /// A missing required column fails the whole validation
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub checks: Vec<Check>,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, dtype: ExpectedType) -> Self {
        Self {
            name: name.into(),
            dtype,
            nullable: false,
            coerce: false,
            required: true,
            checks: Vec::new(),
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ExpectedType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ExpectedType::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ExpectedType::String)
    }

    pub fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub fn coerce(self) -> Self {
        Self {
            coerce: true,
            ..self
        }
    }

    /// Skip this column when the table does not have it
    pub fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Value must be >= `min`
    pub fn min(self, min: f64) -> Self {
        self.with_check(Check::GreaterOrEqual { value: min })
    }

    /// Value must be <= `max`
    pub fn max(self, max: f64) -> Self {
        self.with_check(Check::LessOrEqual { value: max })
    }

    /// Inclusive range, recorded as two checks so each bound reports on its own
    pub fn between(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn is_positive(self) -> Self {
        self.with_check(Check::GreaterThan { value: 0.0 })
    }

    pub fn is_in<S: Into<Scalar>>(self, values: impl IntoIterator<Item = S>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.with_check(Check::MemberOf { values })
    }

    pub fn matches(self, pattern: impl Into<String>) -> Self {
        self.with_check(Check::StrMatches {
            pattern: pattern.into(),
        })
    }

    pub fn with_length_between(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.with_check(Check::StrLength { min, max })
    }
}

/// Ordered, name-unique set of column rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// # Errors
    ///
    /// `FrameError::InvalidSchema` if two columns share a name.
    pub fn new(columns: Vec<ColumnSchema>) -> Result<Self, FrameError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(FrameError::InvalidSchema(format!(
                    "column '{}' is declared twice",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawSchema {
            columns: Vec<ColumnSchema>,
        }
        let raw = RawSchema::deserialize(deserializer)?;
        Schema::new(raw.columns).map_err(serde::de::Error::custom)
    }
}
