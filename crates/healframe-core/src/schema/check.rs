use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal used in a `member-of` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// A value check, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Check {
    GreaterOrEqual {
        value: f64,
    },
    LessOrEqual {
        value: f64,
    },
    GreaterThan {
        value: f64,
    },
    LessThan {
        value: f64,
    },
    /// Inclusive on both ends
    InRange {
        min: f64,
        max: f64,
    },
    MemberOf {
        values: Vec<Scalar>,
    },
    StrMatches {
        pattern: String,
    },
    StrLength {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
}

impl Check {
    /// Rule identifier recorded in violations.
    pub fn name(&self) -> &'static str {
        match self {
            Check::GreaterOrEqual { .. } => "greater-or-equal",
            Check::LessOrEqual { .. } => "less-or-equal",
            Check::GreaterThan { .. } => "greater-than",
            Check::LessThan { .. } => "less-than",
            Check::InRange { .. } => "in-range",
            Check::MemberOf { .. } => "member-of",
            Check::StrMatches { .. } => "str-matches",
            Check::StrLength { .. } => "str-length",
        }
    }
}
