use crate::rules::{NullCheck, NumericRule, StringRule, TypeCheck};
use arrow::datatypes::{Float64Type, Int64Type};

/// Compiled, executable rules for one schema column.
pub enum ExecutableColumn {
    /// Text column with string rules.
    String {
        /// Canonical column name
        name: String,
        /// Value checks, in schema order
        rules: Vec<Box<dyn StringRule>>,
        type_check: TypeCheck,
        /// Present when nulls are not allowed
        null_check: Option<NullCheck>,
        /// Convert cells instead of requiring a compatible physical type
        coerce: bool,
    },
    /// Integer column, evaluated as i64.
    Integer {
        name: String,
        rules: Vec<Box<dyn NumericRule<Int64Type>>>,
        type_check: TypeCheck,
        null_check: Option<NullCheck>,
        coerce: bool,
    },
    /// Float column, evaluated as f64.
    Float {
        name: String,
        rules: Vec<Box<dyn NumericRule<Float64Type>>>,
        type_check: TypeCheck,
        null_check: Option<NullCheck>,
        coerce: bool,
    },
}

impl ExecutableColumn {
    pub fn get_name(&self) -> &str {
        match self {
            ExecutableColumn::String { name, .. } => name,
            ExecutableColumn::Integer { name, .. } => name,
            ExecutableColumn::Float { name, .. } => name,
        }
    }

    pub fn type_check(&self) -> &TypeCheck {
        match self {
            ExecutableColumn::String { type_check, .. } => type_check,
            ExecutableColumn::Integer { type_check, .. } => type_check,
            ExecutableColumn::Float { type_check, .. } => type_check,
        }
    }

    pub fn null_check(&self) -> Option<&NullCheck> {
        match self {
            ExecutableColumn::String { null_check, .. } => null_check.as_ref(),
            ExecutableColumn::Integer { null_check, .. } => null_check.as_ref(),
            ExecutableColumn::Float { null_check, .. } => null_check.as_ref(),
        }
    }

    pub fn coerces(&self) -> bool {
        match self {
            ExecutableColumn::String { coerce, .. } => *coerce,
            ExecutableColumn::Integer { coerce, .. } => *coerce,
            ExecutableColumn::Float { coerce, .. } => *coerce,
        }
    }

    /// Names of the value checks, in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        match self {
            ExecutableColumn::String { rules, .. } => rules.iter().map(|r| r.name()).collect(),
            ExecutableColumn::Integer { rules, .. } => rules.iter().map(|r| r.name()).collect(),
            ExecutableColumn::Float { rules, .. } => rules.iter().map(|r| r.name()).collect(),
        }
    }
}
