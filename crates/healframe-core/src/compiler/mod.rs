//! Rule compilation.
//!
//! Converts declarative [`ColumnSchema`] entries into [`ExecutableColumn`]s
//! holding typed rule objects, and binds them to the arrays of a table.

use arrow::array::ArrayRef;
use arrow::datatypes::ArrowPrimitiveType;
use num_traits::ToPrimitive;
use tracing::debug;


use crate::{
    errors::FrameError,
    rules::{IsInCheck, NullCheck, NumericRule, Range, RegexMatch, StringLengthCheck, StringRule, TypeCheck},
    schema::{Check, ColumnSchema, ExpectedType, Schema},
    table::Table,
    validator::ExecutableColumn,
};

/// An executable column paired with the array it runs on.
pub struct BoundColumn {
    pub column: ExecutableColumn,
    pub array: ArrayRef,
}

fn compile_string_rules(
    checks: &[Check],
    column_name: &str,
) -> Result<Vec<Box<dyn StringRule>>, FrameError> {
    let mut executable_rules: Vec<Box<dyn StringRule>> = Vec::new();
    for check in checks {
        match check {
            Check::StrLength { min, max } => {
                executable_rules.push(Box::new(StringLengthCheck::new(*min, *max)));
            }
            Check::StrMatches { pattern } => {
                executable_rules.push(Box::new(RegexMatch::new(pattern)?));
            }
            Check::MemberOf { values } => {
                executable_rules.push(Box::new(IsInCheck::text(values)));
            }
            _ => {
                return Err(FrameError::InvalidSchema(format!(
                    "Invalid check '{}' for string column '{}'",
                    check.name(),
                    column_name,
                )))
            }
        }
    }
    Ok(executable_rules)
}

/// Compile numeric checks for either the integer or the float column kind.
fn compile_numeric_rules<T>(
    checks: &[Check],
    column_name: &str,
) -> Result<Vec<Box<dyn NumericRule<T>>>, FrameError>
where
    T: ArrowPrimitiveType,
    T::Native: ToPrimitive,
{
    let mut executable_rules: Vec<Box<dyn NumericRule<T>>> = Vec::new();
    for check in checks {
        let name = check.name();
        match check {
            Check::GreaterOrEqual { value } => {
                executable_rules.push(Box::new(Range::new(name, Some(*value), None, true)));
            }
            Check::LessOrEqual { value } => {
                executable_rules.push(Box::new(Range::new(name, None, Some(*value), true)));
            }
            Check::GreaterThan { value } => {
                executable_rules.push(Box::new(Range::new(name, Some(*value), None, false)));
            }
            Check::LessThan { value } => {
                executable_rules.push(Box::new(Range::new(name, None, Some(*value), false)));
            }
            Check::InRange { min, max } => {
                if min > max {
                    return Err(FrameError::InvalidSchema(format!(
                        "in-range on column '{}' has min {} above max {}",
                        column_name, min, max
                    )));
                }
                executable_rules.push(Box::new(Range::new(name, Some(*min), Some(*max), true)));
            }
            Check::MemberOf { values } => {
                executable_rules.push(Box::new(IsInCheck::numeric(column_name, values)?));
            }
            Check::StrMatches { .. } | Check::StrLength { .. } => {
                return Err(FrameError::InvalidSchema(format!(
                    "Invalid check '{}' for numeric column '{}'",
                    name, column_name
                )))
            }
        }
    }
    Ok(executable_rules)
}

/// Compile one column declaration into an executable column.
///
/// # Errors
///
/// Returns `FrameError::InvalidSchema` if:
/// - A check doesn't match the column type (e.g. str-length on an integer column)
/// - A regex pattern is invalid
/// - A member-of on a numeric column lists text values
pub fn compile_column(schema: &ColumnSchema) -> Result<ExecutableColumn, FrameError> {
    let name = schema.name.clone();
    let type_check = TypeCheck::new(name.clone(), schema.dtype);
    let null_check = (!schema.nullable).then(NullCheck::new);
    let coerce = schema.coerce;

    match schema.dtype {
        ExpectedType::String => Ok(ExecutableColumn::String {
            rules: compile_string_rules(&schema.checks, &name)?,
            name,
            type_check,
            null_check,
            coerce,
        }),
        ExpectedType::Integer => Ok(ExecutableColumn::Integer {
            rules: compile_numeric_rules(&schema.checks, &name)?,
            name,
            type_check,
            null_check,
            coerce,
        }),
        ExpectedType::Float => Ok(ExecutableColumn::Float {
            rules: compile_numeric_rules(&schema.checks, &name)?,
            name,
            type_check,
            null_check,
            coerce,
        }),
    }
}

/// Compile every schema column and bind it to the table's array, in schema order.
///
/// Every column is compiled before the table is looked at, so an inconsistent
/// schema is reported even when a column is also missing.
///
/// # Errors
///
/// - `FrameError::InvalidSchema` from [`compile_column`]
/// - `FrameError::SchemaMismatch` for a required column absent from the table
pub fn compile_schema(schema: &Schema, table: &Table) -> Result<Vec<BoundColumn>, FrameError> {
    let compiled = schema
        .columns()
        .iter()
        .map(|c| compile_column(c).map(|e| (c, e)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut bound = Vec::with_capacity(compiled.len());
    for (declared, column) in compiled {
        match table.column(&declared.name) {
            Some(array) => bound.push(BoundColumn {
                column,
                array: array.clone(),
            }),
            None if declared.required => {
                return Err(FrameError::SchemaMismatch(declared.name.clone()))
            }
            None => debug!(column = %declared.name, "optional column absent, skipped"),
        }
    }
    Ok(bound)
}
