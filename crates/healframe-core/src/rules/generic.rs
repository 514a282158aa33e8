use std::sync::Arc;

use arrow::array::{new_null_array, Array, ArrayRef, AsArray, PrimitiveArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{ArrowPrimitiveType, DataType, Float64Type, Int64Type};
use tracing::debug;

use crate::{errors::FrameError, schema::ExpectedType};

pub const TYPE_RULE: &str = "type";
pub const NULLABLE_RULE: &str = "nullable";

/// Arrow type a column is evaluated as.
pub fn arrow_type(expected: ExpectedType) -> DataType {
    match expected {
        ExpectedType::Integer => DataType::Int64,
        ExpectedType::Float => DataType::Float64,
        ExpectedType::String => DataType::Utf8,
    }
}

/// A column converted to its expected type, with the rows that could not be.
#[derive(Debug)]
pub struct Coerced {
    pub array: ArrayRef,
    /// Ascending row positions of non-null cells whose conversion failed
    pub failed: Vec<usize>,
}

/// Brings a column to its expected type, either by converting each cell or by
/// accepting only physical types that already fit.
pub struct TypeCheck {
    column: String,
    expected: ExpectedType,
}

impl TypeCheck {
    pub fn new(column: String, expected: ExpectedType) -> Self {
        Self { column, expected }
    }

    /// Convert every cell to the expected type. Never fails because of a cell value.
    pub fn coerce(&self, array: &ArrayRef) -> Result<Coerced, FrameError> {
        let dt = array.data_type();
        let is_text = matches!(dt, DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View);

        match self.expected {
            ExpectedType::Integer if is_text => {
                Ok(convert_strings::<Int64Type>(&utf8(array)?, parse_integer))
            }
            ExpectedType::Float if is_text => {
                Ok(convert_strings::<Float64Type>(&utf8(array)?, parse_float))
            }
            ExpectedType::Integer if dt.is_floating() => {
                let floats = cast(array, &DataType::Float64)?;
                let ints: PrimitiveArray<Int64Type> = floats
                    .as_primitive::<Float64Type>()
                    .unary_opt::<_, Int64Type>(integral);
                Ok(with_failures(array, Arc::new(ints)))
            }
            ExpectedType::Float => {
                let floats = self.cast_or_null(array, &DataType::Float64);
                let finite: PrimitiveArray<Float64Type> = floats
                    .as_primitive::<Float64Type>()
                    .unary_opt::<_, Float64Type>(|v| v.is_finite().then_some(v));
                Ok(with_failures(array, Arc::new(finite)))
            }
            ExpectedType::Integer => {
                let ints = self.cast_or_null(array, &DataType::Int64);
                Ok(with_failures(array, ints))
            }
            ExpectedType::String => {
                let strings = self.cast_or_null(array, &DataType::Utf8);
                Ok(with_failures(array, strings))
            }
        }
    }

    /// Accept the column as is when its physical type fits the expected type.
    ///
    /// # Errors
    ///
    /// `FrameError::TypeMismatch` when the physical type does not fit.
    pub fn conform(&self, array: &ArrayRef) -> Result<ArrayRef, FrameError> {
        let dt = array.data_type();
        let integer_family = matches!(
            dt,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
        );
        let compatible = matches!(dt, DataType::Null)
            || match self.expected {
                ExpectedType::Integer => integer_family,
                ExpectedType::Float => integer_family || dt.is_floating(),
                ExpectedType::String => {
                    matches!(dt, DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View)
                }
            };
        if !compatible {
            return Err(FrameError::TypeMismatch {
                column: self.column.clone(),
                expected: self.expected.to_string(),
                found: dt.to_string(),
            });
        }
        Ok(cast(array, &arrow_type(self.expected))?)
    }

    fn cast_or_null(&self, array: &ArrayRef, target: &DataType) -> ArrayRef {
        cast(array, target).unwrap_or_else(|e| {
            debug!(column = %self.column, error = %e, "unsupported cast, every value fails");
            new_null_array(target, array.len())
        })
    }
}

/// Reports null cells of a column.
#[derive(Default)]
pub struct NullCheck {}

impl NullCheck {
    pub fn new() -> Self {
        Self {}
    }

    /// Null rows, skipping the ascending positions in `exclude`.
    pub fn validate(&self, array: &dyn Array, exclude: &[usize]) -> Vec<usize> {
        if array.null_count() == 0 {
            return Vec::new();
        }
        (0..array.len())
            .filter(|&row| array.is_null(row) && exclude.binary_search(&row).is_err())
            .collect()
    }
}

fn utf8(array: &ArrayRef) -> Result<ArrayRef, FrameError> {
    match array.data_type() {
        DataType::Utf8 => Ok(array.clone()),
        _ => Ok(cast(array, &DataType::Utf8)?),
    }
}

fn convert_strings<T: ArrowPrimitiveType>(
    strings: &ArrayRef,
    parse: impl Fn(&str) -> Option<T::Native>,
) -> Coerced {
    let strings: &StringArray = strings.as_string::<i32>();
    let mut failed = Vec::new();
    let values: PrimitiveArray<T> = strings
        .iter()
        .enumerate()
        .map(|(row, value)| {
            let trimmed = value?.trim();
            // Blank text is a missing value, not a malformed one
            if trimmed.is_empty() {
                return None;
            }
            let parsed = parse(trimmed);
            if parsed.is_none() {
                failed.push(row);
            }
            parsed
        })
        .collect();
    Coerced {
        array: Arc::new(values),
        failed,
    }
}

fn with_failures(source: &ArrayRef, converted: ArrayRef) -> Coerced {
    let failed = (0..source.len())
        .filter(|&row| source.is_valid(row) && converted.is_null(row))
        .collect();
    Coerced {
        array: converted,
        failed,
    }
}

fn integral(v: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.is_finite() && v.fract() == 0.0 && in_range).then_some(v as i64)
}

fn parse_integer(s: &str) -> Option<i64> {
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(integral))
}

fn parse_float(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Float64Array, Int32Array, Int64Array};

    fn ints(array: &ArrayRef) -> Vec<Option<i64>> {
        array.as_primitive::<Int64Type>().iter().collect()
    }

    #[test]
    fn test_coerce_strings_to_integer() {
        let check = TypeCheck::new("age".to_string(), ExpectedType::Integer);
        let array: ArrayRef = Arc::new(StringArray::from(vec![
            Some("34"),
            Some(" 29 "),
            Some("abc"),
            None,
            Some("40.0"),
            Some("40.5"),
            Some("   "),
        ]));
        let coerced = check.coerce(&array).unwrap();
        assert_eq!(
            ints(&coerced.array),
            vec![Some(34), Some(29), None, None, Some(40), None, None]
        );
        assert_eq!(coerced.failed, vec![2, 5]);
    }

    #[test]
    fn test_coerce_floats_to_integer() {
        let check = TypeCheck::new("n".to_string(), ExpectedType::Integer);
        let array: ArrayRef = Arc::new(Float64Array::from(vec![
            Some(1.0),
            Some(1.5),
            None,
            Some(f64::NAN),
            Some(1e300),
        ]));
        let coerced = check.coerce(&array).unwrap();
        assert_eq!(ints(&coerced.array), vec![Some(1), None, None, None, None]);
        assert_eq!(coerced.failed, vec![1, 3, 4]);
    }

    #[test]
    fn test_coerce_strings_to_float() {
        let check = TypeCheck::new("x".to_string(), ExpectedType::Float);
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("1.25"), Some("inf"), Some("x")]));
        let coerced = check.coerce(&array).unwrap();
        let values: Vec<Option<f64>> = coerced.array.as_primitive::<Float64Type>().iter().collect();
        assert_eq!(values, vec![Some(1.25), None, None]);
        assert_eq!(coerced.failed, vec![1, 2]);
    }

    #[test]
    fn test_coerce_anything_to_string() {
        let check = TypeCheck::new("s".to_string(), ExpectedType::String);
        let array: ArrayRef = Arc::new(Int64Array::from(vec![Some(7), None]));
        let coerced = check.coerce(&array).unwrap();
        assert_eq!(coerced.array.data_type(), &DataType::Utf8);
        assert!(coerced.failed.is_empty());
        assert_eq!(coerced.array.as_string::<i32>().value(0), "7");
    }

    #[test]
    fn test_coerce_boolean_to_integer() {
        let check = TypeCheck::new("b".to_string(), ExpectedType::Integer);
        let array: ArrayRef = Arc::new(BooleanArray::from(vec![true, false]));
        let coerced = check.coerce(&array).unwrap();
        assert_eq!(ints(&coerced.array), vec![Some(1), Some(0)]);
        assert!(coerced.failed.is_empty());
    }

    #[test]
    fn test_conform_accepts_integer_family() {
        let check = TypeCheck::new("n".to_string(), ExpectedType::Integer);
        let array: ArrayRef = Arc::new(Int32Array::from(vec![1, 2]));
        let conformed = check.conform(&array).unwrap();
        assert_eq!(conformed.data_type(), &DataType::Int64);
    }

    #[test]
    fn test_conform_widens_integer_to_float() {
        let check = TypeCheck::new("n".to_string(), ExpectedType::Float);
        let array: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        let conformed = check.conform(&array).unwrap();
        assert_eq!(conformed.data_type(), &DataType::Float64);
    }

    #[test]
    fn test_conform_rejects_text_for_integer() {
        let check = TypeCheck::new("n".to_string(), ExpectedType::Integer);
        let array: ArrayRef = Arc::new(StringArray::from(vec!["1"]));
        match check.conform(&array) {
            Err(FrameError::TypeMismatch { column, expected, .. }) => {
                assert_eq!(column, "n");
                assert_eq!(expected, "integer");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_null_check_excludes_failed_rows() {
        let rule = NullCheck::new();
        let array = Int64Array::from(vec![Some(1), None, None, Some(4), None]);
        assert_eq!(rule.validate(&array, &[]), vec![1, 2, 4]);
        assert_eq!(rule.validate(&array, &[2]), vec![1, 4]);
    }
}
