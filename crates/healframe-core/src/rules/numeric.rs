use arrow::array::PrimitiveArray;
use arrow::datatypes::ArrowPrimitiveType;
use num_traits::ToPrimitive;

pub trait NumericRule<T: ArrowPrimitiveType>: Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &str;
    /// Row positions of non-null values that break the rule.
    fn validate(&self, array: &PrimitiveArray<T>) -> Vec<usize>;
}

/// Lower and/or upper bound on a numeric column.
///
/// Bounds are compared in f64 whatever the column's native type. A value that
/// cannot be compared (NaN) breaks the rule.
pub struct Range {
    name: &'static str,
    min: Option<f64>,
    max: Option<f64>,
    inclusive: bool,
}

impl Range {
    pub fn new(name: &'static str, min: Option<f64>, max: Option<f64>, inclusive: bool) -> Self {
        Self {
            name,
            min,
            max,
            inclusive,
        }
    }

    fn accepts(&self, value: f64) -> bool {
        let above = self.min.map_or(true, |min| {
            if self.inclusive {
                value >= min
            } else {
                value > min
            }
        });
        let below = self.max.map_or(true, |max| {
            if self.inclusive {
                value <= max
            } else {
                value < max
            }
        });
        above && below
    }
}

impl<T> NumericRule<T> for Range
where
    T: ArrowPrimitiveType,
    T::Native: ToPrimitive,
{
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, array: &PrimitiveArray<T>) -> Vec<usize> {
        array
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                let value = value?.to_f64()?;
                (!self.accepts(value)).then_some(row)
            })
            .collect()
    }
}
