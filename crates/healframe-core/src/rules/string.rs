use arrow::array::StringArray;
use regex::Regex;

use crate::errors::FrameError;

/// A rule evaluated on the text cells of a column.
pub trait StringRule: Send + Sync {
    /// Returns the name of the rule.
    fn name(&self) -> &str;
    /// Row positions of non-null values that break the rule.
    fn validate(&self, array: &StringArray) -> Vec<usize>;
}

/// Character count bounds, both inclusive.
pub struct StringLengthCheck {
    min: Option<usize>,
    max: Option<usize>,
}

impl StringLengthCheck {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

impl StringRule for StringLengthCheck {
    fn name(&self) -> &str {
        "str-length"
    }

    fn validate(&self, array: &StringArray) -> Vec<usize> {
        array
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                let len = value?.chars().count();
                let too_short = self.min.is_some_and(|min| len < min);
                let too_long = self.max.is_some_and(|max| len > max);
                (too_short || too_long).then_some(row)
            })
            .collect()
    }
}

/// Cells must match a regex somewhere; anchor the pattern for a full match.
pub struct RegexMatch {
    regex: Regex,
}

impl RegexMatch {
    pub fn new(pattern: &str) -> Result<Self, FrameError> {
        let regex = Regex::new(pattern).map_err(|e| {
            FrameError::InvalidSchema(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { regex })
    }
}

impl StringRule for RegexMatch {
    fn name(&self) -> &str {
        "str-matches"
    }

    fn validate(&self, array: &StringArray) -> Vec<usize> {
        array
            .iter()
            .enumerate()
            .filter_map(|(row, value)| (!self.regex.is_match(value?)).then_some(row))
            .collect()
    }
}
