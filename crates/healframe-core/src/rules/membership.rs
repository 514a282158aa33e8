use std::collections::HashSet;
use std::hash::{BuildHasher, Hasher};

use arrow::array::{PrimitiveArray, StringArray};
use arrow::datatypes::ArrowPrimitiveType;
use num_traits::ToPrimitive;
use xxhash_rust::xxh3::xxh3_64;

use crate::errors::FrameError;
use crate::rules::{NumericRule, StringRule};
use crate::schema::Scalar;

/// Hasher for sets whose keys are already xxh3 digests.
#[derive(Default, Clone)]
pub struct DigestHasher(u64);

impl Hasher for DigestHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = xxh3_64(bytes) ^ self.0.rotate_left(5);
    }

    #[inline]
    fn write_u64(&mut self, digest: u64) {
        self.0 = digest;
    }
}

#[derive(Default, Clone)]
pub struct DigestBuilder;

impl BuildHasher for DigestBuilder {
    type Hasher = DigestHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        DigestHasher::default()
    }
}

type DigestSet = HashSet<u64, DigestBuilder>;

fn number_digest(value: f64) -> u64 {
    // 0.0 and -0.0 are the same member
    let value = if value == 0.0 { 0.0 } else { value };
    xxh3_64(&value.to_bits().to_le_bytes())
}

fn text_digest(value: &str) -> u64 {
    xxh3_64(value.as_bytes())
}

/// Set membership over numbers or text.
pub struct IsInCheck {
    members: DigestSet,
}

impl IsInCheck {
    /// Members for a numeric column; text members are rejected.
    pub fn numeric(column: &str, values: &[Scalar]) -> Result<Self, FrameError> {
        let mut members = DigestSet::with_hasher(DigestBuilder);
        for value in values {
            let number = value.as_f64().ok_or_else(|| {
                FrameError::InvalidSchema(format!(
                    "member-of on numeric column '{}' lists text value '{}'",
                    column, value
                ))
            })?;
            members.insert(number_digest(number));
        }
        Ok(Self { members })
    }

    /// Members for a text column; numbers are compared by their written form.
    pub fn text(values: &[Scalar]) -> Self {
        let members = values
            .iter()
            .map(|v| text_digest(&v.to_string()))
            .collect::<DigestSet>();
        Self { members }
    }
}

impl<T> NumericRule<T> for IsInCheck
where
    T: ArrowPrimitiveType,
    T::Native: ToPrimitive,
{
    fn name(&self) -> &str {
        "member-of"
    }

    fn validate(&self, array: &PrimitiveArray<T>) -> Vec<usize> {
        array
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                let number = value?.to_f64()?;
                (!self.members.contains(&number_digest(number))).then_some(row)
            })
            .collect()
    }
}

impl StringRule for IsInCheck {
    fn name(&self) -> &str {
        "member-of"
    }

    fn validate(&self, array: &StringArray) -> Vec<usize> {
        array
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                (!self.members.contains(&text_digest(value?))).then_some(row)
            })
            .collect()
    }
}
