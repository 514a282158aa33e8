pub mod generic;
pub mod membership;
pub mod numeric;
pub mod string;

pub use generic::{Coerced, NullCheck, TypeCheck, NULLABLE_RULE, TYPE_RULE};
pub use membership::IsInCheck;
pub use numeric::{NumericRule, Range};
pub use string::{RegexMatch, StringLengthCheck, StringRule};
