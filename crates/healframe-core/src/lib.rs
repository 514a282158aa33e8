pub mod compiler;
pub mod engine;
pub mod errors;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod results;
pub mod rules;
pub mod schema;
pub mod table;
pub mod validator;

pub use engine::validate;
pub use errors::FrameError;
pub use loader::{load, load_with, LoaderConfig, LoaderConfigBuilder};
pub use normalizer::{
    canonicalize_header, coerce_numeric_column, normalize, normalize_headers, NormalizeConfig,
    NumericCoercion,
};
pub use results::{RuleResult, Validated, ValidationOutcome, ValidationSummary, Violation};
pub use schema::{Check, ColumnSchema, ExpectedType, Scalar, Schema};
pub use table::Table;
