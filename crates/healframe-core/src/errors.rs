use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    /// The input file could not be located or opened
    #[error("Input file not found or unreadable: '{path}'")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The raw table is structurally broken (ragged rows, no header, bad encoding)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Two raw headers produced the same canonical name
    #[error("Headers '{first}' and '{second}' both canonicalize to '{canonical}'")]
    HeaderCollision {
        first: String,
        second: String,
        canonical: String,
    },

    /// A raw header has no character left after canonicalization
    #[error("Header '{raw}' canonicalizes to an empty name")]
    InvalidHeader { raw: String },

    /// A strip pattern is not a valid regular expression
    #[error("Invalid strip pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A required schema column is absent from the table
    #[error("Schema mismatch: required column '{0}' not found in table")]
    SchemaMismatch(String),

    /// A non-coerced column does not hold the declared type
    #[error("Column '{column}' holds {found} but the schema expects {expected} (enable coerce to convert)")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// The schema itself is inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// The Arrow kernel produced an error
    #[error("Arrow computation error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// IO error outside of opening the input
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
