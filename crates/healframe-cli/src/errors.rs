use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No input file: set 'input.path' in the config or pass --input")]
    MissingInput,
    #[error("Delimiter must be a single ASCII character, got '{value}'")]
    InvalidDelimiter { value: String },
    #[error("Configuration declares no [[column]]")]
    NoColumns,
    #[error("Column '{column_name}' is listed in [[normalize.numeric]] and as {dtype} in [[column]]")]
    ConflictingCoercion { column_name: String, dtype: String },
}
