use std::path::Path;

use anyhow::{Context, Result};
use healframe_core::{
    ColumnSchema, ExpectedType, LoaderConfig, LoaderConfigBuilder, NormalizeConfig, Schema,
};
use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: Input,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub column: Vec<ColumnSchema>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Input {
    pub path: Option<String>,
    pub delimiter: Option<String>,
    pub infer_max_records: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Output {
    pub path: Option<String>,
}

pub fn parse_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

impl Config {
    pub fn loader_config(&self) -> Result<LoaderConfig, ConfigError> {
        let mut builder = LoaderConfigBuilder::new();
        if let Some(delimiter) = &self.input.delimiter {
            builder = builder.with_delimiter(parse_delimiter(delimiter)?);
        }
        if let Some(max) = self.input.infer_max_records {
            builder = builder.with_infer_max_records(max);
        }
        Ok(builder.build())
    }

    /// The validation schema, checked against the normalization settings.
    pub fn schema(&self) -> Result<Schema> {
        if self.column.is_empty() {
            return Err(ConfigError::NoColumns.into());
        }
        for coercion in &self.normalize.numeric {
            let declared = self.column.iter().find(|c| c.name == coercion.column);
            if let Some(column) = declared {
                if column.dtype == ExpectedType::String && !column.coerce {
                    return Err(ConfigError::ConflictingCoercion {
                        column_name: column.name.clone(),
                        dtype: column.dtype.to_string(),
                    }
                    .into());
                }
            }
        }
        Schema::new(self.column.clone()).context("Invalid [[column]] section")
    }

    /// Input path, with the command line taking precedence.
    pub fn input_path(&self, overridden: Option<&str>) -> Result<String, ConfigError> {
        overridden
            .map(str::to_string)
            .or_else(|| self.input.path.clone())
            .ok_or(ConfigError::MissingInput)
    }
}

fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(ConfigError::InvalidDelimiter {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healframe_core::Check;

    const SAMPLE: &str = r#"
[input]
path = "data/raw/input_data.csv"
delimiter = ";"
infer_max_records = 100

[output]
path = "data/processed/"

[[normalize.numeric]]
column = "billing_cost"
strip_pattern = '\$'

[[column]]
name = "customer_id"
dtype = "integer"

[[column]]
name = "billing_cost"
dtype = "float"
nullable = true
checks = [{ kind = "greater-or-equal", value = 0 }]

[[column]]
name = "age_years"
dtype = "integer"
coerce = true
checks = [
    { kind = "greater-or-equal", value = 0 },
    { kind = "less-or-equal", value = 120 },
]

[[column]]
name = "label_class"
dtype = "integer"
coerce = true
checks = [{ kind = "member-of", values = [0, 1] }]
"#;

    #[test]
    fn test_parse_sample_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.input.path.as_deref(), Some("data/raw/input_data.csv"));
        assert_eq!(config.output.path.as_deref(), Some("data/processed/"));
        assert_eq!(config.normalize.numeric[0].strip_pattern, r"\$");

        let loader = config.loader_config().unwrap();
        assert_eq!(loader.delimiter, b';');
        assert_eq!(loader.infer_max_records, Some(100));

        let schema = config.schema().unwrap();
        assert_eq!(schema.len(), 4);
        let age = schema.get("age_years").unwrap();
        assert!(age.coerce);
        assert_eq!(
            age.checks,
            vec![
                Check::GreaterOrEqual { value: 0.0 },
                Check::LessOrEqual { value: 120.0 }
            ]
        );
    }

    #[test]
    fn test_input_override() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.input_path(Some("other.csv")).unwrap(), "other.csv");
        assert_eq!(config.input_path(None).unwrap(), "data/raw/input_data.csv");
    }

    #[test]
    fn test_missing_input() {
        let config: Config = toml::from_str("[[column]]\nname = \"a\"\ndtype = \"integer\"\n").unwrap();
        assert!(matches!(config.input_path(None), Err(ConfigError::MissingInput)));
    }

    #[test]
    fn test_no_columns() {
        let config: Config = toml::from_str("[input]\npath = \"a.csv\"\n").unwrap();
        let err = config.schema().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NoColumns)
        ));
    }

    #[test]
    fn test_duplicate_columns() {
        let config: Config = toml::from_str(
            "[[column]]\nname = \"a\"\ndtype = \"integer\"\n[[column]]\nname = \"a\"\ndtype = \"float\"\n",
        )
        .unwrap();
        assert!(config.schema().is_err());
    }

    #[test]
    fn test_conflicting_coercion() {
        let config: Config = toml::from_str(
            "[[normalize.numeric]]\ncolumn = \"a\"\n[[column]]\nname = \"a\"\ndtype = \"string\"\n",
        )
        .unwrap();
        let err = config.schema().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ConflictingCoercion { .. })
        ));
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
