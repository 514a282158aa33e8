//! Delimited file loader.
//!
//! Reads a CSV-like file into a [`Table`], using the first row as raw headers and
//! inferring column types from the data. Only a missing file or a structurally
//! broken input fails here; bad cell values are left for the normalizer and the
//! validator.

mod config;

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{new_null_array, Array};
use arrow::compute::{cast_with_options, concat_batches, CastOptions};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use tracing::debug;

pub use config::{LoaderConfig, LoaderConfigBuilder, DEFAULT_BATCH_SIZE};

use crate::errors::FrameError;
use crate::table::Table;

/// Load a delimited file with the default [`LoaderConfig`].
pub fn load(path: impl AsRef<Path>) -> Result<Table, FrameError> {
    load_with(path, &LoaderConfig::default())
}

/// Load a delimited file.
///
/// Column types are inferred from the scanned rows. When a later cell does not
/// parse as its inferred type, the file is read again as text and each column
/// keeps its inferred type only if every cell converts.
///
/// # Errors
///
/// - `FrameError::NotFound` if the file cannot be located or opened
/// - `FrameError::MalformedInput` if the file has no header row, is not valid
///   UTF-8, or has rows with a different number of fields than the header
pub fn load_with(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Table, FrameError> {
    let path = path.as_ref();
    let mut file = open_input(path)?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(config.delimiter);
    let (schema, scanned) = format
        .infer_schema(&mut file, config.infer_max_records)
        .map_err(malformed)?;
    if schema.fields().is_empty() {
        return Err(FrameError::MalformedInput(format!(
            "'{}' has no header row",
            path.display()
        )));
    }
    debug!(
        path = %path.display(),
        columns = schema.fields().len(),
        scanned,
        "inferred input schema"
    );
    let schema = Arc::new(schema);

    file.seek(SeekFrom::Start(0))?;
    let batch = match read_batch(&mut file, schema.clone(), config) {
        Ok(batch) => batch,
        Err(ArrowError::ParseError(reason)) => {
            debug!(path = %path.display(), %reason, "cell outside inferred type, reading as text");
            file.seek(SeekFrom::Start(0))?;
            read_as_text(&mut file, &schema, config)?
        }
        Err(e) => return Err(malformed(e)),
    };
    debug!(path = %path.display(), rows = batch.num_rows(), "loaded input");

    Ok(Table::new(batch))
}

fn read_batch(
    file: &mut File,
    schema: SchemaRef,
    config: &LoaderConfig,
) -> Result<RecordBatch, ArrowError> {
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(config.delimiter)
        .with_batch_size(config.batch_size)
        .build(file)?;
    let batches = reader.collect::<Result<Vec<RecordBatch>, ArrowError>>()?;
    concat_batches(&schema, &batches)
}

/// Read every column as text, then restore each inferred type that all cells
/// convert to. Columns with a stray cell stay text for the normalizer.
fn read_as_text(
    file: &mut File,
    inferred: &Schema,
    config: &LoaderConfig,
) -> Result<RecordBatch, FrameError> {
    let text_schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let text = read_batch(file, text_schema, config).map_err(malformed)?;

    let strict = CastOptions {
        safe: false,
        ..Default::default()
    };
    let mut fields = Vec::with_capacity(text.num_columns());
    let mut columns = Vec::with_capacity(text.num_columns());
    for (field, column) in inferred.fields().iter().zip(text.columns()) {
        let target = field.data_type();
        let restored = match target {
            DataType::Utf8 => None,
            DataType::Null if column.null_count() == column.len() => {
                Some(Ok(new_null_array(target, column.len())))
            }
            DataType::Null => None,
            _ => Some(cast_with_options(column, target, &strict)),
        };
        match restored {
            None => {
                fields.push(Field::new(field.name(), DataType::Utf8, true));
                columns.push(column.clone());
            }
            Some(Ok(converted)) => {
                fields.push(Field::new(field.name(), target.clone(), true));
                columns.push(converted);
            }
            Some(Err(e)) => {
                debug!(column = %field.name(), inferred = %target, error = %e, "keeping column as text");
                fields.push(Field::new(field.name(), DataType::Utf8, true));
                columns.push(column.clone());
            }
        }
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

fn open_input(path: &Path) -> Result<File, FrameError> {
    let not_found = |source: io::Error| FrameError::NotFound {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(not_found)?;
    let metadata = file.metadata().map_err(not_found)?;
    if metadata.is_dir() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path is a directory",
        )));
    }
    Ok(file)
}

fn malformed(e: ArrowError) -> FrameError {
    FrameError::MalformedInput(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_infers_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,price,label").unwrap();
        writeln!(file, "1,2.5,a").unwrap();
        writeln!(file, "2,3.0,b").unwrap();

        let table = load(&path).unwrap();
        let schema = table.schema();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_load_custom_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a;b").unwrap();
        writeln!(file, "1;x").unwrap();

        let config = LoaderConfigBuilder::new().with_delimiter(b';').build();
        let table = load_with(&path, &config).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let result = load(dir.path());
        assert!(matches!(result, Err(FrameError::NotFound { .. })));
    }

    #[test]
    fn test_load_empty_file_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        File::create(&path).unwrap();
        let result = load(&path);
        assert!(matches!(result, Err(FrameError::MalformedInput(_))));
    }
}
