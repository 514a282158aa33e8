//! In-memory table.
//!
//! A [`Table`] is a single Arrow `RecordBatch`. Loader, normalizer, validator and
//! writers all work on this one representation, so row positions never have to
//! be translated between two table types.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::array_value_to_string;

use crate::errors::FrameError;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a table from named columns. All columns must have the same length.
    pub fn try_from_columns(columns: Vec<(&str, ArrayRef)>) -> Result<Self, FrameError> {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect();
        let row_count = columns.first().map(|(_, array)| array.len()).unwrap_or(0);
        let arrays = columns.into_iter().map(|(_, array)| array).collect();
        Self::try_from_parts(Arc::new(Schema::new(fields)), arrays, row_count)
    }

    pub(crate) fn try_from_parts(
        schema: SchemaRef,
        columns: Vec<ArrayRef>,
        row_count: usize,
    ) -> Result<Self, FrameError> {
        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
        Ok(Self { batch })
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.batch.column_by_name(name)
    }

    /// Render one cell as text, `None` when the cell is null or the column is unknown.
    pub fn display_value(&self, column: &str, row: usize) -> Option<String> {
        let array = self.column(column)?;
        display_cell(array, row)
    }

    /// Return a copy of this table where `name` is replaced by `array`.
    /// The field keeps its position; its data type follows the new array.
    pub fn with_column(&self, name: &str, array: ArrayRef) -> Result<Self, FrameError> {
        let schema = self.batch.schema();
        let (index, _) = schema
            .column_with_name(name)
            .ok_or_else(|| FrameError::SchemaMismatch(name.to_string()))?;

        let fields: Vec<Field> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| {
                if i == index {
                    Field::new(f.name(), array.data_type().clone(), true)
                } else {
                    f.as_ref().clone()
                }
            })
            .collect();
        let mut columns = self.batch.columns().to_vec();
        columns[index] = array;

        Self::try_from_parts(Arc::new(Schema::new(fields)), columns, self.num_rows())
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

pub(crate) fn display_cell(array: &ArrayRef, row: usize) -> Option<String> {
    if row >= array.len() || array.is_null(row) {
        return None;
    }
    array_value_to_string(array, row).ok()
}
