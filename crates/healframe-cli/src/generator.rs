//! Sample messy input, as a client upload would look.
//!
//! The file has inconsistent header casing, `$` amounts, a non-numeric amount
//! and an impossible age.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, Int64Array, StringArray};
use healframe_core::Table;
use tracing::info;

use crate::writer::{resolve_file_path, write_table};

pub const DEFAULT_SAMPLE_PATH: &str = "data/raw/input_data.csv";

pub fn messy_customers() -> Result<Table> {
    let table = Table::try_from_columns(vec![
        (
            "CUSTOMER_ID",
            Arc::new(Int64Array::from(vec![1001, 1002, 1003, 1004, 1005])) as ArrayRef,
        ),
        (
            "Billing Cost",
            Arc::new(StringArray::from(vec![
                "$1200.50", "$500.00", "INVALID", "$0.00", "$99.99",
            ])) as ArrayRef,
        ),
        (
            "Age_Years",
            Arc::new(Int64Array::from(vec![34, 29, -1, 52, 44])) as ArrayRef,
        ),
        (
            "Label_Class",
            Arc::new(Int64Array::from(vec![0, 1, 0, 1, 0])) as ArrayRef,
        ),
    ])?;
    Ok(table)
}

/// Write the sample file and return where it landed.
pub fn generate_messy_data(path: &str) -> Result<PathBuf> {
    let target = resolve_file_path(path, "input_data.csv")?;
    let table = messy_customers()?;
    write_table(&table, Path::new(&target))?;
    info!(
        path = %target.display(),
        rows = table.num_rows(),
        "generated messy sample data"
    );
    Ok(target)
}
