use std::collections::BTreeSet;

use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch;

use crate::{errors::FrameError, table::Table};

/// Drop the rows at `rows`, keeping the relative order of the others.
///
/// Positions past the end of the table are ignored.
pub fn remove_rows(table: &Table, rows: &BTreeSet<usize>) -> Result<Table, FrameError> {
    if rows.is_empty() {
        return Ok(table.clone());
    }
    let keep: BooleanArray = (0..table.num_rows())
        .map(|row| Some(!rows.contains(&row)))
        .collect();
    let batch = filter_record_batch(table.batch(), &keep)?;
    Ok(Table::new(batch))
}
