use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use arrow::csv::WriterBuilder;
use healframe_core::Table;

pub const DEFAULT_OUTPUT_NAME: &str = "clean_data.csv";

/// Where to write the clean table.
///
/// An existing directory, or a path ending with a separator, receives
/// `default_name`; missing parent directories are created.
pub fn resolve_file_path(path: &str, default_name: &str) -> Result<PathBuf> {
    let target = Path::new(path);

    let output_path = if target.is_dir() {
        target.join(default_name)
    } else if path.ends_with('/') || path.ends_with('\\') {
        fs::create_dir_all(target)
            .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        target.join(default_name)
    } else {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        target.to_path_buf()
    };
    Ok(output_path)
}

/// Write `table` as CSV with a header row.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer
        .write(table.batch())
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}
