//! Executable form of a schema.
//!
//! A [`crate::schema::ColumnSchema`] is plain data; the compiler turns it into
//! an [`ExecutableColumn`] holding typed rule objects that the engine runs
//! directly against Arrow arrays.

mod executable_column;

pub use executable_column::ExecutableColumn;
