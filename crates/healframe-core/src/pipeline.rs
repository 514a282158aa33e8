//! Load, normalize and validate in one call.

use std::path::Path;

use tracing::info;

use crate::{
    engine::validate,
    errors::FrameError,
    loader::{load_with, LoaderConfig},
    normalizer::{normalize, NormalizeConfig},
    schema::Schema,
    Validated,
};

/// Run the whole pipeline on a delimited file.
///
/// Fatal errors from any stage abort the run; cell-level problems end up as
/// violations in the returned [`Validated`].
pub fn run(
    path: impl AsRef<Path>,
    loader: &LoaderConfig,
    normalize_config: &NormalizeConfig,
    schema: &Schema,
) -> Result<Validated, FrameError> {
    let path = path.as_ref();
    let raw = load_with(path, loader)?;
    info!(
        path = %path.display(),
        rows = raw.num_rows(),
        columns = raw.num_columns(),
        "loaded input"
    );
    let normalized = normalize(&raw, normalize_config)?;
    validate(&normalized, schema)
}
