use crate::{
    config::{self, TreeSource},
    errors::{FileOperation, IoError},
    materialize::{self, Report},
    vfs::TreeStats,
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PlanterError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Io(#[from] IoError),
}

/// Plants the tree described by `source` under `destination`.
///
/// `destination` (and any missing parents) is created first, then the tree is
/// materialized inside it.
///
/// # Errors
///
/// Returns a [`PlanterError`] if:
///
/// - The tree file cannot be read or is not a valid tree.
/// - `destination` or any directory of the tree cannot be created.
/// - Any file of the tree cannot be written. Entries written before the failure are
///   left on disk.
pub fn build(source: &TreeSource, destination: &str) -> Result<Report, PlanterError> {
    let tree = source.load()?;

    let destination = Path::new(destination);

    log::debug!("ensuring destination exists: {}", destination.display());

    std::fs::create_dir_all(destination).map_err(|error| {
        IoError::new(FileOperation::Mkdir, destination.to_path_buf(), error)
    })?;

    let report = materialize::materialize(destination, &tree)?;

    Ok(report)
}

/// Loads and validates the tree described by `source` without touching the disk.
///
/// # Errors
///
/// Returns a [`PlanterError`] if the tree file cannot be read or is not a valid tree.
pub fn check(source: &TreeSource) -> Result<TreeStats, PlanterError> {
    let tree = source.load()?;

    Ok(tree.stats())
}
