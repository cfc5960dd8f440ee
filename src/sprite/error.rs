//! Per-icon and per-output failures during sprite assembly.

use std::path::PathBuf;

use thiserror::Error;

/// Icon bytes could not be read or do not parse as SVG. The icon is skipped.
#[derive(Debug, Error)]
pub enum SourceReadError {
    #[error("failed to read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{}` is not valid SVG: {}", .0.display(), .1)]
    Parse(PathBuf, String),
}

/// The optimizer rejected an icon. The cleaned source is used instead.
#[derive(Debug, Error)]
#[error("failed to optimize `{}`: {message}", .path.display())]
pub struct OptimizationError {
    pub path: PathBuf,
    pub message: String,
}

/// A combined document or generated listing could not be written.
#[derive(Debug, Error)]
#[error("failed to write `{}`", .0.display())]
pub struct OutputWriteError(pub PathBuf, #[source] pub std::io::Error);
