use std::path::PathBuf;

use thiserror::Error;

use super::cache::CacheError;
use super::mapping::MappingError;

/// Errors raised while loading or transforming ground truth.
#[derive(Debug, Error)]
pub enum GroundTruthError {
    /// The label mapping could not be built.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// Reading or writing a cached blob failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The annotation root could not be listed.
    #[error("Failed to list annotation directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// An annotation file could not be read.
    #[error("Failed to read annotation file {path}: {source}")]
    ReadAnnotation {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Boundary smoothing left a background frame inside a video.
    #[error("Label 0 remains in {video:?} after boundary smoothing")]
    ZeroLabelRemains {
        video: String,
    },
    /// Down-sampling was asked to keep every 0th frame.
    #[error("Sparse stride must be at least 1")]
    InvalidStride,
}
