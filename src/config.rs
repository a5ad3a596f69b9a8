//! Settings consumed by the ground-truth pipeline.
//!
//! Settings live in a TOML file (default `framegt.toml` in the application
//! directory). Every field has a default so partial files stay valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::ground_truth::sparse::DEFAULT_SPARSE_STRIDE;

/// Default filename of the settings file inside the application directory.
pub const CONFIG_FILE_NAME: &str = "framegt.toml";
/// Subdirectory of the ground-truth root holding the mapping file and caches.
pub const MAPPING_DIR_NAME: &str = "mapping";
/// Name of the label mapping file inside [`MAPPING_DIR_NAME`].
pub const MAPPING_FILE_NAME: &str = "mapping.txt";

/// Errors that may occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the settings file.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// The resampling stride must be positive.
    #[error("sparse_stride must be at least 1")]
    InvalidStride,
    /// No usable application directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthSettings {
    /// Directory holding one annotation file per video plus `mapping/`.
    #[serde(default = "default_gt_root")]
    pub gt_root: PathBuf,
    /// Keep background at index `-1` instead of moving it past the action labels.
    #[serde(default)]
    pub bg: bool,
    /// Keep label-0 runs at video boundaries; when false they are smoothed away.
    #[serde(default = "default_true")]
    pub zeros: bool,
    /// Frame stride used by sparse resampling.
    #[serde(default = "default_sparse_stride")]
    pub sparse_stride: usize,
    /// Directory for log files; defaults to `logs/` in the application directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for GroundTruthSettings {
    fn default() -> Self {
        Self {
            gt_root: default_gt_root(),
            bg: false,
            zeros: default_true(),
            sparse_stride: default_sparse_stride(),
            log_dir: None,
        }
    }
}

impl GroundTruthSettings {
    /// Settings rooted at `gt_root` with every other field defaulted.
    pub fn for_root(gt_root: impl Into<PathBuf>) -> Self {
        Self {
            gt_root: gt_root.into(),
            ..Self::default()
        }
    }

    /// Directory holding the mapping file and cached blobs.
    pub fn mapping_dir(&self) -> PathBuf {
        self.gt_root.join(MAPPING_DIR_NAME)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.mapping_dir().join(MAPPING_FILE_NAME)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sparse_stride == 0 {
            return Err(ConfigError::InvalidStride);
        }
        Ok(())
    }
}

/// Resolve the default settings path inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(|_| ConfigError::NoConfigDir)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from the default location, returning defaults if the file is missing.
pub fn load_or_default() -> Result<GroundTruthSettings, ConfigError> {
    load_settings_from(&config_path()?)
}

/// Load settings from `path`, returning defaults if the file is missing.
pub fn load_settings_from(path: &Path) -> Result<GroundTruthSettings, ConfigError> {
    if !path.exists() {
        return Ok(GroundTruthSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: GroundTruthSettings =
        toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}

fn default_gt_root() -> PathBuf {
    PathBuf::from("groundTruth")
}

fn default_true() -> bool {
    true
}

fn default_sparse_stride() -> usize {
    DEFAULT_SPARSE_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, GroundTruthSettings::default());
        assert!(settings.zeros);
        assert!(!settings.bg);
        assert_eq!(settings.sparse_stride, 10);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "gt_root = \"/data/breakfast/groundTruth\"\nzeros = false\n",
        )
        .unwrap();
        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.gt_root, PathBuf::from("/data/breakfast/groundTruth"));
        assert!(!settings.zeros);
        assert_eq!(settings.sparse_stride, DEFAULT_SPARSE_STRIDE);
        assert_eq!(
            settings.mapping_path(),
            PathBuf::from("/data/breakfast/groundTruth/mapping/mapping.txt")
        );
    }

    #[test]
    fn zero_stride_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "sparse_stride = 0\n").unwrap();
        assert!(matches!(
            load_settings_from(&path),
            Err(ConfigError::InvalidStride)
        ));
    }

    #[test]
    fn malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "bg = \"yes\"\n").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
