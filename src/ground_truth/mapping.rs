//! Bidirectional action-name ↔ index table read from `mapping.txt`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Dense integer index of an action label.
pub type LabelIndex = i64;

/// Raw index reserved for the background label in mapping files.
pub const BACKGROUND_INDEX: LabelIndex = -1;

/// Errors raised while building a [`LabelMapping`].
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be opened or read.
    #[error("Failed to read mapping file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A line did not contain exactly `<index> <name>`.
    #[error("Malformed mapping line {line} in {path}: {content:?}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        content: String,
    },
    /// Background cannot move past an action index of `i64::MAX`.
    #[error("No index left above the largest label in {path} to relocate background")]
    NoRoomForBackground { path: PathBuf },
    /// The index column was not an integer.
    #[error("Invalid label index {token:?} on line {line} of {path}")]
    InvalidIndex {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

/// Name ↔ index lookup tables for action labels.
///
/// Both tables are exact inverses once construction finishes. When background
/// frames are excluded, the background entry is moved from `-1` to one past
/// the largest action index so trainable labels stay packed in `0..K`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMapping {
    name_to_index: BTreeMap<String, LabelIndex>,
    index_to_name: BTreeMap<LabelIndex, String>,
    background: Option<LabelIndex>,
}

impl LabelMapping {
    /// Read a mapping file from disk.
    pub fn load(path: &Path, keep_background: bool) -> Result<Self, MappingError> {
        let file = File::open(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path, keep_background)
    }

    /// Parse mapping lines from any buffered reader; `origin` is used in errors.
    pub fn from_reader<R: BufRead>(
        reader: R,
        origin: &Path,
        keep_background: bool,
    ) -> Result<Self, MappingError> {
        let mut mapping = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| MappingError::Read {
                path: origin.to_path_buf(),
                source,
            })?;
            let (index, name) = parse_line(&line, origin, idx + 1)?;
            mapping.insert(index, name);
        }
        mapping.background = mapping
            .index_to_name
            .contains_key(&BACKGROUND_INDEX)
            .then_some(BACKGROUND_INDEX);
        if !keep_background {
            mapping.relocate_background(origin)?;
        }
        Ok(mapping)
    }

    fn insert(&mut self, index: LabelIndex, name: String) {
        // A repeated name or index replaces the earlier pair in both tables.
        if let Some(old_index) = self.name_to_index.remove(&name) {
            self.index_to_name.remove(&old_index);
        }
        if let Some(old_name) = self.index_to_name.remove(&index) {
            self.name_to_index.remove(&old_name);
        }
        self.name_to_index.insert(name.clone(), index);
        self.index_to_name.insert(index, name);
    }

    fn relocate_background(&mut self, origin: &Path) -> Result<(), MappingError> {
        let Some(name) = self.index_to_name.get(&BACKGROUND_INDEX).cloned() else {
            return Ok(());
        };
        let new_index = match self.index_to_name.keys().next_back() {
            Some(&max) => max
                .max(BACKGROUND_INDEX)
                .checked_add(1)
                .ok_or_else(|| MappingError::NoRoomForBackground {
                    path: origin.to_path_buf(),
                })?,
            None => 0,
        };
        self.index_to_name.remove(&BACKGROUND_INDEX);
        self.name_to_index.insert(name.clone(), new_index);
        self.index_to_name.insert(new_index, name);
        self.background = Some(new_index);
        tracing::debug!("Relocated background label to index {new_index}");
        Ok(())
    }

    /// Index assigned to `name`, if it is a known label.
    pub fn index_of(&self, name: &str) -> Option<LabelIndex> {
        self.name_to_index.get(name).copied()
    }

    /// Name assigned to `index`, if any.
    pub fn name_of(&self, index: LabelIndex) -> Option<&str> {
        self.index_to_name.get(&index).map(String::as_str)
    }

    /// Current index of the background label: `-1` when kept, relocated otherwise.
    pub fn background_index(&self) -> Option<LabelIndex> {
        self.background
    }

    pub fn len(&self) -> usize {
        self.index_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_name.is_empty()
    }

    /// Iterate `(index, name)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelIndex, &str)> {
        self.index_to_name
            .iter()
            .map(|(index, name)| (*index, name.as_str()))
    }
}

fn parse_line(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<(LabelIndex, String), MappingError> {
    let mut tokens = line.split_whitespace();
    let (Some(index), Some(name), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(MappingError::MalformedLine {
            path: path.to_path_buf(),
            line: line_no,
            content: line.to_string(),
        });
    };
    let index = index
        .parse::<LabelIndex>()
        .map_err(|_| MappingError::InvalidIndex {
            path: path.to_path_buf(),
            line: line_no,
            token: index.to_string(),
        })?;
    Ok((index, name.to_string()))
}
