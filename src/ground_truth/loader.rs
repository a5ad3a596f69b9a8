//! Parsing of per-video annotation files into dense labels and segments.
//!
//! Each annotation file holds one line per frame whose first token is the
//! action name. A file containing a name the mapping does not know is
//! skipped as a whole; nothing partial reaches the store.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::GroundTruthError;
use super::mapping::{LabelIndex, LabelMapping};
use super::store::{GroundTruthStore, Segment};

/// Outcome of parsing one annotation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileParse {
    /// Every line resolved to a known label.
    Complete {
        labels: Vec<LabelIndex>,
        segments: Vec<Segment>,
    },
    /// Parsing stopped at `line` (1-based) on an unknown or empty `token`.
    Skipped { token: String, line: usize },
}

/// Store built from an annotation directory plus the videos left out of it.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub store: GroundTruthStore,
    pub skipped: Vec<String>,
}

/// Parse one annotation stream.
pub fn parse_annotation<R: BufRead>(
    reader: R,
    mapping: &LabelMapping,
) -> std::io::Result<FileParse> {
    let mut labels = Vec::new();
    let mut segments = Vec::new();
    let mut current: Option<LabelIndex> = None;
    let mut start = 0usize;

    for (frame, line) in reader.lines().enumerate() {
        let line = line?;
        let token = line.split_whitespace().next().unwrap_or_default();
        let Some(label) = mapping.index_of(token) else {
            return Ok(FileParse::Skipped {
                token: token.to_string(),
                line: frame + 1,
            });
        };
        if current != Some(label) {
            if let Some(previous) = current {
                segments.push(Segment::new(previous, start, frame));
            }
            current = Some(label);
            start = frame;
        }
        labels.push(label);
    }
    if let Some(last) = current {
        segments.push(Segment::new(last, start, labels.len()));
    }
    Ok(FileParse::Complete { labels, segments })
}

/// Parse every file directly inside `root`, ignoring subdirectories.
///
/// Files are visited in name order so logs and skipped lists are stable.
pub fn load_annotations(
    root: &Path,
    mapping: &LabelMapping,
) -> Result<LoadOutcome, GroundTruthError> {
    let read_dir_err = |source| GroundTruthError::ReadDir {
        path: root.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(root)
        .map_err(read_dir_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_dir_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut outcome = LoadOutcome::default();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let video = entry.file_name().to_string_lossy().into_owned();
        let file = File::open(&path).map_err(|source| GroundTruthError::ReadAnnotation {
            path: path.clone(),
            source,
        })?;
        let parsed = parse_annotation(BufReader::new(file), mapping)
            .map_err(|source| GroundTruthError::ReadAnnotation { path, source })?;
        match parsed {
            FileParse::Complete { labels, segments } => {
                outcome.store.insert(video, labels, segments);
            }
            FileParse::Skipped { token, line } => {
                tracing::warn!("Skipping {video}: unknown label {token:?} on line {line}");
                outcome.skipped.push(video);
            }
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground_truth::store::segments_cover;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn mapping(text: &str, keep_background: bool) -> LabelMapping {
        LabelMapping::from_reader(Cursor::new(text), Path::new("mapping.txt"), keep_background)
            .unwrap()
    }

    #[test]
    fn builds_labels_and_runs() {
        let mapping = mapping("0 walk\n1 run\n-1 background\n", false);
        let parsed = parse_annotation(
            Cursor::new("walk\nwalk\nbackground\nbackground\nrun\n"),
            &mapping,
        )
        .unwrap();
        assert_eq!(
            parsed,
            FileParse::Complete {
                labels: vec![0, 0, 2, 2, 1],
                segments: vec![
                    Segment::new(0, 0, 2),
                    Segment::new(2, 2, 4),
                    Segment::new(1, 4, 5)
                ],
            }
        );
    }

    #[test]
    fn uses_first_token_only() {
        let mapping = mapping("0 walk\n1 run\n", true);
        let body = Cursor::new("walk 0.93\nrun extra tokens\n");
        let parsed = parse_annotation(body, &mapping).unwrap();
        let FileParse::Complete { labels, .. } = parsed else {
            panic!("expected a complete parse");
        };
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn leading_retained_background_run_is_recorded() {
        let mapping = mapping("0 walk\n-1 SIL\n", true);
        let parsed = parse_annotation(Cursor::new("SIL\nSIL\nwalk\n"), &mapping).unwrap();
        let FileParse::Complete { segments, .. } = parsed else {
            panic!("expected a complete parse");
        };
        assert_eq!(segments, vec![Segment::new(-1, 0, 2), Segment::new(0, 2, 3)]);
    }

    #[test]
    fn unknown_token_skips_file() {
        let mapping = mapping("0 walk\n", true);
        let parsed = parse_annotation(Cursor::new("walk\nwalk\nfly\nwalk\n"), &mapping).unwrap();
        assert_eq!(
            parsed,
            FileParse::Skipped {
                token: "fly".to_string(),
                line: 3
            }
        );
    }

    #[test]
    fn blank_line_skips_file() {
        let mapping = mapping("0 walk\n", true);
        let parsed = parse_annotation(Cursor::new("walk\n\nwalk\n"), &mapping).unwrap();
        assert!(matches!(parsed, FileParse::Skipped { line: 2, .. }));
    }

    #[test]
    fn empty_file_is_complete_and_empty() {
        let mapping = mapping("0 walk\n", true);
        let parsed = parse_annotation(Cursor::new(""), &mapping).unwrap();
        assert_eq!(
            parsed,
            FileParse::Complete {
                labels: Vec::new(),
                segments: Vec::new()
            }
        );
    }

    #[test]
    fn directory_load_skips_subdirs_and_bad_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir(root.join("mapping")).unwrap();
        std::fs::write(root.join("mapping").join("mapping.txt"), "0 walk\n").unwrap();
        std::fs::write(root.join("b_video"), "walk\nrun\nrun\nwalk\n").unwrap();
        std::fs::write(root.join("a_video"), "walk\nwalk\nswim\n").unwrap();

        let mapping = mapping("0 walk\n1 run\n", true);
        let outcome = load_annotations(root, &mapping).unwrap();

        assert_eq!(outcome.skipped, vec!["a_video".to_string()]);
        assert_eq!(outcome.store.videos().collect::<Vec<_>>(), vec!["b_video"]);
        assert!(outcome.store.segments("a_video").is_none());
        let labels = outcome.store.labels("b_video").unwrap();
        let segments = outcome.store.segments("b_video").unwrap();
        assert!(segments_cover(segments, labels.len()));
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let mapping = mapping("0 walk\n", true);
        let err = load_annotations(&dir.path().join("absent"), &mapping).unwrap_err();
        assert!(matches!(err, GroundTruthError::ReadDir { .. }));
    }
}
