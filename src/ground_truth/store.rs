//! Per-video label containers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mapping::LabelIndex;

/// Dense per-frame labels keyed by video identifier.
pub type LabelsByVideo = BTreeMap<String, Vec<LabelIndex>>;
/// Run-length segments keyed by video identifier.
pub type SegmentsByVideo = BTreeMap<String, Vec<Segment>>;

/// A maximal run of frames sharing one label, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub label: LabelIndex,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(label: LabelIndex, start: usize, end: usize) -> Self {
        Self { label, start, end }
    }

    /// Number of frames in the run.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dense labels and segment lists for a set of videos.
///
/// The two maps are persisted separately (`gt` / `order`) and can diverge:
/// resampling rewrites `labels` but leaves `segments` at frame resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundTruthStore {
    pub labels: LabelsByVideo,
    pub segments: SegmentsByVideo,
}

impl GroundTruthStore {
    pub fn new(labels: LabelsByVideo, segments: SegmentsByVideo) -> Self {
        Self { labels, segments }
    }

    /// Number of videos with dense labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, video: &str) -> bool {
        self.labels.contains_key(video)
    }

    pub fn labels(&self, video: &str) -> Option<&[LabelIndex]> {
        self.labels.get(video).map(Vec::as_slice)
    }

    pub fn segments(&self, video: &str) -> Option<&[Segment]> {
        self.segments.get(video).map(Vec::as_slice)
    }

    pub fn videos(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    pub fn insert(&mut self, video: String, labels: Vec<LabelIndex>, segments: Vec<Segment>) {
        self.segments.insert(video.clone(), segments);
        self.labels.insert(video, labels);
    }
}

/// Check that `segments` tile `0..frames` without gaps or overlaps.
pub fn segments_cover(segments: &[Segment], frames: usize) -> bool {
    let mut cursor = 0usize;
    for segment in segments {
        if segment.start != cursor || segment.end < segment.start {
            return false;
        }
        cursor = segment.end;
    }
    cursor == frames
}

/// Collapse a dense label sequence into its runs.
pub fn runs_of(labels: &[LabelIndex]) -> Vec<Segment> {
    let mut runs: Vec<Segment> = Vec::new();
    for (frame, &label) in labels.iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.label == label => run.end = frame + 1,
            _ => runs.push(Segment::new(label, frame, frame + 1)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_of_collapses_repeats() {
        let runs = runs_of(&[0, 0, 2, 2, 1]);
        assert_eq!(
            runs,
            vec![Segment::new(0, 0, 2), Segment::new(2, 2, 4), Segment::new(1, 4, 5)]
        );
        assert!(segments_cover(&runs, 5));
    }

    #[test]
    fn cover_detects_gaps_and_short_tails() {
        let gap = [Segment::new(1, 0, 2), Segment::new(2, 3, 5)];
        assert!(!segments_cover(&gap, 5));
        let short = [Segment::new(1, 0, 2)];
        assert!(!segments_cover(&short, 3));
        assert!(segments_cover(&[], 0));
    }

    #[test]
    fn insert_keeps_maps_in_step() {
        let mut store = GroundTruthStore::default();
        store.insert("a".into(), vec![3, 3], vec![Segment::new(3, 0, 2)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.labels("a"), Some(&[3, 3][..]));
        assert_eq!(store.segments("a").map(<[Segment]>::len), Some(1));
        assert!(!store.contains("b"));
    }
}
