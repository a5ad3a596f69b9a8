//! Label counts derived from stored ground truth.

use std::collections::BTreeSet;

use super::mapping::LabelIndex;
use super::store::LabelsByVideo;

/// Per-activity summary reported by the command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    pub activity: String,
    pub videos: usize,
    pub k: usize,
}

/// Count distinct labels across videos whose identifier contains `activity`.
///
/// `background` is not counted when it occurs.
pub fn distinct_labels(
    labels: &LabelsByVideo,
    activity: &str,
    background: Option<LabelIndex>,
) -> usize {
    let seen: BTreeSet<LabelIndex> = labels
        .iter()
        .filter(|(video, _)| video.contains(activity))
        .flat_map(|(_, sequence)| sequence.iter().copied())
        .collect();
    match background {
        Some(bg) if seen.contains(&bg) => seen.len() - 1,
        _ => seen.len(),
    }
}

/// Number of videos whose identifier contains `activity`.
pub fn matching_videos(labels: &LabelsByVideo, activity: &str) -> usize {
    labels.keys().filter(|video| video.contains(activity)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(entries: Vec<(&str, Vec<LabelIndex>)>) -> LabelsByVideo {
        entries
            .into_iter()
            .map(|(name, labels)| (name.to_string(), labels))
            .collect()
    }

    #[test]
    fn unions_labels_of_matching_videos() {
        let labels = store(vec![
            ("P03_coffee", vec![1, 1, 2]),
            ("P04_coffee", vec![2, 3]),
            ("P03_tea", vec![7, 8]),
        ]);
        assert_eq!(distinct_labels(&labels, "coffee", None), 3);
        assert_eq!(matching_videos(&labels, "coffee"), 2);
    }

    #[test]
    fn excludes_background_index() {
        let labels = store(vec![("P03_coffee", vec![4, 1, 2, 4])]);
        assert_eq!(distinct_labels(&labels, "coffee", Some(4)), 2);
        assert_eq!(distinct_labels(&labels, "coffee", Some(9)), 3);
    }

    #[test]
    fn count_ignores_video_and_frame_order() {
        let forward = store(vec![
            ("P01_cereals", vec![-1, 0, 1, -1]),
            ("P02_cereals", vec![0, 2, 2]),
            ("P01_tea", vec![3]),
        ]);
        let mut reversed = LabelsByVideo::new();
        reversed.insert("P01_tea".into(), vec![3]);
        reversed.insert("P02_cereals".into(), vec![2, 2, 0]);
        reversed.insert("P01_cereals".into(), vec![-1, 1, 0, -1]);

        for background in [None, Some(-1)] {
            assert_eq!(
                distinct_labels(&forward, "cereals", background),
                distinct_labels(&reversed, "cereals", background)
            );
        }
        assert_eq!(distinct_labels(&reversed, "cereals", Some(-1)), 3);
        assert_eq!(distinct_labels(&reversed, "cereals", None), 4);
    }

    #[test]
    fn no_match_is_zero() {
        let labels = store(vec![("P03_coffee", vec![1])]);
        assert_eq!(distinct_labels(&labels, "juice", Some(-1)), 0);
    }
}
