//! Removal of label-0 runs at the start and end of each video.

use super::error::GroundTruthError;
use super::mapping::LabelIndex;
use super::store::{LabelsByVideo, Segment, SegmentsByVideo};

/// Label treated as filler at sequence boundaries.
pub const ZERO_LABEL: LabelIndex = 0;

/// Overwrite leading and trailing zero runs with the nearest non-zero label.
///
/// Interior zeros are left in place; a sequence made only of zeros is unchanged.
pub fn fill_zero_boundaries(labels: &mut [LabelIndex]) {
    if labels.first() == Some(&ZERO_LABEL) {
        if let Some(pos) = labels.iter().position(|&label| label != ZERO_LABEL) {
            let fill = labels[pos];
            labels[..pos].fill(fill);
        }
    }
    if labels.last() == Some(&ZERO_LABEL) {
        if let Some(pos) = labels.iter().rposition(|&label| label != ZERO_LABEL) {
            let fill = labels[pos];
            labels[pos + 1..].fill(fill);
        }
    }
}

/// Relabel zero-labelled endpoint segments with their inner neighbour's label.
///
/// Bounds are kept, so adjacent segments may end up sharing a label.
pub fn fill_zero_segments(segments: &mut [Segment]) {
    let count = segments.len();
    if count < 2 {
        return;
    }
    if segments[0].label == ZERO_LABEL {
        segments[0].label = segments[1].label;
    }
    if segments[count - 1].label == ZERO_LABEL {
        segments[count - 1].label = segments[count - 2].label;
    }
}

/// Smooth every dense sequence and require that no zero survives.
pub fn smooth_labels(labels: &mut LabelsByVideo) -> Result<(), GroundTruthError> {
    for (video, sequence) in labels.iter_mut() {
        fill_zero_boundaries(sequence);
        if sequence.contains(&ZERO_LABEL) {
            return Err(GroundTruthError::ZeroLabelRemains {
                video: video.clone(),
            });
        }
    }
    Ok(())
}

pub fn smooth_segments(segments: &mut SegmentsByVideo) {
    for runs in segments.values_mut() {
        fill_zero_segments(runs);
    }
}
