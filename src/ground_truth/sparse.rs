use std::num::NonZeroUsize;

use super::mapping::LabelIndex;
use super::store::LabelsByVideo;

/// Default frame stride used when down-sampling label sequences.
pub const DEFAULT_SPARSE_STRIDE: usize = 10;

/// Keep every `stride`-th label starting at frame 0.
pub fn subsample(labels: &[LabelIndex], stride: NonZeroUsize) -> Vec<LabelIndex> {
    labels.iter().step_by(stride.get()).copied().collect()
}

pub fn subsample_all(labels: &mut LabelsByVideo, stride: NonZeroUsize) {
    for sequence in labels.values_mut() {
        *sequence = subsample(sequence, stride);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stride(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn length_is_ceiling_of_stride_division() {
        for len in [0usize, 1, 9, 10, 11, 25, 30] {
            let labels: Vec<LabelIndex> = (0..len as LabelIndex).collect();
            let sparse = subsample(&labels, stride(DEFAULT_SPARSE_STRIDE));
            assert_eq!(sparse.len(), len.div_ceil(DEFAULT_SPARSE_STRIDE));
            for (i, value) in sparse.iter().enumerate() {
                assert_eq!(*value, labels[i * DEFAULT_SPARSE_STRIDE]);
            }
        }
    }

    #[test]
    fn resamples_every_video() {
        let mut labels = LabelsByVideo::new();
        labels.insert("a".into(), vec![1, 1, 2, 2, 3]);
        labels.insert("b".into(), vec![4]);
        subsample_all(&mut labels, stride(2));
        assert_eq!(labels["a"], vec![1, 2, 3]);
        assert_eq!(labels["b"], vec![4]);
    }

    #[test]
    fn stride_of_one_keeps_every_frame() {
        let labels = vec![3, 1, 4, 1, 5];
        assert_eq!(subsample(&labels, stride(1)), labels);
    }
}
