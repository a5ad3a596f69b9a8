//! Frame-level ground truth for temporal action segmentation.
//!
//! [`GroundTruth`] owns the label mapping and two independent stores: the
//! active one, which smoothing and resampling rewrite, and a with-zeros copy
//! that keeps the boundary labels as loaded. Parsed results are memoized in
//! an [`ObjectCache`]; once a blob exists it is used verbatim until deleted.

pub mod cache;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod smoothing;
pub mod sparse;
pub mod stats;
pub mod store;

use std::num::NonZeroUsize;
use std::time::Instant;

pub use cache::{CacheError, DirCache, MemoryCache, ObjectCache};
pub use error::GroundTruthError;
pub use loader::{FileParse, LoadOutcome};
pub use mapping::{BACKGROUND_INDEX, LabelIndex, LabelMapping, MappingError};
pub use stats::ActivitySummary;
pub use store::{GroundTruthStore, LabelsByVideo, Segment, SegmentsByVideo};

use crate::config::GroundTruthSettings;
use cache::{GT_KEY, GT_WO_ZEROS_KEY, ORDER_KEY, ORDER_WO_ZEROS_KEY, SKIPPED_KEY};

/// Ground-truth labels for every annotated video under a root directory.
#[derive(Debug)]
pub struct GroundTruth<C: ObjectCache = DirCache> {
    settings: GroundTruthSettings,
    cache: C,
    mapping: LabelMapping,
    store: GroundTruthStore,
    with_zeros: GroundTruthStore,
    skipped: Vec<String>,
}

impl GroundTruth<DirCache> {
    /// Ground truth cached next to the mapping file under `<gt_root>/mapping`.
    pub fn new(settings: GroundTruthSettings) -> Self {
        let cache = DirCache::new(settings.mapping_dir());
        Self::with_cache(settings, cache)
    }
}

impl<C: ObjectCache> GroundTruth<C> {
    pub fn with_cache(settings: GroundTruthSettings, cache: C) -> Self {
        Self {
            settings,
            cache,
            mapping: LabelMapping::default(),
            store: GroundTruthStore::default(),
            with_zeros: GroundTruthStore::default(),
            skipped: Vec::new(),
        }
    }

    /// Build the mapping, load labels and smooth boundaries unless `zeros` is set.
    pub fn load_mapping(&mut self) -> Result<(), GroundTruthError> {
        timed("create_mapping", || self.create_mapping())?;
        timed("load_gt", || self.load_gt())?;
        if !self.settings.zeros {
            timed("rid_of_zeros", || self.rid_of_zeros())?;
        }
        Ok(())
    }

    /// (Re)build the label mapping from `<gt_root>/mapping/mapping.txt`.
    ///
    /// The mapping is rebuilt from scratch on every call.
    pub fn create_mapping(&mut self) -> Result<(), GroundTruthError> {
        let path = self.settings.mapping_path();
        self.mapping = LabelMapping::load(&path, self.settings.bg)?;
        tracing::info!(
            "Loaded {} labels from {} (background at {:?})",
            self.mapping.len(),
            path.display(),
            self.mapping.background_index()
        );
        Ok(())
    }

    /// Load per-video labels from cache, or parse the annotation root and cache the result.
    pub fn load_gt(&mut self) -> Result<(), GroundTruthError> {
        let labels: Option<LabelsByVideo> = self.cache.load(GT_KEY)?;
        let segments: Option<SegmentsByVideo> = self.cache.load(ORDER_KEY)?;
        if let (Some(labels), Some(segments)) = (labels, segments) {
            tracing::info!("Using cached ground truth for {} videos", labels.len());
            self.store = GroundTruthStore::new(labels, segments);
            // Caches written before skips were recorded have no blob.
            self.skipped = self.cache.load::<Vec<String>>(SKIPPED_KEY)?.unwrap_or_default();
        } else {
            let outcome = loader::load_annotations(&self.settings.gt_root, &self.mapping)?;
            tracing::info!(
                "Parsed ground truth for {} videos ({} skipped)",
                outcome.store.len(),
                outcome.skipped.len()
            );
            self.cache.save(&outcome.store.labels, GT_KEY)?;
            self.cache.save(&outcome.store.segments, ORDER_KEY)?;
            self.cache.save(&outcome.skipped, SKIPPED_KEY)?;
            self.store = outcome.store;
            self.skipped = outcome.skipped;
        }
        self.with_zeros = self.store.clone();
        Ok(())
    }

    /// Replace label-0 runs at video boundaries with neighbouring labels.
    ///
    /// The loaded labels stay available through [`Self::with_zeros`]. Fails
    /// without touching the cache if a zero remains inside any video.
    pub fn rid_of_zeros(&mut self) -> Result<(), GroundTruthError> {
        self.with_zeros = self.store.clone();

        let labels = match self.cache.load::<LabelsByVideo>(GT_WO_ZEROS_KEY)? {
            Some(labels) => labels,
            None => {
                let mut labels = self.store.labels.clone();
                smoothing::smooth_labels(&mut labels)?;
                self.cache.save(&labels, GT_WO_ZEROS_KEY)?;
                labels
            }
        };
        let segments = match self.cache.load::<SegmentsByVideo>(ORDER_WO_ZEROS_KEY)? {
            Some(segments) => segments,
            None => {
                let mut segments = self.store.segments.clone();
                smoothing::smooth_segments(&mut segments);
                self.cache.save(&segments, ORDER_WO_ZEROS_KEY)?;
                segments
            }
        };
        self.store = GroundTruthStore::new(labels, segments);
        Ok(())
    }

    /// Number of distinct non-background labels over videos whose name contains `activity`.
    pub fn define_k(&self, activity: &str) -> usize {
        stats::distinct_labels(
            &self.store.labels,
            activity,
            self.mapping.background_index(),
        )
    }

    /// Video count and K for each activity name.
    pub fn activity_summaries<S: AsRef<str>>(&self, activities: &[S]) -> Vec<ActivitySummary> {
        activities
            .iter()
            .map(|activity| {
                let activity = activity.as_ref();
                ActivitySummary {
                    activity: activity.to_string(),
                    videos: stats::matching_videos(&self.store.labels, activity),
                    k: self.define_k(activity),
                }
            })
            .collect()
    }

    /// Down-sample every dense sequence to the configured stride.
    ///
    /// Segment lists are not recomputed and no longer match the labels. A
    /// stride of 0 is rejected before any sequence is touched.
    pub fn sparse_gt(&mut self) -> Result<(), GroundTruthError> {
        let stride =
            NonZeroUsize::new(self.settings.sparse_stride).ok_or(GroundTruthError::InvalidStride)?;
        sparse::subsample_all(&mut self.store.labels, stride);
        self.with_zeros.labels = self.store.labels.clone();
        tracing::info!("Resampled {} videos with stride {stride}", self.store.len());
        Ok(())
    }

    pub fn settings(&self) -> &GroundTruthSettings {
        &self.settings
    }

    pub fn mapping(&self) -> &LabelMapping {
        &self.mapping
    }

    /// Active labels: smoothed and/or resampled once those steps have run.
    pub fn store(&self) -> &GroundTruthStore {
        &self.store
    }

    /// Labels with boundary zeros preserved.
    pub fn with_zeros(&self) -> &GroundTruthStore {
        &self.with_zeros
    }

    /// Videos left out of the store because of unknown labels.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

fn timed<T>(stage: &str, run: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let out = run();
    tracing::info!("{stage} finished in {:.3}s", started.elapsed().as_secs_f64());
    out
}
