//! Location index over normalised participants
//!
//! Maps `(level, current county)` to the positions of the views located
//! there. Built once per run and only read afterwards, so every "who is in
//! county C at level L" question is a single map lookup.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::algorithm::matching::view::ParticipantView;
use crate::error::{Result, SwapEngineError};
use crate::models::level::LevelId;
use crate::models::location::CountyId;

type Bucket = SmallVec<[usize; 8]>;

/// Read-only `(level, county) -> participants` index
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    buckets: FxHashMap<(LevelId, CountyId), Bucket>,
    len: usize,
}

impl LocationIndex {
    /// Index every view by its level and current county
    #[must_use]
    pub fn build(views: &[ParticipantView]) -> Self {
        let mut buckets: FxHashMap<(LevelId, CountyId), Bucket> = FxHashMap::default();
        for (pos, view) in views.iter().enumerate() {
            buckets
                .entry((view.level, view.current_county()))
                .or_default()
                .push(pos);
        }
        Self {
            buckets,
            len: views.len(),
        }
    }

    /// Index a single-level slice, refusing views of any other level
    pub fn build_for_level(views: &[ParticipantView], level: LevelId) -> Result<Self> {
        if let Some(other) = views.iter().find(|v| v.level != level) {
            return Err(SwapEngineError::LevelMismatch {
                expected: level,
                found: other.level,
            });
        }
        Ok(Self::build(views))
    }

    /// Positions of all views at `level` currently in `county`, in input order
    #[must_use]
    pub fn candidates(&self, level: LevelId, county: CountyId) -> &[usize] {
        self.buckets
            .get(&(level, county))
            .map(|bucket| bucket.as_slice())
            .unwrap_or_default()
    }

    /// Number of indexed views
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty `(level, county)` buckets
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
