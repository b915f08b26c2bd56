//! Triangle (three-party cyclic) swap detection
//!
//! A triangle is A → B → C → A where each participant wants the current
//! county of the next one. The search is a bounded expansion of depth three
//! from every root A through the location index:
//!
//! 1. B is drawn from the buckets of A's wanted counties, pruned by the A–B
//!    subject check.
//! 2. C is drawn from the buckets of B's wanted counties, pruned by the A–C
//!    subject check.
//! 3. The cycle closes when C wants A's current county.
//!
//! The three rotations of one cycle, and a reverse cycle over the same three
//! participants, share one canonical key (the sorted member keys). The first
//! cycle encountered is retained, with roots taken in input order and wanted
//! counties in ascending id order. The parallel search keeps that rule: each
//! root is expanded independently and the per-root results are merged in
//! root order before a single dedup pass.

use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::algorithm::matching::index::LocationIndex;
use crate::algorithm::matching::policy::SubjectEqualityPolicy;
use crate::algorithm::matching::types::MatchedTriangle;
use crate::algorithm::matching::view::ParticipantView;
use crate::models::participant::ParticipantKey;
use crate::utils::progress;

type Cycle = [usize; 3];

/// Finds 3-cycles over one indexed population
#[derive(Debug, Clone, Copy)]
pub struct TriangleMatcher<'a> {
    views: &'a [ParticipantView],
    index: &'a LocationIndex,
}

impl<'a> TriangleMatcher<'a> {
    #[must_use]
    pub const fn new(views: &'a [ParticipantView], index: &'a LocationIndex) -> Self {
        Self { views, index }
    }

    /// Every closed cycle starting at `a`, in discovery order, not deduplicated
    #[must_use]
    pub fn cycles_from(&self, a: usize) -> Vec<Cycle> {
        let view_a = &self.views[a];
        let mut cycles = Vec::new();

        for &county_b in view_a.wanted_counties() {
            for &b in self.index.candidates(view_a.level, county_b) {
                let view_b = &self.views[b];
                if view_b.key == view_a.key || !SubjectEqualityPolicy::allows(view_a, view_b) {
                    continue;
                }

                for &county_c in view_b.wanted_counties() {
                    for &c in self.index.candidates(view_a.level, county_c) {
                        let view_c = &self.views[c];
                        if view_c.key == view_a.key || view_c.key == view_b.key {
                            continue;
                        }
                        if !SubjectEqualityPolicy::allows(view_a, view_c) {
                            continue;
                        }
                        if view_c.wants(view_a.current_county()) {
                            cycles.push([a, b, c]);
                        }
                    }
                }
            }
        }

        cycles
    }

    fn canonical_key(&self, cycle: &Cycle) -> [ParticipantKey; 3] {
        let mut keys = cycle.map(|i| self.views[i].key);
        keys.sort_unstable();
        keys
    }

    /// Keep the first cycle per member set, preserving order
    fn dedup(&self, cycles: impl IntoIterator<Item = Cycle>) -> Vec<MatchedTriangle> {
        let mut seen = FxHashSet::default();
        cycles
            .into_iter()
            .filter(|cycle| seen.insert(self.canonical_key(cycle)))
            .map(|cycle| MatchedTriangle::from_views(cycle.map(|i| &self.views[i])))
            .collect()
    }

    /// All triangles, searched sequentially
    #[must_use]
    pub fn find(&self) -> Vec<MatchedTriangle> {
        self.find_with_progress(&ProgressBar::hidden())
    }

    /// All triangles, searched sequentially, with a bar drawn when `show_progress` is set
    #[must_use]
    pub fn find_sequential(&self, show_progress: bool) -> Vec<MatchedTriangle> {
        let pb = progress::create_progress_bar(
            self.views.len() as u64,
            Some("Searching triangle swaps"),
            show_progress,
        );
        let triangles = self.find_with_progress(&pb);
        progress::finish_progress_bar(&pb, Some("Triangle search complete"));
        triangles
    }

    /// All triangles, searched sequentially with progress reporting
    #[must_use]
    pub fn find_with_progress(&self, pb: &ProgressBar) -> Vec<MatchedTriangle> {
        let mut cycles = Vec::new();
        for a in 0..self.views.len() {
            cycles.extend(self.cycles_from(a));
            pb.inc(1);
        }
        let triangles = self.dedup(cycles);
        debug!(
            "Triangle search over {} views found {} triangles",
            self.views.len(),
            triangles.len()
        );
        triangles
    }

    /// All triangles, with roots expanded on the rayon pool
    ///
    /// Produces exactly the same list as [`Self::find`].
    #[must_use]
    pub fn find_parallel(&self, show_progress: bool) -> Vec<MatchedTriangle> {
        let pb = progress::create_progress_bar(
            self.views.len() as u64,
            Some("Searching triangle swaps"),
            show_progress,
        );
        info!(
            "Using parallel triangle search with {} threads",
            rayon::current_num_threads()
        );

        let per_root: Vec<Vec<Cycle>> = (0..self.views.len())
            .into_par_iter()
            .map(|a| {
                let cycles = self.cycles_from(a);
                pb.inc(1);
                cycles
            })
            .collect();

        let triangles = self.dedup(per_root.into_iter().flatten());
        progress::finish_progress_bar(&pb, Some("Triangle search complete"));
        triangles
    }

    /// Every triangle containing the view at `root`, rotated so the root leads
    #[must_use]
    pub fn find_for(&self, root: usize) -> Vec<MatchedTriangle> {
        self.dedup(self.cycles_from(root))
    }
}
