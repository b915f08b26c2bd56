//! Two-way (mutual) swap detection
//!
//! For every participant A, the candidates are looked up in the location
//! index at each county A wants; a candidate B is kept when B wants A's
//! current county and the subject policy allows the pair. Each pair is
//! reported once, with the smaller participant key first.

use log::debug;
use rustc_hash::FxHashSet;

use crate::algorithm::matching::index::LocationIndex;
use crate::algorithm::matching::policy::SubjectEqualityPolicy;
use crate::algorithm::matching::types::MatchedPair;
use crate::algorithm::matching::view::ParticipantView;
use crate::models::participant::ParticipantKey;

/// Finds reciprocal pairs over one indexed population
#[derive(Debug, Clone, Copy)]
pub struct TwoWayMatcher<'a> {
    views: &'a [ParticipantView],
    index: &'a LocationIndex,
}

impl<'a> TwoWayMatcher<'a> {
    #[must_use]
    pub const fn new(views: &'a [ParticipantView], index: &'a LocationIndex) -> Self {
        Self { views, index }
    }

    /// Positions of every mutual partner of the view at `a`, in discovery order
    pub fn partners(&self, a: usize) -> impl Iterator<Item = usize> + '_ {
        let view_a = &self.views[a];
        view_a
            .wanted_counties()
            .iter()
            .flat_map(move |&county| self.index.candidates(view_a.level, county).iter().copied())
            .filter(move |&b| {
                let view_b = &self.views[b];
                view_b.key != view_a.key
                    && view_b.wants(view_a.current_county())
                    && SubjectEqualityPolicy::allows(view_a, view_b)
            })
    }

    /// All mutual pairs, each reported once in canonical orientation
    #[must_use]
    pub fn find(&self) -> Vec<MatchedPair> {
        let mut seen: FxHashSet<(ParticipantKey, ParticipantKey)> = FxHashSet::default();
        let mut pairs = Vec::new();

        for a in 0..self.views.len() {
            for b in self.partners(a) {
                let (first, second) = if self.views[a].key < self.views[b].key {
                    (&self.views[a], &self.views[b])
                } else {
                    (&self.views[b], &self.views[a])
                };
                if seen.insert((first.key, second.key)) {
                    pairs.push(MatchedPair::from_views(first, second));
                }
            }
        }

        debug!("Two-way search over {} views found {} pairs", self.views.len(), pairs.len());
        pairs
    }

    /// Every pair containing the view at `root`, with the root reported first
    #[must_use]
    pub fn find_for(&self, root: usize) -> Vec<MatchedPair> {
        self.partners(root)
            .map(|b| MatchedPair::from_views(&self.views[root], &self.views[b]))
            .collect()
    }
}
