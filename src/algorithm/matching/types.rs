//! Type definitions for match results
//!
//! Results are transient values: recomputed on every run and never stored
//! by the engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::time::Duration;

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::matching::policy::SubjectEqualityPolicy;
use crate::algorithm::matching::view::{Exclusion, ExclusionReason, ParticipantView};
use crate::models::level::{LevelId, SubjectId};
use crate::models::location::{CountyId, LocationHierarchy, LocationPath};
use crate::models::participant::ParticipantKey;

/// One side of a two-way swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairSide {
    pub key: ParticipantKey,
    /// Where this participant is now
    pub current: LocationPath,
    /// County this participant moves to (the partner's current county)
    pub target_county: CountyId,
}

/// A mutual two-party swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub first: PairSide,
    pub second: PairSide,
    pub level: LevelId,
    /// Shared subject set, present only at exact-match levels
    pub subjects: Option<BTreeSet<SubjectId>>,
}

impl MatchedPair {
    pub(crate) fn from_views(a: &ParticipantView, b: &ParticipantView) -> Self {
        Self {
            first: PairSide {
                key: a.key,
                current: a.current,
                target_county: b.current_county(),
            },
            second: PairSide {
                key: b.key,
                current: b.current,
                target_county: a.current_county(),
            },
            level: a.level,
            subjects: SubjectEqualityPolicy::shared_subjects(a),
        }
    }

    #[must_use]
    pub const fn keys(&self) -> (ParticipantKey, ParticipantKey) {
        (self.first.key, self.second.key)
    }

    /// Whether `key` is one of the two parties
    #[must_use]
    pub fn involves(&self, key: ParticipantKey) -> bool {
        self.first.key == key || self.second.key == key
    }

    /// The other party, if `key` is one of them
    #[must_use]
    pub fn partner_of(&self, key: ParticipantKey) -> Option<&PairSide> {
        if self.first.key == key {
            Some(&self.second)
        } else if self.second.key == key {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// One participant's position in a triangle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriangleLeg {
    pub key: ParticipantKey,
    pub current: LocationPath,
    /// Current county of the next participant in the cycle
    pub target_county: CountyId,
}

/// A three-party cyclic swap: legs[0] → legs[1] → legs[2] → legs[0]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedTriangle {
    pub legs: [TriangleLeg; 3],
    pub level: LevelId,
    /// Shared subject set, present only at exact-match levels
    pub subjects: Option<BTreeSet<SubjectId>>,
}

impl MatchedTriangle {
    pub(crate) fn from_views(cycle: [&ParticipantView; 3]) -> Self {
        let leg = |i: usize| TriangleLeg {
            key: cycle[i].key,
            current: cycle[i].current,
            target_county: cycle[(i + 1) % 3].current_county(),
        };
        Self {
            legs: [leg(0), leg(1), leg(2)],
            level: cycle[0].level,
            subjects: SubjectEqualityPolicy::shared_subjects(cycle[0]),
        }
    }

    /// Member keys in cycle order
    #[must_use]
    pub fn keys(&self) -> [ParticipantKey; 3] {
        [self.legs[0].key, self.legs[1].key, self.legs[2].key]
    }

    /// Member keys sorted; identical for every rotation of one cycle
    #[must_use]
    pub fn canonical_keys(&self) -> [ParticipantKey; 3] {
        let mut keys = self.keys();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn involves(&self, key: ParticipantKey) -> bool {
        self.legs.iter().any(|leg| leg.key == key)
    }
}

/// Summary counts for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStatistics {
    /// Participants supplied
    pub population: usize,
    /// Participants that reached the index
    pub indexed: usize,
    /// Excluded participants per reason
    pub excluded: BTreeMap<ExclusionReason, usize>,
    pub pair_count: usize,
    pub triangle_count: usize,
    pub elapsed: Duration,
}

impl MatchStatistics {
    pub(crate) fn tally_exclusions(exclusions: &[Exclusion]) -> BTreeMap<ExclusionReason, usize> {
        exclusions.iter().counts_by(|e| e.reason).into_iter().collect()
    }
}

impl fmt::Display for MatchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matching Summary:")?;
        writeln!(f, "  Population: {}", self.population)?;
        writeln!(f, "  Matchable: {}", self.indexed)?;
        for (reason, count) in &self.excluded {
            writeln!(f, "  Excluded ({reason}): {count}")?;
        }
        writeln!(f, "  Two-way swaps: {}", self.pair_count)?;
        writeln!(f, "  Triangle swaps: {}", self.triangle_count)?;
        writeln!(f, "  Elapsed: {:.2?}", self.elapsed)
    }
}

/// Output of one matching run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchResult {
    pub pairs: Vec<MatchedPair>,
    pub triangles: Vec<MatchedTriangle>,
    /// Participants left out, with a reason each
    pub excluded: Vec<Exclusion>,
    pub statistics: MatchStatistics,
}

impl MatchResult {
    /// Why a participant was excluded, if it was
    #[must_use]
    pub fn exclusion_of(&self, key: ParticipantKey) -> Option<ExclusionReason> {
        self.excluded
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.reason)
    }

    /// Render a plain-text report with county names
    #[must_use]
    pub fn render(&self, hierarchy: &LocationHierarchy) -> String {
        let mut out = String::new();
        let subjects = |s: &Option<BTreeSet<SubjectId>>| {
            s.as_ref()
                .map(|set| format!(" [subjects: {}]", set.iter().join(", ")))
                .unwrap_or_default()
        };

        let _ = writeln!(out, "{}", self.statistics);
        for (i, pair) in self.pairs.iter().enumerate() {
            let _ = writeln!(
                out,
                "Pair #{}: {} ({} → {}) ⇄ {} ({} → {}){}",
                i + 1,
                pair.first.key,
                hierarchy.county_name(pair.first.current.county),
                hierarchy.county_name(pair.first.target_county),
                pair.second.key,
                hierarchy.county_name(pair.second.current.county),
                hierarchy.county_name(pair.second.target_county),
                subjects(&pair.subjects),
            );
        }
        for (i, triangle) in self.triangles.iter().enumerate() {
            let legs = triangle
                .legs
                .iter()
                .map(|leg| {
                    format!(
                        "{} ({} → {})",
                        leg.key,
                        hierarchy.county_name(leg.current.county),
                        hierarchy.county_name(leg.target_county)
                    )
                })
                .join(" → ");
            let _ = writeln!(
                out,
                "Triangle #{}: {}{}",
                i + 1,
                legs,
                subjects(&triangle.subjects)
            );
        }
        out
    }
}
