//! Matches for a single fast entry
//!
//! A fast entry is matched with the same two-way and triangle logic as every
//! other participant; this module only roots the search at the entry and
//! splits the partners by variant for callers that present them separately.

use serde::Serialize;

use crate::algorithm::matching::matcher::PreparedRun;
use crate::algorithm::matching::types::{MatchedPair, MatchedTriangle};
use crate::algorithm::matching::view::ExclusionReason;
use crate::error::Result;
use crate::models::participant::{ParticipantKey, ParticipantKind};

/// Everything one fast entry can swap with
#[derive(Debug, Clone, Serialize)]
pub struct FastEntryMatches {
    pub entry: ParticipantKey,
    /// Set when the entry itself could not be matched
    pub excluded: Option<ExclusionReason>,
    /// Mutual partners that are also fast entries
    pub anonymous: Vec<MatchedPair>,
    /// Mutual partners that are registered teachers
    pub registered: Vec<MatchedPair>,
    /// Triangles led by the entry; the other two may be of either variant
    pub triangles: Vec<MatchedTriangle>,
}

impl FastEntryMatches {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anonymous.is_empty() && self.registered.is_empty() && self.triangles.is_empty()
    }
}

/// Two-way partners and triangles for the fast entry `entry_id`
pub fn matches_for_entry(run: &PreparedRun, entry_id: u64) -> Result<FastEntryMatches> {
    let entry = ParticipantKey::anonymous(entry_id);
    let pairs = run.partners_of(entry)?;
    let triangles = run.triangles_through(entry)?;

    let (anonymous, registered): (Vec<_>, Vec<_>) = pairs
        .into_iter()
        .partition(|pair| {
            pair.partner_of(entry)
                .is_some_and(|partner| partner.key.kind == ParticipantKind::Anonymous)
        });

    Ok(FastEntryMatches {
        entry,
        excluded: run.view(entry).map_or_else(|| run.exclusion_of(entry), |_| None),
        anonymous,
        registered,
        triangles,
    })
}
