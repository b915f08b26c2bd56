//! Subject equality policy
//!
//! At exact-match levels two participants are only compatible when their
//! subject sets are identical. Subset or overlap is not enough. Empty sets
//! never reach this check: normalisation excludes them first.

use std::collections::BTreeSet;

use crate::algorithm::matching::view::ParticipantView;
use crate::models::level::{SubjectId, SubjectRule};

/// Level-dependent subject compatibility check
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectEqualityPolicy;

impl SubjectEqualityPolicy {
    /// Whether `a` and `b` may be matched as far as subjects are concerned
    ///
    /// Both views are expected to share a level; the rule of `a` decides.
    #[must_use]
    pub fn allows(a: &ParticipantView, b: &ParticipantView) -> bool {
        match a.rule {
            SubjectRule::Ignored => true,
            SubjectRule::ExactMatch => !a.subjects().is_empty() && a.subjects() == b.subjects(),
        }
    }

    /// Subject set shared by a match, reported only at exact-match levels
    #[must_use]
    pub fn shared_subjects(a: &ParticipantView) -> Option<BTreeSet<SubjectId>> {
        match a.rule {
            SubjectRule::Ignored => None,
            SubjectRule::ExactMatch => Some(a.subjects().clone()),
        }
    }
}
