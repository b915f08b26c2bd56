//! Source representations of swap participants
//!
//! Two variants feed the engine: registered teachers, whose location comes
//! from their school's ward, and anonymous fast entries, which carry their
//! location and preferences directly. Numeric ids come from separate
//! sequences, so identity is always the pair (variant, id).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::level::{LevelId, SubjectId};
use crate::models::location::{ConstituencyId, CountyId, WardId};

/// Which source representation a participant came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    Registered,
    Anonymous,
}

/// Type-tagged participant identity
///
/// Keys order by variant first, then id; this ordering defines the canonical
/// orientation of reported pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantKey {
    pub kind: ParticipantKind,
    pub id: u64,
}

impl ParticipantKey {
    #[must_use]
    pub const fn registered(id: u64) -> Self {
        Self {
            kind: ParticipantKind::Registered,
            id,
        }
    }

    #[must_use]
    pub const fn anonymous(id: u64) -> Self {
        Self {
            kind: ParticipantKind::Anonymous,
            id,
        }
    }
}

impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParticipantKind::Registered => write!(f, "user_{}", self.id),
            ParticipantKind::Anonymous => write!(f, "fs_{}", self.id),
        }
    }
}

/// School a registered teacher works at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ward: Option<WardId>,
    #[serde(default)]
    pub level: Option<LevelId>,
}

/// Where a registered teacher is willing to move
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPreference {
    #[serde(default)]
    pub desired_county: Option<CountyId>,
    #[serde(default)]
    pub desired_constituency: Option<ConstituencyId>,
    #[serde(default)]
    pub desired_ward: Option<WardId>,
    #[serde(default)]
    pub open_to_all: BTreeSet<CountyId>,
}

impl LocationPreference {
    /// Preference for a single desired county
    #[must_use]
    pub fn desiring(county: CountyId) -> Self {
        Self {
            desired_county: Some(county),
            ..Self::default()
        }
    }

    /// Add an additional acceptable county
    #[must_use]
    pub fn open_to(mut self, county: CountyId) -> Self {
        self.open_to_all.insert(county);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.desired_county.is_none() && self.open_to_all.is_empty()
    }
}

/// One subject assignment record; a teacher may have several
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectAssignment {
    #[serde(default)]
    pub subjects: BTreeSet<SubjectId>,
}

impl SubjectAssignment {
    #[must_use]
    pub fn new(subjects: impl IntoIterator<Item = SubjectId>) -> Self {
        Self {
            subjects: subjects.into_iter().collect(),
        }
    }
}

/// A teacher with an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    pub id: u64,
    #[serde(default)]
    pub school: Option<School>,
    /// The teacher's own level; falls back to the school's level when unset
    #[serde(default)]
    pub level: Option<LevelId>,
    #[serde(default)]
    pub preference: Option<LocationPreference>,
    #[serde(default)]
    pub subject_assignments: Vec<SubjectAssignment>,
}

impl Registered {
    #[must_use]
    pub const fn key(&self) -> ParticipantKey {
        ParticipantKey::registered(self.id)
    }

    /// Level used for matching: own level first, then the school's
    #[must_use]
    pub fn effective_level(&self) -> Option<LevelId> {
        self.level
            .or_else(|| self.school.as_ref().and_then(|s| s.level))
    }

    /// All assignment records consolidated into one set
    #[must_use]
    pub fn subjects(&self) -> BTreeSet<SubjectId> {
        self.subject_assignments
            .iter()
            .flat_map(|a| a.subjects.iter().copied())
            .collect()
    }
}

/// An anonymous, account-less swap registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymousEntry {
    pub id: u64,
    #[serde(default)]
    pub current_county: Option<CountyId>,
    #[serde(default)]
    pub current_constituency: Option<ConstituencyId>,
    #[serde(default)]
    pub current_ward: Option<WardId>,
    #[serde(default)]
    pub most_preferred: Option<CountyId>,
    #[serde(default)]
    pub acceptable: BTreeSet<CountyId>,
    pub level: LevelId,
    #[serde(default)]
    pub subjects: BTreeSet<SubjectId>,
}

impl AnonymousEntry {
    #[must_use]
    pub const fn key(&self) -> ParticipantKey {
        ParticipantKey::anonymous(self.id)
    }
}

/// Either participant variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Participant {
    Registered(Registered),
    Anonymous(AnonymousEntry),
}

impl Participant {
    #[must_use]
    pub const fn key(&self) -> ParticipantKey {
        match self {
            Self::Registered(r) => r.key(),
            Self::Anonymous(a) => a.key(),
        }
    }
}

impl From<Registered> for Participant {
    fn from(value: Registered) -> Self {
        Self::Registered(value)
    }
}

impl From<AnonymousEntry> for Participant {
    fn from(value: AnonymousEntry) -> Self {
        Self::Anonymous(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_tagged_by_variant() {
        let r = ParticipantKey::registered(7);
        let a = ParticipantKey::anonymous(7);
        assert_ne!(r, a);
        assert!(r < a);
        assert_eq!(r.to_string(), "user_7");
        assert_eq!(a.to_string(), "fs_7");
    }

    #[test]
    fn test_subject_assignments_are_consolidated() {
        let teacher = Registered {
            id: 1,
            school: None,
            level: None,
            preference: None,
            subject_assignments: vec![
                SubjectAssignment::new([SubjectId(1), SubjectId(2)]),
                SubjectAssignment::new([SubjectId(2), SubjectId(3)]),
            ],
        };
        let expected: BTreeSet<_> = [SubjectId(1), SubjectId(2), SubjectId(3)].into();
        assert_eq!(teacher.subjects(), expected);
    }

    #[test]
    fn test_effective_level_prefers_own_level() {
        let mut teacher = Registered {
            id: 1,
            school: Some(School {
                id: 1,
                name: "Moi Primary".to_string(),
                ward: None,
                level: Some(LevelId(1)),
            }),
            level: None,
            preference: None,
            subject_assignments: Vec::new(),
        };
        assert_eq!(teacher.effective_level(), Some(LevelId(1)));
        teacher.level = Some(LevelId(2));
        assert_eq!(teacher.effective_level(), Some(LevelId(2)));
    }

    #[test]
    fn test_preference_builders() {
        let pref = LocationPreference::desiring(CountyId(1)).open_to(CountyId(3));
        assert_eq!(pref.desired_county, Some(CountyId(1)));
        assert!(pref.open_to_all.contains(&CountyId(3)));
        assert!(!pref.is_empty());
        assert!(LocationPreference::default().is_empty());
    }
}
