//! Normalised participant view
//!
//! Both participant variants are resolved once, up front, into a
//! [`ParticipantView`]: a current county, a sorted wants-set, a level and a
//! consolidated subject set. Anything that cannot be resolved turns the
//! participant into an [`Exclusion`] with a reason code instead of an error.

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::models::level::{LevelCatalog, LevelId, SubjectId, SubjectRule};
use crate::models::location::{ConstituencyId, CountyId, LocationHierarchy, LocationPath, WardId};
use crate::models::participant::{AnonymousEntry, Participant, ParticipantKey, Registered};

/// Sorted, duplicate-free set of counties
pub type CountySet = SmallVec<[CountyId; 4]>;

/// Why a participant never reached the location index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Registered teacher without a school
    MissingSchool,
    /// School without a ward
    MissingWard,
    /// Location chain does not reach a county
    UnresolvedCounty,
    /// Neither the teacher nor the school has a level
    MissingLevel,
    /// Level id not present in the catalog
    UnknownLevel,
    /// No location preference on record
    MissingPreference,
    /// Preference names no county at all
    EmptyPreference,
    /// Exact-match level with an empty subject set
    MissingSubjects,
    /// Outside the level slice requested for this run
    FilteredLevel,
    /// Same identity supplied more than once
    Duplicate,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingSchool => "no school on profile",
            Self::MissingWard => "school has no ward",
            Self::UnresolvedCounty => "current location does not resolve to a county",
            Self::MissingLevel => "no teaching level",
            Self::UnknownLevel => "teaching level not recognised",
            Self::MissingPreference => "no swap preference set",
            Self::EmptyPreference => "swap preference names no county",
            Self::MissingSubjects => "no subjects set for an exact-match level",
            Self::FilteredLevel => "outside the requested level",
            Self::Duplicate => "duplicate participant",
        };
        f.write_str(text)
    }
}

/// A participant that was left out of matching, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub key: ParticipantKey,
    pub reason: ExclusionReason,
}

/// Common shape of a matchable participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    pub key: ParticipantKey,
    pub level: LevelId,
    pub rule: SubjectRule,
    pub current: LocationPath,
    wants: CountySet,
    /// More specific target inside the desired county, if given
    pub desired_constituency: Option<ConstituencyId>,
    pub desired_ward: Option<WardId>,
    subjects: BTreeSet<SubjectId>,
}

impl ParticipantView {
    /// Build a view from already-resolved parts
    #[must_use]
    pub fn new(
        key: ParticipantKey,
        level: LevelId,
        rule: SubjectRule,
        current: LocationPath,
        wants: impl IntoIterator<Item = CountyId>,
        subjects: impl IntoIterator<Item = SubjectId>,
    ) -> Self {
        Self {
            key,
            level,
            rule,
            current,
            wants: county_set(None, wants),
            desired_constituency: None,
            desired_ward: None,
            subjects: subjects.into_iter().collect(),
        }
    }

    #[must_use]
    pub const fn current_county(&self) -> CountyId {
        self.current.county
    }

    #[must_use]
    pub fn wants(&self, county: CountyId) -> bool {
        self.wants.binary_search(&county).is_ok()
    }

    /// Wanted counties in ascending id order
    #[must_use]
    pub fn wanted_counties(&self) -> &[CountyId] {
        &self.wants
    }

    #[must_use]
    pub const fn subjects(&self) -> &BTreeSet<SubjectId> {
        &self.subjects
    }
}

fn county_set(first: Option<CountyId>, rest: impl IntoIterator<Item = CountyId>) -> CountySet {
    let mut set: CountySet = first.into_iter().chain(rest).collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Resolves participants against one hierarchy and level catalog
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    hierarchy: &'a LocationHierarchy,
    levels: &'a LevelCatalog,
    exact_match_keywords: &'a [String],
    level_filter: Option<LevelId>,
}

impl<'a> Normalizer<'a> {
    #[must_use]
    pub const fn new(
        hierarchy: &'a LocationHierarchy,
        levels: &'a LevelCatalog,
        exact_match_keywords: &'a [String],
    ) -> Self {
        Self {
            hierarchy,
            levels,
            exact_match_keywords,
            level_filter: None,
        }
    }

    /// Exclude every participant outside `level`
    #[must_use]
    pub const fn with_level_filter(mut self, level: Option<LevelId>) -> Self {
        self.level_filter = level;
        self
    }

    /// Normalise one participant
    pub fn normalize(&self, participant: &Participant) -> Result<ParticipantView, ExclusionReason> {
        match participant {
            Participant::Registered(r) => self.normalize_registered(r),
            Participant::Anonymous(a) => self.normalize_anonymous(a),
        }
    }

    /// Normalise a whole population, keeping input order for the views
    ///
    /// The first record of a key that normalises is indexed; records of that
    /// key seen afterwards are excluded as duplicates.
    #[must_use]
    pub fn normalize_all(&self, participants: &[Participant]) -> (Vec<ParticipantView>, Vec<Exclusion>) {
        let mut views = Vec::with_capacity(participants.len());
        let mut exclusions = Vec::new();
        let mut seen = FxHashSet::default();

        for participant in participants {
            let key = participant.key();
            if seen.contains(&key) {
                exclusions.push(Exclusion {
                    key,
                    reason: ExclusionReason::Duplicate,
                });
                continue;
            }
            match self.normalize(participant) {
                Ok(view) => {
                    seen.insert(key);
                    views.push(view);
                }
                Err(reason) => {
                    debug!("Excluding {key}: {reason}");
                    exclusions.push(Exclusion { key, reason });
                }
            }
        }

        (views, exclusions)
    }

    fn resolve_level(&self, level: LevelId) -> Result<SubjectRule, ExclusionReason> {
        let record = self.levels.get(level).ok_or(ExclusionReason::UnknownLevel)?;
        if self.level_filter.is_some_and(|wanted| wanted != level) {
            return Err(ExclusionReason::FilteredLevel);
        }
        Ok(record.subject_rule(self.exact_match_keywords))
    }

    fn normalize_registered(&self, r: &Registered) -> Result<ParticipantView, ExclusionReason> {
        let school = r.school.as_ref().ok_or(ExclusionReason::MissingSchool)?;
        let ward = school.ward.ok_or(ExclusionReason::MissingWard)?;
        let current = self
            .hierarchy
            .resolve_ward(ward)
            .ok_or(ExclusionReason::UnresolvedCounty)?;

        let level = r.effective_level().ok_or(ExclusionReason::MissingLevel)?;
        let rule = self.resolve_level(level)?;

        let pref = r.preference.as_ref().ok_or(ExclusionReason::MissingPreference)?;
        if pref.is_empty() {
            return Err(ExclusionReason::EmptyPreference);
        }

        let subjects = r.subjects();
        if rule == SubjectRule::ExactMatch && subjects.is_empty() {
            return Err(ExclusionReason::MissingSubjects);
        }

        Ok(ParticipantView {
            key: r.key(),
            level,
            rule,
            current,
            wants: county_set(pref.desired_county, pref.open_to_all.iter().copied()),
            desired_constituency: pref.desired_constituency,
            desired_ward: pref.desired_ward,
            subjects,
        })
    }

    fn resolve_entry_location(&self, a: &AnonymousEntry) -> Option<LocationPath> {
        let known = a
            .current_county
            .filter(|&county| self.hierarchy.county(county).is_some());
        if let Some(county) = known {
            return Some(LocationPath {
                county,
                constituency: a.current_constituency,
                ward: a.current_ward,
            });
        }
        if let Some(path) = a.current_ward.and_then(|w| self.hierarchy.resolve_ward(w)) {
            return Some(path);
        }
        let constituency = a.current_constituency?;
        let county = self.hierarchy.constituency_county(constituency)?;
        Some(LocationPath {
            county,
            constituency: Some(constituency),
            ward: None,
        })
    }

    fn normalize_anonymous(&self, a: &AnonymousEntry) -> Result<ParticipantView, ExclusionReason> {
        let current = self
            .resolve_entry_location(a)
            .ok_or(ExclusionReason::UnresolvedCounty)?;
        let rule = self.resolve_level(a.level)?;

        let wants = county_set(a.most_preferred, a.acceptable.iter().copied());
        if wants.is_empty() {
            return Err(ExclusionReason::EmptyPreference);
        }
        if rule == SubjectRule::ExactMatch && a.subjects.is_empty() {
            return Err(ExclusionReason::MissingSubjects);
        }

        Ok(ParticipantView {
            key: a.key(),
            level: a.level,
            rule,
            current,
            wants,
            desired_constituency: None,
            desired_ward: None,
            subjects: a.subjects.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::level::Level;
    use crate::models::participant::{LocationPreference, School, SubjectAssignment};

    fn hierarchy() -> LocationHierarchy {
        LocationHierarchy::builder()
            .county(1, "Nairobi")
            .and_then(|b| b.county(2, "Mombasa"))
            .and_then(|b| b.constituency(10, "Westlands", Some(1)))
            .and_then(|b| b.constituency(20, "Mvita", Some(2)))
            .and_then(|b| b.constituency(30, "Nowhere", None))
            .and_then(|b| b.ward(100, "Parklands", Some(10)))
            .and_then(|b| b.ward(200, "Majengo", Some(20)))
            .and_then(|b| b.ward(300, "Lost", Some(30)))
            .unwrap()
            .build()
    }

    fn levels() -> LevelCatalog {
        LevelCatalog::from_levels([
            Level {
                id: LevelId(1),
                name: "Primary".to_string(),
                code: "PRI".to_string(),
            },
            Level {
                id: LevelId(2),
                name: "Secondary".to_string(),
                code: "SEC".to_string(),
            },
        ])
        .unwrap()
    }

    fn teacher(ward: Option<u32>, level: u32, pref: Option<LocationPreference>) -> Registered {
        Registered {
            id: 1,
            school: Some(School {
                id: 1,
                name: "School".to_string(),
                ward: ward.map(WardId),
                level: Some(LevelId(level)),
            }),
            level: None,
            preference: pref,
            subject_assignments: Vec::new(),
        }
    }

    fn keywords() -> Vec<String> {
        vec!["secondary".to_string(), "high".to_string()]
    }

    #[test]
    fn test_registered_view_resolves_location_and_wants() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let pref = LocationPreference::desiring(CountyId(2)).open_to(CountyId(1));
        let view = n
            .normalize(&teacher(Some(100), 1, Some(pref)).into())
            .unwrap();
        assert_eq!(view.current_county(), CountyId(1));
        assert_eq!(view.wanted_counties(), &[CountyId(1), CountyId(2)]);
        assert_eq!(view.rule, SubjectRule::Ignored);
    }

    #[test]
    fn test_incomplete_registered_data_is_excluded() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let pref = || Some(LocationPreference::desiring(CountyId(2)));

        let mut no_school = teacher(Some(100), 1, pref());
        no_school.school = None;
        assert_eq!(n.normalize(&no_school.into()), Err(ExclusionReason::MissingSchool));
        assert_eq!(
            n.normalize(&teacher(None, 1, pref()).into()),
            Err(ExclusionReason::MissingWard)
        );
        assert_eq!(
            n.normalize(&teacher(Some(300), 1, pref()).into()),
            Err(ExclusionReason::UnresolvedCounty)
        );
        assert_eq!(
            n.normalize(&teacher(Some(100), 9, pref()).into()),
            Err(ExclusionReason::UnknownLevel)
        );
        assert_eq!(
            n.normalize(&teacher(Some(100), 1, None).into()),
            Err(ExclusionReason::MissingPreference)
        );
        assert_eq!(
            n.normalize(&teacher(Some(100), 1, Some(LocationPreference::default())).into()),
            Err(ExclusionReason::EmptyPreference)
        );
        assert_eq!(
            n.normalize(&teacher(Some(100), 2, pref()).into()),
            Err(ExclusionReason::MissingSubjects)
        );
    }

    #[test]
    fn test_exact_level_keeps_consolidated_subjects() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let mut t = teacher(Some(100), 2, Some(LocationPreference::desiring(CountyId(2))));
        t.subject_assignments = vec![
            SubjectAssignment::new([SubjectId(1)]),
            SubjectAssignment::new([SubjectId(2)]),
        ];
        let view = n.normalize(&t.into()).unwrap();
        assert_eq!(view.rule, SubjectRule::ExactMatch);
        assert_eq!(view.subjects().len(), 2);
    }

    #[test]
    fn test_anonymous_entry_location_fallbacks() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let mut entry = AnonymousEntry {
            id: 1,
            current_county: None,
            current_constituency: None,
            current_ward: Some(WardId(200)),
            most_preferred: Some(CountyId(1)),
            acceptable: BTreeSet::new(),
            level: LevelId(1),
            subjects: BTreeSet::new(),
        };
        let view = n.normalize(&entry.clone().into()).unwrap();
        assert_eq!(view.current_county(), CountyId(2));

        entry.current_ward = None;
        entry.current_constituency = Some(ConstituencyId(10));
        let view = n.normalize(&entry.clone().into()).unwrap();
        assert_eq!(view.current_county(), CountyId(1));

        entry.current_constituency = None;
        assert_eq!(
            n.normalize(&entry.clone().into()),
            Err(ExclusionReason::UnresolvedCounty)
        );

        entry.current_county = Some(CountyId(2));
        entry.most_preferred = None;
        assert_eq!(
            n.normalize(&entry.clone().into()),
            Err(ExclusionReason::EmptyPreference)
        );

        entry.most_preferred = Some(CountyId(1));
        entry.level = LevelId(2);
        assert_eq!(n.normalize(&entry.into()), Err(ExclusionReason::MissingSubjects));
    }

    #[test]
    fn test_unknown_entry_county_falls_back_or_is_excluded() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let mut entry = AnonymousEntry {
            id: 1,
            current_county: Some(CountyId(999)),
            current_constituency: None,
            current_ward: None,
            most_preferred: Some(CountyId(2)),
            acceptable: BTreeSet::new(),
            level: LevelId(1),
            subjects: BTreeSet::new(),
        };
        assert_eq!(
            n.normalize(&entry.clone().into()),
            Err(ExclusionReason::UnresolvedCounty)
        );

        entry.current_ward = Some(WardId(100));
        let view = n.normalize(&entry.into()).unwrap();
        assert_eq!(view.current_county(), CountyId(1));
        assert_eq!(view.current.ward, Some(WardId(100)));
    }

    #[test]
    fn test_duplicates_and_level_filter() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k).with_level_filter(Some(LevelId(2)));
        let t: Participant = teacher(Some(100), 1, Some(LocationPreference::desiring(CountyId(2)))).into();
        let (views, exclusions) = n.normalize_all(&[t.clone(), t]);
        assert!(views.is_empty());
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.iter().all(|e| e.reason == ExclusionReason::FilteredLevel));
    }

    #[test]
    fn test_broken_record_does_not_shadow_a_later_valid_one() {
        let (h, l, k) = (hierarchy(), levels(), keywords());
        let n = Normalizer::new(&h, &l, &k);
        let valid = teacher(Some(100), 1, Some(LocationPreference::desiring(CountyId(2))));
        let mut broken = valid.clone();
        broken.school = None;

        let (views, exclusions) = n.normalize_all(&[
            Participant::from(broken),
            Participant::from(valid.clone()),
            Participant::from(valid),
        ]);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].key, ParticipantKey::registered(1));
        let reasons: Vec<_> = exclusions.iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            [ExclusionReason::MissingSchool, ExclusionReason::Duplicate]
        );
    }
}
