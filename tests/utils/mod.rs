//! Shared fixtures for the integration tests
//!
//! A small slice of the Kenyan hierarchy: four counties with one
//! constituency and one ward each, a primary and a secondary level, and
//! three subjects.

#![allow(dead_code)]

use std::collections::BTreeSet;

use swap_engine::{
    AnonymousEntry, CountyId, Level, LevelCatalog, LevelId, LocationHierarchy, LocationPreference,
    MatchingConfig, Participant, Registered, School, SubjectAssignment, SubjectId, SwapMatcher,
    WardId,
};

pub const NAIROBI: CountyId = CountyId(1);
pub const MOMBASA: CountyId = CountyId(2);
pub const KISUMU: CountyId = CountyId(3);
pub const NAKURU: CountyId = CountyId(4);
pub const COUNTIES: [CountyId; 4] = [NAIROBI, MOMBASA, KISUMU, NAKURU];

pub const PRIMARY: LevelId = LevelId(1);
pub const SECONDARY: LevelId = LevelId(2);

pub const MATH: u32 = 1;
pub const CHEM: u32 = 2;
pub const ENGLISH: u32 = 3;

/// Reference data shared by every test
pub struct World {
    pub hierarchy: LocationHierarchy,
    pub levels: LevelCatalog,
}

impl World {
    pub fn new() -> Self {
        let names = ["Nairobi", "Mombasa", "Kisumu", "Nakuru"];
        let mut builder = LocationHierarchy::builder();
        for (county, name) in COUNTIES.iter().zip(names) {
            let c = county.0;
            builder = builder
                .county(c, name)
                .and_then(|b| b.constituency(c * 10, format!("{name} Central"), Some(c)))
                .and_then(|b| b.ward(c * 100, format!("{name} Town"), Some(c * 10)))
                .expect("fixture hierarchy is valid");
        }

        let levels = LevelCatalog::from_levels([
            Level {
                id: PRIMARY,
                name: "Primary".to_string(),
                code: "PRI".to_string(),
            },
            Level {
                id: SECONDARY,
                name: "Secondary/High School".to_string(),
                code: "SEC".to_string(),
            },
        ])
        .expect("fixture levels are valid");

        Self {
            hierarchy: builder.build(),
            levels,
        }
    }

    pub fn matcher(&self, config: MatchingConfig) -> SwapMatcher<'_> {
        SwapMatcher::new(config, &self.hierarchy, &self.levels).expect("valid config")
    }
}

/// Ward of the single school location in a county
pub fn ward_of(county: CountyId) -> WardId {
    WardId(county.0 * 100)
}

fn subject_set(subjects: &[u32]) -> BTreeSet<SubjectId> {
    subjects.iter().map(|&s| SubjectId(s)).collect()
}

/// A registered teacher at a school in `county`
pub fn teacher(
    id: u64,
    level: LevelId,
    county: CountyId,
    desired: Option<CountyId>,
    open_to_all: &[CountyId],
    subjects: &[u32],
) -> Participant {
    Registered {
        id,
        school: Some(School {
            id,
            name: format!("School {id}"),
            ward: Some(ward_of(county)),
            level: Some(level),
        }),
        level: None,
        preference: Some(LocationPreference {
            desired_county: desired,
            open_to_all: open_to_all.iter().copied().collect(),
            ..LocationPreference::default()
        }),
        subject_assignments: if subjects.is_empty() {
            Vec::new()
        } else {
            vec![SubjectAssignment {
                subjects: subject_set(subjects),
            }]
        },
    }
    .into()
}

/// A registered teacher wanting exactly one county
pub fn simple_teacher(id: u64, level: LevelId, county: CountyId, wants: CountyId, subjects: &[u32]) -> Participant {
    teacher(id, level, county, Some(wants), &[], subjects)
}

/// An anonymous fast entry in `county`
pub fn entry(
    id: u64,
    level: LevelId,
    county: CountyId,
    most_preferred: Option<CountyId>,
    acceptable: &[CountyId],
    subjects: &[u32],
) -> Participant {
    AnonymousEntry {
        id,
        current_county: Some(county),
        current_constituency: None,
        current_ward: None,
        most_preferred,
        acceptable: acceptable.iter().copied().collect(),
        level,
        subjects: subject_set(subjects),
    }
    .into()
}
