//! Data model consumed by the matching engine
//!
//! These types mirror read snapshots of data owned by the surrounding
//! system. The engine never mutates them.

pub mod level;
pub mod location;
pub mod participant;

pub use level::{Level, LevelCatalog, LevelId, SubjectId, SubjectRule};
pub use location::{
    ConstituencyId, County, CountyId, HierarchyBuilder, LocationHierarchy, LocationPath, WardId,
};
pub use participant::{
    AnonymousEntry, LocationPreference, Participant, ParticipantKey, ParticipantKind, Registered,
    School, SubjectAssignment,
};
