//! A Rust library for finding location swaps between teachers: mutual
//! two-party exchanges and three-party cyclic (triangle) exchanges, over
//! registered teachers and anonymous fast entries alike.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{MatchKinds, MatchingConfig, MatchingConfigBuilder};
pub use error::{Result, SwapEngineError};
pub use loader::{LoadedSnapshot, Snapshot};

// Data model
pub use models::{
    AnonymousEntry, CountyId, Level, LevelCatalog, LevelId, LocationHierarchy, LocationPreference,
    Participant, ParticipantKey, ParticipantKind, Registered, School, SubjectAssignment, SubjectId,
    WardId,
};

// Matching
pub use algorithm::matching::{
    Exclusion, ExclusionReason, FastEntryMatches, MatchResult, MatchStatistics, MatchedPair,
    MatchedTriangle, PreparedRun, SwapMatcher, matches_for_entry,
};
