//! Swap matching algorithms
//!
//! This module implements the engine that finds location swaps between
//! teachers. It includes:
//!
//! 1. Normalisation of registered teachers and fast entries into one view
//! 2. A `(level, county)` location index built once per run
//! 3. The level-dependent subject equality policy
//! 4. Two-way (mutual) and triangle (3-cycle) swap detection
//!
//! Registered teachers and anonymous fast entries are matched by the same
//! logic; identities are always tagged with their variant.

pub mod fast_entry;
pub mod index;
pub mod matcher;
pub mod policy;
pub mod triangle;
pub mod two_way;
pub mod types;
pub mod view;

// Re-export key types
pub use fast_entry::{FastEntryMatches, matches_for_entry};
pub use index::LocationIndex;
pub use matcher::{PreparedRun, SwapMatcher};
pub use policy::SubjectEqualityPolicy;
pub use triangle::TriangleMatcher;
pub use two_way::TwoWayMatcher;
pub use types::{MatchResult, MatchStatistics, MatchedPair, MatchedTriangle, PairSide, TriangleLeg};
pub use view::{Exclusion, ExclusionReason, Normalizer, ParticipantView};
