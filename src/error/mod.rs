//! Error handling for the swap engine.
//!
//! Incomplete participant data is never an error here: it degrades the
//! participant to unmatchable and is reported through
//! [`ExclusionReason`](crate::algorithm::matching::ExclusionReason). The
//! variants below cover malformed reference data, I/O and decoding failures,
//! and caller misuse.

use std::io;

use crate::models::level::LevelId;
use crate::models::participant::ParticipantKey;

/// Specialized error type for the swap engine
#[derive(Debug, thiserror::Error)]
pub enum SwapEngineError {
    /// Error opening or reading a snapshot file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a JSON snapshot
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The same location id was registered twice within one tier
    #[error("Duplicate {kind} id {id} in location hierarchy")]
    DuplicateLocation {
        /// Tier name (county, constituency or ward)
        kind: &'static str,
        /// Offending id
        id: u32,
    },

    /// The same level id was registered twice
    #[error("Duplicate level id {0}")]
    DuplicateLevel(LevelId),

    /// The process-wide hierarchy has already been installed
    #[error("Location hierarchy has already been loaded")]
    HierarchyAlreadyLoaded,

    /// The process-wide hierarchy was read before being installed
    #[error("Location hierarchy has not been loaded")]
    HierarchyNotLoaded,

    /// A level-scoped structure was used with a view of another level
    #[error("Level mismatch: expected level {expected}, found level {found}")]
    LevelMismatch {
        /// Level the structure was built for
        expected: LevelId,
        /// Level that was supplied
        found: LevelId,
    },

    /// A rooted query named a participant that is not in the population
    #[error("Unknown participant {0}")]
    UnknownParticipant(ParticipantKey),

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for swap engine operations
pub type Result<T> = std::result::Result<T, SwapEngineError>;
