//! Teaching levels
//!
//! A level gates which participants are comparable at all, and decides
//! whether the subject sets of a match must be identical.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapEngineError};

/// Identifier of a teaching level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub u32);

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u32);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A teaching level record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// How subject sets are compared at a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectRule {
    /// Subjects play no part in matching
    Ignored,
    /// Subject sets must be identical
    ExactMatch,
}

impl Level {
    /// Classify this level against a set of exact-match keywords
    ///
    /// A level whose name contains any keyword (case-insensitive) requires
    /// identical subject sets.
    #[must_use]
    pub fn subject_rule<S: AsRef<str>>(&self, exact_match_keywords: &[S]) -> SubjectRule {
        let name = self.name.to_lowercase();
        if exact_match_keywords
            .iter()
            .any(|k| name.contains(&k.as_ref().to_lowercase()))
        {
            SubjectRule::ExactMatch
        } else {
            SubjectRule::Ignored
        }
    }
}

/// All levels known for a matching run
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: FxHashMap<LevelId, Level>,
}

impl LevelCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from decoded records, rejecting duplicate ids
    pub fn from_levels(levels: impl IntoIterator<Item = Level>) -> Result<Self> {
        let mut catalog = Self::new();
        for level in levels {
            catalog.insert(level)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, level: Level) -> Result<()> {
        if self.levels.contains_key(&level.id) {
            return Err(SwapEngineError::DuplicateLevel(level.id));
        }
        self.levels.insert(level.id, level);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: LevelId) -> Option<&Level> {
        self.levels.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
