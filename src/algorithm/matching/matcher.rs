//! Matching run orchestration
//!
//! A run normalises the supplied population, builds the location index once,
//! and then only reads from it. Nothing survives between runs.

use std::time::Instant;

use log::info;
use rustc_hash::FxHashMap;

use crate::algorithm::matching::index::LocationIndex;
use crate::algorithm::matching::triangle::TriangleMatcher;
use crate::algorithm::matching::two_way::TwoWayMatcher;
use crate::algorithm::matching::types::{MatchResult, MatchStatistics, MatchedPair, MatchedTriangle};
use crate::algorithm::matching::view::{Exclusion, ExclusionReason, Normalizer, ParticipantView};
use crate::config::MatchingConfig;
use crate::error::{Result, SwapEngineError};
use crate::models::level::LevelCatalog;
use crate::models::location::LocationHierarchy;
use crate::models::participant::{Participant, ParticipantKey};

/// Normalised and indexed population, ready to be queried
#[derive(Debug, Clone)]
pub struct PreparedRun {
    views: Vec<ParticipantView>,
    index: LocationIndex,
    positions: FxHashMap<ParticipantKey, usize>,
    exclusions: Vec<Exclusion>,
    population: usize,
}

impl PreparedRun {
    #[must_use]
    pub fn views(&self) -> &[ParticipantView] {
        &self.views
    }

    #[must_use]
    pub const fn index(&self) -> &LocationIndex {
        &self.index
    }

    #[must_use]
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    #[must_use]
    pub const fn population(&self) -> usize {
        self.population
    }

    /// The normalised view of a participant, if it was matchable
    #[must_use]
    pub fn view(&self, key: ParticipantKey) -> Option<&ParticipantView> {
        self.positions.get(&key).map(|&pos| &self.views[pos])
    }

    /// Why a participant was excluded, if it was
    #[must_use]
    pub fn exclusion_of(&self, key: ParticipantKey) -> Option<ExclusionReason> {
        self.exclusions
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.reason)
    }

    /// Position of `key` among the views; `Ok(None)` for an excluded participant
    fn locate(&self, key: ParticipantKey) -> Result<Option<usize>> {
        if let Some(&pos) = self.positions.get(&key) {
            return Ok(Some(pos));
        }
        if self.exclusion_of(key).is_some() {
            return Ok(None);
        }
        Err(SwapEngineError::UnknownParticipant(key))
    }

    /// All two-way partners of one participant, with that participant first
    ///
    /// An excluded participant has no partners; an unknown key is an error.
    pub fn partners_of(&self, key: ParticipantKey) -> Result<Vec<MatchedPair>> {
        Ok(self
            .locate(key)?
            .map(|pos| TwoWayMatcher::new(&self.views, &self.index).find_for(pos))
            .unwrap_or_default())
    }

    /// All triangles containing one participant, rotated so it leads
    pub fn triangles_through(&self, key: ParticipantKey) -> Result<Vec<MatchedTriangle>> {
        Ok(self
            .locate(key)?
            .map(|pos| TriangleMatcher::new(&self.views, &self.index).find_for(pos))
            .unwrap_or_default())
    }
}

/// Matcher for finding swaps in one population slice
#[derive(Debug)]
pub struct SwapMatcher<'a> {
    /// Matching configuration
    config: MatchingConfig,
    hierarchy: &'a LocationHierarchy,
    levels: &'a LevelCatalog,
}

impl<'a> SwapMatcher<'a> {
    /// Create a new matcher, validating the configuration
    pub fn new(
        config: MatchingConfig,
        hierarchy: &'a LocationHierarchy,
        levels: &'a LevelCatalog,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hierarchy,
            levels,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Normalise and index a population
    pub fn prepare(&self, participants: &[Participant]) -> Result<PreparedRun> {
        let normalizer = Normalizer::new(
            self.hierarchy,
            self.levels,
            &self.config.exact_match_keywords,
        )
        .with_level_filter(self.config.level_filter);
        let (views, exclusions) = normalizer.normalize_all(participants);

        let index = match self.config.level_filter {
            Some(level) => LocationIndex::build_for_level(&views, level)?,
            None => LocationIndex::build(&views),
        };
        let positions = views
            .iter()
            .enumerate()
            .map(|(pos, view)| (view.key, pos))
            .collect();

        info!(
            "Indexed {} of {} participants into {} level/county buckets",
            index.len(),
            participants.len(),
            index.bucket_count()
        );

        Ok(PreparedRun {
            views,
            index,
            positions,
            exclusions,
            population: participants.len(),
        })
    }

    /// Run the configured matchers over a prepared population
    #[must_use]
    pub fn execute(&self, run: &PreparedRun) -> MatchResult {
        let start_time = Instant::now();

        let pairs = if self.config.kinds.pairs {
            TwoWayMatcher::new(&run.views, &run.index).find()
        } else {
            Vec::new()
        };

        let triangles = if self.config.kinds.triangles {
            let matcher = TriangleMatcher::new(&run.views, &run.index);
            if self.config.use_parallel && run.views.len() >= self.config.parallel_threshold {
                matcher.find_parallel(self.config.show_progress)
            } else {
                matcher.find_sequential(self.config.show_progress)
            }
        } else {
            Vec::new()
        };

        let elapsed = start_time.elapsed();
        info!(
            "Matching complete: {} two-way and {} triangle swaps among {} participants in {:.2?}",
            pairs.len(),
            triangles.len(),
            run.views.len(),
            elapsed
        );

        let statistics = MatchStatistics {
            population: run.population,
            indexed: run.views.len(),
            excluded: MatchStatistics::tally_exclusions(&run.exclusions),
            pair_count: pairs.len(),
            triangle_count: triangles.len(),
            elapsed,
        };

        MatchResult {
            pairs,
            triangles,
            excluded: run.exclusions.clone(),
            statistics,
        }
    }

    /// Normalise, index and match a population in one call
    pub fn run(&self, participants: &[Participant]) -> Result<MatchResult> {
        let prepared = self.prepare(participants)?;
        Ok(self.execute(&prepared))
    }
}
