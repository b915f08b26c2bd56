//! Configuration for a matching run.

use std::fmt;

use itertools::Itertools;

use crate::error::{Result, SwapEngineError};
use crate::models::level::LevelId;

/// Level-name keywords that switch on exact subject matching
pub const DEFAULT_EXACT_MATCH_KEYWORDS: [&str; 2] = ["secondary", "high"];

/// Which matchers a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchKinds {
    /// Find mutual two-party swaps
    pub pairs: bool,
    /// Find three-party cyclic swaps
    pub triangles: bool,
}

impl Default for MatchKinds {
    fn default() -> Self {
        Self {
            pairs: true,
            triangles: true,
        }
    }
}

/// Configuration for the matching process
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Matchers to run
    pub kinds: MatchKinds,
    /// A level whose name contains one of these requires identical subject sets
    pub exact_match_keywords: Vec<String>,
    /// Whether to use parallel processing for the triangle search
    pub use_parallel: bool,
    /// Minimum indexed population before the triangle search goes parallel
    pub parallel_threshold: usize,
    /// Show progress bars for the triangle search
    pub show_progress: bool,
    /// Restrict the run to one level
    pub level_filter: Option<LevelId>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            kinds: MatchKinds::default(),
            exact_match_keywords: DEFAULT_EXACT_MATCH_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            use_parallel: true,
            parallel_threshold: 1000,
            show_progress: false,
            level_filter: None,
        }
    }
}

impl MatchingConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing matching configuration
    #[must_use]
    pub fn builder() -> MatchingConfigBuilder {
        MatchingConfigBuilder::new()
    }

    /// Check the configuration for values that would make a run meaningless
    pub fn validate(&self) -> Result<()> {
        if self.parallel_threshold == 0 {
            return Err(SwapEngineError::InvalidConfig(
                "parallel_threshold must be at least 1".to_string(),
            ));
        }
        if !self.kinds.pairs && !self.kinds.triangles {
            return Err(SwapEngineError::InvalidConfig(
                "at least one of pairs or triangles must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for MatchingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matching Configuration:")?;
        writeln!(f, "  Pairs: {}", self.kinds.pairs)?;
        writeln!(f, "  Triangles: {}", self.kinds.triangles)?;
        writeln!(
            f,
            "  Exact-match keywords: {}",
            self.exact_match_keywords.iter().join(", ")
        )?;
        writeln!(f, "  Parallel: {}", self.use_parallel)?;
        writeln!(f, "  Parallel threshold: {}", self.parallel_threshold)?;
        if let Some(level) = self.level_filter {
            writeln!(f, "  Level filter: {level}")?;
        }
        Ok(())
    }
}

/// Builder for constructing matching configuration
#[derive(Debug, Clone)]
pub struct MatchingConfigBuilder {
    config: MatchingConfig,
}

impl Default for MatchingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    /// Set which matchers run
    #[must_use]
    pub const fn kinds(mut self, kinds: MatchKinds) -> Self {
        self.config.kinds = kinds;
        self
    }

    /// Only look for two-way swaps
    #[must_use]
    pub const fn pairs_only(self) -> Self {
        self.kinds(MatchKinds {
            pairs: true,
            triangles: false,
        })
    }

    /// Only look for triangle swaps
    #[must_use]
    pub const fn triangles_only(self) -> Self {
        self.kinds(MatchKinds {
            pairs: false,
            triangles: true,
        })
    }

    /// Replace the exact-match keywords
    #[must_use]
    pub fn exact_match_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exact_match_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether to use parallel processing
    #[must_use]
    pub const fn use_parallel(mut self, parallel: bool) -> Self {
        self.config.use_parallel = parallel;
        self
    }

    /// Set the parallel threshold
    #[must_use]
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }

    /// Set whether to show progress bars
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Restrict the run to one level
    #[must_use]
    pub const fn level_filter(mut self, level: LevelId) -> Self {
        self.config.level_filter = Some(level);
        self
    }

    /// Build the matching configuration
    #[must_use]
    pub fn build(self) -> MatchingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MatchingConfig::default();
        assert!(config.kinds.pairs);
        assert!(config.kinds.triangles);
        assert_eq!(config.exact_match_keywords, vec!["secondary", "high"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_and_validation() {
        let config = MatchingConfig::builder()
            .pairs_only()
            .parallel_threshold(0)
            .build();
        assert!(!config.kinds.triangles);
        assert!(matches!(
            config.validate(),
            Err(SwapEngineError::InvalidConfig(_))
        ));

        let config = MatchingConfig::builder()
            .kinds(MatchKinds {
                pairs: false,
                triangles: false,
            })
            .build();
        assert!(config.validate().is_err());
    }
}
