//! Comparison policy
//!
//! A [`DiffConfig`] is an immutable value handed to every comparison
//! operation. Independent comparisons can each hold their own.

use regex::Regex;
use zipdiff_core::{Error, Result};
use zipdiff_parsers::ParseOptions;

use crate::filter::PathFilter;

/// How two archives are compared
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Leading path segments removed from every name of the first archive
    pub skip_prefixes1: usize,
    /// Leading path segments removed from every name of the second archive
    pub skip_prefixes2: usize,
    /// Skip the modification time when comparing entries
    pub ignore_timestamps: bool,
    /// Compare the CRC-32 of entries
    pub compare_checksums: bool,
    /// Drop every path that goes through a `CVS/` directory
    pub ignore_vcs_metadata: bool,
    /// Paths matching this pattern in full are excluded
    exclusion: Option<Regex>,
    /// Codec options used while reading archives
    pub parse_options: ParseOptions,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            skip_prefixes1: 0,
            skip_prefixes2: 0,
            ignore_timestamps: false,
            compare_checksums: true,
            ignore_vcs_metadata: false,
            exclusion: None,
            parse_options: ParseOptions::default(),
        }
    }
}

impl DiffConfig {
    pub fn builder() -> DiffConfigBuilder {
        DiffConfigBuilder::default()
    }

    /// Compiled exclusion pattern, anchored at both ends
    pub fn exclusion(&self) -> Option<&Regex> {
        self.exclusion.as_ref()
    }

    /// The filter shared by enumeration and aggregation
    pub fn path_filter(&self) -> PathFilter<'_> {
        PathFilter::new(self.ignore_vcs_metadata, self.exclusion.as_ref())
    }
}

/// Builder for [`DiffConfig`]
#[derive(Debug, Clone, Default)]
pub struct DiffConfigBuilder {
    config: DiffConfig,
    patterns: Vec<String>,
}

impl DiffConfigBuilder {
    pub fn skip_prefixes1(mut self, segments: usize) -> Self {
        self.config.skip_prefixes1 = segments;
        self
    }

    pub fn skip_prefixes2(mut self, segments: usize) -> Self {
        self.config.skip_prefixes2 = segments;
        self
    }

    pub fn ignore_timestamps(mut self, ignore: bool) -> Self {
        self.config.ignore_timestamps = ignore;
        self
    }

    pub fn compare_checksums(mut self, compare: bool) -> Self {
        self.config.compare_checksums = compare;
        self
    }

    pub fn ignore_vcs_metadata(mut self, ignore: bool) -> Self {
        self.config.ignore_vcs_metadata = ignore;
        self
    }

    /// Verify the checksum of every nested archive before reading it
    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.config.parse_options.strict_validation = strict;
        self
    }

    /// Add one exclusion pattern
    pub fn exclusion_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Add several exclusion patterns; a path is excluded if any matches
    pub fn exclusion_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Compile the exclusion patterns and produce the configuration
    pub fn build(self) -> Result<DiffConfig> {
        let mut config = self.config;
        config.exclusion = compile_exclusion(&self.patterns)?;
        Ok(config)
    }
}

/// Join `patterns` into `^(?:(p1)|(p2)|...)$`
///
/// `None` when there is nothing to exclude.
pub fn compile_exclusion(patterns: &[String]) -> Result<Option<Regex>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let union = patterns
        .iter()
        .map(|p| format!("({})", p))
        .collect::<Vec<_>>()
        .join("|");
    let anchored = format!("^(?:{})$", union);
    tracing::trace!(pattern = %anchored, "compiling exclusion pattern");

    Regex::new(&anchored)
        .map(Some)
        .map_err(|e| Error::invalid_config(format!("exclusion pattern {}: {}", union, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_defaults() {
        let config = DiffConfig::default();
        assert!(!config.ignore_timestamps);
        assert!(config.compare_checksums);
        assert!(!config.ignore_vcs_metadata);
        assert_eq!((config.skip_prefixes1, config.skip_prefixes2), (0, 0));
        assert!(config.exclusion().is_none());
        assert!(!config.parse_options.strict_validation);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = DiffConfig::builder()
            .skip_prefixes1(1)
            .skip_prefixes2(2)
            .ignore_timestamps(true)
            .compare_checksums(false)
            .ignore_vcs_metadata(true)
            .strict_validation(true)
            .build()
            .unwrap();

        assert_eq!(config.skip_prefixes1, 1);
        assert_eq!(config.skip_prefixes2, 2);
        assert!(config.ignore_timestamps);
        assert!(!config.compare_checksums);
        assert!(config.ignore_vcs_metadata);
        assert!(config.parse_options.strict_validation);
    }

    #[test]
    fn test_patterns_are_a_full_match_union() {
        let config = DiffConfig::builder()
            .exclusion_patterns([".*\\.class", "docs/.*"])
            .build()
            .unwrap();
        let re = config.exclusion().unwrap();

        assert!(re.is_match("com/acme/App.class"));
        assert!(re.is_match("docs/index.html"));
        assert!(!re.is_match("src/docs/index.html"));
        assert!(!re.is_match("App.class.bak"));
    }

    #[test]
    fn test_alternation_inside_a_pattern_stays_grouped() {
        let re = compile_exclusion(&["a|b".to_string()]).unwrap().unwrap();
        assert!(re.is_match("a"));
        assert!(re.is_match("b"));
        assert!(!re.is_match("ab"));
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let err = DiffConfig::builder()
            .exclusion_pattern("(unclosed")
            .build()
            .unwrap_err();
        assert!(err.is_config_error());
    }
}
