//! Task configuration
//!
//! A task file is TOML:
//!
//! ```toml
//! [vocabulary]
//! singular = "moth"
//! plural = "moths"
//!
//! [filters]
//! required_words = ["moth"]
//! sole_infobox = true
//!
//! [policy]
//! accept_two_word_species = true
//!
//! [staging]
//! success_file = "moths.tsv"
//! max_staged = 500
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Regular expressions are compiled when the file is loaded, so a bad
//! pattern fails the run before any article is read.

use crate::error::{EngineError, EngineResult};
use crate::types::Vocabulary;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use taxodesc_common::config::{load_or_default, ConfigSource, LoggingConfig};
use tracing::info;

/// Tie-break rules the rank reconciler may apply
///
/// All rules are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TieBreakPolicy {
    /// Genus/Species tie: single-word title is a genus, otherwise a species
    pub genus_species_by_title_shape: bool,
    /// Species/Subspecies tie resolves to Subspecies
    pub prefer_subspecies_over_species: bool,
    /// Species/Variety tie resolves to Variety
    pub prefer_variety_over_species: bool,
    /// Two-word title with Species among the tied ranks is a species
    pub accept_two_word_species: bool,
    /// Retry without the taxonomy template's vote when it causes a tie
    pub drop_taxonomy_on_conflict: bool,
}

impl Default for TieBreakPolicy {
    fn default() -> Self {
        Self {
            genus_species_by_title_shape: true,
            prefer_subspecies_over_species: true,
            prefer_variety_over_species: true,
            accept_two_word_species: true,
            drop_taxonomy_on_conflict: true,
        }
    }
}

/// Filter settings as written in the task file, before pattern compilation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    required_words: Vec<String>,
    excluded_words: Vec<String>,
    any_words: Vec<String>,
    lead_pattern: Option<String>,
    title_pattern: Option<String>,
    require_infobox: bool,
    infobox_markers: Vec<String>,
    sole_infobox: bool,
    override_manual: bool,
    override_embedded: bool,
    existing_description_pattern: Option<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            required_words: Vec::new(),
            excluded_words: Vec::new(),
            any_words: Vec::new(),
            lead_pattern: None,
            title_pattern: None,
            require_infobox: false,
            infobox_markers: vec!["infobox".to_string()],
            sole_infobox: true,
            override_manual: false,
            override_embedded: false,
            existing_description_pattern: None,
        }
    }
}

/// Article pre-filters and lead criteria, with patterns compiled
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "FilterSettings")]
pub struct FilterConfig {
    /// Every word must appear in the lead (case-sensitive)
    pub required_words: Vec<String>,
    /// No word may appear in the lead (case-sensitive)
    pub excluded_words: Vec<String>,
    /// At least one word must appear in the lead, when non-empty
    pub any_words: Vec<String>,
    pub lead_pattern: Option<Regex>,
    pub title_pattern: Option<Regex>,
    pub require_infobox: bool,
    /// Template-name fragments that count as an infobox
    pub infobox_markers: Vec<String>,
    /// With `require_infobox`, skip pages with more than one infobox
    pub sole_infobox: bool,
    /// Replace descriptions written into the markup
    pub override_manual: bool,
    /// Replace descriptions produced by templates
    pub override_embedded: bool,
    /// When overriding, only replace descriptions matching this
    pub existing_description_pattern: Option<Regex>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        // Default settings contain no patterns, so this cannot fail
        Self::from_settings(FilterSettings::default())
    }
}

impl FilterConfig {
    fn from_settings(settings: FilterSettings) -> Self {
        Self {
            required_words: settings.required_words,
            excluded_words: settings.excluded_words,
            any_words: settings.any_words,
            lead_pattern: None,
            title_pattern: None,
            require_infobox: settings.require_infobox,
            infobox_markers: settings.infobox_markers,
            sole_infobox: settings.sole_infobox,
            override_manual: settings.override_manual,
            override_embedded: settings.override_embedded,
            existing_description_pattern: None,
        }
    }
}

fn compile(field: &str, pattern: Option<&str>) -> Result<Option<Regex>, String> {
    pattern
        .map(|p| Regex::new(p).map_err(|e| format!("invalid {field} pattern: {e}")))
        .transpose()
}

impl TryFrom<FilterSettings> for FilterConfig {
    type Error = String;

    fn try_from(settings: FilterSettings) -> Result<Self, Self::Error> {
        let lead_pattern = compile("lead", settings.lead_pattern.as_deref())?;
        let title_pattern = compile("title", settings.title_pattern.as_deref())?;
        let existing_description_pattern = compile(
            "existing description",
            settings.existing_description_pattern.as_deref(),
        )?;
        Ok(Self {
            lead_pattern,
            title_pattern,
            existing_description_pattern,
            ..Self::from_settings(settings)
        })
    }
}

/// Everything `classify` needs besides the article and the store
#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationConfig {
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub policy: TieBreakPolicy,
}

impl ClassificationConfig {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            filters: FilterConfig::default(),
            policy: TieBreakPolicy::default(),
        }
    }

    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_policy(mut self, policy: TieBreakPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Batch limits and output files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub success_file: PathBuf,
    pub failure_file: PathBuf,
    /// Stop after this many eligible articles (0 = unlimited)
    pub max_articles: usize,
    /// Stop after this many successes (0 = unlimited)
    pub max_staged: usize,
    /// Ignore titles until one containing this text
    pub start_at: Option<String>,
    /// Stop after the first title containing this text
    pub stop_at: Option<String>,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            success_file: PathBuf::from("staged.tsv"),
            failure_file: PathBuf::from("staged_failures.tsv"),
            max_articles: 0,
            max_staged: 0,
            start_at: None,
            stop_at: None,
        }
    }
}

/// Contents of a task file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub vocabulary: Option<Vocabulary>,
    pub filters: FilterConfig,
    pub policy: TieBreakPolicy,
    pub staging: StagingConfig,
    pub logging: LoggingConfig,
}

impl TaskConfig {
    /// Load from the resolved source, falling back to defaults when there is
    /// no file
    pub fn load(source: &ConfigSource) -> EngineResult<Self> {
        let config: TaskConfig = load_or_default(source)?;
        info!("Task configuration from {}", source);
        Ok(config)
    }

    /// Load a specific file
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        Self::load(&ConfigSource::CommandLine(path.to_path_buf()))
    }

    /// Classification settings; a vocabulary is required
    pub fn classification(&self) -> EngineResult<ClassificationConfig> {
        let vocabulary = self.vocabulary.clone().ok_or_else(|| {
            EngineError::Config("task configuration has no [vocabulary] section".to_string())
        })?;
        Ok(ClassificationConfig {
            vocabulary,
            filters: self.filters.clone(),
            policy: self.policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_all_enabled() {
        let policy = TieBreakPolicy::default();
        assert!(policy.genus_species_by_title_shape);
        assert!(policy.drop_taxonomy_on_conflict);
    }

    #[test]
    fn test_filter_defaults() {
        let filters = FilterConfig::default();
        assert_eq!(filters.infobox_markers, vec!["infobox".to_string()]);
        assert!(filters.sole_infobox);
        assert!(!filters.require_infobox);
        assert!(filters.lead_pattern.is_none());
    }

    #[test]
    fn test_parse_task_toml() {
        let toml_str = r#"
            [vocabulary]
            singular = "moth"
            plural = "moths"

            [filters]
            required_words = ["moth"]
            title_pattern = "^[A-Z]"
            override_embedded = true

            [policy]
            accept_two_word_species = false

            [staging]
            max_staged = 10
        "#;
        let task: TaskConfig = toml::from_str(toml_str).unwrap();
        let config = task.classification().unwrap();
        assert_eq!(config.vocabulary.plural, "moths");
        assert_eq!(config.filters.required_words, vec!["moth".to_string()]);
        assert!(config.filters.title_pattern.unwrap().is_match("Acleris"));
        assert!(config.filters.override_embedded);
        assert!(config.filters.sole_infobox);
        assert!(!config.policy.accept_two_word_species);
        assert!(config.policy.prefer_variety_over_species);
        assert_eq!(task.staging.max_staged, 10);
        assert_eq!(task.logging.level, "info");
    }

    #[test]
    fn test_invalid_pattern_rejected_at_load() {
        let toml_str = "[filters]\nlead_pattern = \"(unclosed\"\n";
        let err = toml::from_str::<TaskConfig>(toml_str).unwrap_err();
        assert!(err.to_string().contains("invalid lead pattern"));
    }

    #[test]
    fn test_missing_vocabulary_is_config_error() {
        let task = TaskConfig::default();
        assert!(matches!(task.classification(), Err(EngineError::Config(_))));
    }
}
