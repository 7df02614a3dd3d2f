//! Core types for taxodesc-engine
//!
//! - **Rank** and its Latin field-name table
//! - **Article** and derived views (compressed markup, title shape)
//! - **Vocabulary** for the organism nouns used in descriptions
//! - **ClassificationResult** with its failure and skip reasons

use crate::error::StoreError;
use crate::store::DocumentStore;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Rank
// ============================================================================

/// Taxonomic rank
///
/// Declaration order is the canonical ordering used when reporting
/// candidate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Species,
    Subspecies,
    Variety,
    Genus,
    Subgenus,
    Tribe,
    Subtribe,
    Family,
    Subfamily,
    Superfamily,
    Class,
    Subclass,
    Order,
    Suborder,
    Infraorder,
    Phylum,
    Subphylum,
    Clade,
    InformalGroup,
    Group,
}

/// Latin infobox field names and the rank each denotes
pub(crate) const FIELD_NAMES: &[(&str, Rank)] = &[
    ("genus", Rank::Genus),
    ("varietas", Rank::Variety),
    ("variety", Rank::Variety),
    ("tribus", Rank::Tribe),
    ("superfamilia", Rank::Superfamily),
    ("subtribus", Rank::Subtribe),
    ("subspecies", Rank::Subspecies),
    ("trinomial", Rank::Subspecies),
    ("classis", Rank::Class),
    ("subfamilia", Rank::Subfamily),
    ("species", Rank::Species),
    ("binomial", Rank::Species),
    ("subordo", Rank::Suborder),
    ("infraordo", Rank::Infraorder),
    ("subgenus", Rank::Subgenus),
    ("ordo", Rank::Order),
    ("subclassis", Rank::Subclass),
    ("familia", Rank::Family),
    ("informalgroup", Rank::InformalGroup),
    ("stemgroup", Rank::Group),
    ("localgroup", Rank::Group),
    ("clade", Rank::Clade),
    ("cladus", Rank::Clade),
    ("phylum", Rank::Phylum),
    ("subphylum", Rank::Subphylum),
];

impl Rank {
    /// Display label, capitalized
    pub fn label(self) -> &'static str {
        match self {
            Rank::Species => "Species",
            Rank::Subspecies => "Subspecies",
            Rank::Variety => "Variety",
            Rank::Genus => "Genus",
            Rank::Subgenus => "Subgenus",
            Rank::Tribe => "Tribe",
            Rank::Subtribe => "Subtribe",
            Rank::Family => "Family",
            Rank::Subfamily => "Subfamily",
            Rank::Superfamily => "Superfamily",
            Rank::Class => "Class",
            Rank::Subclass => "Subclass",
            Rank::Order => "Order",
            Rank::Suborder => "Suborder",
            Rank::Infraorder => "Infraorder",
            Rank::Phylum => "Phylum",
            Rank::Subphylum => "Subphylum",
            Rank::Clade => "Clade",
            Rank::InformalGroup => "Informal group",
            Rank::Group => "Group",
        }
    }

    /// Species, Subspecies and Variety name a single organism kind and take
    /// the singular noun; every other rank takes the plural.
    pub fn is_species_level(self) -> bool {
        matches!(self, Rank::Species | Rank::Subspecies | Rank::Variety)
    }

    /// Map a Latin field or rank name (`familia`, `subordo`, ...) to a rank
    ///
    /// Case and surrounding whitespace are ignored.
    pub fn from_field_name(name: &str) -> Option<Rank> {
        let name = name.trim().to_lowercase();
        FIELD_NAMES
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, rank)| *rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Vocabulary
// ============================================================================

/// Organism nouns for one task ("moth" / "moths")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub singular: String,
    pub plural: String,
}

impl Vocabulary {
    pub fn new(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            singular: singular.into(),
            plural: plural.into(),
        }
    }

    /// Noun to use after "<rank> of"
    pub fn noun_for(&self, rank: Rank) -> &str {
        if rank.is_species_level() {
            &self.singular
        } else {
            &self.plural
        }
    }
}

// ============================================================================
// Article
// ============================================================================

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.+?\)").unwrap());
static SHORT_DESCRIPTION_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{\{\s*short description\s*\|\s*([^}|]*)").unwrap());

/// Where an existing short description comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptionOrigin {
    /// Written into the article markup directly
    Manual,
    /// Produced by an infobox or other template
    Embedded,
}

impl fmt::Display for DescriptionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionOrigin::Manual => f.write_str("manual"),
            DescriptionOrigin::Embedded => f.write_str("embedded"),
        }
    }
}

/// Short description an article already carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingDescription {
    pub text: String,
    pub origin: DescriptionOrigin,
}

/// One encyclopedia article as seen by the classifier
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    /// Raw wiki markup
    pub text: String,
    pub categories: Vec<String>,
    pub exists: bool,
    pub existing_description: Option<ExistingDescription>,
}

impl Article {
    /// Build an existing article, detecting a manual short description in
    /// the markup.
    pub fn new(title: impl Into<String>, text: impl Into<String>, categories: Vec<String>) -> Self {
        let text = text.into();
        let existing_description = manual_description(&text).map(|text| ExistingDescription {
            text,
            origin: DescriptionOrigin::Manual,
        });
        Self {
            title: title.into(),
            text,
            categories,
            exists: true,
            existing_description,
        }
    }

    /// Placeholder for a title the store does not know
    pub fn missing(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: String::new(),
            categories: Vec::new(),
            exists: false,
            existing_description: None,
        }
    }

    pub fn with_existing_description(mut self, description: Option<ExistingDescription>) -> Self {
        self.existing_description = description;
        self
    }

    /// Fetch an article and its existing description from a document store
    ///
    /// A description reported by the store counts as manual when the markup
    /// carries the template itself, otherwise as embedded.
    pub fn fetch(store: &dyn DocumentStore, title: &str) -> Result<Article, StoreError> {
        let Some(text) = store.text(title)? else {
            return Ok(Article::missing(title));
        };
        let categories = store.categories(title)?;
        let mut article = Article::new(title, text, categories);

        if let Some(reported) = store.short_description(title)? {
            let origin = if article.existing_description.is_some() {
                DescriptionOrigin::Manual
            } else {
                DescriptionOrigin::Embedded
            };
            article.existing_description = Some(ExistingDescription {
                text: reported,
                origin,
            });
        }
        Ok(article)
    }

    /// Markup lowercased with all whitespace removed
    pub fn compressed_text(&self) -> String {
        compress(&self.text)
    }

    pub fn title_shape(&self) -> TitleShape {
        TitleShape::from_title(&self.title)
    }
}

fn manual_description(text: &str) -> Option<String> {
    SHORT_DESCRIPTION_TEMPLATE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

/// Lowercase and drop every whitespace character
pub fn compress(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// Title shape
// ============================================================================

/// Title with parenthetical disambiguators removed, plus word tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleShape {
    bare: String,
    words: Vec<String>,
}

impl TitleShape {
    pub fn from_title(title: &str) -> Self {
        let bare = PARENTHETICAL.replace_all(title, "").trim().to_string();
        let words = bare.split_whitespace().map(str::to_string).collect();
        Self { bare, words }
    }

    /// Title without "(moth)"-style disambiguators
    pub fn bare(&self) -> &str {
        &self.bare
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_single_word(&self) -> bool {
        self.words.len() == 1
    }

    pub fn is_multi_word(&self) -> bool {
        self.words.len() > 1
    }

    /// Title carries a "var." token
    pub fn has_variety_marker(&self) -> bool {
        self.words.iter().any(|w| w == "var.")
    }

    /// Title carries a "subsp." or "ssp." token
    pub fn has_subspecies_marker(&self) -> bool {
        self.words.iter().any(|w| w == "subsp." || w == "ssp.")
    }
}

// ============================================================================
// Classification outcome
// ============================================================================

/// How much a produced description can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reliability {
    Confident,
    /// Rank and title shape disagree; a person should check it
    NeedsReview,
}

/// Generated short description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub text: String,
    pub rank: Rank,
    pub reliability: Reliability,
    /// "Extinct " prefix was applied
    pub extinct: bool,
    /// "Single-species " prefix was applied
    pub monotypic: bool,
}

impl Description {
    pub fn needs_review(&self) -> bool {
        self.reliability == Reliability::NeedsReview
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Why an eligible article got no description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    LeadNotExtracted,
    RequiredWordMissing(String),
    ExcludedWordPresent(String),
    NoAnyWordPresent,
    LeadPatternMismatch,
    TitlePatternMismatch,
    NoConsistentRank { candidates: Vec<Rank> },
    ConflictingRanks { candidates: Vec<Rank>, taxonomy: Rank },
    DescriptionTooLong { text: String },
}

impl FailureReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::LeadNotExtracted => "lead_not_extracted",
            FailureReason::RequiredWordMissing(_) => "required_word_missing",
            FailureReason::ExcludedWordPresent(_) => "excluded_word_present",
            FailureReason::NoAnyWordPresent => "no_any_word_present",
            FailureReason::LeadPatternMismatch => "lead_pattern_mismatch",
            FailureReason::TitlePatternMismatch => "title_pattern_mismatch",
            FailureReason::NoConsistentRank { .. } => "no_consistent_rank",
            FailureReason::ConflictingRanks { .. } => "conflicting_ranks",
            FailureReason::DescriptionTooLong { .. } => "description_too_long",
        }
    }
}

fn join_ranks(ranks: &[Rank]) -> String {
    ranks.iter().map(|r| r.label()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LeadNotExtracted => f.write_str("lead could not be extracted"),
            FailureReason::RequiredWordMissing(word) => write!(f, "required word missing - {word}"),
            FailureReason::ExcludedWordPresent(word) => write!(f, "excluded word present - {word}"),
            FailureReason::NoAnyWordPresent => f.write_str("none of the any-words present"),
            FailureReason::LeadPatternMismatch => f.write_str("lead does not match pattern"),
            FailureReason::TitlePatternMismatch => f.write_str("title does not match pattern"),
            FailureReason::NoConsistentRank { candidates } if candidates.is_empty() => {
                f.write_str("no consistent rank")
            }
            FailureReason::NoConsistentRank { candidates } => {
                write!(f, "no consistent rank ({})", join_ranks(candidates))
            }
            FailureReason::ConflictingRanks {
                candidates,
                taxonomy,
            } => write!(
                f,
                "no consistent rank ({}; taxonomy template says {})",
                join_ranks(candidates),
                taxonomy
            ),
            FailureReason::DescriptionTooLong { text } => {
                write!(f, "description too long - {text}")
            }
        }
    }
}

/// Why an article was not considered at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    PageMissing,
    ListArticle,
    AlreadyDescribed(DescriptionOrigin),
    ExistingDescriptionMismatch,
    Redirect,
    MissingInfobox,
    MultipleInfoboxes,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PageMissing => f.write_str("page does not exist"),
            SkipReason::ListArticle => f.write_str("is a list"),
            SkipReason::AlreadyDescribed(_) => f.write_str("already has description"),
            SkipReason::ExistingDescriptionMismatch => {
                f.write_str("existing description does not match pattern")
            }
            SkipReason::Redirect => f.write_str("is a redirect"),
            SkipReason::MissingInfobox => f.write_str("does not have infobox"),
            SkipReason::MultipleInfoboxes => f.write_str("has multiple infoboxes"),
        }
    }
}

/// Outcome of classifying one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    Success(Description),
    Failure(FailureReason),
    Skipped(SkipReason),
}

impl ClassificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationResult::Success(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ClassificationResult::Skipped(_))
    }

    pub fn description(&self) -> Option<&Description> {
        match self {
            ClassificationResult::Success(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationResult::Success(d) => write!(f, "{d}"),
            ClassificationResult::Failure(reason) => write!(f, "{reason}"),
            ClassificationResult::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}
