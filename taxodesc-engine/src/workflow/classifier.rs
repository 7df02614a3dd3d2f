//! Article classifier
//!
//! # Pipeline
//! 1. Admissibility pre-filters (skip)
//! 2. Lead extraction (failure if the lead cannot be sanitized)
//! 3. Lead and title criteria (failure)
//! 4. Rank evidence from categories, infobox, lead text and taxonomy template
//! 5. Rank reconciliation (failure if no unique rank)
//! 6. Description synthesis with extinction/monotypic prefixes
//!
//! Only document-store failures while fetching the article itself are
//! returned as errors; every other outcome is a [`ClassificationResult`].

use crate::config::ClassificationConfig;
use crate::error::StoreError;
use crate::extractors::{
    collect_evidence, markers, CategoryExtractor, ExtractionContext, InfoboxExtractor,
    LeadTextExtractor, RankExtractor, TaxonomyExtractor,
};
use crate::fusion::{synthesize_description, RankResolver, Resolution};
use crate::lead::{extract_lead, opening_section, LeadText};
use crate::store::DocumentStore;
use crate::types::{Article, ClassificationResult, FailureReason};
use crate::validators::{check_admissible, check_criteria};
use tracing::debug;

/// Classification outcome plus the lead it was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub result: ClassificationResult,
    /// Sanitized lead, when extraction got that far
    pub lead: Option<LeadText>,
}

impl Classified {
    fn without_lead(result: ClassificationResult) -> Self {
        Self { result, lead: None }
    }
}

/// Classifier bound to one store and task configuration
pub struct Classifier<'a> {
    store: &'a dyn DocumentStore,
    config: &'a ClassificationConfig,
    lead_text: LeadTextExtractor,
    resolver: RankResolver,
}

impl<'a> Classifier<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: &'a ClassificationConfig) -> Self {
        Self {
            store,
            config,
            lead_text: LeadTextExtractor::new(&config.vocabulary),
            resolver: RankResolver::new(config.policy),
        }
    }

    /// Fetch and classify a title
    pub fn classify_title(&self, title: &str) -> Result<Classified, StoreError> {
        let article = Article::fetch(self.store, title)?;
        Ok(self.classify(&article))
    }

    /// Classify an article already in hand
    pub fn classify(&self, article: &Article) -> Classified {
        let filters = &self.config.filters;

        if let Some(reason) = check_admissible(article, filters) {
            return Classified::without_lead(ClassificationResult::Skipped(reason));
        }

        let lead = match extract_lead(opening_section(&article.text)) {
            Ok(lead) => lead,
            Err(e) => {
                debug!(title = %article.title, "{}", e);
                return Classified::without_lead(ClassificationResult::Failure(
                    FailureReason::LeadNotExtracted,
                ));
            }
        };

        let result = match check_criteria(&lead, &article.title, filters) {
            Ok(()) => self.describe(article, &lead),
            Err(reason) => {
                debug!(title = %article.title, "Criteria not met: {}", reason);
                ClassificationResult::Failure(reason)
            }
        };
        Classified {
            result,
            lead: Some(lead),
        }
    }

    fn describe(&self, article: &Article, lead: &LeadText) -> ClassificationResult {
        let compressed = article.compressed_text();
        let shape = article.title_shape();
        let ctx = ExtractionContext {
            article,
            compressed: &compressed,
            lead,
            shape: &shape,
        };

        let extractors: [&dyn RankExtractor; 3] =
            [&CategoryExtractor, &InfoboxExtractor, &self.lead_text];
        let mut evidence = collect_evidence(&extractors, &ctx);
        let taxonomy = TaxonomyExtractor::new(self.store).lookup(&article.text, &compressed);
        evidence.taxonomy = taxonomy.rank;
        debug!(title = %article.title, ?evidence, "rank evidence");

        let monotypic = markers::is_monotypic(article, &compressed, lead.as_str());
        let resolved = match self.resolver.resolve(&evidence, &shape, monotypic) {
            Resolution::Resolved(resolved) => resolved,
            Resolution::Unresolved(reason) => {
                debug!(title = %article.title, "Unresolved: {}", reason);
                return ClassificationResult::Failure(reason);
            }
        };

        let extinct = taxonomy.extinct
            || markers::has_extinction_markers(article, &compressed, lead.as_str());
        match synthesize_description(&resolved, &self.config.vocabulary, extinct) {
            Ok(description) => {
                debug!(
                    title = %article.title,
                    rule = ?resolved.rule,
                    "Described as '{}'",
                    description
                );
                ClassificationResult::Success(description)
            }
            Err(reason) => ClassificationResult::Failure(reason),
        }
    }
}

/// Classify a single article
pub fn classify(
    article: &Article,
    config: &ClassificationConfig,
    store: &dyn DocumentStore,
) -> ClassificationResult {
    Classifier::new(store, config).classify(article).result
}
