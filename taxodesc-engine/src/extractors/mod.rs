//! Rank evidence extractors
//!
//! Each extractor looks at one kind of evidence and returns a rank or no
//! opinion:
//! 1. **category** - category names ("Tortricidae genera")
//! 2. **infobox** - bold-italic fields in the structured infobox
//! 3. **lead_text** - "X is a genus of..." phrasing in the lead
//! 4. **taxonomy** - rank recorded on the linked taxonomy template page
//!
//! **markers** detects extinction and monotypic hints used to embellish the
//! final description.

pub mod category;
pub mod infobox;
pub mod lead_text;
pub mod markers;
pub mod taxonomy;

pub use category::CategoryExtractor;
pub use infobox::InfoboxExtractor;
pub use lead_text::LeadTextExtractor;
pub use taxonomy::{TaxonomyExtractor, TaxonomyLookup};

use crate::lead::LeadText;
use crate::types::{Article, Rank, TitleShape};
use std::fmt;

/// Everything an extractor may look at for one article
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub article: &'a Article,
    /// Markup lowercased with whitespace removed
    pub compressed: &'a str,
    pub lead: &'a LeadText,
    pub shape: &'a TitleShape,
}

/// Which kind of evidence produced a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSource {
    Category,
    Infobox,
    LeadText,
    Taxonomy,
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvidenceSource::Category => "category",
            EvidenceSource::Infobox => "infobox",
            EvidenceSource::LeadText => "lead",
            EvidenceSource::Taxonomy => "taxonomy",
        };
        f.write_str(name)
    }
}

/// Extractor that needs nothing beyond the article itself
pub trait RankExtractor {
    fn source(&self) -> EvidenceSource;

    /// Rank suggested by this evidence, `None` for no opinion
    fn extract(&self, ctx: &ExtractionContext<'_>) -> Option<Rank>;
}

/// One optional vote per evidence source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankEvidence {
    pub category: Option<Rank>,
    pub infobox: Option<Rank>,
    pub lead: Option<Rank>,
    pub taxonomy: Option<Rank>,
}

impl RankEvidence {
    pub fn set(&mut self, source: EvidenceSource, rank: Option<Rank>) {
        match source {
            EvidenceSource::Category => self.category = rank,
            EvidenceSource::Infobox => self.infobox = rank,
            EvidenceSource::LeadText => self.lead = rank,
            EvidenceSource::Taxonomy => self.taxonomy = rank,
        }
    }

    /// Every opinion, taxonomy included
    pub fn votes(&self) -> Vec<Rank> {
        [self.category, self.infobox, self.lead, self.taxonomy]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Opinions from the article alone
    pub fn votes_without_taxonomy(&self) -> Vec<Rank> {
        [self.category, self.infobox, self.lead]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Run every article-local extractor
pub fn collect_evidence(
    extractors: &[&dyn RankExtractor],
    ctx: &ExtractionContext<'_>,
) -> RankEvidence {
    let mut evidence = RankEvidence::default();
    for extractor in extractors {
        let rank = extractor.extract(ctx);
        tracing::trace!(source = %extractor.source(), ?rank, "extracted");
        evidence.set(extractor.source(), rank);
    }
    evidence
}
