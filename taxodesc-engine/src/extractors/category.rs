//! Rank from category names
//!
//! Categories are matched by case-insensitive substring against an ordered
//! table of plural rank words; the first hit gives the coarse rank, which a
//! second category may refine ("genera" plus "subgenera" is Subgenus).

use super::{EvidenceSource, ExtractionContext, RankExtractor};
use crate::types::Rank;

const CATEGORY_WORDS: &[(&str, Rank)] = &[
    ("subspecies", Rank::Subspecies),
    ("subgenera", Rank::Subgenus),
    ("genera", Rank::Genus),
    ("subfamilies", Rank::Subfamily),
    ("families", Rank::Family),
    ("superfamilies", Rank::Superfamily),
    ("orders", Rank::Order),
    ("suborders", Rank::Suborder),
    ("phyla", Rank::Phylum),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryExtractor;

impl RankExtractor for CategoryExtractor {
    fn source(&self) -> EvidenceSource {
        EvidenceSource::Category
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Option<Rank> {
        rank_from_categories(&ctx.article.categories)
    }
}

pub fn rank_from_categories(categories: &[String]) -> Option<Rank> {
    let lowered: Vec<String> = categories.iter().map(|c| c.to_lowercase()).collect();
    let mentions = |word: &str| lowered.iter().any(|c| c.contains(word));

    let coarse = CATEGORY_WORDS
        .iter()
        .find(|(word, _)| mentions(word))
        .map(|(_, rank)| *rank)?;

    let refined = match coarse {
        Rank::Genus if mentions("subgenera") => Rank::Subgenus,
        Rank::Family if mentions("subfamilies") => Rank::Subfamily,
        Rank::Family if mentions("superfamilies") => Rank::Superfamily,
        Rank::Order if mentions("suborders") => Rank::Suborder,
        rank => rank,
    };
    Some(refined)
}
