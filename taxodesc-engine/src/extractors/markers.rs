//! Extinction and monotypic markers
//!
//! These do not vote on the rank. They decide whether a description gets the
//! "Extinct " or "Single-species " prefix.

use super::infobox::names_single_species;
use crate::types::Article;

/// Lead phrases (lowercase) saying the taxon has a single member species
const MONOTYPIC_LEAD_PHRASES: &[&str] = &[
    "monotypic",
    "monospecific",
    " a single species",
    " the single species",
    " single-species",
    " only one species",
    " only the one species",
    " its only species",
];

const EXTINCT_LEAD_PHRASES: &[&str] = &["is a fossil", "is an extinct"];

const EXTINCT_CATEGORY_WORDS: &[&str] = &["fossil", "prehistoric", "extinctions"];

/// Fragments of compressed markup that mark an extinct taxon
const EXTINCT_MARKUP: &[&str] = &[
    "isafossil",
    "isanextinct",
    "{{extinct}}",
    "|status=ex",
    "|extinct=y",
    "|extinct=t",
    "|type_species=\u{2020}",
    "extinctions]]",
    "[[category:prehistoric",
];

/// Page or lead says the taxon contains a single species
pub fn is_monotypic(article: &Article, compressed: &str, lead: &str) -> bool {
    let page_level = article
        .categories
        .iter()
        .any(|c| c.to_lowercase().contains("monotypic"))
        || compressed.contains("[[category:monotypic")
        || names_single_species(compressed);
    if page_level {
        return true;
    }

    let lead = lead.to_lowercase();
    MONOTYPIC_LEAD_PHRASES.iter().any(|p| lead.contains(p))
}

/// Page or lead says the taxon is extinct
pub fn has_extinction_markers(article: &Article, compressed: &str, lead: &str) -> bool {
    let lead = lead.to_lowercase();
    EXTINCT_LEAD_PHRASES.iter().any(|p| lead.contains(p))
        || article.categories.iter().any(|c| {
            let c = c.to_lowercase();
            EXTINCT_CATEGORY_WORDS.iter().any(|w| c.contains(w))
        })
        || EXTINCT_MARKUP.iter().any(|m| compressed.contains(m))
}
