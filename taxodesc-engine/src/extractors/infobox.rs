//! Rank from the structured infobox
//!
//! Works on compressed markup (lowercase, no whitespace). In a taxobox the
//! taxon the article is about is the one set in bold italic (`'''''X'''''`):
//! - a bold-italic field equal to the title decides outright
//! - otherwise the bold-italic field that appears last in the markup wins
//!
//! Pages without a taxobox fall back to the species-level box templates.

use super::{EvidenceSource, ExtractionContext, RankExtractor};
use crate::types::{compress, Rank, FIELD_NAMES};

const BOLD_ITALIC: &str = "'''''";

#[derive(Debug, Default, Clone, Copy)]
pub struct InfoboxExtractor;

impl RankExtractor for InfoboxExtractor {
    fn source(&self) -> EvidenceSource {
        EvidenceSource::Infobox
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Option<Rank> {
        rank_from_infobox(ctx.compressed, ctx.shape.bare())
    }
}

/// Rank from compressed page markup and the bare article title
pub fn rank_from_infobox(compressed: &str, bare_title: &str) -> Option<Rank> {
    if compressed.contains("{{taxobox") {
        rank_from_taxobox(compressed, &compress(bare_title))
    } else {
        rank_from_species_box(compressed)
    }
}

fn rank_from_taxobox(compressed: &str, title: &str) -> Option<Rank> {
    let bold = |field: &str| compressed.contains(&format!("|{field}={BOLD_ITALIC}"));

    if !title.is_empty() {
        for (field, rank) in FIELD_NAMES {
            if compressed.contains(&format!("|{field}={BOLD_ITALIC}{title}{BOLD_ITALIC}")) {
                return Some(*rank);
            }
        }
    }

    let latest = FIELD_NAMES
        .iter()
        .filter_map(|(field, rank)| {
            compressed
                .rfind(&format!("|{field}={BOLD_ITALIC}"))
                .map(|pos| (pos, *rank))
        })
        .max_by_key(|(pos, _)| *pos)
        .map(|(_, rank)| rank);

    let refined = match latest {
        Some(Rank::Genus) if bold("subgenus") => Some(Rank::Subgenus),
        Some(Rank::Family) if bold("subfamilia") => Some(Rank::Subfamily),
        Some(Rank::Family) if bold("superfamilia") => Some(Rank::Superfamily),
        Some(Rank::Tribe) if bold("subtribus") => Some(Rank::Subtribe),
        Some(Rank::Class) if bold("subclassis") => Some(Rank::Subclass),
        Some(Rank::Order) if bold("subordo") => Some(Rank::Suborder),
        _ => None,
    };
    if refined.is_some() {
        return refined;
    }

    // A bold species or binomial means the page is about a species, unless
    // the genus is bold too, which marks a genus page listing its type species.
    let genus_bold = bold("genus");
    let species_bold = bold("species") || compressed.contains("|binomial=''");
    if species_bold && !genus_bold {
        let trinomial =
            field_filled(compressed, "subspecies") || field_filled(compressed, "trinomial");
        return Some(if trinomial {
            Rank::Subspecies
        } else {
            Rank::Species
        });
    }
    if species_bold && genus_bold {
        return Some(Rank::Genus);
    }

    latest
}

/// Taxobox with both genus and species in bold italic: a genus page naming
/// its single species
pub fn names_single_species(compressed: &str) -> bool {
    compressed.contains("{{taxobox")
        && compressed.contains(&format!("|genus={BOLD_ITALIC}"))
        && (compressed.contains(&format!("|species={BOLD_ITALIC}"))
            || compressed.contains("|binomial=''"))
}

fn rank_from_species_box(compressed: &str) -> Option<Rank> {
    if compressed.contains("{{speciesbox") {
        Some(Rank::Species)
    } else if compressed.contains("{{subspeciesbox") {
        Some(Rank::Subspecies)
    } else if compressed.contains("{{infraspeciesbox") {
        if field_filled(compressed, "varietas") || field_filled(compressed, "variety") {
            Some(Rank::Variety)
        } else if field_filled(compressed, "subspecies") {
            Some(Rank::Subspecies)
        } else {
            None
        }
    } else {
        None
    }
}

/// `|field=` followed by a value rather than the next field or the box end
fn field_filled(compressed: &str, field: &str) -> bool {
    let needle = format!("|{field}=");
    compressed.match_indices(&needle).any(|(pos, _)| {
        compressed[pos + needle.len()..]
            .chars()
            .next()
            .is_some_and(|c| c != '|' && c != '}')
    })
}
