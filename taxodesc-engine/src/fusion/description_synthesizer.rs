//! Description synthesis
//!
//! `"<Rank> of <noun>"`, with at most one prefix:
//! - `"Extinct genus of moths"` when extinction markers were found
//! - `"Single-species genus of moths"` for a monotypic genus
//!
//! A prefix is only applied if the result still fits the length limit.
//! Extinction is tried first.

use super::rank_resolver::ResolvedRank;
use crate::types::{Description, FailureReason, Rank, Vocabulary};

/// Longest description produced, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 40;

fn fits(text: &str) -> bool {
    text.chars().count() <= MAX_DESCRIPTION_CHARS
}

/// Build the description for a resolved rank
pub fn synthesize_description(
    resolved: &ResolvedRank,
    vocabulary: &Vocabulary,
    extinct: bool,
) -> Result<Description, FailureReason> {
    let rank = resolved.rank;
    let noun = vocabulary.noun_for(rank);
    let lowered = rank.label().to_lowercase();

    let base = format!("{} of {}", rank.label(), noun);
    if !fits(&base) {
        return Err(FailureReason::DescriptionTooLong { text: base });
    }

    let describe = |text: String, extinct: bool, monotypic: bool| Description {
        text,
        rank,
        reliability: resolved.reliability,
        extinct,
        monotypic,
    };

    if extinct {
        let text = format!("Extinct {lowered} of {noun}");
        if fits(&text) {
            return Ok(describe(text, true, false));
        }
    }
    if resolved.monotypic && rank == Rank::Genus {
        let text = format!("Single-species {lowered} of {noun}");
        if fits(&text) {
            return Ok(describe(text, false, true));
        }
    }
    Ok(describe(base, false, false))
}
