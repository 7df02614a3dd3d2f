//! Rank plausibility against title shape
//!
//! Binomial titles name species-level taxa and single-word titles name
//! higher taxa. A rank that disagrees is still described, but flagged for
//! review.

use crate::types::{Rank, Reliability, TitleShape};

pub fn assess_plausibility(rank: Rank, shape: &TitleShape) -> Reliability {
    let implausible = if shape.is_single_word() {
        matches!(rank, Rank::Subspecies | Rank::Variety)
    } else if shape.is_multi_word() {
        !rank.is_species_level()
    } else {
        false
    };

    if implausible {
        Reliability::NeedsReview
    } else {
        Reliability::Confident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(title: &str) -> TitleShape {
        TitleShape::from_title(title)
    }

    #[test]
    fn test_plausible_pairs() {
        assert_eq!(assess_plausibility(Rank::Genus, &shape("Acleris")), Reliability::Confident);
        assert_eq!(
            assess_plausibility(Rank::Species, &shape("Acleris comariana")),
            Reliability::Confident
        );
        assert_eq!(
            assess_plausibility(Rank::Variety, &shape("Rosa canina var. lutetiana")),
            Reliability::Confident
        );
    }

    #[test]
    fn test_single_word_infraspecific_needs_review() {
        assert_eq!(
            assess_plausibility(Rank::Subspecies, &shape("Britannicus")),
            Reliability::NeedsReview
        );
    }

    #[test]
    fn test_multi_word_higher_rank_needs_review() {
        assert_eq!(
            assess_plausibility(Rank::Genus, &shape("Acleris comariana")),
            Reliability::NeedsReview
        );
        // Disambiguator does not count as a word
        assert_eq!(
            assess_plausibility(Rank::Genus, &shape("Acleris (moth)")),
            Reliability::Confident
        );
    }
}
