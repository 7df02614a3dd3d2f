//! Rank reconciliation
//!
//! # Algorithm
//! 1. A "var." or "subsp."/"ssp." token in the title decides outright
//! 2. Count votes; the most frequent rank wins when it is unique
//! 3. Ties go through the tie-break rules enabled in [`TieBreakPolicy`]
//! 4. A tie the rules cannot settle is retried without the taxonomy
//!    template's vote
//! 5. The winner is checked against the title shape; a single-word "species"
//!    with monotypic markers becomes a genus
//!
//! Ties that survive every step are failures, never guesses.

use crate::config::TieBreakPolicy;
use crate::extractors::RankEvidence;
use crate::types::{FailureReason, Rank, Reliability, TitleShape};
use crate::validators::assess_plausibility;
use std::collections::BTreeMap;
use tracing::debug;

/// Which rule produced the resolved rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionRule {
    VarietyTitle,
    SubspeciesTitle,
    Majority,
    GenusSpeciesByTitleShape,
    SubspeciesOverSpecies,
    VarietyOverSpecies,
    TwoWordSpecies,
    WithoutTaxonomy,
    MonotypicGenus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRank {
    pub rank: Rank,
    pub reliability: Reliability,
    /// Genus known to hold a single species
    pub monotypic: bool,
    pub rule: ResolutionRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedRank),
    Unresolved(FailureReason),
}

/// Most frequent ranks in `votes`, in rank order
pub fn multimode(votes: &[Rank]) -> Vec<Rank> {
    let mut counts: BTreeMap<Rank, usize> = BTreeMap::new();
    for rank in votes {
        *counts.entry(*rank).or_insert(0) += 1;
    }
    let Some(top) = counts.values().copied().max() else {
        return Vec::new();
    };
    counts
        .into_iter()
        .filter(|(_, count)| *count == top)
        .map(|(rank, _)| rank)
        .collect()
}

fn is_pair(modes: &[Rank], a: Rank, b: Rank) -> bool {
    modes.len() == 2 && modes.contains(&a) && modes.contains(&b)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankResolver {
    policy: TieBreakPolicy,
}

impl RankResolver {
    pub fn new(policy: TieBreakPolicy) -> Self {
        Self { policy }
    }

    /// Reconcile `evidence` for an article with the given title shape
    pub fn resolve(
        &self,
        evidence: &RankEvidence,
        shape: &TitleShape,
        monotypic: bool,
    ) -> Resolution {
        if shape.has_variety_marker() {
            return Resolution::Resolved(ResolvedRank {
                rank: Rank::Variety,
                reliability: Reliability::Confident,
                monotypic: false,
                rule: ResolutionRule::VarietyTitle,
            });
        }
        if shape.has_subspecies_marker() {
            return Resolution::Resolved(ResolvedRank {
                rank: Rank::Subspecies,
                reliability: Reliability::Confident,
                monotypic: false,
                rule: ResolutionRule::SubspeciesTitle,
            });
        }

        let votes = evidence.votes();
        let modes = multimode(&votes);
        debug!(?votes, ?modes, "rank votes");

        let (rank, rule) = match modes.as_slice() {
            [] => {
                return Resolution::Unresolved(FailureReason::NoConsistentRank {
                    candidates: Vec::new(),
                })
            }
            [only] => (*only, ResolutionRule::Majority),
            _ => match self
                .break_tie(&modes, &votes, shape)
                .or_else(|| self.without_taxonomy(evidence))
            {
                Some(decided) => decided,
                None => {
                    return Resolution::Unresolved(unresolved(modes.clone(), evidence.taxonomy))
                }
            },
        };

        Resolution::Resolved(self.finish(rank, rule, shape, monotypic))
    }

    fn break_tie(
        &self,
        modes: &[Rank],
        votes: &[Rank],
        shape: &TitleShape,
    ) -> Option<(Rank, ResolutionRule)> {
        let policy = &self.policy;

        if policy.genus_species_by_title_shape && is_pair(modes, Rank::Genus, Rank::Species) {
            let rank = if shape.is_single_word() {
                Rank::Genus
            } else {
                Rank::Species
            };
            return Some((rank, ResolutionRule::GenusSpeciesByTitleShape));
        }
        if policy.prefer_subspecies_over_species
            && is_pair(modes, Rank::Subspecies, Rank::Species)
        {
            return Some((Rank::Subspecies, ResolutionRule::SubspeciesOverSpecies));
        }
        if policy.prefer_variety_over_species && is_pair(modes, Rank::Variety, Rank::Species) {
            return Some((Rank::Variety, ResolutionRule::VarietyOverSpecies));
        }
        if policy.accept_two_word_species
            && modes.contains(&Rank::Species)
            && shape.word_count() == 2
            && votes.iter().any(|r| *r != Rank::Species)
        {
            return Some((Rank::Species, ResolutionRule::TwoWordSpecies));
        }
        None
    }

    fn without_taxonomy(&self, evidence: &RankEvidence) -> Option<(Rank, ResolutionRule)> {
        if !self.policy.drop_taxonomy_on_conflict || evidence.taxonomy.is_none() {
            return None;
        }
        match multimode(&evidence.votes_without_taxonomy()).as_slice() {
            [only] => Some((*only, ResolutionRule::WithoutTaxonomy)),
            _ => None,
        }
    }

    fn finish(
        &self,
        rank: Rank,
        rule: ResolutionRule,
        shape: &TitleShape,
        monotypic: bool,
    ) -> ResolvedRank {
        if rank == Rank::Species && shape.is_single_word() && monotypic {
            return ResolvedRank {
                rank: Rank::Genus,
                reliability: Reliability::Confident,
                monotypic: true,
                rule: ResolutionRule::MonotypicGenus,
            };
        }
        ResolvedRank {
            rank,
            reliability: assess_plausibility(rank, shape),
            monotypic: monotypic && rank == Rank::Genus,
            rule,
        }
    }
}

fn unresolved(candidates: Vec<Rank>, taxonomy: Option<Rank>) -> FailureReason {
    match taxonomy {
        Some(taxonomy) => FailureReason::ConflictingRanks {
            candidates,
            taxonomy,
        },
        None => FailureReason::NoConsistentRank { candidates },
    }
}
