//! Rank from the lead's wording
//!
//! Looks for "X is a genus of ..." phrasing in three passes:
//! 1. Copula immediately followed by a rank word ("is a subfamily")
//! 2. Species phrasing ("Acleris comariana is a moth", "was a moth")
//! 3. Copula, up to 50 characters of filler, then a rank word, where the
//!    filler may not run into " in the" ("is a small genus", but not
//!    "is a moth in the family")
//!
//! Every pass reads only the first sentence when that sentence is longer than
//! 26 characters. Pass 3 gives no opinion when it finds more than one
//! distinct rank.

use super::{EvidenceSource, ExtractionContext, RankExtractor};
use crate::lead::LeadText;
use crate::types::{Rank, Vocabulary};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Restrict matching to the first sentence when it is longer than this
const MIN_SENTENCE_CHARS: usize = 26;
/// Longest filler pass 3 accepts between copula and rank word
const MAX_FILLER_CHARS: usize = 50;

/// Rank word stems, truncated so that plurals and inflections match
const RANK_STEMS: &[(&str, Rank)] = &[
    ("subgenu", Rank::Subgenus),
    ("genus", Rank::Genus),
    ("superfami", Rank::Superfamily),
    ("famil", Rank::Family),
    ("subfami", Rank::Subfamily),
    ("tribe", Rank::Tribe),
    ("subtrib", Rank::Subtribe),
    ("class", Rank::Class),
    ("subclas", Rank::Subclass),
    ("order", Rank::Order),
    ("suborde", Rank::Suborder),
    ("infraorde", Rank::Infraorder),
    ("clade", Rank::Clade),
    ("variet", Rank::Variety),
    ("species", Rank::Species),
    ("informal group", Rank::InformalGroup),
    ("phylum", Rank::Phylum),
    ("subphylu", Rank::Subphylum),
];

static TIGHT_PATTERNS: Lazy<Vec<(Regex, Rank)>> = Lazy::new(|| {
    RANK_STEMS
        .iter()
        .map(|(stem, rank)| {
            let pattern = format!(r"\b(?:is|are|was|were)\san?\s{}", regex::escape(stem));
            (Regex::new(&pattern).unwrap(), *rank)
        })
        .collect()
});

static LOOSE_COPULA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:is|are|was|were)\sa").unwrap());

/// Lead-text extractor for one vocabulary
#[derive(Debug, Clone)]
pub struct LeadTextExtractor {
    singular: String,
    species_phrase: Option<Regex>,
}

impl LeadTextExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let singular = vocabulary.singular.to_lowercase();
        let species_phrase =
            Regex::new(&format!(r"\b(?:is|was)\san?\s{}\b", regex::escape(&singular))).ok();
        Self {
            singular,
            species_phrase,
        }
    }

    /// Rank suggested by `lead` for an article titled `bare_title`
    pub fn rank_from_lead(&self, lead: &str, bare_title: &str) -> Option<Rank> {
        let lowered = lead.to_lowercase();
        let focus = first_sentence(&lowered);

        if let Some(rank) = TIGHT_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(focus))
            .map(|(_, rank)| *rank)
        {
            return Some(rank);
        }

        if self.titled_species_phrase(focus, bare_title) {
            return Some(Rank::Species);
        }
        if self
            .species_phrase
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(focus))
        {
            return Some(Rank::Species);
        }

        loose_rank(focus)
    }

    fn titled_species_phrase(&self, text: &str, bare_title: &str) -> bool {
        let title = bare_title.trim().to_lowercase();
        if title.is_empty() {
            return false;
        }
        let pattern = format!(
            r"{}\s(?:is|was)\san?\s{}\b",
            regex::escape(&title),
            regex::escape(&self.singular)
        );
        Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
    }
}

impl RankExtractor for LeadTextExtractor {
    fn source(&self) -> EvidenceSource {
        EvidenceSource::LeadText
    }

    fn extract(&self, ctx: &ExtractionContext<'_>) -> Option<Rank> {
        self.rank_from_lead(LeadText::as_str(ctx.lead), ctx.shape.bare())
    }
}

/// Text up to the first period, if that sentence is long enough to trust
fn first_sentence(text: &str) -> &str {
    match text.split_once('.') {
        Some((sentence, _)) if sentence.chars().count() > MIN_SENTENCE_CHARS => sentence,
        _ => text,
    }
}

fn loose_rank(text: &str) -> Option<Rank> {
    let chars: Vec<char> = text.chars().collect();
    let copula_ends: Vec<usize> = LOOSE_COPULA
        .find_iter(text)
        .map(|m| text[..m.end()].chars().count())
        .collect();

    let found: BTreeSet<Rank> = RANK_STEMS
        .iter()
        .filter(|(stem, _)| {
            let stem: Vec<char> = stem.chars().collect();
            copula_ends
                .iter()
                .any(|&end| stem_follows_filler(&chars, end, &stem))
        })
        .map(|(_, rank)| *rank)
        .collect();

    let mut ranks = found.into_iter();
    match (ranks.next(), ranks.next()) {
        (Some(rank), None) => Some(rank),
        _ => None,
    }
}

/// Whitespace then `stem` within [`MAX_FILLER_CHARS`] of `start`, without the
/// filler containing the start of " in the"
fn stem_follows_filler(chars: &[char], start: usize, stem: &[char]) -> bool {
    for filler in 0..=MAX_FILLER_CHARS {
        let at = start + filler;
        if at >= chars.len() {
            break;
        }
        if filler > 0 && starts_in_the(chars, at - 1) {
            break;
        }
        if chars[at].is_whitespace() && chars[at + 1..].starts_with(stem) {
            return true;
        }
    }
    false
}

fn starts_in_the(chars: &[char], at: usize) -> bool {
    let rest = &chars[at..];
    rest.len() >= 7
        && rest[0].is_whitespace()
        && rest[1] == 'i'
        && rest[2] == 'n'
        && rest[3].is_whitespace()
        && rest[4..7] == ['t', 'h', 'e']
}
