//! Evidence fusion
//!
//! 1. **rank_resolver** - Reconciles the extractors' votes into one rank
//! 2. **description_synthesizer** - Turns a resolved rank into the
//!    short description text

pub mod description_synthesizer;
pub mod rank_resolver;

pub use description_synthesizer::{synthesize_description, MAX_DESCRIPTION_CHARS};
pub use rank_resolver::{multimode, RankResolver, Resolution, ResolutionRule, ResolvedRank};
