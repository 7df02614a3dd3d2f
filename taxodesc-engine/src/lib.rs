//! taxodesc-engine library interface
//!
//! Classifies encyclopedia articles about organisms by taxonomic rank and
//! produces short descriptions such as "Genus of moths".

pub mod config;
pub mod error;
pub mod extractors; // Rank evidence sources
pub mod fusion; // Rank reconciliation and description text
pub mod lead;
pub mod store; // Document store and knowledge base interfaces
pub mod types;
pub mod validators;
pub mod workflow;

pub use crate::config::{ClassificationConfig, FilterConfig, TaskConfig, TieBreakPolicy};
pub use crate::error::{EngineError, EngineResult, StoreError};
pub use crate::types::{
    Article, ClassificationResult, Description, FailureReason, Rank, Reliability, SkipReason,
    Vocabulary,
};
pub use crate::workflow::{classify, Classifier};
