//! Error types for taxodesc-engine
//!
//! Classification outcomes (skips, criteria failures, unresolved ranks) are
//! values, not errors. The types here cover collaborator and I/O failures only.

use thiserror::Error;

/// Failure talking to a Document Store or Knowledge Base
///
/// Distinct from "not found", which collaborators report as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Collaborator could not be reached or refused the request
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    /// IO error while reading a local store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store content could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Engine-level error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// Collaborator failure propagated out of classification
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid task configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed staging data
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// taxodesc-common error
    #[error("Common error: {0}")]
    Common(#[from] taxodesc_common::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
