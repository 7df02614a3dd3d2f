//! # Taxodesc Common Library
//!
//! Shared code for the taxodesc workspace:
//! - Error and result types
//! - Task configuration file resolution and loading
//! - Logging initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
