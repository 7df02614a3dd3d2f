//! Classification workflow
//!
//! - **classifier** - Runs one article through filters, extractors, the
//!   rank resolver and the description synthesizer
//! - **batch** - Runs a title list with limits and collects staging records
//! - **staging** - Tab-separated staging file format
//! - **statistics** - Run counters and summary

pub mod batch;
pub mod classifier;
pub mod staging;
pub mod statistics;

pub use batch::{BatchReport, BatchRunner};
pub use classifier::{classify, Classified, Classifier};
pub use staging::{read_failures, read_staging, write_staging, StagedOutcome, StagingRecord};
pub use statistics::RunStatistics;
