//! Batch runs
//!
//! Classifies titles in order and collects staging records:
//! - titles before `start_at` are ignored
//! - skipped articles are counted but not recorded or numbered
//! - the run stops at `max_articles` targets, `max_staged` successes, or
//!   after the `stop_at` title
//!
//! A document-store failure aborts the run. Knowledge-base failures only
//! lose the informational external description.

use super::classifier::Classifier;
use super::staging::{StagedOutcome, StagingRecord};
use super::statistics::RunStatistics;
use crate::config::{ClassificationConfig, StagingConfig};
use crate::error::EngineResult;
use crate::store::{DocumentStore, KnowledgeBase};
use crate::types::ClassificationResult;
use tracing::{info, warn};

/// Records and counters from one run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub successes: Vec<StagingRecord>,
    pub failures: Vec<StagingRecord>,
    pub stats: RunStatistics,
}

pub struct BatchRunner<'a> {
    classifier: Classifier<'a>,
    knowledge: &'a dyn KnowledgeBase,
    limits: &'a StagingConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        knowledge: &'a dyn KnowledgeBase,
        config: &'a ClassificationConfig,
        limits: &'a StagingConfig,
    ) -> Self {
        Self {
            classifier: Classifier::new(store, config),
            knowledge,
            limits,
        }
    }

    pub fn run<I, S>(&self, titles: I) -> EngineResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let limits = self.limits;
        let mut stats = RunStatistics::start();
        let mut successes = Vec::new();
        let mut failures = Vec::new();
        let mut started = limits.start_at.is_none();

        for title in titles {
            let title = title.as_ref();
            if !started {
                match &limits.start_at {
                    Some(start) if title.contains(start.as_str()) => started = true,
                    _ => continue,
                }
            }

            let classified = self.classifier.classify_title(title)?;
            match classified.result {
                ClassificationResult::Skipped(_) => stats.skips += 1,
                result => {
                    stats.targets += 1;
                    let outcome = match result {
                        ClassificationResult::Success(description) => {
                            stats.successes += 1;
                            if description.needs_review() {
                                stats.needs_review += 1;
                            }
                            info!("{} {}: {}", stats.targets, title, description);
                            StagedOutcome::Description {
                                text: description.text,
                                reliability: description.reliability,
                            }
                        }
                        other => {
                            stats.failures += 1;
                            info!("{} {}: FAILED - {}", stats.targets, title, other);
                            StagedOutcome::Failure(other.to_string())
                        }
                    };

                    let record = StagingRecord {
                        sequence: stats.targets,
                        title: title.to_string(),
                        external_description: self.external_description(title),
                        lead: classified.lead.map(|lead| lead.into_string()),
                        outcome,
                    };
                    if matches!(record.outcome, StagedOutcome::Description { .. }) {
                        successes.push(record);
                    } else {
                        failures.push(record);
                    }
                }
            }

            if limits.max_articles > 0 && stats.targets >= limits.max_articles {
                info!("Reached maximum of {} articles", limits.max_articles);
                break;
            }
            if limits.max_staged > 0 && stats.successes >= limits.max_staged {
                info!("Reached maximum of {} staged descriptions", limits.max_staged);
                break;
            }
            if limits
                .stop_at
                .as_deref()
                .is_some_and(|stop| title.contains(stop))
            {
                info!("Stopping after '{}'", title);
                break;
            }
        }

        stats.finish();
        info!("{}", stats);
        Ok(BatchReport {
            successes,
            failures,
            stats,
        })
    }

    fn external_description(&self, title: &str) -> String {
        match self.knowledge.external_description(title) {
            Ok(description) => description.unwrap_or_default(),
            Err(e) => {
                warn!(title, "Knowledge base lookup failed: {}", e);
                String::new()
            }
        }
    }
}
