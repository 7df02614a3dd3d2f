//! Run statistics

use chrono::{DateTime, Utc};
use std::fmt;

/// Counters for one batch run
///
/// Targets are eligible articles (successes plus failures); skips are not
/// targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    pub targets: usize,
    pub successes: usize,
    pub failures: usize,
    pub skips: usize,
    /// Successes flagged for review
    pub needs_review: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStatistics {
    pub fn start() -> Self {
        Self {
            targets: 0,
            successes: 0,
            failures: 0,
            skips: 0,
            needs_review: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn success_percent(&self) -> f64 {
        percent(self.successes, self.targets)
    }

    pub fn failure_percent(&self) -> f64 {
        percent(self.failures, self.targets)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TARGETS: {}  SUCCESS: {} ({:.1}%, {} need review)  FAILURE: {} ({:.1}%)  SKIPPED: {}",
            self.targets,
            self.successes,
            self.success_percent(),
            self.needs_review,
            self.failures,
            self.failure_percent(),
            self.skips
        )?;
        if let Some(finished) = self.finished_at {
            let elapsed = finished - self.started_at;
            write!(
                f,
                "  [{} - {}, {}s]",
                self.started_at.format("%Y-%m-%d %H:%M:%S"),
                finished.format("%H:%M:%S"),
                elapsed.num_seconds()
            )?;
        }
        Ok(())
    }
}
