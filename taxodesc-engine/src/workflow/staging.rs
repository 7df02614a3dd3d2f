//! Staging files
//!
//! One record per line, tab separated:
//!
//! ```text
//! <sequence>\t<title>\t<description or failure reason>\t<external description>\t<lead>
//! ```
//!
//! - a description needing review is written with a leading `*`
//! - a missing lead is written as `[None]`
//! - table markup lines (`{|`, `|}`, `|-`, `|+`, `!`) and blank lines are
//!   ignored when reading, so a staging file can be pasted into a wiki table

use crate::error::{EngineError, EngineResult};
use crate::types::Reliability;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

const NO_LEAD: &str = "[None]";
const REVIEW_MARK: char = '*';
const TABLE_MARKUP: &[&str] = &["{|", "|}", "|-", "|+", "!"];

/// Third column of a staging record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedOutcome {
    Description { text: String, reliability: Reliability },
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRecord {
    /// Position among eligible articles, starting at 1
    pub sequence: usize,
    pub title: String,
    pub outcome: StagedOutcome,
    /// Knowledge-base description, empty if none
    pub external_description: String,
    pub lead: Option<String>,
}

/// Tabs and newlines would break the line format
fn field(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

impl StagingRecord {
    pub fn to_line(&self) -> String {
        let outcome = match &self.outcome {
            StagedOutcome::Description {
                text,
                reliability: Reliability::NeedsReview,
            } => format!("{REVIEW_MARK}{text}"),
            StagedOutcome::Description { text, .. } => text.clone(),
            StagedOutcome::Failure(reason) => reason.clone(),
        };
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.sequence,
            field(&self.title),
            field(&outcome),
            field(&self.external_description),
            self.lead.as_deref().map(field).unwrap_or_else(|| NO_LEAD.to_string())
        )
    }

    /// Parse a success-file line; `None` for lines that hold no record
    pub fn parse_line(line: &str) -> Option<EngineResult<StagingRecord>> {
        record_fields(line).map(|line| parse_fields(line, description_outcome))
    }

    /// Parse a failure-file line; `None` for lines that hold no record
    pub fn parse_failure_line(line: &str) -> Option<EngineResult<StagingRecord>> {
        record_fields(line).map(|line| parse_fields(line, failure_outcome))
    }
}

/// Line without its terminator, unless it is blank or table markup
fn record_fields(line: &str) -> Option<&str> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() || TABLE_MARKUP.iter().any(|m| trimmed.starts_with(m)) {
        return None;
    }
    Some(trimmed)
}

fn description_outcome(column: &str) -> StagedOutcome {
    match column.strip_prefix(REVIEW_MARK) {
        Some(text) => StagedOutcome::Description {
            text: text.to_string(),
            reliability: Reliability::NeedsReview,
        },
        None => StagedOutcome::Description {
            text: column.to_string(),
            reliability: Reliability::Confident,
        },
    }
}

fn failure_outcome(column: &str) -> StagedOutcome {
    StagedOutcome::Failure(column.to_string())
}

fn parse_fields(line: &str, outcome: fn(&str) -> StagedOutcome) -> EngineResult<StagingRecord> {
    let mut fields = line.split('\t');
    let (Some(sequence), Some(title), Some(column)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(EngineError::Parse(format!("expected at least 3 fields: {line}")));
    };
    let sequence = sequence
        .trim()
        .parse::<usize>()
        .map_err(|e| EngineError::Parse(format!("bad sequence number '{sequence}': {e}")))?;

    let external_description = fields.next().unwrap_or_default().to_string();
    let lead = fields
        .next()
        .filter(|lead| *lead != NO_LEAD)
        .map(str::to_string);

    Ok(StagingRecord {
        sequence,
        title: title.to_string(),
        outcome: outcome(column),
        external_description,
        lead,
    })
}

/// Write records to `path`, replacing its contents
pub fn write_staging(path: &Path, records: &[StagingRecord]) -> EngineResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(writer, "{}", record.to_line())?;
    }
    writer.flush()?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read a success staging file
pub fn read_staging(path: &Path) -> EngineResult<Vec<StagingRecord>> {
    read_records(path, StagingRecord::parse_line)
}

/// Read a failure staging file
pub fn read_failures(path: &Path) -> EngineResult<Vec<StagingRecord>> {
    read_records(path, StagingRecord::parse_failure_line)
}

fn read_records(
    path: &Path,
    parse: fn(&str) -> Option<EngineResult<StagingRecord>>,
) -> EngineResult<Vec<StagingRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = parse(&line) {
            let record =
                record.map_err(|e| EngineError::Parse(format!("line {}: {}", number + 1, e)))?;
            records.push(record);
        }
    }
    Ok(records)
}
