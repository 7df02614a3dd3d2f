//! Batch run and staging file tests

use taxodesc_engine::config::StagingConfig;
use taxodesc_engine::store::{DumpStore, KnowledgeBase, PageRecord};
use taxodesc_engine::workflow::{
    read_failures, read_staging, write_staging, BatchRunner, StagedOutcome,
};
use taxodesc_engine::{ClassificationConfig, Reliability, StoreError, Vocabulary};
use tempfile::TempDir;

fn page(text: &str, categories: &[&str]) -> PageRecord {
    PageRecord {
        text: text.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        short_description: None,
        external_description: None,
    }
}

/// Four pages: two describable, one without evidence, one already described
fn dump() -> DumpStore {
    let mut store = DumpStore::new();
    let mut acleris = page(
        "'''Acleris''' is a genus of moths of the family Tortricidae.",
        &["Moth genera"],
    );
    acleris.external_description = Some("genus of insects".to_string());
    store.insert_page("Acleris", acleris);
    store.insert_page(
        "Acleris comariana",
        page("'''Acleris comariana''' is a moth of the family Tortricidae.", &[]),
    );
    store.insert_page("Bar baz", page("Bar baz is a thing.", &[]));
    store.insert_page(
        "Cydia",
        page("{{Short description|Genus of moths}}\n'''Cydia''' is a genus of moths.", &[]),
    );
    store
}

fn moths() -> ClassificationConfig {
    ClassificationConfig::new(Vocabulary::new("moth", "moths"))
}

#[test]
fn test_run_over_dump() {
    let store = dump();
    let config = moths();
    let limits = StagingConfig::default();
    let report = BatchRunner::new(&store, &store, &config, &limits)
        .run(store.titles())
        .unwrap();

    assert_eq!(report.stats.targets, 3);
    assert_eq!(report.stats.successes, 2);
    assert_eq!(report.stats.failures, 1);
    assert_eq!(report.stats.skips, 1);
    assert!(report.stats.finished_at.is_some());

    let first = &report.successes[0];
    assert_eq!(first.sequence, 1);
    assert_eq!(first.title, "Acleris");
    assert_eq!(first.external_description, "genus of insects");
    assert_eq!(
        first.outcome,
        StagedOutcome::Description {
            text: "Genus of moths".to_string(),
            reliability: Reliability::Confident,
        }
    );
    assert_eq!(
        first.lead.as_deref(),
        Some("Acleris is a genus of moths of the family Tortricidae.")
    );

    let failure = &report.failures[0];
    assert_eq!(failure.sequence, 3);
    assert_eq!(failure.title, "Bar baz");
    assert_eq!(failure.outcome, StagedOutcome::Failure("no consistent rank".to_string()));
}

#[test]
fn test_limits_and_window() {
    let store = dump();
    let config = moths();

    let limits = StagingConfig {
        max_staged: 1,
        ..StagingConfig::default()
    };
    let report = BatchRunner::new(&store, &store, &config, &limits)
        .run(store.titles())
        .unwrap();
    assert_eq!(report.stats.successes, 1);
    assert_eq!(report.stats.targets, 1);

    let limits = StagingConfig {
        start_at: Some("comariana".to_string()),
        stop_at: Some("Bar".to_string()),
        ..StagingConfig::default()
    };
    let report = BatchRunner::new(&store, &store, &config, &limits)
        .run(store.titles())
        .unwrap();
    assert_eq!(report.stats.targets, 2);
    assert_eq!(report.successes[0].title, "Acleris comariana");
    assert_eq!(report.successes[0].sequence, 1);
    assert_eq!(report.stats.skips, 0);
}

struct DownKnowledgeBase;

impl KnowledgeBase for DownKnowledgeBase {
    fn external_description(&self, _title: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("503".to_string()))
    }
}

#[test]
fn test_knowledge_base_failure_is_not_fatal() {
    let store = dump();
    let config = moths();
    let limits = StagingConfig::default();
    let report = BatchRunner::new(&store, &DownKnowledgeBase, &config, &limits)
        .run(["Acleris"])
        .unwrap();
    assert_eq!(report.successes.len(), 1);
    assert_eq!(report.successes[0].external_description, "");
}

#[test]
fn test_staging_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = dump();
    let config = moths();
    let limits = StagingConfig {
        success_file: dir.path().join("staged.tsv"),
        failure_file: dir.path().join("failures.tsv"),
        ..StagingConfig::default()
    };
    let report = BatchRunner::new(&store, &store, &config, &limits)
        .run(store.titles())
        .unwrap();

    write_staging(&limits.success_file, &report.successes).unwrap();
    write_staging(&limits.failure_file, &report.failures).unwrap();

    let content = std::fs::read_to_string(&limits.success_file).unwrap();
    assert!(content.starts_with("1\tAcleris\tGenus of moths\tgenus of insects\t"));

    // Wiki table markup pasted around the records is ignored
    let wrapped = format!("{{| class=\"wikitable\"\n|-\n{content}\n|}}\n");
    std::fs::write(&limits.success_file, wrapped).unwrap();
    let records = read_staging(&limits.success_file).unwrap();
    assert_eq!(records, report.successes);

    let failures = read_failures(&limits.failure_file).unwrap();
    assert_eq!(failures, report.failures);
    assert!(failures
        .iter()
        .all(|r| matches!(r.outcome, StagedOutcome::Failure(_))));
}
