//! End-to-end classification tests
//!
//! Articles are built in memory and classified against a `DumpStore`.

use taxodesc_engine::fusion::{RankResolver, Resolution};
use taxodesc_engine::extractors::RankEvidence;
use taxodesc_engine::lead::{extract_lead, MAX_LEAD_CHARS};
use taxodesc_engine::store::{DocumentStore, DumpStore, PageRecord};
use taxodesc_engine::types::TitleShape;
use taxodesc_engine::{
    classify, Article, ClassificationConfig, ClassificationResult, Classifier, FailureReason,
    Rank, Reliability, SkipReason, StoreError, Vocabulary,
};

const ACLERIS: &str = "{{Taxobox
| name = Acleris
| regnum = [[Animal]]ia
| familia = [[Tortricidae]]
| genus = '''''Acleris'''''
| genus_authority = Hübner, 1825
}}
'''''Acleris''''' is a genus of moths in the family [[Tortricidae]].

== Species ==
* ''[[Acleris comariana]]''
";

const ACLERIS_COMARIANA: &str = "{{Taxobox
| name = Acleris comariana
| regnum = [[Animal]]ia
| familia = [[Tortricidae]]
| genus = ''[[Acleris]]''
| species = '''''A. comariana'''''
| binomial = ''Acleris comariana''
| binomial_authority = ([[Philipp Christoph Zeller|Lienig & Zeller]], 1846)
}}
'''''Acleris comariana''''' is a moth of the family [[Tortricidae]].<ref>{{cite web|title=Tortricidae}}</ref>
";

fn moths() -> ClassificationConfig {
    ClassificationConfig::new(Vocabulary::new("moth", "moths"))
}

fn article(title: &str, text: &str, categories: &[&str]) -> Article {
    Article::new(title, text, categories.iter().map(|c| c.to_string()).collect())
}

fn description(result: &ClassificationResult) -> &str {
    match result {
        ClassificationResult::Success(d) => &d.text,
        other => panic!("expected a description, got {other:?}"),
    }
}

#[test]
fn test_two_word_species_article() {
    let store = DumpStore::new();
    let a = article(
        "Acleris comariana",
        ACLERIS_COMARIANA,
        &["Acleris", "Moths described in 1846"],
    );
    let result = classify(&a, &moths(), &store);

    assert_eq!(description(&result), "Species of moth");
    let d = result.description().unwrap();
    assert_eq!(d.rank, Rank::Species);
    assert_eq!(d.reliability, Reliability::Confident);
}

#[test]
fn test_genus_article() {
    let store = DumpStore::new();
    let a = article("Acleris", ACLERIS, &["Genera"]);
    assert_eq!(description(&classify(&a, &moths(), &store)), "Genus of moths");
}

#[test]
fn test_genus_article_with_second_infobox() {
    let store = DumpStore::new();
    let text = format!("{{{{Infobox insect}}}}\n{{{{Infobox map}}}}\n{ACLERIS}");
    let a = article("Acleris", &text, &["Genera"]);
    assert_eq!(description(&classify(&a, &moths(), &store)), "Genus of moths");
}

#[test]
fn test_extinct_genus_article() {
    let store = DumpStore::new();
    let text = ACLERIS.replace("| genus_authority", "| extinct = yes\n| genus_authority");
    let a = article("Acleris", &text, &["Genera"]);
    let result = classify(&a, &moths(), &store);
    assert_eq!(description(&result), "Extinct genus of moths");
    assert!(result.description().unwrap().extinct);
}

#[test]
fn test_genus_species_tie_on_single_word_title() {
    let store = DumpStore::new();
    let a = article(
        "Foo",
        "{{Speciesbox\n| genus = Foo\n}}\n'''Foo''' is found in Peru.",
        &["Moth genera"],
    );
    assert_eq!(description(&classify(&a, &moths(), &store)), "Genus of moths");

    // Two genus votes against one species vote needs no tie-break
    let resolution = RankResolver::default().resolve(
        &RankEvidence {
            category: Some(Rank::Genus),
            infobox: Some(Rank::Species),
            lead: Some(Rank::Genus),
            taxonomy: None,
        },
        &TitleShape::from_title("Foo"),
        false,
    );
    assert!(matches!(resolution, Resolution::Resolved(r) if r.rank == Rank::Genus));
}

#[test]
fn test_no_evidence_fails() {
    let store = DumpStore::new();
    let a = article("Foo bar", "Foo bar is a thing.", &[]);
    let result = classify(&a, &moths(), &store);
    assert_eq!(
        result,
        ClassificationResult::Failure(FailureReason::NoConsistentRank { candidates: vec![] })
    );
    assert_eq!(result.to_string(), "no consistent rank");
}

#[test]
fn test_existing_description_skipped() {
    let store = DumpStore::new();
    let text = format!("{{{{Short description|Species of moth}}}}\n{ACLERIS_COMARIANA}");
    let a = article("Acleris comariana", &text, &[]);
    let result = classify(&a, &moths(), &store);
    assert!(matches!(result, ClassificationResult::Skipped(SkipReason::AlreadyDescribed(_))));
    if let ClassificationResult::Skipped(reason) = result {
        assert_eq!(reason.to_string(), "already has description");
    }
}

#[test]
fn test_embedded_description_from_store_skipped() {
    let mut store = DumpStore::new();
    store.insert_page(
        "Acleris",
        PageRecord {
            text: ACLERIS.to_string(),
            categories: vec!["Genera".to_string()],
            short_description: Some("Genus of insects".to_string()),
            external_description: None,
        },
    );
    let config = moths();
    let classified = Classifier::new(&store, &config).classify_title("Acleris").unwrap();
    assert!(classified.result.is_skipped());
}

#[test]
fn test_missing_page_skipped() {
    let store = DumpStore::new();
    let config = moths();
    let classified = Classifier::new(&store, &config).classify_title("Nowhere").unwrap();
    assert_eq!(
        classified.result,
        ClassificationResult::Skipped(SkipReason::PageMissing)
    );
}

#[test]
fn test_monotypic_genus() {
    let store = DumpStore::new();
    let a = article(
        "Foo",
        "'''Foo''' is a genus of moths. It contains only one species.",
        &["Monotypic moth genera"],
    );
    let result = classify(&a, &moths(), &store);
    assert_eq!(description(&result), "Single-species genus of moths");
}

#[test]
fn test_taxonomy_template_vote_dropped_on_conflict() {
    let mut store = DumpStore::new();
    store.insert_template("Template:Taxonomy/Tortricini", "| rank = genus\n| parent = Tortricinae");
    let a = article(
        "Tortricini",
        "{{Automatic taxobox\n\
            | taxon = Tortricini\n\
            }}\n\
            '''Tortricini''' is a tribe of moths of the family [[Tortricidae]].",
        &[],
    );
    assert_eq!(description(&classify(&a, &moths(), &store)), "Tribe of moths");
}

#[test]
fn test_taxonomy_template_extinct_flag() {
    let mut store = DumpStore::new();
    store.insert_template("Template:Taxonomy/Foo", "| rank = genus\n| extinct = true");
    let a = article(
        "Foo",
        "{{Automatic taxobox\n| taxon = foo\n}}\n'''Foo''' is a genus of moths.",
        &[],
    );
    assert_eq!(description(&classify(&a, &moths(), &store)), "Extinct genus of moths");
}

#[test]
fn test_unbalanced_lead_fails() {
    let store = DumpStore::new();
    let a = article("Foo", "{{Taxobox | name = Foo\n'''Foo''' is a genus of moths.", &[]);
    assert_eq!(
        classify(&a, &moths(), &store),
        ClassificationResult::Failure(FailureReason::LeadNotExtracted)
    );
}

#[test]
fn test_criteria_failure() {
    let store = DumpStore::new();
    let mut config = moths();
    config.filters.excluded_words = vec!["Tortricidae".to_string()];
    let a = article("Acleris", ACLERIS, &["Genera"]);
    assert_eq!(
        classify(&a, &config, &store),
        ClassificationResult::Failure(FailureReason::ExcludedWordPresent("Tortricidae".to_string()))
    );
}

#[test]
fn test_classification_is_idempotent() {
    let store = DumpStore::new();
    let config = moths();
    let classifier = Classifier::new(&store, &config);
    for (title, text) in [("Acleris", ACLERIS), ("Acleris comariana", ACLERIS_COMARIANA)] {
        let a = article(title, text, &["Genera"]);
        assert_eq!(classifier.classify(&a), classifier.classify(&a));
    }
}

#[test]
fn test_descriptions_never_exceed_limit() {
    let store = DumpStore::new();
    let config = ClassificationConfig::new(Vocabulary::new(
        "flowering plant",
        "flowering plants of the tropics",
    ));
    let cases = [
        ("Acleris", ACLERIS.to_string()),
        ("Acleris", ACLERIS.replace("| genus_authority", "| extinct = yes\n| genus_authority")),
        ("Acleris comariana", ACLERIS_COMARIANA.to_string()),
    ];
    for (title, text) in cases {
        let a = article(title, &text, &["Genera"]);
        match classify(&a, &config, &store) {
            ClassificationResult::Success(d) => assert!(d.text.chars().count() <= 40, "{}", d.text),
            ClassificationResult::Failure(_) | ClassificationResult::Skipped(_) => {}
        }
    }
}

#[test]
fn test_sanitizer_balance() {
    let balanced = [
        "{{a}} text [[b]]",
        "{{a|{{b}}}} [[File:x.jpg|[[c]]]] text",
        "[[a|b]] {{c}}{{d}}",
    ];
    for raw in balanced {
        assert!(extract_lead(raw).is_ok(), "{raw}");
    }

    let unbalanced = ["{{a text", "[[a text", "{{a}} {{b", "text ]]"];
    for raw in unbalanced {
        assert!(extract_lead(raw).is_err(), "{raw}");
    }

    let long = "x".repeat(MAX_LEAD_CHARS * 2);
    assert_eq!(extract_lead(&long).unwrap().as_str().len(), MAX_LEAD_CHARS);
}

struct UnreachableStore;

impl DocumentStore for UnreachableStore {
    fn text(&self, _title: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
    fn categories(&self, _title: &str) -> Result<Vec<String>, StoreError> {
        Ok(vec![])
    }
    fn template_page(&self, _name: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
}

#[test]
fn test_store_failure_propagates() {
    let config = moths();
    let result = Classifier::new(&UnreachableStore, &config).classify_title("Acleris");
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}
