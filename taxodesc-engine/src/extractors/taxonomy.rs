//! Rank from the taxonomy template
//!
//! Articles using an automatic taxobox name their taxon (`| taxon = Acleris`)
//! and the rank lives on `Template:Taxonomy/Acleris`. The template page also
//! says whether the taxon is extinct.
//!
//! Store failures here are not fatal: they are logged and treated as no
//! opinion.

use crate::store::DocumentStore;
use crate::types::{compress, Rank};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static TAXON_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\|\s*taxon\s*=\s*([^|}\n]+)").unwrap());
static RANK_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|rank=([^|}]+)").unwrap());
static EXTINCT_FIELD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|extinct=([^|}]+)").unwrap());

/// What the taxonomy template says about an article's taxon
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyLookup {
    /// Template page consulted, if the article names a taxon
    pub template: Option<String>,
    pub rank: Option<Rank>,
    pub extinct: bool,
}

/// Looks up taxonomy templates through a document store
pub struct TaxonomyExtractor<'s> {
    store: &'s dyn DocumentStore,
}

impl<'s> TaxonomyExtractor<'s> {
    pub fn new(store: &'s dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Consult the template for an article's raw and compressed markup
    pub fn lookup(&self, text: &str, compressed: &str) -> TaxonomyLookup {
        if !compressed.contains("{{automatictaxobox") {
            return TaxonomyLookup::default();
        }
        let Some(name) = template_name(text) else {
            debug!("Automatic taxobox without a taxon field");
            return TaxonomyLookup::default();
        };

        match self.store.template_page(&name) {
            Ok(Some(template)) => {
                let mut lookup = parse_template(&template);
                debug!(
                    template = %name,
                    rank = ?lookup.rank,
                    extinct = lookup.extinct,
                    "taxonomy template"
                );
                lookup.template = Some(name);
                lookup
            }
            Ok(None) => {
                debug!(template = %name, "taxonomy template does not exist");
                TaxonomyLookup {
                    template: Some(name),
                    ..Default::default()
                }
            }
            Err(e) => {
                warn!(template = %name, "Failed to fetch taxonomy template: {}", e);
                TaxonomyLookup {
                    template: Some(name),
                    ..Default::default()
                }
            }
        }
    }
}

/// `Template:Taxonomy/<Taxon>` for the taxon named in the automatic taxobox
pub fn template_name(text: &str) -> Option<String> {
    let taxon = TAXON_FIELD.captures(text)?.get(1)?.as_str().trim();
    let mut chars = taxon.chars();
    let first = chars.next()?;
    let name: String = first
        .to_uppercase()
        .chain(chars.flat_map(char::to_lowercase))
        .collect();
    Some(format!("Template:Taxonomy/{name}"))
}

/// Rank and extinction flag from taxonomy template markup
pub fn parse_template(template: &str) -> TaxonomyLookup {
    let compressed = compress(template);
    let rank = RANK_FIELD
        .captures(&compressed)
        .and_then(|caps| Rank::from_field_name(&caps[1]));
    let extinct = EXTINCT_FIELD
        .captures(&compressed)
        .is_some_and(|caps| caps[1].contains("yes") || caps[1].contains("true"));
    TaxonomyLookup {
        template: None,
        rank,
        extinct,
    }
}
