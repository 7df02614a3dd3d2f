//! JSON page dump store
//!
//! Offline [`DocumentStore`] and [`KnowledgeBase`] backed by a JSON file:
//!
//! ```json
//! {
//!   "pages": {
//!     "Acleris": { "text": "...", "categories": ["Tortricidae genera"] }
//!   },
//!   "templates": { "Template:Taxonomy/Acleris": "..." }
//! }
//! ```

use super::{DocumentStore, KnowledgeBase};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// One page in a dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRecord {
    pub text: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Effective short description, manual or embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Knowledge-base description for the linked entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_description: Option<String>,
}

/// In-memory page dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpStore {
    #[serde(default)]
    pages: BTreeMap<String, PageRecord>,
    #[serde(default)]
    templates: BTreeMap<String, String>,
}

impl DumpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dump from a JSON file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        let store: DumpStore = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StoreError::Parse(format!("{}: {}", path.display(), e)))?;
        info!(
            "Loaded page dump {} ({} pages, {} templates)",
            path.display(),
            store.pages.len(),
            store.templates.len()
        );
        Ok(store)
    }

    pub fn insert_page(&mut self, title: impl Into<String>, page: PageRecord) {
        self.pages.insert(title.into(), page);
    }

    pub fn insert_template(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(name.into(), text.into());
    }

    /// Page titles in sorted order
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl DocumentStore for DumpStore {
    fn text(&self, title: &str) -> Result<Option<String>, StoreError> {
        Ok(self.pages.get(title).map(|p| p.text.clone()))
    }

    fn categories(&self, title: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .pages
            .get(title)
            .map(|p| p.categories.clone())
            .unwrap_or_default())
    }

    fn template_page(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.templates.get(name).cloned())
    }

    fn short_description(&self, title: &str) -> Result<Option<String>, StoreError> {
        Ok(self.pages.get(title).and_then(|p| p.short_description.clone()))
    }
}

impl KnowledgeBase for DumpStore {
    fn external_description(&self, title: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .pages
            .get(title)
            .and_then(|p| p.external_description.clone()))
    }
}
