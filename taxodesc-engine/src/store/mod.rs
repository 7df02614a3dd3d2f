//! Collaborator interfaces
//!
//! The classifier never talks to a wiki directly. It reads page text,
//! categories and taxonomy template pages through [`DocumentStore`], and the
//! batch layer asks a [`KnowledgeBase`] for an informational description.
//!
//! `Ok(None)` means "not found"; `Err` means the collaborator failed.

mod dump;

pub use dump::{DumpStore, PageRecord};

use crate::error::StoreError;

/// Read access to article markup and metadata
pub trait DocumentStore {
    /// Raw markup of a page, `None` if the page does not exist
    fn text(&self, title: &str) -> Result<Option<String>, StoreError>;

    /// Category names of a page (without the `Category:` prefix)
    fn categories(&self, title: &str) -> Result<Vec<String>, StoreError>;

    /// Markup of a template page such as `Template:Taxonomy/Acleris`
    fn template_page(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Effective short description as rendered, if the store can report it
    fn short_description(&self, _title: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }
}

/// External structured knowledge base
pub trait KnowledgeBase {
    /// Description recorded for the entity linked to `title`
    fn external_description(&self, title: &str) -> Result<Option<String>, StoreError>;
}
