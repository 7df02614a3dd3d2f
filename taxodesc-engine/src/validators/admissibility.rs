//! Admissibility pre-filters
//!
//! Checks run in a fixed order and the first one that applies decides the
//! skip reason:
//! 1. Page exists
//! 2. Title is not a list ("List of ...")
//! 3. No existing description, unless the task overrides that kind
//! 4. Not a redirect
//! 5. Infobox present, when required
//! 6. At most one infobox, when an infobox is required and sole infobox is
//!    enforced

use crate::config::FilterConfig;
use crate::types::{Article, DescriptionOrigin, SkipReason};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TEMPLATE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*([^|{}\n]+)").unwrap());

/// Reason to skip `article`, or `None` if it is eligible
pub fn check_admissible(article: &Article, filters: &FilterConfig) -> Option<SkipReason> {
    let reason = skip_reason(article, filters);
    if let Some(reason) = &reason {
        debug!(title = %article.title, "Skipping: {}", reason);
    }
    reason
}

fn skip_reason(article: &Article, filters: &FilterConfig) -> Option<SkipReason> {
    if !article.exists {
        return Some(SkipReason::PageMissing);
    }
    if article.title.to_lowercase().contains("list of") {
        return Some(SkipReason::ListArticle);
    }

    if let Some(existing) = &article.existing_description {
        let may_override = match existing.origin {
            DescriptionOrigin::Manual => filters.override_manual,
            DescriptionOrigin::Embedded => filters.override_embedded,
        };
        if !may_override {
            return Some(SkipReason::AlreadyDescribed(existing.origin));
        }
        if let Some(pattern) = &filters.existing_description_pattern {
            if !pattern.is_match(&existing.text) {
                return Some(SkipReason::ExistingDescriptionMismatch);
            }
        }
    }

    if article.text.to_lowercase().contains("#redirect") {
        return Some(SkipReason::Redirect);
    }

    if !filters.require_infobox {
        return None;
    }
    let infoboxes = count_infoboxes(&article.text, &filters.infobox_markers);
    if infoboxes == 0 {
        return Some(SkipReason::MissingInfobox);
    }
    if filters.sole_infobox && infoboxes > 1 {
        return Some(SkipReason::MultipleInfoboxes);
    }
    None
}

/// Number of template invocations whose name contains one of `markers`
pub fn count_infoboxes(text: &str, markers: &[String]) -> usize {
    let markers: Vec<String> = markers.iter().map(|m| m.to_lowercase()).collect();
    TEMPLATE_NAME
        .captures_iter(text)
        .filter(|caps| {
            let name = caps[1].to_lowercase();
            markers.iter().any(|m| name.contains(m.as_str()))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExistingDescription;

    fn article(title: &str, text: &str) -> Article {
        Article::new(title, text, vec![])
    }

    #[test]
    fn test_missing_page() {
        let filters = FilterConfig::default();
        assert_eq!(
            check_admissible(&Article::missing("Nowhere"), &filters),
            Some(SkipReason::PageMissing)
        );
    }

    #[test]
    fn test_list_article() {
        let filters = FilterConfig::default();
        assert_eq!(
            check_admissible(&article("List of Acleris species", "x"), &filters),
            Some(SkipReason::ListArticle)
        );
    }

    #[test]
    fn test_existing_description_respected_unless_overridden() {
        let text = "{{Short description|Genus of insects}}\nAcleris is a genus.";
        let mut filters = FilterConfig::default();
        assert_eq!(
            check_admissible(&article("Acleris", text), &filters),
            Some(SkipReason::AlreadyDescribed(DescriptionOrigin::Manual))
        );

        filters.override_manual = true;
        assert_eq!(check_admissible(&article("Acleris", text), &filters), None);

        filters.existing_description_pattern = Some(Regex::new("^Genus of moths$").unwrap());
        assert_eq!(
            check_admissible(&article("Acleris", text), &filters),
            Some(SkipReason::ExistingDescriptionMismatch)
        );
    }

    #[test]
    fn test_embedded_override_is_separate() {
        let mut filters = FilterConfig::default();
        filters.override_manual = true;
        let a = article("Acleris", "Acleris is a genus.").with_existing_description(Some(
            ExistingDescription {
                text: "Genus of insects".to_string(),
                origin: DescriptionOrigin::Embedded,
            },
        ));
        assert_eq!(
            check_admissible(&a, &filters),
            Some(SkipReason::AlreadyDescribed(DescriptionOrigin::Embedded))
        );
    }

    #[test]
    fn test_redirect() {
        let filters = FilterConfig::default();
        assert_eq!(
            check_admissible(&article("Acleris", "#REDIRECT [[Tortricidae]]"), &filters),
            Some(SkipReason::Redirect)
        );
    }

    #[test]
    fn test_infobox_requirements() {
        let mut filters = FilterConfig::default();
        filters.require_infobox = true;
        assert_eq!(
            check_admissible(&article("A", "A is a genus."), &filters),
            Some(SkipReason::MissingInfobox)
        );

        let two = "{{Infobox insect}}\n{{ Infobox person | name = x }}\nA is a genus.";
        assert_eq!(
            check_admissible(&article("A", two), &filters),
            Some(SkipReason::MultipleInfoboxes)
        );

        filters.sole_infobox = false;
        assert_eq!(check_admissible(&article("A", two), &filters), None);
    }

    #[test]
    fn test_several_infoboxes_allowed_when_not_required() {
        let filters = FilterConfig::default();
        let two = "{{Infobox insect}}\n{{Infobox map}}\n'''Acleris''' is a genus of moths.";
        assert_eq!(check_admissible(&article("Acleris", two), &filters), None);
    }

    #[test]
    fn test_count_infoboxes_uses_markers() {
        let markers = vec!["taxobox".to_string()];
        let text = "{{Taxobox | name = A}} {{Automatic taxobox}} {{cite web}}";
        assert_eq!(count_infoboxes(text, &markers), 2);
    }
}
