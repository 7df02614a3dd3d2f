//! Lead and title criteria
//!
//! Word checks are case-sensitive substring tests against the sanitized
//! lead; patterns use the compiled expressions from [`FilterConfig`].

use crate::config::FilterConfig;
use crate::lead::LeadText;
use crate::types::FailureReason;

/// Check the task criteria, reporting the first one that fails
pub fn check_criteria(
    lead: &LeadText,
    title: &str,
    filters: &FilterConfig,
) -> Result<(), FailureReason> {
    let lead = lead.as_str();

    if let Some(word) = filters.required_words.iter().find(|w| !lead.contains(w.as_str())) {
        return Err(FailureReason::RequiredWordMissing(word.clone()));
    }
    if let Some(word) = filters.excluded_words.iter().find(|w| lead.contains(w.as_str())) {
        return Err(FailureReason::ExcludedWordPresent(word.clone()));
    }
    if !filters.any_words.is_empty()
        && !filters.any_words.iter().any(|w| lead.contains(w.as_str()))
    {
        return Err(FailureReason::NoAnyWordPresent);
    }
    if let Some(pattern) = &filters.lead_pattern {
        if !pattern.is_match(lead) {
            return Err(FailureReason::LeadPatternMismatch);
        }
    }
    if let Some(pattern) = &filters.title_pattern {
        if !pattern.is_match(title) {
            return Err(FailureReason::TitlePatternMismatch);
        }
    }
    Ok(())
}
