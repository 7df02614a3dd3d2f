//! Lead sanitizer
//!
//! Turns the opening markup of an article into plain prose:
//! - templates (`{{...}}`) and media links (`[[File:...]]`) are removed
//! - piped links keep their display text
//! - references, comments and HTML tags are stripped
//! - bold/italic markup, entities and whitespace runs are normalized
//!
//! Unbalanced `{{`/`}}` or `[[`/`]]` pairs make the lead unextractable.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Longest lead kept, in characters
pub const MAX_LEAD_CHARS: usize = 150;

/// Stands in for masked spans until cleanup; never present in real markup
const MASK: char = '\u{1A}';

static PIPED_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[([^\[\]|]*)\|").unwrap());
static SELF_CLOSING_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<ref[^<>]{0,40}/\s{0,3}>").unwrap());
static REF_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ref(?:\s[^<>]*)?>.*?</ref\s*>").unwrap());
static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static MAGIC_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"__[A-Z]+__").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lead could not be reduced to prose
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    #[error("lead could not be extracted: unbalanced template braces at offset {0}")]
    UnbalancedTemplate(usize),

    #[error("lead could not be extracted: unbalanced link brackets at offset {0}")]
    UnbalancedLink(usize),
}

/// Sanitized opening prose of an article, at most [`MAX_LEAD_CHARS`] long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadText(String);

impl LeadText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for LeadText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Markup before the first section heading
pub fn opening_section(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("==") {
            return &text[..offset];
        }
        offset += line.len();
    }
    text
}

/// Sanitize raw lead markup
pub fn extract_lead(raw: &str) -> Result<LeadText, LeadError> {
    let mut chars: Vec<char> = raw.chars().collect();

    for (start, end) in balanced_spans(&chars, '{', '}').map_err(LeadError::UnbalancedTemplate)? {
        mask(&mut chars, start, end);
    }

    // Spans close innermost first, so a caption link inside a media link is
    // seen before the media link that swallows it.
    for (start, end) in balanced_spans(&chars, '[', ']').map_err(LeadError::UnbalancedLink)? {
        if is_media_link(&chars[start + 2..end - 2]) {
            mask(&mut chars, start, end);
        }
    }

    let text: String = chars.into_iter().collect();
    let text = PIPED_LINK.replace_all(&text, "[[");
    let text = strip_markup_tags(&text);
    let text = normalize(&text);

    let lead: String = text.chars().take(MAX_LEAD_CHARS).collect();
    Ok(LeadText(lead.trim().to_string()))
}

/// Spans `[start, end)` of matched double-delimiter pairs, in closing order
///
/// Returns the character offset of the first unmatched delimiter on failure.
fn balanced_spans(chars: &[char], open: char, close: char) -> Result<Vec<(usize, usize)>, usize> {
    let mut stack = Vec::new();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let pair = chars.get(i + 1) == Some(&chars[i]);
        if chars[i] == open && pair {
            stack.push(i);
            i += 2;
        } else if chars[i] == close && pair {
            let start = stack.pop().ok_or(i)?;
            spans.push((start, i + 2));
            i += 2;
        } else {
            i += 1;
        }
    }

    match stack.pop() {
        Some(unclosed) => Err(unclosed),
        None => Ok(spans),
    }
}

fn mask(chars: &mut [char], start: usize, end: usize) {
    chars[start..end].iter_mut().for_each(|c| *c = MASK);
}

fn is_media_link(inner: &[char]) -> bool {
    let head: String = inner
        .iter()
        .skip_while(|c| c.is_whitespace())
        .take(6)
        .flat_map(|c| c.to_lowercase())
        .collect();
    head.starts_with("file:") || head.starts_with("image:")
}

fn strip_markup_tags(text: &str) -> String {
    let text = HTML_COMMENT.replace_all(text, "");
    let text = SELF_CLOSING_REF.replace_all(&text, "");
    let text = REF_SPAN.replace_all(&text, "");
    HTML_TAG.replace_all(&text, "").into_owned()
}

fn normalize(text: &str) -> String {
    let mut text: String = text
        .chars()
        .filter(|c| !matches!(*c, MASK | '[' | ']' | '{' | '}'))
        .collect();
    text = text.replace("'''", "").replace("''", "");
    text = MAGIC_WORD.replace_all(&text, "").into_owned();
    text = text
        .replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(raw: &str) -> String {
        extract_lead(raw).unwrap().into_string()
    }

    #[test]
    fn test_templates_removed() {
        assert_eq!(
            lead("{{Taxobox\n| name = {{nested}}\n}}\n'''Acleris''' is a genus."),
            "Acleris is a genus."
        );
    }

    #[test]
    fn test_piped_link_keeps_display_text() {
        assert_eq!(
            lead("It is a moth of the family [[Tortricidae|tortricid moths]]."),
            "It is a moth of the family tortricid moths."
        );
    }

    #[test]
    fn test_media_link_removed_with_caption() {
        assert_eq!(
            lead("[[File:Moth.jpg|thumb|A [[moth]] at rest]]'''X''' is a moth."),
            "X is a moth."
        );
        assert_eq!(lead("[[ image:a.png]]Y is a moth."), "Y is a moth.");
    }

    #[test]
    fn test_references_and_comments_removed() {
        assert_eq!(
            lead("Z is a moth.<ref name=\"a\"/> Found<ref>Smith, 1990</ref> here.<!-- todo -->"),
            "Z is a moth. Found here."
        );
    }

    #[test]
    fn test_tags_removed_contents_kept() {
        assert_eq!(lead("A <small>small</small> moth"), "A small moth");
    }

    #[test]
    fn test_entities_and_magic_words() {
        assert_eq!(
            lead("__NOTOC__A&nbsp;moth &ndash; 1990&mdash;now"),
            "A moth \u{2013} 1990\u{2014}now"
        );
    }

    #[test]
    fn test_unbalanced_templates_fail() {
        assert_eq!(
            extract_lead("{{Taxobox | name = X"),
            Err(LeadError::UnbalancedTemplate(0))
        );
        assert!(matches!(
            extract_lead("text }} more"),
            Err(LeadError::UnbalancedTemplate(5))
        ));
    }

    #[test]
    fn test_unbalanced_link_fails() {
        assert!(matches!(
            extract_lead("A [[moth of the family"),
            Err(LeadError::UnbalancedLink(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = LeadError::UnbalancedLink(3);
        assert!(err.to_string().starts_with("lead could not be extracted"));
    }

    #[test]
    fn test_truncated_to_limit() {
        let raw = "word ".repeat(100);
        let out = lead(&raw);
        assert!(out.chars().count() <= MAX_LEAD_CHARS);
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn test_opening_section_stops_at_heading() {
        let text = "Intro line\nmore\n== Description ==\nbody";
        assert_eq!(opening_section(text), "Intro line\nmore\n");
        assert_eq!(opening_section("no headings"), "no headings");
    }
}
