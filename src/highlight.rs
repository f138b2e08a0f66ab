use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: r#"<span class="highlight">"#.to_owned(),
            close: "</span>".to_owned(),
        }
    }
}

/// Literal, case-sensitive matcher over several terms. Longer terms win when
/// several start at the same position. Very large term sets can exceed the
/// regex size limit, which is reported instead of matching nothing.
pub fn build_highlight_regex(terms: &[String]) -> Result<Option<Regex>, regex::Error> {
    let unique = unique_terms(terms);
    if unique.is_empty() {
        return Ok(None);
    }
    let pattern = unique
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).map(Some)
}

/// Non-empty terms in first-seen order, then longest first.
fn unique_terms(terms: &[String]) -> Vec<&str> {
    let mut unique = Vec::new();
    let mut seen = HashSet::new();
    for term in terms {
        if !term.is_empty() && seen.insert(term.as_str()) {
            unique.push(term.as_str());
        }
    }
    unique.sort_by(|a, b| b.len().cmp(&a.len()));
    unique
}

#[derive(Debug, Clone)]
enum Matcher {
    Nothing,
    Literal(String),
    Terms(Regex),
}

#[derive(Debug, Clone)]
pub struct Highlighter {
    matcher: Matcher,
    marker: HighlightMarker,
}

impl Highlighter {
    /// A single search term is matched with plain substring search, so any
    /// length is accepted.
    pub fn new(search: &str, marker: HighlightMarker) -> Self {
        let matcher = if search.is_empty() {
            Matcher::Nothing
        } else {
            Matcher::Literal(search.to_owned())
        };
        Self { matcher, marker }
    }

    pub fn for_terms(terms: &[String], marker: HighlightMarker) -> Result<Self, regex::Error> {
        let matcher = match unique_terms(terms).as_slice() {
            [] => Matcher::Nothing,
            [only] => Matcher::Literal((*only).to_owned()),
            _ => match build_highlight_regex(terms)? {
                Some(regex) => Matcher::Terms(regex),
                None => Matcher::Nothing,
            },
        };
        Ok(Self { matcher, marker })
    }

    pub fn keywords<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let spans = self.spans(text);
        if spans.is_empty() {
            return Cow::Borrowed(text);
        }
        let extra = spans.len() * (self.marker.open.len() + self.marker.close.len());
        let mut out = String::with_capacity(text.len() + extra);
        let mut last = 0;
        for span in spans {
            out.push_str(&text[last..span.start]);
            out.push_str(&self.marker.open);
            out.push_str(&text[span.clone()]);
            out.push_str(&self.marker.close);
            last = span.end;
        }
        out.push_str(&text[last..]);
        Cow::Owned(out)
    }

    /// Byte ranges of every non-overlapping match, left to right.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Nothing => Vec::new(),
            Matcher::Literal(term) => text
                .match_indices(term.as_str())
                .map(|(start, found)| start..start + found.len())
                .collect(),
            Matcher::Terms(regex) => regex.find_iter(text).map(|m| m.range()).collect(),
        }
    }
}

/// Wraps every occurrence of `search` in `text` with the default marker.
pub fn keywords(text: &str, search: &str) -> String {
    Highlighter::new(search, HighlightMarker::default())
        .keywords(text)
        .into_owned()
}

pub fn highlight_spans(text: &str, search: &str) -> Vec<Range<usize>> {
    Highlighter::new(search, HighlightMarker::default()).spans(text)
}
