//! Post summaries.
//!
//! A post's summary is its precomputed `summary` custom field when one
//! exists. Otherwise it is cut from the body: markup removed, line breaks
//! dropped, truncated to a character budget.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::types::{PostRecord, SUMMARY_FIELD};

/// Marker the markdown editor prepends to stored bodies.
pub const MARKDOWN_MARKER: &str = "<!--markdown-->";

lazy_static! {
    // Comments first, so a `>` inside a comment doesn't end the match early.
    // A `<` followed by whitespace is text, not a tag.
    static ref MARKUP_PATTERN: Regex = Regex::new(r"(?s)<!--.*?-->|<[^\s>][^>]*>").unwrap();
}

/// Where a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// The `summary` custom field, used verbatim
    Precomputed,
    /// Cut from the post body
    Excerpt,
}

/// Picks or derives the summary for a post.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryResolver;

impl SummaryResolver {
    pub fn new() -> Self {
        Self
    }

    /// Summary text for `record`. A precomputed summary is trusted as-is
    /// and never truncated; excerpts hold at most `max_length` characters.
    pub fn resolve(&self, record: &PostRecord, max_length: usize) -> String {
        self.resolve_with_source(record, max_length).0
    }

    pub fn resolve_with_source(
        &self,
        record: &PostRecord,
        max_length: usize,
    ) -> (String, SummarySource) {
        if let Some(summary) = record.field(SUMMARY_FIELD) {
            debug!(post_id = %record.id, "Using precomputed summary");
            return (summary.to_string(), SummarySource::Precomputed);
        }

        let excerpt = plain_text_excerpt(&record.raw_body, max_length);
        debug!(
            post_id = %record.id,
            chars = excerpt.chars().count(),
            max_length,
            "Summary cut from body"
        );
        (excerpt, SummarySource::Excerpt)
    }
}

/// Body text without markup or line breaks.
pub fn strip_markup(body: &str) -> String {
    MARKUP_PATTERN
        .replace_all(body, "")
        .replace(MARKDOWN_MARKER, "")
        .replace(['\r', '\n'], "")
}

/// First `max_length` characters (Unicode scalar values) of the plain text.
pub fn plain_text_excerpt(body: &str, max_length: usize) -> String {
    strip_markup(body).chars().take(max_length).collect()
}
