// Output formatting: terminal display and JSON reports.

pub mod terminal;

use serde::Serialize;

use crate::profile::ProfileRecord;
use crate::similarity::{Facet, SimilarityResult};

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Machine-readable summary of one comparison (`compare --json`).
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub first: &'a str,
    pub second: &'a str,
    pub first_follows_second: bool,
    pub second_follows_first: bool,
    pub result: &'a SimilarityResult,
    pub facets: Vec<(Facet, f64)>,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(a: &'a ProfileRecord, b: &'a ProfileRecord, result: &'a SimilarityResult) -> Self {
        Self {
            first: a.handle(),
            second: b.handle(),
            first_follows_second: a.follows(b),
            second_follows_first: b.follows(a),
            result,
            facets: Facet::ALL.iter().map(|&f| (f, result.facet(f))).collect(),
        }
    }
}
