//! Data models for search results and scraped articles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SearchRecord`]: One search-result card, normalized and keyword-tagged
//! - [`ArticleRecord`]: One article body fetched from a result link
//! - [`MergedRecord`]: A search record with its article body joined on by link
//! - [`CombinedResult`]: All keywords' records plus the per-keyword failure log
//!
//! Raw extraction output is a [`FieldTable`]: independently harvested columns
//! keyed by field name. Columns may come back with differing lengths; they are
//! padded to a common length before being zipped into records, so a record's
//! positional index is what ties its fields together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name for the headline column of a [`FieldTable`].
pub const HEADLINE: &str = "headline";
/// Field name for the snippet column.
pub const SNIPPET: &str = "snippet";
/// Field name for the raw date column.
pub const DATE: &str = "date";
/// Field name for the link column.
pub const LINK: &str = "link";

/// Raw extraction output: one column of optional strings per named field.
///
/// Every column is padded with `None` to the longest column's length before
/// records are built from it (see [`crate::extract::align`]).
pub type FieldTable = BTreeMap<String, Vec<Option<String>>>;

/// One normalized search-result card.
///
/// All four content fields are extracted in independent passes and may be
/// absent individually; `keyword` records the query that produced the row.
/// Rows whose raw date failed to parse never become a `SearchRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRecord {
    /// The result headline, if that column was extractable.
    pub headline: Option<String>,
    /// The result snippet/excerpt, if present.
    pub snippet: Option<String>,
    /// The parsed publication date.
    pub date: Option<NaiveDate>,
    /// The result link, if present.
    pub link: Option<String>,
    /// The search keyword this row was harvested for.
    pub keyword: String,
}

/// One article body fetched from a search-result link.
///
/// On fetch failure `article` is `None` but the link is always retained, so
/// the row can still be joined back onto the search dataset it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The article body, paragraphs joined with newlines. `None` on failure.
    pub article: Option<String>,
    /// The URL the body was (or should have been) fetched from.
    pub link: String,
}

/// A [`SearchRecord`] with its article body joined on by link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub headline: Option<String>,
    pub snippet: Option<String>,
    pub date: Option<NaiveDate>,
    pub link: Option<String>,
    pub keyword: String,
    pub article: Option<String>,
}

/// The aggregate of a whole keyword batch.
///
/// `records` holds the concatenated, deduplicated rows of every keyword that
/// succeeded, in keyword input order. Keywords whose fetch failed are listed
/// in `failed_keywords` so a run's gaps are auditable.
#[derive(Debug, Default)]
pub struct CombinedResult {
    /// Deduplicated rows from all successful keywords, input order preserved.
    pub records: Vec<SearchRecord>,
    /// Keywords that errored and contributed no rows.
    pub failed_keywords: Vec<String>,
}

impl CombinedResult {
    /// All distinct links in the combined dataset, in row order.
    pub fn links(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.link.clone())
            .filter(|l| seen.insert(l.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_record_equality_and_hash() {
        let a = SearchRecord {
            headline: Some("Ceasefire talks resume".to_string()),
            snippet: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            link: Some("https://example.com/a".to_string()),
            keyword: "Armed conflict".to_string(),
        };
        let b = a.clone();
        assert_eq!(a, b);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_article_record_keeps_link_without_body() {
        let record = ArticleRecord {
            article: None,
            link: "https://example.com/broken".to_string(),
        };
        assert!(record.article.is_none());
        assert_eq!(record.link, "https://example.com/broken");
    }

    #[test]
    fn test_combined_result_links_dedupes_and_preserves_order() {
        let mk = |link: Option<&str>| SearchRecord {
            headline: None,
            snippet: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            link: link.map(str::to_string),
            keyword: "k".to_string(),
        };
        let combined = CombinedResult {
            records: vec![
                mk(Some("https://example.com/1")),
                mk(None),
                mk(Some("https://example.com/2")),
                mk(Some("https://example.com/1")),
            ],
            failed_keywords: vec![],
        };
        assert_eq!(
            combined.links(),
            vec![
                "https://example.com/1".to_string(),
                "https://example.com/2".to_string()
            ]
        );
    }

    #[test]
    fn test_search_record_serializes_date_as_iso() {
        let record = SearchRecord {
            headline: Some("Headline".to_string()),
            snippet: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            link: None,
            keyword: "k".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("2024-03-01"));
    }
}
