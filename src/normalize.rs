//! Turn raw field tables into keyword-tagged, date-validated records.
//!
//! Date parsing doubles as row validation: result cards without a parseable
//! publication date are ad slots, section headers, or half-rendered cards,
//! and are dropped without ceremony. Surviving rows are tagged with the query
//! keyword and sorted by date ascending.

use crate::models::{DATE, FieldTable, HEADLINE, LINK, SNIPPET, SearchRecord};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Build [`SearchRecord`]s from one aligned [`FieldTable`].
///
/// Rows whose raw date does not parse with `date_format` are dropped: a
/// data-quality signal, not an error, so nothing is logged per row. When
/// `min_year` is set, rows older than it are dropped too. The survivors are
/// sorted by parsed date ascending.
pub fn normalize(
    table: &FieldTable,
    keyword: &str,
    date_format: &str,
    min_year: Option<i32>,
) -> Vec<SearchRecord> {
    let empty: Vec<Option<String>> = Vec::new();
    let column = |name: &str| table.get(name).unwrap_or(&empty);
    let cell = |name: &str, i: usize| column(name).get(i).cloned().flatten();

    let row_count = table.values().map(Vec::len).max().unwrap_or(0);
    let mut records = Vec::new();

    for i in 0..row_count {
        let Some(date) = cell(DATE, i)
            .as_deref()
            .and_then(|raw| parse_date(raw, date_format))
        else {
            continue;
        };
        if min_year.is_some_and(|min| date.year() < min) {
            continue;
        }
        records.push(SearchRecord {
            headline: cell(HEADLINE, i),
            snippet: cell(SNIPPET, i),
            date: Some(date),
            link: cell(LINK, i),
            keyword: keyword.to_string(),
        });
    }

    records.sort_by_key(|r| r.date);
    debug!(
        keyword,
        raw = row_count,
        kept = records.len(),
        "normalized field table"
    );
    records
}

fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format).ok()
}
