//! CSV persistence for search records and article bodies.
//!
//! Failed keywords still get a file (header only, no rows) so a run's gaps
//! are visible in the output directory rather than silently absent.

use crate::errors::HarvestError;
use crate::models::{ArticleRecord, MergedRecord, SearchRecord};
use crate::utils::slugify_keyword;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

const SEARCH_HEADER: [&str; 5] = ["headline", "snippet", "date", "link", "keyword"];
const ARTICLE_HEADER: [&str; 2] = ["article", "link"];
const MERGED_HEADER: [&str; 6] = ["headline", "snippet", "date", "link", "keyword", "article"];

/// `<dir>/<stem>_<keyword-slug>.csv`
pub fn keyword_path(dir: &Path, stem: &str, keyword: &str) -> PathBuf {
    dir.join(format!("{stem}_{}.csv", slugify_keyword(keyword)))
}

/// `<dir>/<stem>_combined.csv`
pub fn combined_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_combined.csv"))
}

/// `<dir>/<stem>_art.csv`
pub fn articles_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_art.csv"))
}

/// `<dir>/<stem>_merged.csv`
pub fn merged_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{stem}_merged.csv"))
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: &[T],
    header: &[&str],
) -> Result<(), HarvestError> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        // serde-driven headers only appear with at least one row; write the
        // header explicitly so empty datasets still leave an auditable file.
        writer.write_record(header)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// Write one keyword's (or one site's combined) search records.
pub fn write_search_records(path: &Path, records: &[SearchRecord]) -> Result<(), HarvestError> {
    write_rows(path, records, &SEARCH_HEADER)
}

/// Write fetched article bodies.
pub fn write_articles(path: &Path, articles: &[ArticleRecord]) -> Result<(), HarvestError> {
    write_rows(path, articles, &ARTICLE_HEADER)
}

/// Write search records with article bodies joined on.
pub fn write_merged(path: &Path, merged: &[MergedRecord]) -> Result<(), HarvestError> {
    write_rows(path, merged, &MERGED_HEADER)
}

/// Left-join article bodies onto search records by link.
///
/// Rows without a link, or whose link was never fetched, keep a `None` body.
pub fn merge_articles(
    records: &[SearchRecord],
    articles: &[ArticleRecord],
) -> Vec<MergedRecord> {
    let bodies: HashMap<&str, &Option<String>> = articles
        .iter()
        .map(|a| (a.link.as_str(), &a.article))
        .collect();
    records
        .iter()
        .map(|r| MergedRecord {
            headline: r.headline.clone(),
            snippet: r.snippet.clone(),
            date: r.date,
            link: r.link.clone(),
            keyword: r.keyword.clone(),
            article: r
                .link
                .as_deref()
                .and_then(|link| bodies.get(link).copied().cloned().flatten()),
        })
        .collect()
}
