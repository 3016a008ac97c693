//! Small helpers for filenames, logging, and output-directory checks.

use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Convert a keyword to a filename-safe slug.
///
/// Lowercases, strips anything that is not alphanumeric or whitespace, and
/// joins the remaining terms with underscores.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_keyword("Armed conflict"), "armed_conflict");
/// assert_eq!(slugify_keyword("War on terror!"), "war_on_terror");
/// ```
pub fn slugify_keyword(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && !c.is_whitespace(), "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes with an ellipsis and byte-count
/// indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i <= max)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then probes it with a throwaway file.
/// Failing early here beats discovering an unwritable output directory after
/// an hour of scraping.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
