//! Page-driver abstraction over browser automation.
//!
//! The extraction and pagination code never talks to a browser directly; it
//! depends on the [`PageDriver`] trait, which exposes the small set of
//! primitives the pipeline needs: navigate, wait, query text/attributes,
//! visibility, click, and scroll. Two implementations ship with the binary:
//!
//! - [`ChromeDriver`]: drives a headless Chromium instance, full interaction
//!   support. Required for sites that reveal results through a "load more"
//!   button.
//! - [`FetchDriver`]: plain HTTP fetch plus static HTML parsing. Clicking is
//!   unsupported and nothing is ever "visible", which makes button-paginated
//!   sites degrade to a single-page extraction. Sufficient for offset-
//!   paginated sites that render server-side.
//!
//! Both drivers answer text/attribute queries by parsing an HTML snapshot of
//! the current page, so the query helpers live here and are shared.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

pub mod chrome;
pub mod fetch;

pub use chrome::ChromeDriver;
pub use fetch::FetchDriver;

/// Errors surfaced by [`PageDriver`] implementations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The page could not be loaded at all.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Waiting for a selector exceeded its timeout.
    #[error("timed out after {timeout:?} waiting for `{selector}`")]
    Timeout { selector: String, timeout: Duration },

    /// The selector string is not parseable CSS.
    #[error("invalid selector `{0}`")]
    BadSelector(String),

    /// A click or scroll against an element failed.
    #[error("interaction with `{selector}` failed: {message}")]
    Interaction { selector: String, message: String },

    /// The driver does not implement this primitive.
    #[error("{0} is not supported by this driver")]
    Unsupported(&'static str),

    /// A query was issued before any page was loaded.
    #[error("no page has been loaded")]
    NoPage,

    /// Underlying HTTP failure (fetch driver).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Underlying browser failure (chrome driver).
    #[error("browser error: {0}")]
    Browser(String),
}

/// The browser primitives the pipeline consumes.
///
/// All calls are awaited to completion before the next is issued; no two
/// interactions against the same browsing context are ever in flight
/// concurrently. Implementations own their browsing context and release it
/// when dropped.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url`, waiting up to `timeout` for the load to finish.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Wait up to `timeout` for at least one element matching `selector`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Trimmed text of every element matching `selector`, in document order.
    async fn texts(&self, selector: &str) -> Result<Vec<String>, DriverError>;

    /// `attr` value of every element matching `selector`, in document order.
    /// Elements without the attribute are skipped.
    async fn attrs(&self, selector: &str, attr: &str) -> Result<Vec<String>, DriverError>;

    /// For each element matching `parent`, the trimmed text of its first
    /// descendant matching `child`, or `None` when the i-th parent has no
    /// such descendant. One entry per parent.
    async fn nested_texts(
        &self,
        parent: &str,
        child: &str,
    ) -> Result<Vec<Option<String>>, DriverError>;

    /// Whether the first element matching `selector` is currently rendered
    /// with a nonzero box. Absent elements are simply not visible.
    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Scroll the first element matching `selector` into the viewport.
    async fn scroll_into_view(&self, selector: &str) -> Result<(), DriverError>;
}

fn parse_selector(selector: &str) -> Result<Selector, DriverError> {
    Selector::parse(selector).map_err(|_| DriverError::BadSelector(selector.to_string()))
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text of every `selector` match in an HTML snapshot.
pub(crate) fn select_texts(html: &str, selector: &str) -> Result<Vec<String>, DriverError> {
    let sel = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&sel).map(element_text).collect())
}

/// `attr` value of every `selector` match in an HTML snapshot.
pub(crate) fn select_attrs(
    html: &str,
    selector: &str,
    attr: &str,
) -> Result<Vec<String>, DriverError> {
    let sel = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&sel)
        .filter_map(|el| el.value().attr(attr).map(|v| v.trim().to_string()))
        .collect())
}

/// Per-parent child text lookup in an HTML snapshot: one entry per `parent`
/// match, `None` where that parent has no `child` descendant.
pub(crate) fn select_nested_texts(
    html: &str,
    parent: &str,
    child: &str,
) -> Result<Vec<Option<String>>, DriverError> {
    let parent_sel = parse_selector(parent)?;
    let child_sel = parse_selector(child)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&parent_sel)
        .map(|container| container.select(&child_sel).next().map(element_text))
        .collect())
}

/// Whether an HTML snapshot contains at least one `selector` match.
pub(crate) fn selector_present(html: &str, selector: &str) -> Result<bool, DriverError> {
    let sel = parse_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&sel).next().is_some())
}
