//! Article-body fetching over the link column of a harvested dataset.
//!
//! Strictly sequential: one politeness pause, one navigation, one extraction
//! per link. A failed link still produces a row (body `None`, link kept) so
//! the output always joins cleanly back onto the search records.

use crate::driver::{DriverError, PageDriver};
use crate::models::ArticleRecord;
use crate::utils::truncate_for_log;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const NAV_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_TIMEOUT: Duration = Duration::from_secs(10);
const JITTER_MS: u64 = 250;

/// Visit every link and scrape its article body.
///
/// Returns exactly one [`ArticleRecord`] per input link, in input order.
/// Timeouts, navigation errors and missing body selectors all degrade to a
/// `None` body with the link preserved; one link's failure has no effect on
/// the links after it.
#[instrument(level = "info", skip_all, fields(links = links.len(), body_selector))]
pub async fn fetch_details(
    driver: &dyn PageDriver,
    links: &[String],
    body_selector: &str,
    pause: Duration,
) -> Vec<ArticleRecord> {
    let mut articles = Vec::with_capacity(links.len());
    for link in links {
        politeness_pause(pause).await;
        match fetch_body(driver, link, body_selector).await {
            Ok(body) => {
                debug!(%link, preview = %truncate_for_log(&body, 120), "fetched article body");
                articles.push(ArticleRecord {
                    article: Some(body),
                    link: link.clone(),
                });
            }
            Err(e) => {
                warn!(%link, error = %e, "article fetch failed; keeping link with empty body");
                articles.push(ArticleRecord {
                    article: None,
                    link: link.clone(),
                });
            }
        }
    }
    info!(
        fetched = articles.iter().filter(|a| a.article.is_some()).count(),
        failed = articles.iter().filter(|a| a.article.is_none()).count(),
        "detail fetching finished"
    );
    articles
}

async fn fetch_body(
    driver: &dyn PageDriver,
    url: &str,
    body_selector: &str,
) -> Result<String, DriverError> {
    driver.goto(url, NAV_TIMEOUT).await?;
    driver.wait_for(body_selector, BODY_TIMEOUT).await?;
    let paragraphs = driver.texts(body_selector).await?;
    Ok(paragraphs.join("\n"))
}

async fn politeness_pause(base: Duration) {
    let jitter = Duration::from_millis(rand::rng().random_range(0..JITTER_MS));
    tokio::time::sleep(base + jitter).await;
}
