//! Listing-page pagination: keep revealing results until there are no more.
//!
//! Two interchangeable strategies cover the sites this tool targets:
//!
//! - [`Pagination::Click`]: the listing accumulates results in place behind a
//!   "load more" control. Modeled as an explicit state machine
//!   ([`ClickPager`]) so the stop and failure conditions are testable without
//!   a browser. One extraction pass runs after the clicking finishes.
//! - [`Pagination::Offset`]: the listing is addressed by a numeric offset
//!   query parameter. Each round navigates and extracts one page; a page with
//!   zero headline entries signals the end of results.
//!
//! Interaction failures mid-pagination stop the advance loop but keep what
//! was already gathered. Only a navigation failure on the very first page is
//! fatal to the caller.

use crate::driver::PageDriver;
use crate::errors::HarvestError;
use crate::extract::{FieldSpec, extract};
use crate::models::{FieldTable, HEADLINE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// How long a listing page gets to load.
pub const NAV_TIMEOUT: Duration = Duration::from_secs(60);
/// How long to wait for the load-more control before concluding the listing
/// is a single page.
const BUTTON_TIMEOUT: Duration = Duration::from_secs(60);

fn default_settle_ms() -> u64 {
    2000
}
fn default_click_rounds() -> u32 {
    200
}
fn default_offset_param() -> String {
    "offset".to_string()
}
fn default_page_size() -> u32 {
    20
}
fn default_offset_rounds() -> u32 {
    500
}

/// Site-configured pagination strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Click a "load more" control until it disappears.
    Click {
        button: String,
        #[serde(default = "default_settle_ms")]
        settle_ms: u64,
        #[serde(default = "default_click_rounds")]
        max_rounds: u32,
    },
    /// Walk an offset query parameter until a page comes back empty.
    Offset {
        #[serde(default = "default_offset_param")]
        param: String,
        #[serde(default = "default_page_size")]
        page_size: u32,
        #[serde(default = "default_offset_rounds")]
        max_rounds: u32,
    },
}

/// Advance a listing page to exhaustion and extract its raw field tables.
///
/// Returns one [`FieldTable`] per extraction pass: a single table for the
/// click strategy (the page accumulates revealed results), one per offset
/// round otherwise.
#[instrument(level = "info", skip(driver, fields))]
pub async fn paginate(
    driver: &dyn PageDriver,
    listing_url: &str,
    strategy: &Pagination,
    fields: &BTreeMap<String, FieldSpec>,
) -> Result<Vec<FieldTable>, HarvestError> {
    match strategy {
        Pagination::Click {
            button,
            settle_ms,
            max_rounds,
        } => {
            driver.goto(listing_url, NAV_TIMEOUT).await?;
            let mut pager = ClickPager::new(
                button.clone(),
                Duration::from_millis(*settle_ms),
                *max_rounds,
            );
            let rounds = pager.run(driver).await;
            info!(rounds, "load-more clicking finished");
            Ok(vec![extract(driver, fields).await])
        }
        Pagination::Offset {
            param,
            page_size,
            max_rounds,
        } => paginate_offset(driver, listing_url, param, *page_size, *max_rounds, fields).await,
    }
}

fn offset_url(base: &str, param: &str, offset: u32) -> Result<String, HarvestError> {
    let mut url = url::Url::parse(base).map_err(|source| HarvestError::BadUrl {
        url: base.to_string(),
        source,
    })?;
    url.query_pairs_mut().append_pair(param, &offset.to_string());
    Ok(url.to_string())
}

fn headline_count(table: &FieldTable) -> usize {
    table
        .get(HEADLINE)
        .map(|column| column.iter().filter(|v| v.is_some()).count())
        .unwrap_or(0)
}

async fn paginate_offset(
    driver: &dyn PageDriver,
    listing_url: &str,
    param: &str,
    page_size: u32,
    max_rounds: u32,
    fields: &BTreeMap<String, FieldSpec>,
) -> Result<Vec<FieldTable>, HarvestError> {
    let mut tables: Vec<FieldTable> = Vec::new();
    let mut offset = 0u32;

    for _ in 0..max_rounds {
        let url = offset_url(listing_url, param, offset)?;
        if let Err(e) = driver.goto(&url, NAV_TIMEOUT).await {
            if tables.is_empty() {
                return Err(e.into());
            }
            warn!(%url, error = %e, "navigation failed mid-pagination; keeping pages gathered so far");
            break;
        }

        let mut table = extract(driver, fields).await;
        if headline_count(&table) == 0 {
            // An empty page usually means the results are exhausted, but it
            // can also be a transient render failure. Reload once to confirm.
            info!(offset, "empty page; reloading once to confirm exhaustion");
            if let Err(e) = driver.goto(&url, NAV_TIMEOUT).await {
                warn!(%url, error = %e, "confirmation reload failed; stopping pagination");
                break;
            }
            table = extract(driver, fields).await;
            if headline_count(&table) == 0 {
                info!(offset, pages = tables.len(), "no more results");
                break;
            }
        }

        tables.push(table);
        offset += page_size;
    }

    Ok(tables)
}

/// States of the load-more click loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagerState {
    CheckVisibility,
    Clicking,
    Settling,
    Done,
    Failed,
}

/// Bounded state machine driving a "load more" control.
///
/// One round is scroll + click + settle. The loop ends when the control is
/// no longer visible (`Done`), when an interaction fails (`Failed`, partial
/// results are still usable), or when `max_rounds` is exhausted.
pub struct ClickPager {
    button: String,
    settle: Duration,
    max_rounds: u32,
    rounds: u32,
    state: PagerState,
}

impl ClickPager {
    pub fn new(button: String, settle: Duration, max_rounds: u32) -> Self {
        Self {
            button,
            settle,
            max_rounds,
            rounds: 0,
            state: PagerState::CheckVisibility,
        }
    }

    fn finished(&self) -> bool {
        matches!(self.state, PagerState::Done | PagerState::Failed)
    }

    /// Drive the machine to completion. Returns the number of clicks landed.
    pub async fn run(&mut self, driver: &dyn PageDriver) -> u32 {
        // Control absent from the start: a single-page listing, not an error.
        if driver.wait_for(&self.button, BUTTON_TIMEOUT).await.is_err() {
            info!(button = %self.button, "load-more control not present; single page");
            self.state = PagerState::Done;
            return self.rounds;
        }
        while !self.finished() {
            self.step(driver).await;
        }
        self.rounds
    }

    /// Advance the machine by one transition.
    async fn step(&mut self, driver: &dyn PageDriver) {
        match self.state {
            PagerState::CheckVisibility => {
                if self.rounds >= self.max_rounds {
                    warn!(rounds = self.rounds, "round limit reached; stopping");
                    self.state = PagerState::Done;
                    return;
                }
                match driver.is_visible(&self.button).await {
                    Ok(true) => self.state = PagerState::Clicking,
                    Ok(false) => self.state = PagerState::Done,
                    Err(e) => {
                        warn!(error = %e, "visibility check failed; stopping with partial results");
                        self.state = PagerState::Failed;
                    }
                }
            }
            PagerState::Clicking => {
                let interaction = async {
                    driver.scroll_into_view(&self.button).await?;
                    driver.click(&self.button).await
                };
                match interaction.await {
                    Ok(()) => {
                        self.rounds += 1;
                        self.state = PagerState::Settling;
                    }
                    Err(e) => {
                        warn!(error = %e, "click failed; stopping with partial results");
                        self.state = PagerState::Failed;
                    }
                }
            }
            PagerState::Settling => {
                sleep(self.settle).await;
                self.state = PagerState::CheckVisibility;
            }
            PagerState::Done | PagerState::Failed => {}
        }
    }
}
