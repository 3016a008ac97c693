//! Plain-HTTP implementation of [`PageDriver`].
//!
//! Fetches pages with `reqwest` and answers queries against the static HTML
//! snapshot. There is no live DOM: `wait_for` is a single presence check,
//! `is_visible` always answers `false`, and click/scroll report
//! [`DriverError::Unsupported`]. Offset-paginated sites that render
//! server-side work fully; button-paginated sites degrade to whatever the
//! first page contains.

use super::{DriverError, PageDriver};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct FetchDriver {
    client: reqwest::Client,
    // Snapshot of the most recently fetched page.
    page: Mutex<Option<String>>,
}

impl FetchDriver {
    pub fn new() -> Result<Self, DriverError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            page: Mutex::new(None),
        })
    }

    fn snapshot(&self) -> Result<String, DriverError> {
        self.page
            .lock()
            .expect("page snapshot lock poisoned")
            .clone()
            .ok_or(DriverError::NoPage)
    }
}

#[async_trait]
impl PageDriver for FetchDriver {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        debug!(%url, bytes = html.len(), "fetched page");
        *self.page.lock().expect("page snapshot lock poisoned") = Some(html);
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        // Static snapshot: the element is either there or it never will be.
        let html = self.snapshot()?;
        if super::selector_present(&html, selector)? {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>, DriverError> {
        let html = self.snapshot()?;
        super::select_texts(&html, selector)
    }

    async fn attrs(&self, selector: &str, attr: &str) -> Result<Vec<String>, DriverError> {
        let html = self.snapshot()?;
        super::select_attrs(&html, selector, attr)
    }

    async fn nested_texts(
        &self,
        parent: &str,
        child: &str,
    ) -> Result<Vec<Option<String>>, DriverError> {
        let html = self.snapshot()?;
        super::select_nested_texts(&html, parent, child)
    }

    async fn is_visible(&self, _selector: &str) -> Result<bool, DriverError> {
        Ok(false)
    }

    async fn click(&self, _selector: &str) -> Result<(), DriverError> {
        Err(DriverError::Unsupported("click"))
    }

    async fn scroll_into_view(&self, _selector: &str) -> Result<(), DriverError> {
        Err(DriverError::Unsupported("scroll_into_view"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queries_before_navigation_report_no_page() {
        let driver = FetchDriver::new().unwrap();
        assert!(matches!(
            driver.texts("h2").await.unwrap_err(),
            DriverError::NoPage
        ));
    }

    #[tokio::test]
    async fn test_interactions_are_unsupported() {
        let driver = FetchDriver::new().unwrap();
        assert!(matches!(
            driver.click("button").await.unwrap_err(),
            DriverError::Unsupported("click")
        ));
        assert!(!driver.is_visible("button").await.unwrap());
    }
}
