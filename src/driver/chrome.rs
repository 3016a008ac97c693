//! Headless Chromium implementation of [`PageDriver`].
//!
//! `headless_chrome` exposes a synchronous API, so every browser call is
//! wrapped in `tokio::task::spawn_blocking`. Text and attribute queries work
//! on a rendered-DOM snapshot (`Tab::get_content`) parsed with `scraper`;
//! clicks, scrolling and visibility checks go through live element handles.
//!
//! The Chromium process is torn down when the driver is dropped, so a driver
//! owned by one keyword/site loop releases its browsing context on every exit
//! path.

use super::{DriverError, PageDriver};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct ChromeDriver {
    // Held only to keep the browser process alive for the tab's lifetime.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    /// Launch a Chromium instance and open a fresh tab.
    ///
    /// `javascript: false` disables script execution in the tab, which some
    /// article pages need to render without paywall overlays.
    pub fn launch(headless: bool, javascript: bool) -> Result<Self, DriverError> {
        let browser = Browser::new(LaunchOptions {
            headless,
            ..Default::default()
        })
        .map_err(|e| DriverError::Browser(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Browser(e.to_string()))?;

        if !javascript {
            use headless_chrome::protocol::cdp::Emulation;
            tab.call_method(Emulation::SetScriptExecutionDisabled { value: true })
                .map_err(|e| DriverError::Browser(e.to_string()))?;
        }

        debug!(headless, javascript, "launched Chromium tab");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Run a blocking closure against the tab on the blocking thread pool.
    async fn with_tab<T, F>(&self, op: F) -> Result<T, DriverError>
    where
        T: Send + 'static,
        F: FnOnce(&Tab) -> Result<T, DriverError> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || op(&tab))
            .await
            .map_err(|e| DriverError::Browser(e.to_string()))?
    }

    async fn content(&self) -> Result<String, DriverError> {
        self.with_tab(|tab| {
            tab.get_content()
                .map_err(|e| DriverError::Browser(e.to_string()))
        })
        .await
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        let url = url.to_string();
        self.with_tab(move |tab| {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .and_then(|t| t.wait_until_navigated())
                .map(|_| ())
                .map_err(|e| DriverError::Navigation {
                    url: url.clone(),
                    message: e.to_string(),
                })
        })
        .await
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let sel = selector.to_string();
        self.with_tab(move |tab| {
            tab.wait_for_element_with_custom_timeout(&sel, timeout)
                .map(|_| ())
                .map_err(|_| DriverError::Timeout { selector: sel.clone(), timeout })
        })
        .await
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>, DriverError> {
        let html = self.content().await?;
        super::select_texts(&html, selector)
    }

    async fn attrs(&self, selector: &str, attr: &str) -> Result<Vec<String>, DriverError> {
        let html = self.content().await?;
        super::select_attrs(&html, selector, attr)
    }

    async fn nested_texts(
        &self,
        parent: &str,
        child: &str,
    ) -> Result<Vec<Option<String>>, DriverError> {
        let html = self.content().await?;
        super::select_nested_texts(&html, parent, child)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError> {
        let sel = selector.to_string();
        self.with_tab(move |tab| {
            let Ok(element) = tab.find_element(&sel) else {
                return Ok(false);
            };
            let rendered = element
                .call_js_fn(
                    r#"function() {
                        const rect = this.getBoundingClientRect();
                        return rect.width > 0 && rect.height > 0;
                    }"#,
                    vec![],
                    false,
                )
                .map_err(|e| DriverError::Interaction {
                    selector: sel.clone(),
                    message: e.to_string(),
                })?;
            Ok(matches!(rendered.value, Some(serde_json::Value::Bool(true))))
        })
        .await
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let sel = selector.to_string();
        self.with_tab(move |tab| {
            tab.find_element(&sel)
                .and_then(|el| el.click().map(|_| ()))
                .map_err(|e| DriverError::Interaction {
                    selector: sel.clone(),
                    message: e.to_string(),
                })
        })
        .await
    }

    async fn scroll_into_view(&self, selector: &str) -> Result<(), DriverError> {
        let sel = selector.to_string();
        self.with_tab(move |tab| {
            tab.find_element(&sel)
                .and_then(|el| el.scroll_into_view().map(|_| ()))
                .map_err(|e| DriverError::Interaction {
                    selector: sel.clone(),
                    message: e.to_string(),
                })
        })
        .await
    }
}
