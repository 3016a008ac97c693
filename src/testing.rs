//! Scripted in-memory [`PageDriver`] for unit tests.
//!
//! Every primitive answers from pre-queued responses, so pagination, field
//! extraction and detail fetching are exercised deterministically with no
//! network and no browser. Queues are consumed per call; a drained queue
//! answers "nothing there" (empty batch / not visible), which is also the
//! steady state of a fully paginated listing.

use crate::driver::{DriverError, PageDriver};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct ScriptedDriver {
    visibility: Mutex<VecDeque<bool>>,
    texts: Mutex<HashMap<String, VecDeque<Vec<String>>>>,
    attrs: Mutex<HashMap<String, VecDeque<Vec<String>>>>,
    nested: Mutex<HashMap<(String, String), VecDeque<Vec<Option<String>>>>>,
    fail_fields: Mutex<HashSet<String>>,
    fail_clicks: Mutex<HashSet<String>>,
    fail_nav: Mutex<HashSet<String>>,
    timeout_selectors: Mutex<HashSet<String>>,
    timeout_pages: Mutex<HashSet<String>>,
    current_url: Mutex<Option<String>>,
    clicks: Mutex<Vec<String>>,
    visited: Mutex<Vec<String>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next `is_visible` call.
    pub fn queue_visibility(&self, visible: bool) {
        self.visibility.lock().unwrap().push_back(visible);
    }

    /// Queue one `texts` batch for `selector`.
    pub fn queue_texts(&self, selector: &str, batch: &[&str]) {
        self.texts
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_default()
            .push_back(batch.iter().map(|s| s.to_string()).collect());
    }

    /// Queue one `attrs` batch for `selector`.
    pub fn queue_attrs(&self, selector: &str, batch: &[&str]) {
        self.attrs
            .lock()
            .unwrap()
            .entry(selector.to_string())
            .or_default()
            .push_back(batch.iter().map(|s| s.to_string()).collect());
    }

    /// Queue one `nested_texts` batch for the parent/child pair.
    pub fn queue_nested(&self, parent: &str, child: &str, batch: &[Option<&str>]) {
        self.nested
            .lock()
            .unwrap()
            .entry((parent.to_string(), child.to_string()))
            .or_default()
            .push_back(batch.iter().map(|s| s.map(str::to_string)).collect());
    }

    /// Make every text/attr/nested query against `selector` fail.
    pub fn fail_field(&self, selector: &str) {
        self.fail_fields.lock().unwrap().insert(selector.to_string());
    }

    /// Make clicks on `selector` fail.
    pub fn fail_click(&self, selector: &str) {
        self.fail_clicks.lock().unwrap().insert(selector.to_string());
    }

    /// Make navigation fail for any URL containing `fragment`.
    pub fn fail_navigation(&self, fragment: &str) {
        self.fail_nav.lock().unwrap().insert(fragment.to_string());
    }

    /// Make `wait_for` time out for `selector` on every page.
    pub fn timeout_selector(&self, selector: &str) {
        self.timeout_selectors
            .lock()
            .unwrap()
            .insert(selector.to_string());
    }

    /// Make `wait_for` time out on any page whose URL contains `fragment`.
    pub fn timeout_on_page(&self, fragment: &str) {
        self.timeout_pages.lock().unwrap().insert(fragment.to_string());
    }

    pub fn click_count(&self) -> usize {
        self.clicks.lock().unwrap().len()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    fn field_failure(&self, selector: &str) -> Option<DriverError> {
        self.fail_fields
            .lock()
            .unwrap()
            .contains(selector)
            .then(|| DriverError::Interaction {
                selector: selector.to_string(),
                message: "scripted failure".to_string(),
            })
    }
}

#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.visited.lock().unwrap().push(url.to_string());
        if self
            .fail_nav
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| url.contains(fragment))
        {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        *self.current_url.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let timed_out = self.timeout_selectors.lock().unwrap().contains(selector)
            || self
                .current_url
                .lock()
                .unwrap()
                .as_deref()
                .is_some_and(|url| {
                    self.timeout_pages
                        .lock()
                        .unwrap()
                        .iter()
                        .any(|fragment| url.contains(fragment))
                });
        if timed_out {
            Err(DriverError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
        } else {
            Ok(())
        }
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>, DriverError> {
        if let Some(err) = self.field_failure(selector) {
            return Err(err);
        }
        Ok(self
            .texts
            .lock()
            .unwrap()
            .get_mut(selector)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    async fn attrs(&self, selector: &str, _attr: &str) -> Result<Vec<String>, DriverError> {
        if let Some(err) = self.field_failure(selector) {
            return Err(err);
        }
        Ok(self
            .attrs
            .lock()
            .unwrap()
            .get_mut(selector)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    async fn nested_texts(
        &self,
        parent: &str,
        child: &str,
    ) -> Result<Vec<Option<String>>, DriverError> {
        if let Some(err) = self.field_failure(parent) {
            return Err(err);
        }
        Ok(self
            .nested
            .lock()
            .unwrap()
            .get_mut(&(parent.to_string(), child.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_default())
    }

    async fn is_visible(&self, _selector: &str) -> Result<bool, DriverError> {
        Ok(self
            .visibility
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false))
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        if self.fail_clicks.lock().unwrap().contains(selector) {
            return Err(DriverError::Interaction {
                selector: selector.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.clicks.lock().unwrap().push(selector.to_string());
        Ok(())
    }

    async fn scroll_into_view(&self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }
}
