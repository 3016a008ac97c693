//! Run configuration: keywords, site profiles, and global knobs.
//!
//! Everything site-specific (search URL shape, CSS selectors, date format,
//! pagination strategy) is data loaded from a YAML file, never code. A new
//! site is a new profile, not a new module.

use crate::errors::HarvestError;
use crate::extract::FieldSpec;
use crate::paginate::Pagination;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

fn default_pause_secs() -> f64 {
    2.0
}
fn default_true() -> bool {
    true
}
fn default_joiner() -> String {
    "+".to_string()
}

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds to pause between consecutive article fetches.
    #[serde(default = "default_pause_secs")]
    pub pause_secs: f64,
    /// Drop records published before this year.
    #[serde(default)]
    pub min_year: Option<i32>,
    /// Run the browser without a visible window.
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Leave JavaScript enabled in the browser.
    #[serde(default = "default_true")]
    pub javascript: bool,
    pub sites: Vec<SiteProfile>,
    /// Search keywords, processed in this order.
    pub keywords: Vec<String>,
}

/// One news site: where to search, how to paginate, what to extract.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    /// Search URL with a `{query}` placeholder.
    pub search_url: String,
    /// Separator between encoded query terms (`+` or `%20`, site-dependent).
    #[serde(default = "default_joiner")]
    pub query_joiner: String,
    /// chrono format string the site prints result dates in.
    pub date_format: String,
    pub pagination: Pagination,
    /// Named field selectors; the `headline` field doubles as the
    /// end-of-results sentinel for offset pagination.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
    /// Selector for article body paragraphs on detail pages.
    pub body_selector: Option<String>,
    /// Output filename stem; defaults to the site name.
    #[serde(default)]
    pub output_stem: Option<String>,
}

impl SiteProfile {
    /// Build the listing URL for one keyword.
    pub fn listing_url(&self, keyword: &str) -> String {
        let query = keyword
            .split_whitespace()
            .map(|term| urlencoding::encode(term).into_owned())
            .collect::<Vec<_>>()
            .join(&self.query_joiner);
        self.search_url.replace("{query}", &query)
    }

    pub fn stem(&self) -> &str {
        self.output_stem.as_deref().unwrap_or(&self.name)
    }
}

/// Load and parse a configuration file.
pub fn load_config(path: &Path) -> Result<Config, HarvestError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
pause_secs: 0.5
min_year: 1970
sites:
  - name: washingtonpost
    search_url: "https://www.washingtonpost.com/search/?query={query}"
    date_format: "%B %d, %Y"
    pagination: !click
      button: "button.load-more"
      settle_ms: 2000
    fields:
      headline: !text "h2.headline"
      link: !attr { selector: "a.result-link", attr: "href" }
      snippet: !nested { parent: "div.result-meta", child: "span.excerpt" }
    body_selector: "div.article-body"
  - name: reuters
    search_url: "https://www.reuters.com/site-search/?query={query}"
    date_format: "%B %d, %Y"
    pagination: !offset
      param: "offset"
      page_size: 20
keywords:
  - "Political violence"
  - "Armed conflict"
"#;

    #[test]
    fn test_parses_full_example() {
        let config: Config = serde_yaml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.keywords.len(), 2);
        assert_eq!(config.sites.len(), 2);
        assert!(config.headless);

        let wapo = &config.sites[0];
        assert!(matches!(
            wapo.pagination,
            Pagination::Click { ref button, settle_ms: 2000, .. } if button == "button.load-more"
        ));
        assert_eq!(
            wapo.fields["headline"],
            FieldSpec::Text("h2.headline".to_string())
        );
        assert_eq!(
            wapo.fields["snippet"],
            FieldSpec::Nested {
                parent: "div.result-meta".to_string(),
                child: "span.excerpt".to_string()
            }
        );

        let reuters = &config.sites[1];
        assert!(matches!(
            reuters.pagination,
            Pagination::Offset { page_size: 20, .. }
        ));
        assert!(reuters.body_selector.is_none());
    }

    #[test]
    fn test_listing_url_encodes_and_joins_terms() {
        let config: Config = serde_yaml::from_str(EXAMPLE).unwrap();
        let wapo = &config.sites[0];
        assert_eq!(
            wapo.listing_url("Armed conflict"),
            "https://www.washingtonpost.com/search/?query=Armed+conflict"
        );

        let mut spaced = wapo.clone();
        spaced.query_joiner = "%20".to_string();
        assert_eq!(
            spaced.listing_url("civilian casualties"),
            "https://www.washingtonpost.com/search/?query=civilian%20casualties"
        );
    }

    #[test]
    fn test_defaults_fill_in() {
        let config: Config = serde_yaml::from_str(EXAMPLE).unwrap();
        let reuters = &config.sites[1];
        assert_eq!(reuters.query_joiner, "+");
        assert_eq!(reuters.stem(), "reuters");
        assert!(config.javascript);
    }
}
