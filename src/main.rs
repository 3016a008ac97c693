//! # News Trawler
//!
//! A keyword-driven news harvesting pipeline that searches news sites for a
//! configured list of keywords, pages through the results, normalizes the
//! extracted fields into tabular records, and persists everything as CSV.
//!
//! ## Features
//!
//! - Paginates listing pages by clicking "load more" controls or by walking
//!   an offset query parameter, whichever the site uses
//! - Extracts headline, snippet, date and link columns independently and
//!   repairs length mismatches between them before building records
//! - Validates publication dates, tags every row with its query keyword,
//!   and deduplicates the combined dataset
//! - Optionally visits every harvested link and scrapes the article body
//! - Writes per-keyword, combined, article, and merged CSV files
//!
//! ## Usage
//!
//! ```sh
//! news_trawler -c config/sites.yaml -o ./out --fetch-bodies
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture, per site and keyword:
//! 1. **Search**: build the listing URL for the keyword
//! 2. **Paginate**: advance the listing until no new results appear
//! 3. **Extract**: harvest the configured field selectors into aligned columns
//! 4. **Normalize**: parse dates, drop invalid rows, tag with the keyword
//! 5. **Output**: write CSV files; optionally fetch article bodies and merge
//!
//! One keyword failing never aborts the batch; one site's browser context is
//! released before the next site starts.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod batch;
mod cli;
mod config;
mod details;
mod driver;
mod errors;
mod extract;
mod models;
mod normalize;
mod outputs;
mod paginate;
#[cfg(test)]
mod testing;
mod utils;

use batch::run_batch;
use cli::Cli;
use config::{Config, SiteProfile, load_config};
use details::fetch_details;
use driver::{ChromeDriver, FetchDriver, PageDriver};
use normalize::normalize;
use outputs::csv::{
    articles_path, combined_path, keyword_path, merge_articles, merged_path,
    write_articles, write_merged, write_search_records,
};
use paginate::paginate;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_trawler starting up");

    let args = Cli::parse();
    let config = load_config(Path::new(&args.config))?;
    info!(
        config_path = %args.config,
        sites = config.sites.len(),
        keywords = config.keywords.len(),
        "loaded configuration"
    );

    let output_dir = Path::new(&args.output_dir);
    if let Err(e) = ensure_writable_dir(output_dir).await {
        error!(
            path = %output_dir.display(),
            error = %e,
            "output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let selected: Vec<&SiteProfile> = config
        .sites
        .iter()
        .filter(|site| args.site.as_deref().is_none_or(|wanted| wanted == site.name))
        .collect();
    if selected.is_empty() {
        warn!(site = ?args.site, "no site profile matched; nothing to do");
        return Ok(());
    }

    for site in selected {
        if let Err(e) = run_site(site, &config, &args, output_dir).await {
            error!(site = %site.name, error = %e, "site run failed; continuing with remaining sites");
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "execution complete");
    Ok(())
}

/// Harvest one site across the whole keyword list.
///
/// The driver (and with it the browsing context) lives exactly as long as
/// this function, so it is released on every exit path.
async fn run_site(
    site: &SiteProfile,
    config: &Config,
    args: &Cli,
    output_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    info!(site = %site.name, "starting site");

    let driver: Box<dyn PageDriver> = if args.no_browser {
        Box::new(FetchDriver::new()?)
    } else {
        Box::new(ChromeDriver::launch(config.headless, config.javascript)?)
    };
    let driver = driver.as_ref();
    let min_year = args.min_year.or(config.min_year);

    let combined = run_batch(&config.keywords, |keyword| async move {
        let url = site.listing_url(&keyword);
        info!(%keyword, %url, "searching");

        let tables = paginate(driver, &url, &site.pagination, &site.fields).await?;
        let mut records = Vec::new();
        for table in &tables {
            records.extend(normalize(table, &keyword, &site.date_format, min_year));
        }
        records.sort_by_key(|r| r.date);

        write_search_records(
            &keyword_path(output_dir, site.stem(), &keyword),
            &records,
        )?;
        Ok(records)
    })
    .await;

    if !combined.failed_keywords.is_empty() {
        warn!(
            site = %site.name,
            failed = ?combined.failed_keywords,
            "some keywords produced no data"
        );
        // Failed keywords still leave a header-only file so the run's gaps
        // show up in the output directory.
        for keyword in &combined.failed_keywords {
            let path = keyword_path(output_dir, site.stem(), keyword);
            if let Err(e) = write_search_records(&path, &[]) {
                error!(%keyword, error = %e, "could not write placeholder CSV");
            }
        }
    }

    write_search_records(&combined_path(output_dir, site.stem()), &combined.records)?;

    if args.fetch_bodies {
        match &site.body_selector {
            Some(body_selector) => {
                let links = combined.links();
                let pause = Duration::from_secs_f64(config.pause_secs);
                let articles = fetch_details(driver, &links, body_selector, pause).await;
                write_articles(&articles_path(output_dir, site.stem()), &articles)?;

                let merged = merge_articles(&combined.records, &articles);
                write_merged(&merged_path(output_dir, site.stem()), &merged)?;
            }
            None => {
                warn!(site = %site.name, "no body_selector configured; skipping article bodies");
            }
        }
    }

    info!(
        site = %site.name,
        records = combined.records.len(),
        failed_keywords = combined.failed_keywords.len(),
        "site finished"
    );
    Ok(())
}
