//! Command-line interface definitions.
//!
//! All options can be provided via command-line flags; the config path can
//! also come from the environment.

use clap::Parser;

/// Command-line arguments for the news trawler.
///
/// # Examples
///
/// ```sh
/// # Harvest every configured site into ./out
/// news_trawler -c config/sites.yaml -o ./out
///
/// # One site only, and also fetch article bodies
/// news_trawler -c config/sites.yaml -o ./out --site reuters --fetch-bodies
/// ```
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Path to the site/keyword configuration file
    #[arg(short, long, env = "NEWS_TRAWLER_CONFIG")]
    pub config: String,

    /// Directory CSV output is written to
    #[arg(short, long, default_value = "./out")]
    pub output_dir: String,

    /// Only process the named site profile
    #[arg(short, long)]
    pub site: Option<String>,

    /// Visit every harvested link and scrape article bodies too
    #[arg(long)]
    pub fetch_bodies: bool,

    /// Override the configured minimum publication year
    #[arg(long)]
    pub min_year: Option<i32>,

    /// Use the plain HTTP fetch driver instead of headless Chromium
    #[arg(long)]
    pub no_browser: bool,
}
