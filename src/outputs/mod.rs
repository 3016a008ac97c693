//! Output writers for harvested datasets.
//!
//! Everything the pipeline produces lands on disk as CSV with a stable
//! header and no index column:
//!
//! ```text
//! output_dir/
//! ├── reuters_armed_conflict.csv     per keyword-site combination
//! ├── reuters_combined.csv           all keywords for one site, deduplicated
//! ├── reuters_art.csv                article bodies keyed by link
//! └── reuters_merged.csv             combined rows with bodies joined on
//! ```

pub mod csv;
