//! Keyword batch orchestration.
//!
//! Keywords are processed strictly sequentially, in input order. One keyword
//! failing is logged and recorded, never allowed to sink the rest of the
//! batch; the combined dataset is deduplicated by full-row equality at the
//! end.

use crate::errors::HarvestError;
use crate::models::{CombinedResult, SearchRecord};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{error, info};

/// Run `fetch_one` for every keyword and combine the results.
///
/// Processing order is the literal input order, for reproducible output.
/// Errors are caught per keyword: the failing keyword is recorded on
/// [`CombinedResult::failed_keywords`] and the batch continues. Empty results
/// contribute nothing. The combined rows are deduplicated by full-row
/// equality, first occurrence wins.
pub async fn run_batch<F, Fut>(keywords: &[String], mut fetch_one: F) -> CombinedResult
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<SearchRecord>, HarvestError>>,
{
    let outcomes: Vec<(String, Result<Vec<SearchRecord>, HarvestError>)> =
        stream::iter(keywords.to_vec())
            .then(|keyword| {
                info!(%keyword, "processing keyword");
                let fut = fetch_one(keyword.clone());
                async move { (keyword, fut.await) }
            })
            .collect()
            .await;

    let mut combined = CombinedResult::default();
    for (keyword, outcome) in outcomes {
        match outcome {
            Ok(records) if records.is_empty() => {
                info!(%keyword, "no records for keyword");
            }
            Ok(records) => {
                info!(%keyword, count = records.len(), "keyword finished");
                combined.records.extend(records);
            }
            Err(e) => {
                error!(%keyword, error = %e, "keyword failed; continuing with the rest");
                combined.failed_keywords.push(keyword);
            }
        }
    }

    let before = combined.records.len();
    combined.records = combined.records.into_iter().unique().collect();
    info!(
        total = combined.records.len(),
        duplicates = before - combined.records.len(),
        failed = combined.failed_keywords.len(),
        "batch combined"
    );
    combined
}
