// src/pipeline/list.rs

//! Advisory listing pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{AdvisoryFetcher, FetchOutcome};

/// Fetch the advisories of one source.
///
/// `limit` overrides the source's configured fetch limit.
pub async fn run_list(
    config: Arc<Config>,
    source_id: &str,
    limit: Option<usize>,
) -> Result<FetchOutcome> {
    let mut source = config.source(source_id)?.clone();
    if let Some(limit) = limit {
        source.fetch_limit = limit;
    }

    let fetcher = AdvisoryFetcher::new(Arc::clone(&config))?;
    let outcome = fetcher.fetch_source(&source).await?;

    let converted = outcome
        .records
        .iter()
        .filter(|record| record.already_converted)
        .count();
    log::info!(
        "{}: {} advisories ({} already converted)",
        source.name,
        outcome.records.len(),
        converted
    );
    if outcome.body_failures > 0 {
        log::warn!(
            "{} of {} advisory pages could not be fetched",
            outcome.body_failures,
            outcome.body_total
        );
    }

    Ok(outcome)
}
