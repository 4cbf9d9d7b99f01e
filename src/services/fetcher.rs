// src/services/fetcher.rs

//! Advisory fetcher service.
//!
//! Downloads a source's list page, assembles records from it and, for
//! sources that need it, fetches every advisory page concurrently.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::Result;
use crate::models::{AdvisoryRecord, Config, SourceConfig};
use crate::services::RecordAssembler;
use crate::storage::file_exists;
use crate::utils::http::{create_async_client, fetch_bytes};

/// Summary of one source fetch.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<AdvisoryRecord>,
    pub body_total: usize,
    pub body_failures: usize,
}

/// Service fetching advisories over HTTP.
pub struct AdvisoryFetcher {
    config: Arc<Config>,
    client: Client,
}

impl AdvisoryFetcher {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = create_async_client(&config.fetcher)?;
        Ok(Self { config, client })
    }

    fn output_dir(&self) -> &Path {
        &self.config.paths.output_dir
    }

    /// Fetch the list page of a source and build its records.
    ///
    /// A failed list download fails the whole source; a failed advisory
    /// page only leaves that record without a body.
    pub async fn fetch_source(&self, source: &SourceConfig) -> Result<FetchOutcome> {
        log::info!("Fetching advisory list for {} from {}", source.name, source.url);
        let list_page = fetch_bytes(&self.client, &source.url).await?;

        let assembler = RecordAssembler::new(source, self.output_dir(), file_exists);
        let records = assembler.assemble(&list_page)?;

        if !assembler.needs_body() {
            return Ok(FetchOutcome {
                records,
                ..FetchOutcome::default()
            });
        }

        let delay = Duration::from_millis(self.config.fetcher.request_delay_ms);
        let concurrency = self.config.fetcher.max_concurrent.max(1);
        let mut outcome = FetchOutcome {
            body_total: records.len(),
            ..FetchOutcome::default()
        };

        let assembler = &assembler;
        let mut body_stream = stream::iter(records)
            .map(|record| async move {
                let result = fetch_bytes(&self.client, &record.advisory_url).await;
                (record, result)
            })
            .buffered(concurrency);

        while let Some((record, result)) = body_stream.next().await {
            match result {
                Ok(page) => outcome.records.push(assembler.attach_body(record, &page)),
                Err(error) => {
                    outcome.body_failures += 1;
                    log::warn!("Failed to fetch advisory {}: {}", record.advisory_url, error);
                    outcome.records.push(record);
                }
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }

    /// Fill in the body of a record that does not have one yet.
    pub async fn load_body(
        &self,
        source: &SourceConfig,
        record: AdvisoryRecord,
    ) -> Result<AdvisoryRecord> {
        if record.body_text.is_some() {
            return Ok(record);
        }
        log::debug!("Fetching advisory {}", record.advisory_url);
        let page = fetch_bytes(&self.client, &record.advisory_url).await?;
        let assembler = RecordAssembler::new(source, self.output_dir(), file_exists);
        Ok(assembler.attach_body(record, &page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_default_config() {
        let fetcher = AdvisoryFetcher::new(Arc::new(Config::default())).unwrap();
        assert_eq!(fetcher.output_dir(), Config::default().paths.output_dir);
    }

    #[tokio::test]
    async fn test_load_body_keeps_existing_body() {
        let config = Arc::new(Config::default());
        let fetcher = AdvisoryFetcher::new(Arc::clone(&config)).unwrap();
        let source = config.source("test").unwrap();

        let record = AdvisoryRecord {
            source_id: "test".to_string(),
            display_title: "2015-11-10 15:00:00 (BARDARBUNGA)".to_string(),
            filename: "test.201511101500".to_string(),
            advisory_url: "http://127.0.0.1:9/unreachable".to_string(),
            graphic_url: None,
            body_text: Some("VA ADVISORY".to_string()),
            already_converted: false,
        };

        let loaded = fetcher.load_body(source, record.clone()).await.unwrap();
        assert_eq!(loaded, record);
    }
}
