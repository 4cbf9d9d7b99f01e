// src/pipeline/convert.rs

//! Conversion pipelines for fetched and local advisories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{AdvisoryRecord, Config};
use crate::scan::decode;
use crate::services::{AdvisoryFetcher, Conversion, Converter, local_record};
use crate::storage::{AdvisoryStorage, LocalStorage, file_exists};

/// What happened to the records of a conversion run.
#[derive(Debug, Default)]
pub struct ConvertSummary {
    /// KML files produced in this run
    pub converted: Vec<PathBuf>,
    /// KML files that already existed
    pub skipped: Vec<PathBuf>,
    /// (record filename, error message) of failed records
    pub failed: Vec<(String, String)>,
}

impl ConvertSummary {
    fn record(&mut self, filename: &str, result: Result<Conversion>) {
        match result {
            Ok(Conversion::Converted { kml, output }) => {
                if !output.is_empty() {
                    log::debug!("Converter output for {filename}: {output}");
                }
                self.converted.push(kml);
            }
            Ok(Conversion::AlreadyConverted { kml }) => self.skipped.push(kml),
            Err(e) => {
                log::warn!("{filename} not converted: {e}");
                self.failed.push((filename.to_string(), e.to_string()));
            }
        }
    }

    fn log(&self) {
        log::info!(
            "Conversion finished: {} converted, {} already available, {} failed",
            self.converted.len(),
            self.skipped.len(),
            self.failed.len()
        );
        for kml in &self.converted {
            log::info!("  {}", kml.display());
        }
    }
}

/// Pick records by zero-based index; no indices selects every record.
pub fn select_records(
    records: Vec<AdvisoryRecord>,
    indices: &[usize],
) -> Result<Vec<AdvisoryRecord>> {
    if indices.is_empty() {
        return Ok(records);
    }
    if let Some(bad) = indices.iter().find(|&&i| i >= records.len()) {
        return Err(AppError::validation(format!(
            "No advisory at index {bad} ({} listed)",
            records.len()
        )));
    }
    Ok(indices.iter().map(|&i| records[i].clone()).collect())
}

fn converter(config: &Config) -> Converter<LocalStorage> {
    Converter::new(
        config.converter.clone(),
        LocalStorage::new(&config.paths.output_dir),
    )
}

/// Fetch a source and convert the selected advisories.
///
/// A record that cannot be fetched or converted is reported in the summary
/// and does not stop the others.
pub async fn run_convert(
    config: Arc<Config>,
    source_id: &str,
    indices: &[usize],
    force: bool,
) -> Result<ConvertSummary> {
    let source = config.source(source_id)?;
    let fetcher = AdvisoryFetcher::new(Arc::clone(&config))?;
    let outcome = fetcher.fetch_source(source).await?;
    let records = select_records(outcome.records, indices)?;

    log::info!("Converting {} advisories from {}", records.len(), source.name);
    let converter = converter(&config);
    let mut summary = ConvertSummary::default();

    for record in records {
        let filename = record.filename.clone();
        let needs_body = record.body_text.is_none() && (force || !record.already_converted);
        let record = if needs_body {
            match fetcher.load_body(source, record).await {
                Ok(record) => record,
                Err(e) => {
                    summary.record(&filename, Err(e));
                    continue;
                }
            }
        } else {
            record
        };
        summary.record(&filename, converter.convert(&record, force).await);
    }

    summary.log();
    Ok(summary)
}

/// Convert a local advisory file.
pub async fn run_import(config: &Config, path: &Path, force: bool) -> Result<ConvertSummary> {
    let output_dir = &config.paths.output_dir;
    let record = local_record(path, output_dir, file_exists)?;

    log::info!("Importing {}", record.display_title);
    let input = LocalStorage::new(path.parent().unwrap_or(Path::new(".")));
    let bytes = input.read(&record.filename).await?.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
    })?;
    let decoded = decode(&bytes);
    if decoded.lossy {
        log::warn!("{} is not valid UTF-8; invalid bytes replaced", path.display());
    }
    let record = record.with_body(decoded.text);

    let mut summary = ConvertSummary::default();
    let result = converter(config).convert(&record, force).await;
    summary.record(&record.filename, result);
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConverterConfig;
    use tempfile::TempDir;

    fn record(filename: &str) -> AdvisoryRecord {
        AdvisoryRecord {
            source_id: "toulouse".to_string(),
            display_title: filename.to_string(),
            filename: filename.to_string(),
            advisory_url: format!("http://vaac.meteo.fr/advisory/{filename}"),
            graphic_url: None,
            body_text: None,
            already_converted: false,
        }
    }

    fn config(output_dir: &Path, script: &str) -> Config {
        let mut config = Config::default();
        config.paths.output_dir = output_dir.to_path_buf();
        config.converter = ConverterConfig {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            timeout_secs: 10,
        };
        config
    }

    #[test]
    fn test_select_all_when_no_indices() {
        let records = vec![record("a"), record("b")];
        assert_eq!(select_records(records.clone(), &[]).unwrap(), records);
    }

    #[test]
    fn test_select_by_index() {
        let records = vec![record("a"), record("b"), record("c")];
        let selected = select_records(records, &[2, 0]).unwrap();
        let names: Vec<_> = selected.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["c", "a"]);
    }

    #[test]
    fn test_select_out_of_range() {
        let result = select_records(vec![record("a")], &[1]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_import_plain_text_file() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("london-201511101500.vaa.txt");
        std::fs::write(&input, "VA ADVISORY\nDTG: 20151110/1500Z\n").unwrap();
        let out = tmp.path().join("out");
        let config = config(&out, r#"cp "$1" "${1%.html}.kml""#);

        let summary = run_import(&config, &input, false).await.unwrap();

        let kml = out.join("london-201511101500.vaa.txt.kml");
        assert_eq!(summary.converted, vec![kml.clone()]);
        assert_eq!(
            std::fs::read_to_string(kml).unwrap(),
            "<pre>\nVA ADVISORY\nDTG: 20151110/1500Z\n\n</pre>\n"
        );

        let again = run_import(&config, &input, false).await.unwrap();
        assert!(again.converted.is_empty());
        assert_eq!(again.skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_import_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("FVAK21.html");
        std::fs::write(&input, "<p>VA ADVISORY</p>").unwrap();
        let config = config(&tmp.path().join("out"), "exit 1");

        let summary = run_import(&config, &input, false).await.unwrap();
        assert!(summary.converted.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "FVAK21.html");
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = config(tmp.path(), "true");
        let result = run_import(&config, &tmp.path().join("missing.txt"), false).await;
        match result {
            Err(AppError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                assert!(e.to_string().contains("missing.txt"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_import_reads_from_file_directory() {
        let tmp = TempDir::new().unwrap();
        let inbox = tmp.path().join("inbox");
        std::fs::create_dir(&inbox).unwrap();
        std::fs::write(inbox.join("etna.20200501.txt"), b"VA ADVISORY\xFF
").unwrap();
        let out = tmp.path().join("out");
        let config = config(&out, r#"cp "$1" "${1%.html}.kml""#);

        let summary = run_import(&config, &inbox.join("etna.20200501.txt"), false)
            .await
            .unwrap();

        let kml = out.join("etna.20200501.txt.kml");
        assert_eq!(summary.converted, vec![kml.clone()]);
        assert!(std::fs::read_to_string(kml).unwrap().contains("VA ADVISORY\u{fffd}"));
        assert!(inbox.join("etna.20200501.txt").exists());
    }
}
