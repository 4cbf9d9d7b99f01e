// src/services/convert.rs

//! KML conversion through the external converter program.
//!
//! The advisory body is written to `<output_dir>/<name>.html`, the converter
//! is run on that file and leaves `<name>.kml` beside it. The HTML file is
//! removed after a successful run and kept after a failed one.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::models::{AdvisoryRecord, ConverterConfig};
use crate::storage::AdvisoryStorage;

/// Result of converting one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The converter ran; its combined output is kept for reporting
    Converted { kml: PathBuf, output: String },
    /// A KML file was already present and conversion was not forced
    AlreadyConverted { kml: PathBuf },
}

impl Conversion {
    pub fn kml(&self) -> &PathBuf {
        match self {
            Conversion::Converted { kml, .. } | Conversion::AlreadyConverted { kml } => kml,
        }
    }
}

/// Name of the intermediate HTML file for a record filename.
pub fn html_name(filename: &str) -> String {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    if name.ends_with(".html") {
        name.to_string()
    } else {
        format!("{name}.html")
    }
}

/// Content written for the converter; plain text is wrapped in `<pre>`.
pub fn html_content(body: &str) -> String {
    if body.trim_start().starts_with('<') {
        body.to_string()
    } else {
        format!("<pre>\n{body}\n</pre>\n")
    }
}

/// Runs the converter over records, storing files through `S`.
pub struct Converter<S: AdvisoryStorage> {
    config: ConverterConfig,
    storage: S,
}

impl<S: AdvisoryStorage> Converter<S> {
    pub fn new(config: ConverterConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// Convert one record whose body has been loaded.
    pub async fn convert(&self, record: &AdvisoryRecord, force: bool) -> Result<Conversion> {
        let kml_name = record.output_name();
        let kml = self.storage.path(&kml_name);

        if !force && self.storage.exists(&kml_name).await {
            log::info!("{} already converted: {}", record.filename, kml.display());
            return Ok(Conversion::AlreadyConverted { kml });
        }

        let body = record
            .body_text
            .as_deref()
            .ok_or_else(|| AppError::convert(&record.filename, "advisory has no message body"))?;

        let html = html_name(&record.filename);
        let html_path = self.storage.write(&html, html_content(body).as_bytes()).await?;

        let output = self.run(&html_path).await?;
        self.storage.remove(&html).await?;

        if !self.storage.exists(&kml_name).await {
            log::warn!(
                "Converter finished but {} was not created",
                kml.display()
            );
        }
        log::info!("Converted {} to {}", record.filename, kml.display());
        Ok(Conversion::Converted { kml, output })
    }

    async fn run(&self, html_path: &std::path::Path) -> Result<String> {
        let file = html_path.display().to_string();
        let timeout = Duration::from_secs(self.config.timeout_secs);

        log::debug!(
            "Running {} {:?} {}",
            self.config.program.display(),
            self.config.args,
            file
        );
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.args)
            .arg(html_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| {
                AppError::convert(&file, format!("timed out after {}s", timeout.as_secs()))
            })?
            .map_err(|e| {
                AppError::convert(&file, format!("{}: {e}", self.config.program.display()))
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let combined = combined.trim().to_string();

        if !output.status.success() {
            return Err(AppError::convert(
                &file,
                format!("converter exited with {}: {combined}", output.status),
            ));
        }
        Ok(combined)
    }
}
