// src/services/assembler.rs

//! Record assembly.
//!
//! Turns a source's advisory-list page into [`AdvisoryRecord`]s: runs the
//! source's extractor, names each advisory, resolves its links and marks the
//! ones already converted. No I/O happens here; page bodies and the
//! existing-file check are supplied by the caller.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;
use url::Url;

use crate::error::{AppError, Result};
use crate::extract::{extract_message, extractor_for};
use crate::models::{
    AdvisoryListEntry, AdvisoryRecord, BodyMode, GraphicLink, Naming, SourceConfig, output_name,
};
use crate::scan::decode;
use crate::utils::resolve_url;
use crate::utils::url::{grandparent, last_segment, second_to_last_segment};

/// Source id given to records built from local files.
pub const LOCAL_SOURCE_ID: &str = "local";

/// Advisory timestamp, parsed when the source declares a format.
enum Stamp<'e> {
    Parsed(NaiveDateTime),
    Raw(&'e str),
}

impl Stamp<'_> {
    fn display(&self) -> String {
        match self {
            Stamp::Parsed(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
            Stamp::Raw(raw) => raw.to_string(),
        }
    }

    /// Compact form used in file names.
    fn compact(&self) -> String {
        match self {
            Stamp::Parsed(time) => time.format("%Y%m%d%H%M").to_string(),
            Stamp::Raw(raw) => raw.chars().filter(char::is_ascii_alphanumeric).collect(),
        }
    }
}

/// Builds records for one source.
///
/// `exists(output_dir, name)` reports whether a converted file called `name`
/// is already present in `output_dir`.
pub struct RecordAssembler<'a, E>
where
    E: Fn(&Path, &str) -> bool,
{
    source: &'a SourceConfig,
    output_dir: &'a Path,
    exists: E,
}

impl<'a, E> RecordAssembler<'a, E>
where
    E: Fn(&Path, &str) -> bool,
{
    pub fn new(source: &'a SourceConfig, output_dir: &'a Path, exists: E) -> Self {
        Self {
            source,
            output_dir,
            exists,
        }
    }

    /// Whether records need their advisory page fetched before presentation.
    pub fn needs_body(&self) -> bool {
        self.source.body == BodyMode::Eager
    }

    /// Raw list entries of the page, unfiltered and unlimited.
    pub fn entries(&self, list_page: &[u8]) -> Vec<AdvisoryListEntry> {
        extractor_for(&self.source.format).extract(list_page)
    }

    /// Build at most `fetch_limit` records from a list page.
    ///
    /// Entries whose timestamp does not parse, whose link cannot be named,
    /// or whose advisory URL was already seen are skipped and do not count
    /// towards the limit. Bodies are only filled for inline sources.
    pub fn assemble(&self, list_page: &[u8]) -> Result<Vec<AdvisoryRecord>> {
        let base = self.source.base_url()?;
        let inline_body = (self.source.body == BodyMode::Inline)
            .then(|| decode(list_page).text.into_owned());

        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for entry in self.entries(list_page) {
            if records.len() >= self.source.fetch_limit {
                break;
            }
            let Some(record) = self.record(&base, &entry) else {
                continue;
            };
            if !seen.insert(record.advisory_url.clone()) {
                log::debug!("Skipping duplicate advisory {}", record.advisory_url);
                continue;
            }
            records.push(match &inline_body {
                Some(body) => record.with_body(body.clone()),
                None => record,
            });
        }

        log::debug!(
            "Assembled {} record(s) for source '{}'",
            records.len(),
            self.source.id
        );
        Ok(records)
    }

    /// Body text for a record, from its advisory page.
    ///
    /// Eager sources keep only the advisory block; other sources keep the
    /// whole decoded page.
    pub fn body_from_page(&self, page: &[u8]) -> String {
        match self.source.body {
            BodyMode::Eager => extract_message(page),
            BodyMode::Deferred | BodyMode::Inline => decode(page).text.into_owned(),
        }
    }

    /// Copy of the record with its body taken from the advisory page.
    pub fn attach_body(&self, record: AdvisoryRecord, page: &[u8]) -> AdvisoryRecord {
        let body = self.body_from_page(page);
        record.with_body(body)
    }

    /// Assemble records, loading advisory pages through `load_page` for
    /// eager sources.
    ///
    /// A page that fails to load leaves that record without a body and does
    /// not affect the others.
    pub fn assemble_with<F>(&self, list_page: &[u8], mut load_page: F) -> Result<Vec<AdvisoryRecord>>
    where
        F: FnMut(&str) -> Result<Vec<u8>>,
    {
        let records = self.assemble(list_page)?;
        if !self.needs_body() {
            return Ok(records);
        }

        Ok(records
            .into_iter()
            .map(|record| match load_page(&record.advisory_url) {
                Ok(page) => self.attach_body(record, &page),
                Err(e) => {
                    log::warn!("Failed to fetch advisory {}: {}", record.advisory_url, e);
                    record
                }
            })
            .collect())
    }

    fn record(&self, base: &Url, entry: &AdvisoryListEntry) -> Option<AdvisoryRecord> {
        let advisory_url = resolve_url(base, &entry.link);
        let stamp = self.timestamp(&entry.observed_at)?;
        let filename = self.filename(entry, &advisory_url, &stamp)?;

        let graphic_url = match self.source.graphic {
            GraphicLink::Omitted => None,
            GraphicLink::Column => entry.graphic.as_deref().map(|href| resolve_url(base, href)),
            GraphicLink::VagPng => vag_graphic(&advisory_url),
        };

        let already_converted = (self.exists)(self.output_dir, &output_name(&filename));

        Some(AdvisoryRecord {
            source_id: self.source.id.clone(),
            display_title: format!("{} ({})", stamp.display(), entry.volcano),
            filename,
            advisory_url,
            graphic_url,
            body_text: None,
            already_converted,
        })
    }

    fn timestamp<'e>(&self, raw: &'e str) -> Option<Stamp<'e>> {
        let Some(format) = &self.source.timestamp_format else {
            return Some(Stamp::Raw(raw));
        };
        match NaiveDateTime::parse_from_str(raw.trim(), format) {
            Ok(time) => Some(Stamp::Parsed(time)),
            Err(e) => {
                log::debug!("Skipping entry with timestamp {raw:?} ({format}): {e}");
                None
            }
        }
    }

    fn filename(&self, entry: &AdvisoryListEntry, advisory_url: &str, stamp: &Stamp) -> Option<String> {
        let name = match &self.source.naming {
            Naming::DirectorySegment { prefix } => {
                let segment = second_to_last_segment(advisory_url).filter(|s| !s.is_empty())?;
                format!("{prefix}.{segment}.html")
            }
            Naming::Timestamp { prefix } => format!("{prefix}.{}", stamp.compact()),
            Naming::LinkBasename => last_segment(&entry.link).to_string(),
        };

        if name.is_empty() {
            log::debug!("Skipping entry without a usable name: {}", entry.link);
            return None;
        }
        Some(name)
    }
}

/// Graphic published next to an advisory: `<grandparent>/<dir>_vag.png`.
fn vag_graphic(advisory_url: &str) -> Option<String> {
    let directory = second_to_last_segment(advisory_url)?;
    let parent = grandparent(advisory_url)?;
    Some(format!("{parent}/{directory}_vag.png"))
}

/// Build a record for a local advisory file.
///
/// The body is left empty; it is read from disk when needed.
pub fn local_record<E>(path: &Path, output_dir: &Path, exists: E) -> Result<AdvisoryRecord>
where
    E: Fn(&Path, &str) -> bool,
{
    let absolute = std::path::absolute(path)?;
    let filename = absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::config(format!("{} is not a file path", path.display())))?;
    let advisory_url = Url::from_file_path(&absolute)
        .map_err(|_| AppError::config(format!("Cannot build a file URL for {}", path.display())))?;

    Ok(AdvisoryRecord {
        source_id: LOCAL_SOURCE_ID.to_string(),
        display_title: absolute.display().to_string(),
        already_converted: exists(output_dir, &output_name(&filename)),
        filename,
        advisory_url: advisory_url.to_string(),
        graphic_url: None,
        body_text: None,
    })
}
