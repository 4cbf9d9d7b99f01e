//! Advisory list entries and records.

use serde::{Deserialize, Serialize};

/// One advisory as listed on a source's index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryListEntry {
    /// Advisory link, absolute or relative to the list page
    pub link: String,

    /// Volcano name
    pub volcano: String,

    /// Timestamp exactly as the source prints it
    pub observed_at: String,

    /// Graphic link, for layouts that list one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphic: Option<String>,

    /// Remaining cell texts of the row, in column order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_row: Vec<String>,
}

/// An advisory ready for presentation and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    /// Identifier of the source it was fetched from
    pub source_id: String,

    /// `"<timestamp> (<volcano>)"`
    pub display_title: String,

    /// Stable local file name
    pub filename: String,

    /// Absolute URL of the advisory page
    pub advisory_url: String,

    /// Absolute URL of the ash cloud graphic
    pub graphic_url: Option<String>,

    /// Advisory text, once obtained
    pub body_text: Option<String>,

    /// A converted file for this advisory already exists
    pub already_converted: bool,
}

impl AdvisoryRecord {
    /// Name of the converted file produced for this record.
    pub fn output_name(&self) -> String {
        output_name(&self.filename)
    }

    /// Copy of the record carrying the given body.
    pub fn with_body(self, body: impl Into<String>) -> Self {
        Self {
            body_text: Some(body.into()),
            ..self
        }
    }

    /// Display title, tagged when already converted.
    pub fn label(&self) -> String {
        if self.already_converted {
            format!("{} (converted)", self.display_title)
        } else {
            self.display_title.clone()
        }
    }
}

/// Converted file name for a stored advisory file name.
///
/// Only the last path segment is used; an `.html` suffix becomes `.kml`,
/// anything else gets `.kml` appended.
pub fn output_name(filename: &str) -> String {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    match base.strip_suffix(".html") {
        Some(stem) => format!("{stem}.kml"),
        None => format!("{base}.kml"),
    }
}
