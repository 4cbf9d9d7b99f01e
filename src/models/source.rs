// src/models/source.rs

//! Advisory source definitions.
//!
//! Each advisory centre is described entirely by data: where its list page
//! lives, which markup idiom the page uses, and how records are named. The
//! site-specific heuristics (sentinel link text, expected directory, column
//! positions) live here so they can be re-tuned without touching the parsers.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Markup idiom of a source's advisory-list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListFormat {
    /// Table rows holding a timestamp, a volcano and a marker anchor.
    AnchorTable {
        /// Display text identifying canonical advisory links
        marker: String,
        /// Expected second-to-last path segment of advisory links
        directory: String,
    },

    /// `<ul>` items of the form `<volcano> - <YYYY-MM-DD HH:MM> utc`.
    UnorderedList,

    /// Table whose cells carry advisory and graphic links.
    GraphicsTable {
        #[serde(default)]
        columns: TableColumns,
    },

    /// The list page is a single plain-text advisory.
    PlainText,
}

/// Column positions for [`ListFormat::GraphicsTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumns {
    #[serde(default = "defaults::volcano_column")]
    pub volcano: usize,
    #[serde(default = "defaults::timestamp_column")]
    pub timestamp: usize,
    #[serde(default = "defaults::advisory_column")]
    pub advisory: usize,
    #[serde(default = "defaults::graphic_column")]
    pub graphic: usize,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            volcano: defaults::volcano_column(),
            timestamp: defaults::timestamp_column(),
            advisory: defaults::advisory_column(),
            graphic: defaults::graphic_column(),
        }
    }
}

impl TableColumns {
    /// Number of cells a row needs to carry every column.
    pub fn width(&self) -> usize {
        [self.volcano, self.timestamp, self.advisory, self.graphic]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Convention for naming the locally stored advisory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Naming {
    /// `<prefix>.<second-to-last URL segment>.html`
    DirectorySegment { prefix: String },
    /// `<prefix>.<YYYYmmddHHMM>` from the parsed timestamp
    Timestamp { prefix: String },
    /// Last path segment of the advisory link
    LinkBasename,
}

/// Where the graphic link of a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicLink {
    #[default]
    #[serde(rename = "none")]
    Omitted,
    /// The list entry carries it (graphics table)
    Column,
    /// `<advisory dir>/<segment>_vag.png` next to the advisory
    VagPng,
}

/// When the advisory body is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    /// Fetch and extract the advisory text while listing
    Eager,
    /// Fetch the raw page only when the caller asks for it
    #[default]
    Deferred,
    /// The list page itself is the body
    Inline,
}

/// A single advisory centre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Identifier used on the command line (e.g. "london")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// URL of the advisory-list page, also the base for relative links
    pub url: String,

    /// Maximum number of records returned per fetch
    #[serde(default = "defaults::fetch_limit")]
    pub fetch_limit: usize,

    pub format: ListFormat,

    pub naming: Naming,

    /// chrono format of the source's timestamps; raw strings are kept when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,

    #[serde(default)]
    pub graphic: GraphicLink,

    #[serde(default)]
    pub body: BodyMode,
}

impl SourceConfig {
    /// Parse the list page URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|e| {
            AppError::config(format!("Source '{}' has an invalid url {}: {e}", self.id, self.url))
        })
    }
}

/// Built-in advisory centres.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            id: "toulouse".to_string(),
            name: "VAAC Toulouse".to_string(),
            url: "http://vaac.meteo.fr/advisory/".to_string(),
            fetch_limit: defaults::fetch_limit(),
            format: ListFormat::UnorderedList,
            naming: Naming::DirectorySegment {
                prefix: "toulouse".to_string(),
            },
            timestamp_format: None,
            graphic: GraphicLink::VagPng,
            body: BodyMode::Eager,
        },
        SourceConfig {
            id: "anchorage".to_string(),
            name: "VAAC Anchorage".to_string(),
            url: "http://vaac.arh.noaa.gov/list_vaas.php".to_string(),
            fetch_limit: defaults::fetch_limit(),
            format: ListFormat::AnchorTable {
                marker: "X".to_string(),
                directory: "VAA".to_string(),
            },
            naming: Naming::LinkBasename,
            timestamp_format: Some("%Y-%m-%d %H:%M:%S".to_string()),
            graphic: GraphicLink::Omitted,
            body: BodyMode::Deferred,
        },
        SourceConfig {
            id: "london".to_string(),
            name: "VAAC London".to_string(),
            url: "http://www.metoffice.gov.uk/aviation/vaac/vaacuk.html".to_string(),
            fetch_limit: defaults::fetch_limit(),
            format: ListFormat::GraphicsTable {
                columns: TableColumns::default(),
            },
            naming: Naming::Timestamp {
                prefix: "london".to_string(),
            },
            timestamp_format: Some("%H:%M on %d %b %Y".to_string()),
            graphic: GraphicLink::Column,
            body: BodyMode::Eager,
        },
        SourceConfig {
            id: "test".to_string(),
            name: "Test advisory".to_string(),
            url: "https://github.com/metno/fetch-vaa/raw/master/files/london-201511101500.vaa.txt"
                .to_string(),
            fetch_limit: 1,
            format: ListFormat::PlainText,
            naming: Naming::Timestamp {
                prefix: "test".to_string(),
            },
            timestamp_format: Some("%Y%m%d/%H%MZ".to_string()),
            graphic: GraphicLink::Omitted,
            body: BodyMode::Inline,
        },
    ]
}

mod defaults {
    pub fn fetch_limit() -> usize {
        10
    }
    pub fn volcano_column() -> usize {
        0
    }
    pub fn timestamp_column() -> usize {
        1
    }
    pub fn advisory_column() -> usize {
        2
    }
    pub fn graphic_column() -> usize {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_have_valid_urls() {
        for source in default_sources() {
            assert!(source.base_url().is_ok(), "{}", source.id);
        }
    }

    #[test]
    fn test_table_columns_width() {
        assert_eq!(TableColumns::default().width(), 4);
        let columns = TableColumns {
            volcano: 5,
            ..TableColumns::default()
        };
        assert_eq!(columns.width(), 6);
    }

    #[test]
    fn test_source_from_toml() {
        let source: SourceConfig = toml::from_str(
            r#"
            id = "anchorage"
            name = "VAAC Anchorage"
            url = "https://vaac.arh.noaa.gov/list_vaas.php"
            timestamp_format = "%Y-%m-%d %H:%M:%S"
            format = { kind = "anchor_table", marker = "X", directory = "VAA" }
            naming = { kind = "link_basename" }
            "#,
        )
        .unwrap();

        assert_eq!(source.fetch_limit, 10);
        assert_eq!(source.body, BodyMode::Deferred);
        assert_eq!(source.graphic, GraphicLink::Omitted);
        assert_eq!(
            source.format,
            ListFormat::AnchorTable {
                marker: "X".to_string(),
                directory: "VAA".to_string(),
            }
        );
    }

    #[test]
    fn test_graphics_table_defaults_columns() {
        let source: SourceConfig = toml::from_str(
            r#"
            id = "london"
            name = "VAAC London"
            url = "https://www.metoffice.gov.uk/aviation/vaac/vaacuk.html"
            graphic = "column"
            body = "eager"
            format = { kind = "graphics_table" }
            naming = { kind = "timestamp", prefix = "london" }
            "#,
        )
        .unwrap();

        assert_eq!(
            source.format,
            ListFormat::GraphicsTable {
                columns: TableColumns::default()
            }
        );
        assert_eq!(source.graphic, GraphicLink::Column);
    }

    #[test]
    fn test_invalid_base_url() {
        let mut source = default_sources().remove(0);
        source.url = "not a url".to_string();
        assert!(matches!(source.base_url(), Err(AppError::Config(_))));
    }
}
