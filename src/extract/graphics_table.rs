// src/extract/graphics_table.rs

//! Table layout with volcano, date, advisory link and graphic link columns.
//!
//! The page may hold several tables; only rows after the last `<tbody>` in
//! the source are kept. Rows of a later table without its own `<tbody>` are
//! kept too and fall out as too short.

use std::mem;

use crate::models::{AdvisoryListEntry, TableColumns};
use crate::scan::{TagEvent, TagStream};

use super::ListExtractor;

/// Text and link of one table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub href: String,
}

/// Parsing state for [`GraphicsTableExtractor`].
#[derive(Debug, Default)]
pub struct GraphicsTableState {
    href: String,
    text: String,
    row: Vec<TableCell>,
    rows: Vec<Vec<TableCell>>,
}

impl GraphicsTableState {
    /// Advance on one event.
    pub fn step(&mut self, event: &TagEvent) {
        match event {
            TagEvent::StartTag { name, .. } => match name.as_str() {
                "tbody" => *self = Self::default(),
                "tr" => {
                    self.row.clear();
                    self.href.clear();
                    self.text.clear();
                }
                "a" => {
                    if let Some(href) = event.attr("href") {
                        self.href = href.to_string();
                    }
                }
                _ => {}
            },
            TagEvent::Text { content } => self.text.push_str(content.trim()),
            TagEvent::EndTag { name } => match name.as_str() {
                "td" => self.row.push(TableCell {
                    text: mem::take(&mut self.text),
                    href: mem::take(&mut self.href),
                }),
                "tr" => {
                    let row = mem::take(&mut self.row);
                    if !row.is_empty() {
                        self.rows.push(row);
                    }
                }
                _ => {}
            },
        }
    }

    /// Completed rows of the last table body.
    pub fn into_rows(self) -> Vec<Vec<TableCell>> {
        self.rows
    }
}

/// Extractor for graphics-table pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphicsTableExtractor {
    columns: TableColumns,
}

impl GraphicsTableExtractor {
    pub fn new(columns: TableColumns) -> Self {
        Self { columns }
    }

    /// Raw rows of the last table body.
    pub fn rows(&self, page: &[u8]) -> Vec<Vec<TableCell>> {
        let mut state = GraphicsTableState::default();
        for event in TagStream::from_bytes(page) {
            state.step(&event);
        }
        state.into_rows()
    }

    fn entry(&self, row: &[TableCell]) -> Option<AdvisoryListEntry> {
        if row.len() < self.columns.width() {
            log::debug!("Skipping table row with {} cells", row.len());
            return None;
        }
        let advisory = &row[self.columns.advisory];
        if advisory.href.is_empty() {
            log::debug!("Skipping table row without advisory link: {}", advisory.text);
            return None;
        }
        let graphic = &row[self.columns.graphic].href;

        Some(AdvisoryListEntry {
            link: advisory.href.clone(),
            volcano: row[self.columns.volcano].text.clone(),
            observed_at: row[self.columns.timestamp].text.clone(),
            graphic: (!graphic.is_empty()).then(|| graphic.clone()),
            extra_row: row.iter().map(|cell| cell.text.clone()).collect(),
        })
    }
}

impl ListExtractor for GraphicsTableExtractor {
    fn extract(&self, page: &[u8]) -> Vec<AdvisoryListEntry> {
        self.rows(page)
            .iter()
            .filter_map(|row| self.entry(row))
            .collect()
    }
}
