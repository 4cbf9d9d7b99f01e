// src/models/mod.rs

//! Domain models for the advisory fetcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod advisory;
mod config;
pub mod source;

// Re-export all public types
pub use advisory::{AdvisoryListEntry, AdvisoryRecord, output_name};
pub use config::{Config, ConverterConfig, FetcherConfig, PathsConfig};
pub use source::{BodyMode, GraphicLink, ListFormat, Naming, SourceConfig, TableColumns};
