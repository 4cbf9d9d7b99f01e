// src/lib.rs

//! Volcanic Ash Advisory fetcher library.
//!
//! Scrapes advisory lists published by regional advisory centres, extracts
//! the advisory messages and hands them to an external KML converter.

pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod scan;
pub mod services;
pub mod storage;
pub mod utils;
