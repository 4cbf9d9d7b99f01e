//! Pipeline entry points for fetcher operations.
//!
//! - `run_list`: Fetch the advisories of a source
//! - `run_convert`: Fetch a source and convert selected advisories to KML
//! - `run_import`: Convert a local advisory file
//! - `run_validate`: Check the configuration

pub mod convert;
pub mod list;
pub mod validate;

pub use convert::{ConvertSummary, run_convert, run_import, select_records};
pub use list::run_list;
pub use validate::run_validate;
