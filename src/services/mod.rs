//! Service layer for the advisory fetcher.
//!
//! - Record assembly from list pages (`RecordAssembler`)
//! - HTTP fetching of lists and advisory pages (`AdvisoryFetcher`)
//! - KML conversion through the external tool (`Converter`)

mod assembler;
mod convert;
mod fetcher;

pub use assembler::{LOCAL_SOURCE_ID, RecordAssembler, local_record};
pub use convert::{Conversion, Converter, html_content, html_name};
pub use fetcher::{AdvisoryFetcher, FetchOutcome};
