//! Output-directory storage.
//!
//! Advisory messages are written into the output directory as HTML, the
//! external converter turns them into KML next to them, and the HTML is
//! removed again once converted.
//!
//! ```text
//! {output_dir}/
//! ├── london.201511101500.kml     # converted
//! ├── FVAK21_20200501_1200.kml    # converted
//! └── toulouse.FVFE01.html        # awaiting (or failed) conversion
//! ```

pub mod local;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

pub use local::LocalStorage;

/// Whether `name` exists inside `dir`.
///
/// This is the existence predicate handed to the record assembler.
pub fn file_exists(dir: &Path, name: &str) -> bool {
    dir.join(name).is_file()
}

/// Trait for advisory output backends.
#[async_trait]
pub trait AdvisoryStorage: Send + Sync {
    /// Full path of a file in the store.
    fn path(&self, name: &str) -> PathBuf;

    /// Whether a file called `name` is present.
    async fn exists(&self, name: &str) -> bool;

    /// Write a file atomically, returning its path.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Read a file, returning `None` if it does not exist.
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Remove a file; removing a missing file is not an error.
    async fn remove(&self, name: &str) -> Result<()>;
}
