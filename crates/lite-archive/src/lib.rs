//! Zip containers holding a single reserved entry.
//!
//! # Architecture
//!
//! - `format.rs` - Zip signature sniffing
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract/` - Entry sources and the selective extraction pipeline
//! - `write.rs` - Container building with atomic placement

pub use entry::{Disposition, Entry, ExtractReport};
pub use error::{Error, Result};
pub use extract::{EntrySource, ZipSource, extract, extract_container, metadata_path};
pub use options::{ExtractOptions, METADATA_ENTRY, WriteOptions};
pub use sanitize::{SanitizedPath, sanitize_path};
pub use write::ContainerBuilder;

pub mod entry;
mod error;
pub mod extract;
pub mod format;
pub mod options;
mod sanitize;
mod write;
