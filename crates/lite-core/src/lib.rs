//! Packaging and recovery of self-describing containers.
//!
//! A file is encoded into a [`MetadataRecord`] and stored as the single
//! reserved entry of a zip container. Recovery extracts that entry, decodes
//! the payload, names the result and hands it to a [`Delivery`].
//!
//! # Architecture
//!
//! - `codec.rs` - payload text encodings
//! - `record.rs` - the JSON metadata record
//! - `sniff.rs` - extension detection with a `.txt` fallback
//! - `pack.rs` / `extract.rs` / `recover.rs` - the pipeline stages
//! - `session.rs` - working directories, delivery and cleanup

pub mod codec;
pub mod config;
mod error;
pub mod extract;
pub mod naming;
pub mod pack;
pub mod record;
pub mod recover;
pub mod session;
pub mod sniff;

pub use codec::{Codec, Encoding};
pub use config::Config;
pub use error::{Error, Operation, Result};
pub use extract::Extractor;
pub use pack::Packager;
pub use record::MetadataRecord;
pub use recover::{Recovered, Recoverer};
pub use session::{Delivered, Delivery, RecordSummary, Sessions, Upload};
