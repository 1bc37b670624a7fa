//! Filesystem primitives used by the packaging and recovery sessions.
//!
//! - `primitives/` - atomic writes and idempotent removal
//! - `workflow/` - self-cleaning workspaces and ordered cleanup lists

mod error;
pub mod primitives;
pub mod workflow;

pub use error::{Error, Result};
pub use primitives::{
    AtomicWriteOptions, atomic_write, remove_dir_all_if_exists, remove_file_if_exists,
    staging_path,
};
pub use workflow::{Artifact, Cleanup, CleanupReport, Workspace};
