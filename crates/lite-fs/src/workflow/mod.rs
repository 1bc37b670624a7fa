pub mod cleanup;
pub mod workspace;

pub use cleanup::{Artifact, Cleanup, CleanupReport};
pub use workspace::Workspace;
