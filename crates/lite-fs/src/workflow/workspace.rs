use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A directory that exists for as long as the value does.
///
/// The directory is created on construction and removed recursively on drop
/// unless [`Workspace::keep`] was called.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    kept: bool,
}

impl Workspace {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(|e| Error::Write {
                path: path.clone(),
                source: e,
            })?;
        }

        Ok(Self { path, kept: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, child: impl AsRef<Path>) -> PathBuf {
        self.path.join(child)
    }

    /// Disarm the drop guard and hand back the path.
    pub fn keep(mut self) -> PathBuf {
        self.kept = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.kept && self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "workspace cleanup failed");
            }
        }
    }
}
