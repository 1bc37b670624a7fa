use crate::Error;
use crate::primitives::{remove_dir_all_if_exists, remove_file_if_exists};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    File(PathBuf),
    Dir(PathBuf),
}

impl Artifact {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(p) | Self::Dir(p) => p,
        }
    }
}

/// Ordered list of artifacts to delete once a unit of work is over.
///
/// Every artifact is attempted regardless of earlier failures.
#[derive(Clone, Debug, Default)]
pub struct Cleanup {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failures: Vec<Error>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.push(Artifact::File(path.into()))
    }

    pub fn dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.push(Artifact::Dir(path.into()))
    }

    /// Re-registered paths keep their first position.
    pub fn push(&mut self, artifact: Artifact) -> &mut Self {
        if !self.artifacts.contains(&artifact) {
            self.artifacts.push(artifact);
        }
        self
    }

    /// Swap a registered file for another path, keeping its position.
    pub fn replace_file(&mut self, old: &Path, new: impl Into<PathBuf>) -> &mut Self {
        let new = new.into();
        match self
            .artifacts
            .iter_mut()
            .find(|a| matches!(a, Artifact::File(p) if p == old))
        {
            Some(slot) => *slot = Artifact::File(new),
            None => {
                self.file(new);
            }
        }
        self
    }

    pub fn run(self) -> CleanupReport {
        let mut report = CleanupReport::default();

        for artifact in self.artifacts {
            let result = match &artifact {
                Artifact::File(p) => remove_file_if_exists(p),
                Artifact::Dir(p) => remove_dir_all_if_exists(p),
            };
            match result {
                Ok(true) => report.removed.push(artifact.path().to_path_buf()),
                Ok(false) => report.missing.push(artifact.path().to_path_buf()),
                Err(e) => {
                    tracing::warn!(
                        path = %artifact.path().display(),
                        error = %e,
                        "cleanup step failed"
                    );
                    report.failures.push(e);
                }
            }
        }

        report
    }
}
