use std::path::{Path, PathBuf};

use lite_archive::{ExtractOptions, ExtractReport};

use crate::config::Config;
use crate::error::{Error, Result};

/// Async front for [`lite_archive::extract_container`].
#[derive(Clone, Debug)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.extract_options(),
        }
    }

    /// Where the metadata record lands inside `working_dir`.
    pub fn metadata_path(&self, working_dir: &Path) -> PathBuf {
        lite_archive::metadata_path(working_dir, &self.options)
    }

    /// Extract the metadata entry and return its path.
    ///
    /// Resolves only after every entry was visited and the record was synced.
    pub async fn extract(&self, container: &Path, working_dir: &Path) -> Result<PathBuf> {
        Ok(self.extract_report(container, working_dir).await?.metadata_path)
    }

    pub async fn extract_report(
        &self,
        container: &Path,
        working_dir: &Path,
    ) -> Result<ExtractReport> {
        let container = container.to_path_buf();
        let working_dir = working_dir.to_path_buf();
        let options = self.options.clone();

        let report = tokio::task::spawn_blocking(move || {
            lite_archive::extract_container(&container, &working_dir, &options)
        })
        .await?
        .map_err(|source| match source {
            lite_archive::Error::EntryTooLarge { limit, .. } => Error::PayloadTooLarge { limit },
            source => Error::ContainerMalformed { source },
        })?;

        for entry in report.discarded() {
            tracing::warn!(
                entry = %entry.name,
                bytes = entry.size,
                "ignored extra container entry"
            );
        }
        tracing::debug!(
            entries = report.entry_count(),
            total_bytes = report.total_bytes,
            "extraction complete"
        );
        Ok(report)
    }
}
