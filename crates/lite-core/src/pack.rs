use std::path::{Path, PathBuf};

use lite_archive::{ContainerBuilder, WriteOptions};

use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::naming;
use crate::record::MetadataRecord;

/// Fallback container name when the supplied one has no usable component.
const UNNAMED: &str = "packed";

/// Wraps a source file into a single-entry container.
#[derive(Clone, Debug)]
pub struct Packager {
    codec: Codec,
    suffix: String,
    entry_name: String,
    write_options: WriteOptions,
    output_dir: PathBuf,
    max_source_bytes: u64,
}

impl Packager {
    pub fn new(config: &Config, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            codec: config.codec(),
            suffix: config.container_suffix.clone(),
            entry_name: config.metadata_entry.clone(),
            write_options: config.write_options(),
            output_dir: output_dir.into(),
            max_source_bytes: config.max_source_bytes,
        }
    }

    /// Where a container for `original_file_name` is written.
    pub fn container_path(&self, original_file_name: &str) -> PathBuf {
        let name = naming::safe_file_name(original_file_name).unwrap_or_else(|| UNNAMED.into());
        self.output_dir
            .join(naming::container_file_name(&name, &self.suffix))
    }

    /// Read `source` fully, encode it and write `<output_dir>/<name><suffix>`.
    ///
    /// The source file is left in place.
    pub async fn pack(
        &self,
        source: &Path,
        original_file_name: &str,
        file_extension: Option<&str>,
    ) -> Result<PathBuf> {
        let input_unavailable = |source_err| Error::InputUnavailable {
            path: source.to_path_buf(),
            source: source_err,
        };

        let size = tokio::fs::metadata(source)
            .await
            .map_err(input_unavailable)?
            .len();
        if size > self.max_source_bytes {
            return Err(Error::SourceTooLarge {
                path: source.to_path_buf(),
                size,
                limit: self.max_source_bytes,
            });
        }

        let raw = tokio::fs::read(source).await.map_err(input_unavailable)?;
        let target = self.container_path(original_file_name);
        let record_name = naming::safe_file_name(original_file_name)
            .unwrap_or_else(|| original_file_name.to_string());

        let codec = self.codec;
        let entry_name = self.entry_name.clone();
        let options = self.write_options;
        let extension = file_extension.map(str::to_string);
        let container = target.clone();

        let written = tokio::task::spawn_blocking(move || -> Result<u64> {
            let record = MetadataRecord::encode(&codec, &raw, record_name, extension)?;
            ContainerBuilder::new()
                .options(options)
                .entry(entry_name, record.to_vec()?)
                .write_to(&container)
                .map_err(|source| Error::ContainerWrite { source })
        })
        .await??;

        tracing::debug!(
            container = %target.display(),
            source_bytes = size,
            container_bytes = written,
            codec = %self.codec.encoding(),
            "container written"
        );
        Ok(target)
    }
}
