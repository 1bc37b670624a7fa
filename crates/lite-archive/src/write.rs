use std::io::{Cursor, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::options::WriteOptions;

/// Builds a zip container from in-memory entries.
#[derive(Clone, Debug, Default)]
pub struct ContainerBuilder {
    entries: Vec<(String, Vec<u8>)>,
    options: WriteOptions,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn entry(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.entries.push((name.into(), data));
        self
    }

    fn file_options(&self) -> SimpleFileOptions {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        match self.options.compression_level {
            Some(level) => options.compression_level(Some(level.into())),
            None => options,
        }
    }

    fn write_into<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = zip::ZipWriter::new(writer);
        for (name, data) in &self.entries {
            zip.start_file(name.as_str(), self.file_options())?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_into(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the container to `target`.
    ///
    /// The zip is assembled in a temporary file in the target's directory and
    /// renamed over `target` only once the central directory is on disk.
    pub fn write_to(&self, target: &Path) -> Result<u64> {
        let parent = target
            .parent()
            .ok_or_else(|| lite_fs::Error::NoParent(target.to_path_buf()))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".container-")
            .tempfile_in(parent)
            .map_err(|e| Error::WriteFailed {
                path: target.to_path_buf(),
                source: e,
            })?;

        self.write_into(tmp.as_file_mut())?;
        tmp.as_file().sync_all().map_err(|e| Error::WriteFailed {
            path: target.to_path_buf(),
            source: e,
        })?;

        let file = tmp.persist(target).map_err(|e| Error::WriteFailed {
            path: target.to_path_buf(),
            source: e.error,
        })?;
        let size = file
            .metadata()
            .map_err(|e| Error::WriteFailed {
                path: target.to_path_buf(),
                source: e,
            })?
            .len();

        tracing::debug!(
            path = %target.display(),
            bytes = size,
            entries = self.entries.len(),
            "container written"
        );
        Ok(size)
    }
}
