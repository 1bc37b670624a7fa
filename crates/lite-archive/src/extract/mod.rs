//! Selective, streaming extraction of a container.
//!
//! Every entry is visited in archive order. The reserved entry is written to
//! the working directory; everything else is read to its end and dropped, so
//! a successful return means the whole container was consumed and the
//! persisted file is complete on disk.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::entry::{Disposition, Entry, ExtractReport};
use crate::error::{Error, Result};
use crate::format;
use crate::options::ExtractOptions;
use crate::sanitize::sanitize_path;

mod zip;

pub use self::zip::ZipSource;

/// An entry read from the container but not yet processed.
pub struct PendingEntry<R> {
    pub name: String,
    pub size: u64,
    pub kind: PendingEntryKind<R>,
}

pub enum PendingEntryKind<R> {
    File(R),
    Directory,
}

/// Container-specific entry source.
pub trait EntrySource {
    type Reader<'a>: Read
    where
        Self: 'a;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>>;
}

/// Main extraction pipeline.
pub fn extract<S: EntrySource>(
    source: &mut S,
    working_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let metadata_path = working_dir.join(&options.target_name);
    let mut persisted = false;
    let mut entries = Vec::new();
    let mut total_bytes = 0u64;
    let limit = options.max_entry_bytes.unwrap_or(u64::MAX);

    while let Some(pending) = source.next_entry() {
        let pending = pending?;
        let sanitized = sanitize_path(&pending.name, working_dir)?;
        ensure_parent(&sanitized.resolved)?;

        let entry = match pending.kind {
            PendingEntryKind::Directory => {
                ensure_directory(&sanitized.resolved)?;
                Entry::new(pending.name, 0, Disposition::Directory)
            }
            PendingEntryKind::File(mut reader) if pending.name == options.entry_name => {
                if persisted {
                    return Err(Error::DuplicateEntry { name: pending.name });
                }
                let written = persist(&mut reader, &metadata_path, options)?;
                persisted = true;
                tracing::debug!(entry = %pending.name, bytes = written, "persisted entry");
                Entry::new(pending.name, written, Disposition::Persisted)
            }
            PendingEntryKind::File(mut reader) => {
                let drained = copy_bounded(&mut reader, &mut io::sink(), limit)
                    .map_err(|e| Error::ExtractionFailed {
                        path: sanitized.resolved.clone(),
                        source: e,
                    })?
                    .ok_or_else(|| too_large(&pending.name, limit))?;
                tracing::debug!(entry = %pending.name, bytes = drained, "discarded entry");
                Entry::new(pending.name, drained, Disposition::Discarded)
            }
        };

        total_bytes += entry.size;
        entries.push(entry);
    }

    if !persisted {
        return Err(Error::MissingEntry {
            name: options.entry_name.clone(),
        });
    }

    Ok(ExtractReport {
        metadata_path,
        entries,
        total_bytes,
    })
}

/// Stream `reader` into a staging file next to `target`, then rename it into place.
fn persist(reader: &mut impl Read, target: &Path, options: &ExtractOptions) -> Result<u64> {
    let staging = lite_fs::staging_path(target)?;
    let limit = options.max_entry_bytes.unwrap_or(u64::MAX);

    let written = (|| -> io::Result<Option<u64>> {
        let mut file = File::create(&staging)?;
        let Some(written) = copy_bounded(reader, &mut file, limit)? else {
            return Ok(None);
        };
        if options.sync {
            file.sync_all()?;
        }
        std::fs::rename(&staging, target)?;
        Ok(Some(written))
    })();

    match written {
        Ok(Some(written)) => Ok(written),
        Ok(None) => {
            let _ = lite_fs::remove_file_if_exists(&staging);
            Err(too_large(&options.entry_name, limit))
        }
        Err(e) => {
            let _ = lite_fs::remove_file_if_exists(&staging);
            Err(Error::ExtractionFailed {
                path: target.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Copy at most `limit` bytes. `None` means the reader held more than that.
fn copy_bounded(
    reader: &mut impl Read,
    writer: &mut impl Write,
    limit: u64,
) -> io::Result<Option<u64>> {
    let copied = io::copy(&mut reader.by_ref().take(limit.saturating_add(1)), writer)?;
    Ok((copied <= limit).then_some(copied))
}

fn too_large(name: &str, limit: u64) -> Error {
    Error::EntryTooLarge {
        name: name.to_string(),
        limit,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => ensure_directory(parent),
        None => Ok(()),
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Extract the reserved entry of the container at `container` into `working_dir`.
pub fn extract_container(
    container: &Path,
    working_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut file = File::open(container).map_err(|e| Error::ExtractionFailed {
        path: container.to_path_buf(),
        source: e,
    })?;

    if !format::detect_from_reader(&mut file)? {
        return Err(Error::UnsupportedFormat);
    }

    ensure_directory(working_dir)?;
    let mut source = ZipSource::new(io::BufReader::new(file))?;
    extract(&mut source, working_dir, options)
}

/// Path the reserved entry lands on for a given working directory.
pub fn metadata_path(working_dir: &Path, options: &ExtractOptions) -> PathBuf {
    working_dir.join(&options.target_name)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::write::ContainerBuilder;

    fn build(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = ContainerBuilder::new();
        for (name, data) in entries {
            builder = builder.entry(*name, data.to_vec());
        }
        builder.to_bytes().unwrap()
    }

    #[test]
    fn persists_reserved_entry_only() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = build(&[("original", b"raw payload"), ("metadata.bin", b"{\"a\":1}")]);
        let mut source = ZipSource::new(Cursor::new(bytes)).unwrap();

        let report = extract(&mut source, dir.path(), &ExtractOptions::default()).unwrap();

        assert_eq!(report.entry_count(), 2);
        assert_eq!(std::fs::read(&report.metadata_path).unwrap(), b"{\"a\":1}");
        assert!(!dir.path().join("original").exists());
        assert_eq!(report.discarded().count(), 1);
    }

    #[test]
    fn missing_reserved_entry() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = build(&[("original", b"raw payload")]);
        let mut source = ZipSource::new(Cursor::new(bytes)).unwrap();

        let result = extract(&mut source, dir.path(), &ExtractOptions::default());
        assert!(matches!(result, Err(Error::MissingEntry { .. })));
        assert!(!dir.path().join("metadata.bin").exists());
    }

    #[test]
    fn reserved_entry_over_the_ceiling_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = build(&[("metadata.bin", &[b'x'; 8192])]);
        let mut source = ZipSource::new(Cursor::new(bytes)).unwrap();
        let options = ExtractOptions::default().max_entry_bytes(8191);

        let result = extract(&mut source, dir.path(), &options);

        assert!(matches!(
            result,
            Err(Error::EntryTooLarge { ref name, limit: 8191 }) if name == "metadata.bin"
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn entry_at_the_ceiling_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = build(&[("metadata.bin", &[b'x'; 8192])]);
        let mut source = ZipSource::new(Cursor::new(bytes)).unwrap();
        let options = ExtractOptions::default().max_entry_bytes(8192);

        let report = extract(&mut source, dir.path(), &options).unwrap();
        assert_eq!(report.total_bytes, 8192);
    }

    #[test]
    fn oversized_extra_entry_stops_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = build(&[("original", &[0u8; 65_536]), ("metadata.bin", b"{}")]);
        let mut source = ZipSource::new(Cursor::new(bytes)).unwrap();
        let options = ExtractOptions::default().max_entry_bytes(1024);

        let result = extract(&mut source, dir.path(), &options);
        assert!(matches!(
            result,
            Err(Error::EntryTooLarge { ref name, .. }) if name == "original"
        ));
        assert!(!dir.path().join("metadata.bin").exists());
    }

    #[test]
    fn extract_container_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.b3d");
        std::fs::write(&path, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        let work = dir.path().join("work");
        let result = extract_container(&path, &work, &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }
}
