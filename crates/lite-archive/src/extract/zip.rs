use std::io::{Read, Seek};

use crate::Result;
use crate::extract::{EntrySource, PendingEntry, PendingEntryKind};

pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    /// Reads the central directory; truncated containers fail here.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive, index: 0 })
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    type Reader<'a>
        = zip::read::ZipFile<'a, R>
    where
        Self: 'a;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<Self::Reader<'_>>>> {
        if self.index >= self.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let file = match self.archive.by_index(index) {
            Ok(f) => f,
            Err(e) => return Some(Err(e.into())),
        };

        let name = file.name().to_string();
        let size = file.size();
        let kind = if file.is_dir() {
            PendingEntryKind::Directory
        } else {
            PendingEntryKind::File(file)
        };

        Some(Ok(PendingEntry { name, size, kind }))
    }
}
