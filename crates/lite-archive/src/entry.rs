use std::path::PathBuf;

/// What happened to an entry during extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Streamed to disk as the reserved entry.
    Persisted,
    /// Read to its end and thrown away.
    Discarded,
    Directory,
}

/// Represents a container entry visited during extraction.
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub size: u64,
    pub disposition: Disposition,
}

impl Entry {
    pub fn new(name: impl Into<String>, size: u64, disposition: Disposition) -> Self {
        Self {
            name: name.into(),
            size,
            disposition,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExtractReport {
    /// Where the reserved entry was written.
    pub metadata_path: PathBuf,
    pub entries: Vec<Entry>,
    pub total_bytes: u64,
}

impl ExtractReport {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn discarded(&self) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(|e| e.disposition == Disposition::Discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_fields() {
        let entry = Entry::new("metadata.bin", 1024, Disposition::Persisted);
        assert_eq!(entry.name, "metadata.bin");
        assert_eq!(entry.size, 1024);
        assert_eq!(entry.disposition, Disposition::Persisted);
    }

    #[test]
    fn report_discarded() {
        let report = ExtractReport {
            metadata_path: PathBuf::from("metadata.bin"),
            entries: vec![
                Entry::new("metadata.bin", 10, Disposition::Persisted),
                Entry::new("original", 5, Disposition::Discarded),
                Entry::new("dir/", 0, Disposition::Directory),
            ],
            total_bytes: 15,
        };
        assert_eq!(report.entry_count(), 3);
        let discarded: Vec<_> = report.discarded().map(|e| e.name.as_str()).collect();
        assert_eq!(discarded, vec!["original"]);
    }
}
