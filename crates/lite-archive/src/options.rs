/// Name of the reserved entry carrying the metadata record.
pub const METADATA_ENTRY: &str = "metadata.bin";

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Entry name that gets persisted; every other entry is drained.
    pub entry_name: String,
    /// File name the persisted entry is written to inside the working directory.
    pub target_name: String,
    /// fsync the persisted entry before extraction reports completion.
    pub sync: bool,
    /// Largest number of bytes any single entry may expand to.
    pub max_entry_bytes: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            entry_name: METADATA_ENTRY.to_string(),
            target_name: METADATA_ENTRY.to_string(),
            sync: true,
            max_entry_bytes: None,
        }
    }
}

impl ExtractOptions {
    pub fn entry_name(mut self, name: impl Into<String>) -> Self {
        self.entry_name = name.into();
        self
    }

    pub fn target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = name.into();
        self
    }

    pub fn max_entry_bytes(mut self, limit: u64) -> Self {
        self.max_entry_bytes = Some(limit);
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WriteOptions {
    /// Deflate level for every entry; `None` uses the zip crate's default.
    pub compression_level: Option<u8>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression_level: Some(9),
        }
    }
}

impl WriteOptions {
    pub fn compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }
}
