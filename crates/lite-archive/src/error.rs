use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a zip container")]
    UnsupportedFormat,

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry path is empty or contains a null byte")]
    InvalidPath,

    #[error("archive is corrupted: {source}")]
    Corrupted { source: zip::result::ZipError },

    #[error("container has no '{name}' entry")]
    MissingEntry { name: String },

    #[error("container has more than one '{name}' entry")]
    DuplicateEntry { name: String },

    #[error("entry '{name}' expands past the {limit} byte limit")]
    EntryTooLarge { name: String, limit: u64 },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {path}: {source}")]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },

    #[error("failed to write container '{path}': {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    #[error("filesystem operation failed: {source}")]
    Fs { source: lite_fs::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<lite_fs::Error> for Error {
    fn from(e: lite_fs::Error) -> Self {
        Self::Fs { source: e }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupted { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
