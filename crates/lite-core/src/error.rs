use std::io;
use std::path::PathBuf;

use crate::codec::CodecError;

/// Which kind of session an error surfaced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Pack,
    Recover,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("upload '{path}' is unavailable: {source}")]
    InputUnavailable { path: PathBuf, source: io::Error },

    #[error("source '{path}' is {size} bytes, over the {limit} byte limit")]
    SourceTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("container is malformed: {source}")]
    ContainerMalformed { source: lite_archive::Error },

    #[error("failed to write container: {source}")]
    ContainerWrite { source: lite_archive::Error },

    #[error("recovered data exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: u64 },

    #[error("metadata record is corrupt: {reason}")]
    MetadataCorrupt { reason: String },

    #[error("failed to encode payload: {source}")]
    Encode { source: CodecError },

    #[error("failed to serialize metadata record: {source}")]
    Serialize { source: serde_json::Error },

    #[error("failed to deliver '{display_name}': {source}")]
    DeliveryFailed { display_name: String, source: io::Error },

    #[error("I/O error on '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] lite_fs::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Self::Config(Box::new(e))
    }
}

impl Error {
    /// Text safe to show to whoever submitted the file.
    pub fn user_message(&self, operation: Operation) -> &'static str {
        match (self, operation) {
            (Self::InputUnavailable { .. }, _) => "Send your file again, please.",
            (Self::SourceTooLarge { .. }, _) => "The file is too large to package.",
            (_, Operation::Pack) => "Error during packaging.",
            (_, Operation::Recover) => "Error during recovery.",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
