//! Session lifecycle: working directories, final naming, delivery and cleanup.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lite_fs::{Cleanup, Workspace};

use crate::codec::Encoding;
use crate::config::Config;
use crate::error::{Error, Operation, Result};
use crate::extract::Extractor;
use crate::naming;
use crate::pack::Packager;
use crate::recover::Recoverer;
use crate::sniff;

/// Name of the provisional file inside a recovery working directory.
const PROVISIONAL_NAME: &str = ".recovered.partial";
const FALLBACK_NAME: &str = "recovered";

/// A file handed over by the collaborator, plus the name the client gave it.
#[derive(Clone, Debug)]
pub struct Upload {
    pub path: PathBuf,
    pub original_name: String,
}

impl Upload {
    pub fn new(path: impl Into<PathBuf>, original_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: original_name.into(),
        }
    }
}

/// Consumer of a session's output file.
///
/// The file is removed once `deliver` returns, whatever the result.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, path: &Path, display_name: &str) -> io::Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivered {
    pub display_name: String,
    pub bytes: u64,
}

/// Header of a container's record, read without materializing the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSummary {
    pub original_file_name: String,
    pub file_extension: Option<String>,
    pub detected_extension: String,
    pub encoding: Option<Encoding>,
    pub encoded_len: usize,
    pub entries: usize,
}

/// Runs packing and recovery sessions under one storage root.
#[derive(Clone, Debug)]
pub struct Sessions {
    config: Config,
    extractor: Extractor,
    recoverer: Recoverer,
}

impl Sessions {
    pub fn new(config: Config) -> Self {
        Self {
            extractor: Extractor::new(&config),
            recoverer: Recoverer::new(config.codec())
                .max_record_bytes(config.max_record_bytes()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Package `upload` into a container and hand it to `delivery`.
    ///
    /// Cleanup order: upload, container, working directory.
    #[tracing::instrument(skip_all, fields(session = tracing::field::Empty))]
    pub async fn pack(&self, upload: &Upload, delivery: &dyn Delivery) -> Result<Delivered> {
        ensure_available(&upload.path).await?;

        let mut cleanup = Cleanup::new();
        cleanup.file(&upload.path);

        let result = async {
            let workspace = self.open_workspace(&upload.original_name)?;
            let result = self.pack_in(&workspace, upload, delivery, &mut cleanup).await;
            cleanup.dir(workspace.keep());
            result
        }
        .await;

        self.finish(Operation::Pack, cleanup, &result).await;
        result
    }

    async fn pack_in(
        &self,
        workspace: &Workspace,
        upload: &Upload,
        delivery: &dyn Delivery,
        cleanup: &mut Cleanup,
    ) -> Result<Delivered> {
        tracing::info!(name = %upload.original_name, "packing");

        let packager = Packager::new(&self.config, workspace.path());
        cleanup.file(packager.container_path(&upload.original_name));

        let extension = naming::extension_of(&upload.original_name);
        let container = packager
            .pack(&upload.path, &upload.original_name, extension.as_deref())
            .await?;

        let bytes = tokio::fs::metadata(&container)
            .await
            .map_err(Error::io(&container))?
            .len();
        let display_name = file_name_of(&container);

        deliver(delivery, &container, &display_name).await?;
        Ok(Delivered { display_name, bytes })
    }

    /// Recover the original file from a re-submitted container and hand it to `delivery`.
    ///
    /// Cleanup order: upload, metadata record, provisional or final file, working directory.
    #[tracing::instrument(skip_all, fields(session = tracing::field::Empty))]
    pub async fn recover(&self, upload: &Upload, delivery: &dyn Delivery) -> Result<Delivered> {
        ensure_available(&upload.path).await?;

        let mut cleanup = Cleanup::new();
        cleanup.file(&upload.path);

        let result = async {
            let base = naming::strip_container_suffix(
                &upload.original_name,
                &self.config.container_suffix,
            );
            let workspace = self.open_workspace(base)?;
            let result = self
                .recover_in(&workspace, upload, delivery, &mut cleanup)
                .await;
            cleanup.dir(workspace.keep());
            result
        }
        .await;

        self.finish(Operation::Recover, cleanup, &result).await;
        result
    }

    async fn recover_in(
        &self,
        workspace: &Workspace,
        upload: &Upload,
        delivery: &dyn Delivery,
        cleanup: &mut Cleanup,
    ) -> Result<Delivered> {
        tracing::info!(name = %upload.original_name, "recovering");

        let provisional = workspace.join(PROVISIONAL_NAME);
        cleanup.file(self.extractor.metadata_path(workspace.path()));
        cleanup.file(&provisional);

        let metadata = self.extractor.extract(&upload.path, workspace.path()).await?;
        let recovered = self.recoverer.recover(&metadata, &provisional).await?;

        let base = self.display_base(&upload.original_name, &recovered.original_file_name);
        let display_name = naming::final_file_name(&base, &recovered.extension);
        let final_path = workspace.join(&display_name);

        tokio::fs::rename(&provisional, &final_path)
            .await
            .map_err(Error::io(&final_path))?;
        cleanup.replace_file(&provisional, &final_path);
        tracing::debug!(final_name = %display_name, "provisional file renamed");

        deliver(delivery, &final_path, &display_name).await?;
        Ok(Delivered {
            display_name,
            bytes: recovered.bytes,
        })
    }

    /// Read a container's record header. The upload itself is left in place.
    #[tracing::instrument(skip_all, fields(session = tracing::field::Empty))]
    pub async fn inspect(&self, upload: &Upload) -> Result<RecordSummary> {
        ensure_available(&upload.path).await?;

        let mut cleanup = Cleanup::new();
        let result = async {
            let base = naming::strip_container_suffix(
                &upload.original_name,
                &self.config.container_suffix,
            );
            let workspace = self.open_workspace(base)?;
            cleanup.file(self.extractor.metadata_path(workspace.path()));
            let result = self.inspect_in(&workspace, upload).await;
            cleanup.dir(workspace.keep());
            result
        }
        .await;

        let outcome = result.as_ref().map(|_| ());
        self.finish_with(Operation::Recover, cleanup, outcome).await;
        result
    }

    async fn inspect_in(&self, workspace: &Workspace, upload: &Upload) -> Result<RecordSummary> {
        let report = self
            .extractor
            .extract_report(&upload.path, workspace.path())
            .await?;
        let record = self.recoverer.read_record(&report.metadata_path).await?;
        Ok(RecordSummary {
            detected_extension: sniff::detect(&record),
            encoded_len: record.encoded_payload.len(),
            original_file_name: record.original_file_name,
            file_extension: record.file_extension,
            encoding: record.encoding,
            entries: report.entry_count(),
        })
    }

    /// `<sessions>/<key>-<uuid>`, guarded until the session hands it to its cleanup list.
    fn open_workspace(&self, name: &str) -> Result<Workspace> {
        let id = uuid::Uuid::new_v4();
        tracing::Span::current().record("session", tracing::field::display(id));

        let dir = self
            .config
            .sessions_dir()
            .join(format!("{}-{id}", naming::session_key(name)));
        let workspace = Workspace::new(&dir)?;
        tracing::debug!(dir = %dir.display(), "working directory created");
        Ok(workspace)
    }

    /// Original name for the final file: the container's own name without its
    /// suffix, else the name stored in the record.
    fn display_base(&self, upload_name: &str, record_name: &str) -> String {
        let stripped = naming::strip_container_suffix(upload_name, &self.config.container_suffix);
        naming::safe_file_name(stripped)
            .or_else(|| naming::safe_file_name(record_name))
            .unwrap_or_else(|| FALLBACK_NAME.to_string())
    }

    async fn finish(&self, operation: Operation, cleanup: Cleanup, result: &Result<Delivered>) {
        if let Ok(delivered) = result {
            tracing::info!(
                display_name = %delivered.display_name,
                bytes = delivered.bytes,
                "session complete"
            );
        }
        self.finish_with(operation, cleanup, result.as_ref().map(|_| ()))
            .await;
    }

    async fn finish_with(
        &self,
        operation: Operation,
        cleanup: Cleanup,
        outcome: std::result::Result<(), &Error>,
    ) {
        if let Err(e) = outcome {
            tracing::error!(?operation, error = %e, "session failed");
        }

        match tokio::task::spawn_blocking(move || cleanup.run()).await {
            Ok(report) if report.is_clean() => {
                tracing::debug!(
                    removed = report.removed.len(),
                    missing = report.missing.len(),
                    "session artifacts removed"
                );
            }
            Ok(report) => {
                tracing::warn!(failures = report.failures.len(), "session cleanup incomplete");
            }
            Err(e) => tracing::warn!(error = %e, "cleanup task failed"),
        }
    }
}

async fn ensure_available(path: &Path) -> Result<()> {
    let unavailable = |source| Error::InputUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let meta = tokio::fs::metadata(path).await.map_err(unavailable)?;
    if !meta.is_file() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "upload is not a regular file",
        )));
    }
    Ok(())
}

async fn deliver(delivery: &dyn Delivery, path: &Path, display_name: &str) -> Result<()> {
    delivery
        .deliver(path, display_name)
        .await
        .map_err(|source| Error::DeliveryFailed {
            display_name: display_name.to_string(),
            source,
        })?;
    tracing::debug!(display_name, "delivered");
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}
