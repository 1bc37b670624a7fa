use std::path::Path;

use lite_fs::AtomicWriteOptions;
use tokio::io::AsyncReadExt;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::record::MetadataRecord;
use crate::sniff;

/// Outcome of decoding a metadata record onto disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovered {
    /// Extension picked by [`sniff::detect`], always dotted.
    pub extension: String,
    pub original_file_name: String,
    pub bytes: u64,
}

#[derive(Clone, Copy, Debug)]
pub struct Recoverer {
    codec: Codec,
    max_record_bytes: Option<u64>,
}

impl Recoverer {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            max_record_bytes: None,
        }
    }

    /// Refuse records longer than `limit` bytes before parsing them.
    pub fn max_record_bytes(mut self, limit: u64) -> Self {
        self.max_record_bytes = Some(limit);
        self
    }

    pub async fn read_record(&self, metadata_path: &Path) -> Result<MetadataRecord> {
        let limit = self.max_record_bytes.unwrap_or(u64::MAX);
        let file = tokio::fs::File::open(metadata_path)
            .await
            .map_err(Error::io(metadata_path))?;

        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .await
            .map_err(Error::io(metadata_path))?;
        if bytes.len() as u64 > limit {
            return Err(Error::PayloadTooLarge { limit });
        }
        MetadataRecord::from_slice(&bytes)
    }

    /// Decode the record at `metadata_path` into `provisional_path`.
    ///
    /// Nothing is written when the record or its payload is unusable.
    pub async fn recover(
        &self,
        metadata_path: &Path,
        provisional_path: &Path,
    ) -> Result<Recovered> {
        let record = self.read_record(metadata_path).await?;
        let codec = self.codec;
        let provisional = provisional_path.to_path_buf();

        let recovered = tokio::task::spawn_blocking(move || -> Result<Recovered> {
            let raw = record.decode_payload(&codec)?;
            lite_fs::atomic_write(&provisional, &raw, AtomicWriteOptions::new().sync(true))?;
            Ok(Recovered {
                extension: sniff::detect(&record),
                original_file_name: record.original_file_name,
                bytes: raw.len() as u64,
            })
        })
        .await??;

        tracing::debug!(
            bytes = recovered.bytes,
            extension = %recovered.extension,
            "payload recovered"
        );
        Ok(recovered)
    }
}
