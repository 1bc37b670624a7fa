use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lite_core::Delivery;
use tokio::fs::{self, OpenOptions};

/// Copies session output into a directory under its display name.
///
/// An existing file at the destination is never overwritten.
#[derive(Clone, Debug)]
pub struct DirectoryDelivery {
    out_dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn destination(&self, display_name: &str) -> PathBuf {
        self.out_dir.join(display_name)
    }
}

#[async_trait]
impl Delivery for DirectoryDelivery {
    async fn deliver(&self, path: &Path, display_name: &str) -> io::Result<()> {
        fs::create_dir_all(&self.out_dir).await?;
        let target = self.destination(display_name);

        let mut dest = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;

        let copied = async {
            let mut src = fs::File::open(path).await?;
            let bytes = tokio::io::copy(&mut src, &mut dest).await?;
            dest.sync_all().await?;
            Ok::<_, io::Error>(bytes)
        }
        .await;

        match copied {
            Ok(bytes) => {
                tracing::info!(dest = %target.display(), bytes, "written");
                Ok(())
            }
            Err(e) => {
                drop(dest);
                let _ = fs::remove_file(&target).await;
                Err(e)
            }
        }
    }
}
