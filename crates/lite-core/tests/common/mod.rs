#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use lite_core::{Config, Delivery, Encoding, Upload};

pub fn config(root: &Path, codec: Encoding) -> Config {
    Config {
        storage_root: root.to_path_buf(),
        codec,
        ..Config::default()
    }
}

/// Place `bytes` in a fresh upload slot under `root`.
pub fn upload(root: &Path, name: &str, bytes: &[u8]) -> Upload {
    let slot = root.join("uploads").join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(slot.parent().unwrap()).unwrap();
    std::fs::write(&slot, bytes).unwrap();
    Upload::new(slot, name)
}

/// Nothing left under `<root>/sessions`.
pub fn assert_no_sessions(root: &Path) {
    let sessions = root.join("sessions");
    if sessions.exists() {
        let leftovers: Vec<PathBuf> = std::fs::read_dir(&sessions)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert!(leftovers.is_empty(), "leftover session dirs: {leftovers:?}");
    }
}

/// Keeps a copy of everything it is handed.
#[derive(Default)]
pub struct Collect {
    pub delivered: Mutex<Vec<(String, Vec<u8>)>>,
    pub seen_paths: Mutex<Vec<PathBuf>>,
}

impl Collect {
    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        std::mem::take(&mut *self.delivered.lock().unwrap())
    }

    pub fn single(&self) -> (String, Vec<u8>) {
        let mut all = self.take();
        assert_eq!(all.len(), 1, "expected exactly one delivery");
        all.remove(0)
    }
}

#[async_trait]
impl Delivery for Collect {
    async fn deliver(&self, path: &Path, display_name: &str) -> io::Result<()> {
        let bytes = tokio::fs::read(path).await?;
        self.seen_paths.lock().unwrap().push(path.to_path_buf());
        self.delivered
            .lock()
            .unwrap()
            .push((display_name.to_string(), bytes));
        Ok(())
    }
}

/// Simulates a client that went away mid-transfer.
pub struct Broken;

#[async_trait]
impl Delivery for Broken {
    async fn deliver(&self, path: &Path, _display_name: &str) -> io::Result<()> {
        assert!(path.is_file());
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "client disconnected"))
    }
}

pub struct Panics;

#[async_trait]
impl Delivery for Panics {
    async fn deliver(&self, _path: &Path, _display_name: &str) -> io::Result<()> {
        panic!("delivery blew up");
    }
}
