// SPDX-License-Identifier: MPL-2.0
//! Local key-value store for state that survives restarts.
//!
//! Each key is one CBOR file in the app data directory:
//! - `uploadQueue` - the upload tasks with their status, URL and attempt count
//! - `selectedImages` - the checked image URLs
//!
//! Reading never fails hard. A missing entry yields an empty value, a corrupt
//! one yields an empty value plus a warning key that the UI can show.
//!
//! # Path Resolution
//!
//! 1. Use [`LocalStore::open`] with an explicit directory
//! 2. `--data-dir` CLI flag or `ICED_GALLERY_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::domain::gallery::{FileKey, UploadStatus, UploadTask};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Key of the persisted upload queue.
pub const QUEUE_KEY: &str = "uploadQueue";

/// Key of the persisted selection.
pub const SELECTION_KEY: &str = "selectedImages";

/// One upload task as stored on disk. The local file path is not stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueSnapshotEntry {
    pub name: String,
    pub size: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
}

impl From<&UploadTask> for QueueSnapshotEntry {
    fn from(task: &UploadTask) -> Self {
        Self {
            name: task.key.name.clone(),
            size: task.key.size,
            url: task.url.clone(),
            status: task.status.as_str().to_string(),
            attempts: task.attempts,
        }
    }
}

impl From<QueueSnapshotEntry> for UploadTask {
    fn from(entry: QueueSnapshotEntry) -> Self {
        UploadTask {
            key: FileKey::new(entry.name, entry.size),
            source: None,
            url: entry.url,
            status: UploadStatus::parse(&entry.status),
            attempts: entry.attempts,
        }
    }
}

/// CBOR-backed key-value store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: Option<PathBuf>,
}

impl LocalStore {
    /// Opens the store in `base_dir`, or in the resolved data directory.
    pub fn open(base_dir: Option<PathBuf>) -> Self {
        Self {
            dir: paths::get_app_data_dir_with_override(base_dir),
        }
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(format!("{key}.cbor")))
    }

    /// Reads the value stored under `key`.
    ///
    /// Returns a tuple of (value, optional_warning).
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> (T, Option<String>) {
        let Some(path) = self.entry_path(key) else {
            return (T::default(), None);
        };

        if !path.exists() {
            return (T::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(value) => (value, None),
                Err(err) => {
                    tracing::warn!(key, %err, "discarding unreadable store entry");
                    (
                        T::default(),
                        Some("notification-state-parse-error".to_string()),
                    )
                }
            },
            Err(err) => {
                tracing::warn!(key, %err, "cannot open store entry");
                (
                    T::default(),
                    Some("notification-state-read-error".to_string()),
                )
            }
        }
    }

    /// Replaces the value stored under `key`.
    ///
    /// Returns an optional warning key if the write failed.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Option<String> {
        let Some(path) = self.entry_path(key) else {
            return None;
        };

        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return Some("notification-state-dir-error".to_string());
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                if let Err(err) = write_entry(value, file) {
                    tracing::warn!(key, %err, "cannot write store entry");
                    return Some("notification-state-write-error".to_string());
                }
                tracing::trace!(key, "store entry saved");
                None
            }
            Err(err) => {
                tracing::warn!(key, %err, "cannot create store entry");
                Some("notification-state-create-error".to_string())
            }
        }
    }

    /// Restores the upload queue. Restored tasks have no local file attached.
    pub fn load_queue(&self) -> (Vec<UploadTask>, Option<String>) {
        let (entries, warning): (Vec<QueueSnapshotEntry>, _) = self.load(QUEUE_KEY);
        (entries.into_iter().map(UploadTask::from).collect(), warning)
    }

    pub fn save_queue(&self, tasks: &[UploadTask]) -> Option<String> {
        let entries: Vec<QueueSnapshotEntry> = tasks.iter().map(QueueSnapshotEntry::from).collect();
        self.save(QUEUE_KEY, &entries)
    }

    pub fn load_selection(&self) -> (Vec<String>, Option<String>) {
        self.load(SELECTION_KEY)
    }

    pub fn save_selection(&self, urls: &[String]) -> Option<String> {
        self.save(SELECTION_KEY, urls)
    }
}

/// Encodes `value` and flushes it, so a failed final write is reported.
fn write_entry<T: Serialize + ?Sized>(value: &T, file: impl Write) -> Result<(), String> {
    let mut writer = BufWriter::new(file);
    ciborium::into_writer(value, &mut writer).map_err(|err| err.to_string())?;
    writer.flush().map_err(|err| err.to_string())
}
