// SPDX-License-Identifier: MPL-2.0
//! Core gallery types: remote image descriptors and local upload tasks.

use std::fmt;
use std::path::PathBuf;

// =============================================================================
// ImageDescriptor
// =============================================================================

/// One remote image as described by the backend listing.
///
/// The client never holds an authoritative copy: descriptors only live in the
/// rendered gallery until the next reset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageDescriptor {
    /// URL of the small preview rendered in the grid.
    pub thumbnail: String,
    /// URL of the full-resolution original, also the selection key.
    pub original: String,
}

impl ImageDescriptor {
    /// Creates a descriptor from distinct thumbnail and original URLs.
    #[must_use]
    pub fn new(thumbnail: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            thumbnail: thumbnail.into(),
            original: original.into(),
        }
    }

    /// Creates a descriptor for a listing entry that only carries one URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            thumbnail: url.clone(),
            original: url,
        }
    }
}

// =============================================================================
// FileKey
// =============================================================================

/// Deduplication key of an upload task: file name plus byte size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey {
    /// File name without directory.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
}

impl FileKey {
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.size)
    }
}

// =============================================================================
// UploadStatus
// =============================================================================

/// Lifecycle of an upload task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStatus {
    /// Queued, or currently being attempted.
    #[default]
    Pending,
    /// Uploaded; the task carries the remote URL.
    Success,
    /// Every attempt of the last run failed.
    Failed,
}

impl UploadStatus {
    /// Stable lowercase name, used in the queue snapshot.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Success => "success",
            UploadStatus::Failed => "failed",
        }
    }

    /// Parses the snapshot name. Unknown values map to `Pending`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "success" => UploadStatus::Success,
            "failed" => UploadStatus::Failed,
            _ => UploadStatus::Pending,
        }
    }
}

// =============================================================================
// UploadTask
// =============================================================================

/// A file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    /// Deduplication key.
    pub key: FileKey,
    /// Local file backing the task. `None` for entries restored from the
    /// snapshot until the user selects the same file again.
    pub source: Option<PathBuf>,
    /// Remote URL, set once an attempt succeeded.
    pub url: Option<String>,
    /// Current status.
    pub status: UploadStatus,
    /// Attempts made during the latest run.
    pub attempts: u32,
}

impl UploadTask {
    /// Creates a pending task for a freshly selected file.
    #[must_use]
    pub fn new(key: FileKey, source: PathBuf) -> Self {
        Self {
            key,
            source: Some(source),
            url: None,
            status: UploadStatus::Pending,
            attempts: 0,
        }
    }

    /// Returns true if the task can be picked up by an upload run.
    #[must_use]
    pub fn is_uploadable(&self) -> bool {
        self.source.is_some() && self.status != UploadStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_from_bare_url_uses_it_twice() {
        let descriptor = ImageDescriptor::from_url("https://cdn.test/a.jpg");
        assert_eq!(descriptor.thumbnail, descriptor.original);
    }

    #[test]
    fn upload_status_round_trips_through_names() {
        for status in [
            UploadStatus::Pending,
            UploadStatus::Success,
            UploadStatus::Failed,
        ] {
            assert_eq!(UploadStatus::parse(status.as_str()), status);
        }
        assert_eq!(UploadStatus::parse("uploading"), UploadStatus::Pending);
    }

    #[test]
    fn restored_task_without_source_is_not_uploadable() {
        let mut task = UploadTask::new(FileKey::new("a.jpg", 10), PathBuf::from("/tmp/a.jpg"));
        assert!(task.is_uploadable());

        task.source = None;
        assert!(!task.is_uploadable());
    }

    #[test]
    fn successful_task_is_not_uploadable() {
        let mut task = UploadTask::new(FileKey::new("a.jpg", 10), PathBuf::from("/tmp/a.jpg"));
        task.status = UploadStatus::Success;
        assert!(!task.is_uploadable());
    }

    #[test]
    fn file_key_display_includes_size() {
        assert_eq!(FileKey::new("a.jpg", 42).to_string(), "a.jpg (42 bytes)");
    }
}
