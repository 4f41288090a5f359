// SPDX-License-Identifier: MPL-2.0
//! Media hosting port definition.
//!
//! This module defines the [`MediaHost`] trait: the three HTTP calls the
//! client is built on (upload, list, export) plus plain byte fetches used for
//! thumbnails and individual downloads.
//!
//! # Design Notes
//!
//! - Methods return boxed futures so the trait stays object safe and can be
//!   shared as `Arc<dyn MediaHost>` between Iced tasks
//! - Upload byte progress is reported through a callback, not through the
//!   returned future
//! - Network failures and non-2xx responses are distinct variants of
//!   [`HostError`] but callers treat both as "attempt failed"

use crate::domain::gallery::{ImageDescriptor, PageCursor, PageSize};
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// HostError
// =============================================================================

/// Errors returned by a media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The request could not be sent or the connection failed.
    Network(String),

    /// The server answered with a non-success status code.
    Status(u16),

    /// The response body could not be decoded.
    Decode(String),

    /// A local file could not be read.
    Io(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Network(msg) => write!(f, "Network error: {msg}"),
            HostError::Status(code) => write!(f, "HTTP status {code}"),
            HostError::Decode(msg) => write!(f, "Invalid response: {msg}"),
            HostError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Result type for media host operations.
pub type HostResult<T> = Result<T, HostError>;

// =============================================================================
// Requests
// =============================================================================

/// Byte progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A file ready to be sent to the upload endpoint.
#[derive(Clone)]
pub struct UploadFile {
    /// File name sent in the multipart `file` part.
    pub name: String,
    /// Raw file content.
    pub bytes: Arc<Vec<u8>>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// One page of the backend listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: PageCursor,
    /// Descriptors per page.
    pub limit: PageSize,
}

// =============================================================================
// MediaHost
// =============================================================================

/// Remote media hosting backend.
pub trait MediaHost: Send + Sync {
    /// Uploads one file and returns the URL of the stored original.
    fn upload(&self, file: UploadFile, progress: ProgressFn) -> BoxFuture<'_, HostResult<String>>;

    /// Fetches one page of descriptors, in backend order. An empty page means
    /// there is no more data.
    fn list_page(&self, request: PageRequest) -> BoxFuture<'_, HostResult<Vec<ImageDescriptor>>>;

    /// Asks the backend to bundle the given originals into one archive.
    fn download_archive(&self, urls: Vec<String>) -> BoxFuture<'_, HostResult<Vec<u8>>>;

    /// Fetches the raw bytes behind a URL (thumbnail or original).
    fn fetch(&self, url: String) -> BoxFuture<'_, HostResult<Vec<u8>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display() {
        assert_eq!(HostError::Status(502).to_string(), "HTTP status 502");
        assert!(HostError::Network("refused".into())
            .to_string()
            .contains("refused"));
    }

    #[test]
    fn upload_file_debug_hides_content() {
        let file = UploadFile {
            name: "a.jpg".into(),
            bytes: Arc::new(vec![0; 3]),
        };
        let debug = format!("{file:?}");
        assert!(debug.contains("len: 3"));
    }
}
