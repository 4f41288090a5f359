// SPDX-License-Identifier: MPL-2.0
//! Gallery domain types.
//!
//! - [`types`]: descriptors, upload tasks and their statuses
//! - [`newtypes`]: clamped tunables (page size, retry ceiling, delays)

pub mod newtypes;
pub mod types;

pub use newtypes::{
    MaxAttempts, PageCursor, PageSize, RetryDelay, ScrollThreshold, UploadConcurrency,
};
pub use types::{FileKey, ImageDescriptor, UploadStatus, UploadTask};
