// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration settings.
//!
//! Numeric bounds live next to the domain newtypes that enforce them
//! (`domain::gallery::newtypes`); this module only holds what the settings
//! file falls back to.

// ==========================================================================
// Endpoints
// ==========================================================================

/// Multipart upload endpoint of the media hosting API.
pub const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/dj5gimioa/upload";

/// Unsigned upload preset sent with every upload.
pub const DEFAULT_UPLOAD_PRESET: &str = "unsigned_upload";

/// Base URL of the gallery backend.
pub const DEFAULT_API_BASE_URL: &str = "https://your-render-backend.onrender.com";

/// Timeout applied to every HTTP request (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Smallest accepted request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Largest accepted request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3_600;

// ==========================================================================
// Gallery
// ==========================================================================

/// Thumbnails per grid row.
pub const DEFAULT_GRID_COLUMNS: usize = 4;

/// Smallest accepted column count.
pub const MIN_GRID_COLUMNS: usize = 1;

/// Largest accepted column count.
pub const MAX_GRID_COLUMNS: usize = 12;

/// Decoded thumbnails kept in memory.
pub const DEFAULT_THUMBNAIL_CACHE_SIZE: usize = 500;

/// Smallest accepted thumbnail cache size.
pub const MIN_THUMBNAIL_CACHE_SIZE: usize = 1;

/// Largest accepted thumbnail cache size.
pub const MAX_THUMBNAIL_CACHE_SIZE: usize = 10_000;

// ==========================================================================
// Export
// ==========================================================================

/// File name proposed when saving a zip archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "photos.zip";
