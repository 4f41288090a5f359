// SPDX-License-Identifier: MPL-2.0
//! Gallery and sync newtypes.
//!
//! Type-safe wrappers for the tunables of the upload coordinator and the
//! gallery paginator. Constructors clamp into the supported range so values
//! read from `settings.toml` never need checking at the usage site.

use std::time::Duration;

// =============================================================================
// Bounds
// =============================================================================

/// Page size bounds (descriptors per listing request).
pub mod page_size_bounds {
    /// Minimum page size.
    pub const MIN: u32 = 1;
    /// Maximum page size.
    pub const MAX: u32 = 500;
    /// Default page size.
    pub const DEFAULT: u32 = 50;
}

/// Upload attempt bounds (attempts per file per run).
pub mod attempt_bounds {
    /// Minimum number of attempts.
    pub const MIN: u32 = 1;
    /// Maximum number of attempts.
    pub const MAX: u32 = 20;
    /// Default number of attempts.
    pub const DEFAULT: u32 = 5;
}

/// Retry delay bounds in milliseconds.
pub mod retry_delay_bounds {
    /// Minimum delay between two attempts.
    pub const MIN_MS: u64 = 0;
    /// Maximum delay between two attempts.
    pub const MAX_MS: u64 = 60_000;
    /// Default delay between two attempts.
    pub const DEFAULT_MS: u64 = 1_000;
}

/// Upload concurrency bounds (files in flight).
pub mod concurrency_bounds {
    /// Minimum concurrency (sequential).
    pub const MIN: usize = 1;
    /// Maximum concurrency.
    pub const MAX: usize = 16;
    /// Default concurrency.
    pub const DEFAULT: usize = 1;
}

/// Scroll threshold bounds in logical pixels.
pub mod scroll_threshold_bounds {
    /// Minimum remaining distance that triggers a sync.
    pub const MIN: f32 = 0.0;
    /// Maximum remaining distance that triggers a sync.
    pub const MAX: f32 = 5_000.0;
    /// Default remaining distance that triggers a sync.
    pub const DEFAULT: f32 = 500.0;
}

// =============================================================================
// PageCursor
// =============================================================================

/// Monotonic offset into the backend's paginated listing.
///
/// The cursor only moves forward, one page at a time, or back to zero on a
/// full gallery reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageCursor(u32);

impl PageCursor {
    /// The first page.
    pub const START: Self = Self(0);

    /// Returns the zero-based page number.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the cursor of the following page.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

// =============================================================================
// PageSize
// =============================================================================

/// Number of descriptors requested per listing page (1–500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    /// Creates a page size, clamping to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(page_size_bounds::MIN, page_size_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(page_size_bounds::DEFAULT)
    }
}

// =============================================================================
// MaxAttempts
// =============================================================================

/// Retry ceiling for a single upload (1–20 attempts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxAttempts(u32);

impl MaxAttempts {
    /// Creates an attempt ceiling, clamping to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(attempt_bounds::MIN, attempt_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns true if `attempt` (1-based) is the final allowed attempt or past it.
    #[must_use]
    pub fn is_exhausted_by(self, attempt: u32) -> bool {
        attempt >= self.0
    }
}

impl Default for MaxAttempts {
    fn default() -> Self {
        Self(attempt_bounds::DEFAULT)
    }
}

// =============================================================================
// RetryDelay
// =============================================================================

/// Fixed pause between two attempts of the same upload (0–60 s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDelay(u64);

impl RetryDelay {
    /// Creates a retry delay from milliseconds, clamping to the valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(retry_delay_bounds::MIN_MS, retry_delay_bounds::MAX_MS))
    }

    /// Returns the delay in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the delay as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for RetryDelay {
    fn default() -> Self {
        Self(retry_delay_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// UploadConcurrency
// =============================================================================

/// Number of files uploaded at the same time (1 = sequential).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConcurrency(usize);

impl UploadConcurrency {
    /// Creates a concurrency limit, clamping to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(concurrency_bounds::MIN, concurrency_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for UploadConcurrency {
    fn default() -> Self {
        Self(concurrency_bounds::DEFAULT)
    }
}

// =============================================================================
// ScrollThreshold
// =============================================================================

/// Remaining scroll distance (logical px) under which the next page is fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThreshold(f32);

impl ScrollThreshold {
    /// Creates a threshold, clamping to the valid range. NaN maps to the default.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(
            scroll_threshold_bounds::MIN,
            scroll_threshold_bounds::MAX,
        ))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for ScrollThreshold {
    fn default() -> Self {
        Self(scroll_threshold_bounds::DEFAULT)
    }
}
