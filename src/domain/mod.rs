// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with ZERO external dependencies.
//!
//! This module contains pure domain types and value objects. It depends on
//! nothing but `std` so it can be tested in isolation.
//!
//! # Modules
//!
//! - [`gallery`]: Gallery types ([`ImageDescriptor`](gallery::ImageDescriptor),
//!   [`UploadTask`](gallery::UploadTask), [`PageCursor`](gallery::PageCursor),
//!   [`MaxAttempts`](gallery::MaxAttempts))

pub mod gallery;
