// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the sync logic remains
//! independent of the HTTP client.
//!
//! # Available Ports
//!
//! - [`media_host`]: Upload, listing, archive export and byte fetches
//!
//! # Example
//!
//! ```ignore
//! use iced_gallery::application::port::{MediaHost, PageRequest};
//! use iced_gallery::domain::gallery::{PageCursor, PageSize};
//!
//! async fn first_page(host: &dyn MediaHost) -> usize {
//!     let request = PageRequest { page: PageCursor::START, limit: PageSize::default() };
//!     host.list_page(request).await.map(|page| page.len()).unwrap_or(0)
//! }
//! ```

pub mod media_host;

pub use media_host::{HostError, HostResult, MediaHost, PageRequest, ProgressFn, UploadFile};
