// SPDX-License-Identifier: MPL-2.0
//! Gallery synchronization workflows.
//!
//! - [`upload`]: upload queue and retrying batch coordinator
//! - [`paginator`]: one-request-at-a-time page cursor and scroll trigger
//! - [`gallery`]: rendered items, visibility and lazy thumbnails
//! - [`selection`]: checked image URLs
//! - [`export`]: zip or per-file export of the selection
//!
//! Everything here is UI-agnostic apart from the thumbnail image handles, and
//! only talks to the network through [`MediaHost`](crate::application::port::MediaHost).

pub mod export;
pub mod gallery;
pub mod paginator;
pub mod selection;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;
