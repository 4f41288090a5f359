// SPDX-License-Identifier: MPL-2.0
//! `iced_gallery` is a desktop photo gallery client built with the Iced GUI
//! framework.
//!
//! It uploads local images to a media host with per-file retries, browses
//! the remote gallery page by page with lazily loaded thumbnails, keeps a
//! persisted selection and exports it as a zip archive or as single files.
//!
//! # Layers
//!
//! - [`domain`] - Gallery types and validated settings newtypes
//! - [`application`] - The [`MediaHost`](application::port::MediaHost) port
//! - [`infrastructure`] - The `reqwest` adapter for that port
//! - [`sync`] - Upload coordinator, paginator, gallery, selection and export
//! - [`app`] - Iced application, session, configuration and local storage
//! - [`ui`] - Widgets and styles

#![doc(html_root_url = "https://docs.rs/iced_gallery/0.1.0")]

pub mod app;
pub mod application;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod sync;
pub mod ui;
