// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::application::port::HostError;
use crate::domain::gallery::ImageDescriptor;
use crate::error::Error;
use crate::sync::export::ExportEvent;
use crate::sync::paginator::PageTicket;
use crate::sync::upload::UploadEvent;
use crate::ui::{gallery_grid, toolbar};
use std::path::PathBuf;

/// Top-level messages consumed by `App::update`. The variants forward
/// component messages and carry the results of background work.
#[derive(Debug, Clone)]
pub enum Message {
    Toolbar(toolbar::Message),
    Gallery(gallery_grid::Message),
    /// Result of the file picker; empty when cancelled.
    FilesChosen(Vec<PathBuf>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    Upload(UploadEvent),
    PageLoaded(PageTicket, Result<Vec<ImageDescriptor>, HostError>),
    ThumbnailLoaded(String, Result<Vec<u8>, HostError>),
    WindowResized(iced::Size),
    ArchiveTargetChosen(Vec<String>, Option<PathBuf>),
    ArchiveSaved(Result<u64, Error>),
    ExportFolderChosen(Vec<String>, Option<PathBuf>),
    Export(ExportEvent),
}

/// Runtime flags passed from `main.rs` into the application.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g., `fr`, `en-US`).
    pub lang: Option<String>,
    /// Overrides `[endpoints] api_base_url` from the settings file.
    pub api_url: Option<String>,
}
