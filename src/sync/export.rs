// SPDX-License-Identifier: MPL-2.0
//! Export of the selected originals.
//!
//! Two modes: the backend bundles the selection into one zip archive, or each
//! original is fetched and written into a folder on its own. In the individual
//! mode a failing item is reported and skipped; the remaining items are still
//! saved.

use crate::application::port::MediaHost;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Fallback name for URLs without a usable last segment.
const FALLBACK_FILE_STEM: &str = "image";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// One zip archive built by the backend.
    #[default]
    Zip,
    /// One file per selected original.
    Individual,
}

/// Progress of an individual export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    Started { total: usize },
    ItemSaved { url: String, path: PathBuf },
    ItemFailed { url: String, reason: String },
    Finished(ExportReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportReport {
    pub saved: usize,
    pub failed: usize,
}

/// What the export status line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    /// Export was requested with nothing checked.
    NothingSelected,
    /// Waiting for the user to pick a destination.
    ChoosingDestination(ExportMode),
    /// Waiting for the backend to build the archive.
    Archiving { count: usize },
    /// Individual export in progress.
    Saving { done: usize, total: usize },
    ArchiveSaved { count: usize },
    ArchiveFailed,
    Finished(ExportReport),
}

impl ExportPhase {
    /// True while an export occupies the export button.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            ExportPhase::ChoosingDestination(_)
                | ExportPhase::Archiving { .. }
                | ExportPhase::Saving { .. }
        )
    }

    /// Applies a progress event of an individual export.
    pub fn apply(&mut self, event: &ExportEvent) {
        *self = match (*self, event) {
            (_, ExportEvent::Started { total }) => ExportPhase::Saving {
                done: 0,
                total: *total,
            },
            (
                ExportPhase::Saving { done, total },
                ExportEvent::ItemSaved { .. } | ExportEvent::ItemFailed { .. },
            ) => ExportPhase::Saving {
                done: (done + 1).min(total),
                total,
            },
            (_, ExportEvent::Finished(report)) => ExportPhase::Finished(*report),
            (phase, _) => phase,
        };
    }
}

/// Derives a local file name from an image URL, unique within `taken`.
pub fn file_name_for(url: &str, taken: &mut HashSet<String>) -> String {
    let url = url.split(['?', '#']).next().unwrap_or_default();
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => url,
    };
    let segment = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();
    let sanitized: String = segment
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let base = if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        FALLBACK_FILE_STEM.to_string()
    } else {
        sanitized
    };

    if taken.insert(base.clone()) {
        return base;
    }

    let (stem, extension) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{ext}")),
        _ => (base.clone(), String::new()),
    };
    let mut counter = 1;
    loop {
        let candidate = format!("{stem}-{counter}{extension}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

/// Asks the backend for a zip of `urls` and writes it to `target`.
///
/// Returns the archive size in bytes.
pub async fn export_archive(
    host: Arc<dyn MediaHost>,
    urls: Vec<String>,
    target: PathBuf,
) -> Result<u64> {
    let count = urls.len();
    let archive = host.download_archive(urls).await.map_err(Error::from)?;
    tokio::fs::write(&target, &archive).await?;
    tracing::info!(count, bytes = archive.len(), target = %target.display(), "archive saved");
    Ok(archive.len() as u64)
}

/// Fetches every URL and writes it into `destination`, one file each.
pub async fn export_individually(
    host: Arc<dyn MediaHost>,
    urls: Vec<String>,
    destination: PathBuf,
    events: UnboundedSender<ExportEvent>,
) -> ExportReport {
    let _ = events.send(ExportEvent::Started { total: urls.len() });
    let mut taken = HashSet::new();
    let mut report = ExportReport::default();

    for url in urls {
        let name = file_name_for(&url, &mut taken);
        let path = destination.join(name);

        match save_one(host.as_ref(), &url, &path).await {
            Ok(()) => {
                report.saved += 1;
                tracing::debug!(%url, path = %path.display(), "image saved");
                let _ = events.send(ExportEvent::ItemSaved { url, path });
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(%url, %err, "skipping image");
                let _ = events.send(ExportEvent::ItemFailed {
                    url,
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(saved = report.saved, failed = report.failed, "export finished");
    let _ = events.send(ExportEvent::Finished(report));
    report
}

async fn save_one(host: &dyn MediaHost, url: &str, path: &Path) -> Result<()> {
    let bytes = host.fetch(url.to_string()).await?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
