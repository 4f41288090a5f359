// SPDX-License-Identifier: MPL-2.0
//! Client session: owns the upload queue, the paginated gallery, the
//! selection and the export state.
//!
//! Handlers mutate the session synchronously and return the [`Effect`]s the
//! caller has to run (network requests, dialogs). Results come back through
//! the matching handler. Every change to the queue or the selection is
//! written to the [`LocalStore`] right away.

use super::config::Config;
use super::persisted_state::LocalStore;
use crate::application::port::HostError;
use crate::domain::gallery::{ImageDescriptor, PageSize, ScrollThreshold};
use crate::error::Error;
use crate::sync::export::{ExportEvent, ExportMode, ExportPhase};
use crate::sync::gallery::{Gallery, GalleryItem, GridLayout};
use crate::sync::paginator::{PageOutcome, PageTicket, Paginator, ScrollMetrics};
use crate::sync::selection::SelectionSet;
use crate::sync::upload::{SelectedFile, UploadEvent, UploadJob, UploadPolicy, UploadQueue};
use std::num::NonZeroUsize;

/// Work requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchPage(PageTicket),
    FetchThumbnails(Vec<String>),
    RunUploads(Vec<UploadJob>),
    /// Ask where to save the zip of these URLs.
    ChooseArchiveTarget(Vec<String>),
    /// Ask which folder receives these URLs.
    ChooseExportFolder(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub upload: UploadPolicy,
    pub page_size: PageSize,
    pub scroll_threshold: ScrollThreshold,
    pub layout: GridLayout,
    pub export_mode: ExportMode,
    pub thumbnail_cache: NonZeroUsize,
    /// Gallery height assumed until the first scroll or resize event.
    pub initial_viewport_height: f32,
}

impl SessionSettings {
    pub fn from_config(config: &Config, layout: GridLayout, initial_viewport_height: f32) -> Self {
        Self {
            upload: config.upload_policy(),
            page_size: config.page_size(),
            scroll_threshold: config.scroll_threshold(),
            layout: GridLayout {
                columns: config.grid_columns(),
                ..layout
            },
            export_mode: config.export_mode(),
            thumbnail_cache: config.thumbnail_cache_size(),
            initial_viewport_height,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    settings: SessionSettings,
    store: LocalStore,
    queue: UploadQueue,
    paginator: Paginator,
    gallery: Gallery,
    selection: SelectionSet,
    export: ExportPhase,
    scroll: ScrollMetrics,
    notice: Option<String>,
}

impl Session {
    /// Restores the persisted queue and selection from `store`.
    pub fn restore(settings: SessionSettings, store: LocalStore) -> Self {
        let (tasks, queue_warning) = store.load_queue();
        let (selected, selection_warning) = store.load_selection();
        tracing::debug!(
            tasks = tasks.len(),
            selected = selected.len(),
            "session restored"
        );

        Self {
            queue: UploadQueue::with_tasks(tasks),
            paginator: Paginator::new(settings.page_size),
            gallery: Gallery::new(settings.thumbnail_cache),
            selection: SelectionSet::restore(selected),
            export: ExportPhase::default(),
            scroll: ScrollMetrics {
                offset_y: 0.0,
                viewport_height: settings.initial_viewport_height,
                content_height: 0.0,
            },
            notice: queue_warning.or(selection_warning),
            settings,
            store,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn items(&self) -> &[GalleryItem] {
        self.gallery.items()
    }

    pub fn is_selected(&self, url: &str) -> bool {
        self.selection.contains(url)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn export_phase(&self) -> ExportPhase {
        self.export
    }

    pub fn is_fetching(&self) -> bool {
        self.paginator.is_fetching()
    }

    /// Latest notification key (store or network warning), if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Replaces the current notice with `key`.
    pub fn notify(&mut self, key: impl Into<String>) {
        self.notice = Some(key.into());
    }

    // -------------------------------------------------------------------------
    // Upload
    // -------------------------------------------------------------------------

    pub fn add_files(&mut self, files: Vec<SelectedFile>) {
        let changed = self.queue.enqueue(files);
        if changed > 0 {
            tracing::debug!(changed, "upload queue updated");
            self.persist_queue();
        }
    }

    pub fn start_upload(&mut self) -> Vec<Effect> {
        match self.queue.start_run() {
            Some(jobs) => {
                self.persist_queue();
                vec![Effect::RunUploads(jobs)]
            }
            None => Vec::new(),
        }
    }

    /// Applies upload progress. A finished batch reloads the gallery.
    pub fn upload_progress(&mut self, event: UploadEvent) -> Vec<Effect> {
        let finished = matches!(event, UploadEvent::BatchFinished(_));
        if self.queue.apply(&event) {
            self.persist_queue();
        }
        if finished {
            self.reload_gallery()
        } else {
            Vec::new()
        }
    }

    // -------------------------------------------------------------------------
    // Gallery
    // -------------------------------------------------------------------------

    /// Requests the page at the cursor, unless one is already in flight.
    pub fn sync(&mut self) -> Vec<Effect> {
        self.paginator
            .begin()
            .map(Effect::FetchPage)
            .into_iter()
            .collect()
    }

    /// Clears the rendered items and fetches from the first page again.
    pub fn reload_gallery(&mut self) -> Vec<Effect> {
        tracing::info!("reloading gallery");
        self.paginator.reset();
        self.gallery.clear();
        self.scroll.offset_y = 0.0;
        self.scroll.content_height = self.settings.layout.content_height(0);
        self.sync()
    }

    pub fn page_loaded(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<ImageDescriptor>, HostError>,
    ) -> Vec<Effect> {
        let outcome = self.paginator.complete(ticket, &result);
        match (outcome, result) {
            (PageOutcome::Appended { count }, Ok(page)) => {
                self.gallery.append(page);
                self.scroll.content_height = self.settings.layout.content_height(self.gallery.len());
                tracing::debug!(count, total = self.gallery.len(), "page appended");

                let mut effects = self.visible_thumbnails();
                if self.scroll.near_end(self.settings.scroll_threshold) {
                    effects.extend(self.sync());
                }
                effects
            }
            (PageOutcome::Failed, _) => {
                self.notice = Some("notification-gallery-load-error".to_string());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Records the new scroll position and fires the visibility and
    /// pagination triggers.
    pub fn scrolled(&mut self, metrics: ScrollMetrics) -> Vec<Effect> {
        self.scroll = metrics;
        let mut effects = self.visible_thumbnails();
        if metrics.near_end(self.settings.scroll_threshold) {
            effects.extend(self.sync());
        }
        effects
    }

    pub fn viewport_resized(&mut self, height: f32) -> Vec<Effect> {
        self.scroll.viewport_height = height.max(0.0);
        self.visible_thumbnails()
    }

    pub fn thumbnail_loaded(&mut self, url: &str, result: Result<Vec<u8>, HostError>) {
        self.gallery.thumbnail_loaded(url, result);
    }

    fn visible_thumbnails(&mut self) -> Vec<Effect> {
        let range = self
            .settings
            .layout
            .visible_range(&self.scroll, self.gallery.len());
        let urls = self.gallery.request_thumbnails(range);
        if urls.is_empty() {
            Vec::new()
        } else {
            vec![Effect::FetchThumbnails(urls)]
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Clicking an item flips its checkbox.
    pub fn toggle_item(&mut self, index: usize) {
        let Some(url) = self.original_at(index) else {
            return;
        };
        self.selection.toggle(&url);
        self.persist_selection();
    }

    pub fn set_item_checked(&mut self, index: usize, checked: bool) {
        let Some(url) = self.original_at(index) else {
            return;
        };
        if self.selection.set(&url, checked) {
            self.persist_selection();
        }
    }

    pub fn select_all(&mut self) {
        if self.selection.select_all(self.gallery.originals()) {
            self.persist_selection();
        }
    }

    pub fn deselect_all(&mut self) {
        if self.selection.deselect_all(self.gallery.originals()) {
            self.persist_selection();
        }
    }

    fn original_at(&self, index: usize) -> Option<String> {
        self.gallery
            .get(index)
            .map(|item| item.descriptor.original.clone())
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Exports the checked items that are rendered, in gallery order.
    pub fn start_export(&mut self) -> Vec<Effect> {
        if self.export.is_busy() {
            return Vec::new();
        }

        let urls = self.selection.selected_in(self.gallery.originals());
        if urls.is_empty() {
            self.export = ExportPhase::NothingSelected;
            return Vec::new();
        }

        let mode = self.settings.export_mode;
        self.export = ExportPhase::ChoosingDestination(mode);
        match mode {
            ExportMode::Zip => vec![Effect::ChooseArchiveTarget(urls)],
            ExportMode::Individual => vec![Effect::ChooseExportFolder(urls)],
        }
    }

    /// The destination dialog was dismissed.
    pub fn export_cancelled(&mut self) {
        self.export = ExportPhase::Idle;
    }

    pub fn archive_started(&mut self, count: usize) {
        self.export = ExportPhase::Archiving { count };
    }

    pub fn archive_finished(&mut self, result: Result<u64, Error>) {
        self.export = match (self.export, result) {
            (ExportPhase::Archiving { count }, Ok(_)) => ExportPhase::ArchiveSaved { count },
            (_, Ok(_)) => ExportPhase::ArchiveSaved { count: 0 },
            (_, Err(err)) => {
                tracing::warn!(%err, "archive export failed");
                ExportPhase::ArchiveFailed
            }
        };
    }

    pub fn export_progress(&mut self, event: ExportEvent) {
        self.export.apply(&event);
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    fn persist_queue(&mut self) {
        if let Some(warning) = self.store.save_queue(self.queue.tasks()) {
            self.notice = Some(warning);
        }
    }

    fn persist_selection(&mut self) {
        if let Some(warning) = self.store.save_selection(&self.selection.to_vec()) {
            self.notice = Some(warning);
        }
    }
}
