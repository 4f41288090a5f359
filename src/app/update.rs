// SPDX-License-Identifier: MPL-2.0
//! Update logic: routes messages to the session and runs the effects it
//! returns as Iced tasks.

use super::session::{Effect, Session};
use super::Message;
use crate::application::port::{HostError, MediaHost};
use crate::error::Error;
use crate::i18n::I18n;
use crate::sync::export::{self, ExportEvent, ExportReport};
use crate::sync::upload::{self, BatchSummary, SelectedFile, UploadEvent, UploadJob, UploadPolicy};
use crate::ui::{gallery_grid, toolbar};
use futures_util::{future, stream, Stream, StreamExt};
use iced::Task;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic", "avif",
];

/// Mutable state needed by the update loop.
pub struct UpdateContext<'a> {
    pub i18n: &'a I18n,
    pub session: &'a mut Session,
    pub host: Option<&'a Arc<dyn MediaHost>>,
    pub archive_name: &'a str,
}

pub fn update(ctx: UpdateContext<'_>, message: Message) -> Task<Message> {
    let UpdateContext {
        i18n,
        session,
        host,
        archive_name,
    } = ctx;

    match message {
        Message::Toolbar(message) => handle_toolbar(session, host, i18n, archive_name, message),
        Message::Gallery(message) => handle_gallery(session, host, archive_name, message),
        Message::FilesChosen(paths) => {
            add_paths(session, paths);
            Task::none()
        }
        Message::FileDropped(path) => {
            add_paths(session, vec![path]);
            Task::none()
        }
        Message::Upload(event) => {
            let effects = session.upload_progress(event);
            run_effects(session, host, archive_name, effects)
        }
        Message::PageLoaded(ticket, result) => {
            let effects = session.page_loaded(ticket, result);
            run_effects(session, host, archive_name, effects)
        }
        Message::ThumbnailLoaded(url, result) => {
            session.thumbnail_loaded(&url, result);
            Task::none()
        }
        Message::WindowResized(size) => {
            let effects = session.viewport_resized(super::gallery_viewport_height(size.height));
            run_effects(session, host, archive_name, effects)
        }
        Message::ArchiveTargetChosen(urls, target) => match target {
            Some(target) => {
                session.archive_started(urls.len());
                archive_task(host, urls, target)
            }
            None => {
                session.export_cancelled();
                Task::none()
            }
        },
        Message::ArchiveSaved(result) => {
            session.archive_finished(result);
            Task::none()
        }
        Message::ExportFolderChosen(urls, folder) => match folder {
            Some(folder) => individual_export_task(host, urls, folder),
            None => {
                session.export_cancelled();
                Task::none()
            }
        },
        Message::Export(event) => {
            session.export_progress(event);
            Task::none()
        }
    }
}

fn handle_toolbar(
    session: &mut Session,
    host: Option<&Arc<dyn MediaHost>>,
    i18n: &I18n,
    archive_name: &str,
    message: toolbar::Message,
) -> Task<Message> {
    let effects = match message {
        toolbar::Message::ChooseFiles => return pick_files_task(i18n.tr("dialog-pick-images")),
        toolbar::Message::Upload => session.start_upload(),
        toolbar::Message::Refresh => session.reload_gallery(),
        toolbar::Message::SelectAll => {
            session.select_all();
            Vec::new()
        }
        toolbar::Message::DeselectAll => {
            session.deselect_all();
            Vec::new()
        }
        toolbar::Message::Export => session.start_export(),
        toolbar::Message::DismissNotice => {
            session.dismiss_notice();
            Vec::new()
        }
    };
    run_effects(session, host, archive_name, effects)
}

fn handle_gallery(
    session: &mut Session,
    host: Option<&Arc<dyn MediaHost>>,
    archive_name: &str,
    message: gallery_grid::Message,
) -> Task<Message> {
    match message {
        gallery_grid::Message::Scrolled(metrics) => {
            let effects = session.scrolled(metrics);
            run_effects(session, host, archive_name, effects)
        }
        gallery_grid::Message::ItemClicked(index) => {
            session.toggle_item(index);
            Task::none()
        }
        gallery_grid::Message::ItemChecked(index, checked) => {
            session.set_item_checked(index, checked);
            Task::none()
        }
    }
}

/// Queues every readable path; unreadable ones raise a notice.
fn add_paths(session: &mut Session, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        return;
    }

    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = 0usize;
    for path in paths {
        match SelectedFile::from_path(&path) {
            Ok(file) => files.push(file),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot queue file");
                unreadable += 1;
            }
        }
    }

    session.add_files(files);
    if unreadable > 0 {
        session.notify("notification-files-unreadable");
    }
}

/// Turns session effects into tasks.
pub fn run_effects(
    session: &Session,
    host: Option<&Arc<dyn MediaHost>>,
    archive_name: &str,
    effects: Vec<Effect>,
) -> Task<Message> {
    if effects.is_empty() {
        return Task::none();
    }

    let policy = session.settings().upload;
    Task::batch(
        effects
            .into_iter()
            .map(|effect| run_effect(host, policy, archive_name, effect)),
    )
}

fn run_effect(
    host: Option<&Arc<dyn MediaHost>>,
    policy: UploadPolicy,
    archive_name: &str,
    effect: Effect,
) -> Task<Message> {
    match effect {
        Effect::FetchPage(ticket) => {
            let Some(host) = host.cloned() else {
                return Task::done(Message::PageLoaded(ticket, Err(host_unavailable())));
            };
            Task::perform(
                async move { host.list_page(ticket.request).await },
                move |result| Message::PageLoaded(ticket, result),
            )
        }
        Effect::FetchThumbnails(urls) => Task::batch(urls.into_iter().map(|url| {
            let Some(host) = host.cloned() else {
                return Task::done(Message::ThumbnailLoaded(url, Err(host_unavailable())));
            };
            let request = url.clone();
            Task::perform(
                async move { host.fetch(request).await },
                move |result| Message::ThumbnailLoaded(url, result),
            )
        })),
        Effect::RunUploads(jobs) => upload_task(host, jobs, policy),
        Effect::ChooseArchiveTarget(urls) => {
            let file_name = archive_name.to_string();
            Task::perform(
                async move {
                    rfd::AsyncFileDialog::new()
                        .set_file_name(&file_name)
                        .add_filter("Zip", &["zip"])
                        .save_file()
                        .await
                        .map(|file| file.path().to_path_buf())
                },
                move |target| Message::ArchiveTargetChosen(urls, target),
            )
        }
        Effect::ChooseExportFolder(urls) => Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .pick_folder()
                    .await
                    .map(|folder| folder.path().to_path_buf())
            },
            move |folder| Message::ExportFolderChosen(urls, folder),
        ),
    }
}

fn host_unavailable() -> HostError {
    HostError::Network("HTTP client unavailable".to_string())
}

fn pick_files_task(filter_name: String) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncFileDialog::new()
                .add_filter(filter_name, IMAGE_EXTENSIONS)
                .pick_files()
                .await
                .map(|files| {
                    files
                        .iter()
                        .map(|file| file.path().to_path_buf())
                        .collect()
                })
                .unwrap_or_default()
        },
        Message::FilesChosen,
    )
}

/// Streams the events of `work` as they are sent, then ends once `work`
/// completes and every sender is dropped.
fn progress_stream<E, F>(rx: mpsc::UnboundedReceiver<E>, work: F) -> impl Stream<Item = E>
where
    E: Send + 'static,
    F: Future + Send + 'static,
{
    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    });
    let done = stream::once(work).filter_map(|_| future::ready(None::<E>));
    stream::select(events, done)
}

fn upload_task(
    host: Option<&Arc<dyn MediaHost>>,
    jobs: Vec<UploadJob>,
    policy: UploadPolicy,
) -> Task<Message> {
    let Some(host) = host.cloned() else {
        let mut messages: Vec<Message> = jobs
            .into_iter()
            .map(|job| {
                Message::Upload(UploadEvent::Failed {
                    key: job.key,
                    attempts: 0,
                })
            })
            .collect();
        let summary = BatchSummary {
            succeeded: 0,
            failed: messages.len(),
        };
        messages.push(Message::Upload(UploadEvent::BatchFinished(summary)));
        return Task::stream(stream::iter(messages));
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let work = upload::run_batch(host, jobs, policy, tx);
    Task::stream(progress_stream(rx, work)).map(Message::Upload)
}

fn archive_task(
    host: Option<&Arc<dyn MediaHost>>,
    urls: Vec<String>,
    target: PathBuf,
) -> Task<Message> {
    let Some(host) = host.cloned() else {
        return Task::done(Message::ArchiveSaved(Err(Error::Host(host_unavailable()))));
    };
    Task::perform(
        export::export_archive(host, urls, target),
        Message::ArchiveSaved,
    )
}

fn individual_export_task(
    host: Option<&Arc<dyn MediaHost>>,
    urls: Vec<String>,
    folder: PathBuf,
) -> Task<Message> {
    let Some(host) = host.cloned() else {
        let report = ExportReport {
            saved: 0,
            failed: urls.len(),
        };
        return Task::stream(stream::iter([
            ExportEvent::Started { total: urls.len() },
            ExportEvent::Finished(report),
        ]))
        .map(Message::Export);
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let work = export::export_individually(host, urls, folder, tx);
    Task::stream(progress_stream(rx, work)).map(Message::Export)
}
