// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the session and the
//! media host.
//!
//! The `App` struct wires together localization, the client [`Session`] and
//! the HTTP adapter. The session decides what has to happen; `update` turns
//! its effects into Iced tasks (requests, dialogs, upload streams) and feeds
//! the results back as messages.

pub mod config;
mod message;
pub mod paths;
pub mod persisted_state;
pub mod session;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::application::port::MediaHost;
use crate::i18n::I18n;
use crate::infrastructure::HttpMediaHost;
use crate::ui::design_tokens::sizing;
use crate::ui::gallery_grid;
use crate::ui::theming::{ColorScheme, ThemeMode};
use iced::{window, Element, Subscription, Task, Theme};
use persisted_state::LocalStore;
use session::{Session, SessionSettings};
use std::fmt;
use std::sync::Arc;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    session: Session,
    host: Option<Arc<dyn MediaHost>>,
    theme_mode: ThemeMode,
    colors: ColorScheme,
    archive_name: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("host_ready", &self.host.is_some())
            .field("theme_mode", &self.theme_mode)
            .finish()
    }
}

pub const MIN_WINDOW_WIDTH: f32 = 720.0;
pub const MIN_WINDOW_HEIGHT: f32 = 480.0;

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(sizing::WINDOW_WIDTH, sizing::WINDOW_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Height left to the gallery in a window of `window_height`.
fn gallery_viewport_height(window_height: f32) -> f32 {
    (window_height - sizing::HEADER_HEIGHT).max(0.0)
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 wants a `Fn` boot closure; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Loads settings and persisted state, then requests the first page.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (mut config, config_warning) = config::load();
        if let Some(api_url) = flags.api_url {
            config.endpoints.api_base_url = Some(api_url);
        }

        let i18n = I18n::new(flags.lang, &config);
        let (host, host_warning) =
            match HttpMediaHost::new(config.host_endpoints(), config.request_timeout()) {
                Ok(host) => (Some(Arc::new(host) as Arc<dyn MediaHost>), None),
                Err(err) => {
                    tracing::error!(%err, "HTTP client unavailable");
                    (None, Some(err.i18n_key()))
                }
            };

        let settings = SessionSettings::from_config(
            &config,
            gallery_grid::layout(config.grid_columns()),
            gallery_viewport_height(sizing::WINDOW_HEIGHT),
        );
        let mut session = Session::restore(settings, LocalStore::open(None));
        if let Some(key) = config_warning.as_deref().or(host_warning) {
            session.notify(key);
        }

        let mut app = App {
            i18n,
            session,
            host,
            theme_mode: config.general.theme_mode,
            colors: ColorScheme::for_mode(config.general.theme_mode),
            archive_name: config.archive_name(),
        };
        let effects = app.session.sync();
        let task = update::run_effects(&app.session, app.host.as_ref(), &app.archive_name, effects);
        (app, task)
    }

    /// Assembles an app around an existing session and host.
    pub fn from_parts(i18n: I18n, session: Session, host: Option<Arc<dyn MediaHost>>) -> Self {
        Self {
            i18n,
            session,
            host,
            theme_mode: ThemeMode::Light,
            colors: ColorScheme::light(),
            archive_name: config::DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        if self.session.queue().is_running() {
            let percent = (self.session.queue().ratio() * 100.0).round() as i64;
            format!("{app_name} ({percent}%)")
        } else {
            app_name
        }
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::create_event_subscription()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let ctx = update::UpdateContext {
            i18n: &self.i18n,
            session: &mut self.session,
            host: self.host.as_ref(),
            archive_name: &self.archive_name,
        };
        update::update(ctx, message)
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            session: &self.session,
            colors: &self.colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::HostError;
    use crate::domain::gallery::{ImageDescriptor, PageSize, ScrollThreshold};
    use crate::sync::export::{ExportMode, ExportPhase};
    use crate::sync::gallery::GridLayout;
    use crate::sync::testing::FakeMediaHost;
    use crate::sync::upload::{UploadPhase, UploadPolicy};
    use crate::ui::{gallery_grid, toolbar};
    use session::Effect;
    use std::num::NonZeroUsize;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn settings() -> SessionSettings {
        SessionSettings {
            upload: UploadPolicy::default(),
            page_size: PageSize::default(),
            scroll_threshold: ScrollThreshold::default(),
            layout: GridLayout {
                columns: 4,
                row_height: 200.0,
                spacing: 0.0,
                padding: 0.0,
            },
            export_mode: ExportMode::Zip,
            thumbnail_cache: NonZeroUsize::new(16).expect("non-zero"),
            initial_viewport_height: 400.0,
        }
    }

    fn test_app() -> (TempDir, App) {
        let dir = tempdir().expect("temp dir");
        let store = LocalStore::open(Some(dir.path().to_path_buf()));
        let session = Session::restore(settings(), store);
        let host: Arc<dyn MediaHost> = Arc::new(FakeMediaHost::new());
        let app = App::from_parts(I18n::default(), session, Some(host));
        (dir, app)
    }

    fn loaded_app(count: usize) -> (TempDir, App) {
        let (dir, mut app) = test_app();
        let ticket = app
            .session
            .sync()
            .into_iter()
            .find_map(|effect| match effect {
                Effect::FetchPage(ticket) => Some(ticket),
                _ => None,
            })
            .expect("first page requested");
        let page = (0..count)
            .map(|i| ImageDescriptor::from_url(format!("https://cdn.test/{i}.jpg")))
            .collect();
        let _ = app.update(Message::PageLoaded(ticket, Ok(page)));
        (dir, app)
    }

    #[test]
    fn upload_without_files_asks_for_a_selection() {
        let (_dir, mut app) = test_app();
        let _ = app.update(Message::Toolbar(toolbar::Message::Upload));
        assert_eq!(app.session().queue().phase(), UploadPhase::NothingSelected);
    }

    #[test]
    fn unreadable_files_raise_a_notice() {
        let (_dir, mut app) = test_app();
        let _ = app.update(Message::FilesChosen(vec![PathBuf::from(
            "/definitely/missing/photo.jpg",
        )]));
        assert!(app.session().queue().tasks().is_empty());
        assert_eq!(app.session().notice(), Some("notification-files-unreadable"));
    }

    #[test]
    fn dropped_file_is_queued_once() {
        let (dir, mut app) = test_app();
        let path = dir.path().join("drop.jpg");
        std::fs::write(&path, b"jpeg").expect("write file");

        let _ = app.update(Message::FileDropped(path.clone()));
        let _ = app.update(Message::FileDropped(path));

        assert_eq!(app.session().queue().tasks().len(), 1);
    }

    #[test]
    fn clicking_a_cell_toggles_its_selection() {
        let (_dir, mut app) = loaded_app(3);
        let _ = app.update(Message::Gallery(gallery_grid::Message::ItemClicked(1)));
        assert!(app.session().is_selected("https://cdn.test/1.jpg"));
        let _ = app.update(Message::Gallery(gallery_grid::Message::ItemClicked(1)));
        assert!(!app.session().is_selected("https://cdn.test/1.jpg"));
    }

    #[test]
    fn failed_page_shows_a_notice_and_can_be_dismissed() {
        let (_dir, mut app) = test_app();
        let ticket = app
            .session
            .sync()
            .into_iter()
            .find_map(|effect| match effect {
                Effect::FetchPage(ticket) => Some(ticket),
                _ => None,
            })
            .expect("first page requested");

        let _ = app.update(Message::PageLoaded(ticket, Err(HostError::Status(500))));
        assert_eq!(app.session().notice(), Some("notification-gallery-load-error"));
        assert!(!app.session().is_fetching());

        let _ = app.update(Message::Toolbar(toolbar::Message::DismissNotice));
        assert_eq!(app.session().notice(), None);
    }

    #[test]
    fn cancelled_archive_dialog_returns_to_idle() {
        let (_dir, mut app) = loaded_app(2);
        let _ = app.update(Message::Toolbar(toolbar::Message::SelectAll));
        let _ = app.update(Message::Toolbar(toolbar::Message::Export));
        assert_eq!(
            app.session().export_phase(),
            ExportPhase::ChoosingDestination(ExportMode::Zip)
        );

        let _ = app.update(Message::ArchiveTargetChosen(
            vec!["https://cdn.test/0.jpg".into()],
            None,
        ));
        assert_eq!(app.session().export_phase(), ExportPhase::Idle);
    }

    #[test]
    fn title_shows_app_name_when_idle() {
        let (_dir, app) = test_app();
        assert_eq!(app.title(), app.i18n.tr("window-title"));
    }

    #[test]
    fn gallery_viewport_excludes_the_header() {
        assert!((gallery_viewport_height(800.0) - 660.0).abs() < f32::EPSILON);
        assert!(gallery_viewport_height(10.0).abs() < f32::EPSILON);
    }
}
