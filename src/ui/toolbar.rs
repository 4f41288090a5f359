// SPDX-License-Identifier: MPL-2.0
//! Toolbar with the upload and export controls and their status lines.

use crate::app::session::Session;
use crate::i18n::I18n;
use crate::sync::export::ExportPhase;
use crate::sync::upload::UploadPhase;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use crate::ui::theming::ColorScheme;
use fluent_bundle::FluentValue;
use iced::widget::{button, column, container, progress_bar, row, text};
use iced::{Alignment, Element, Length};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    ChooseFiles,
    Upload,
    Refresh,
    SelectAll,
    DeselectAll,
    Export,
    DismissNotice,
}

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub session: &'a Session,
    pub colors: &'a ColorScheme,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let session = ctx.session;
    let uploading = session.queue().is_running();
    let exporting = session.export_phase().is_busy();

    let upload_controls = row![
        button(text(i18n.tr("button-choose-files"))).on_press(Message::ChooseFiles),
        button(text(i18n.tr("button-upload"))).on_press_maybe((!uploading).then_some(Message::Upload)),
        button(text(i18n.tr("button-refresh"))).on_press_maybe(
            (!session.is_fetching()).then_some(Message::Refresh)
        ),
    ]
    .spacing(spacing::XS);

    let selection_controls = row![
        text(i18n.tr_with_args(
            "gallery-selected-count",
            &[("count", FluentValue::from(session.selection_len()))],
        ))
        .size(typography::BODY),
        button(text(i18n.tr("button-select-all"))).on_press(Message::SelectAll),
        button(text(i18n.tr("button-deselect-all"))).on_press(Message::DeselectAll),
        button(text(i18n.tr("button-export"))).on_press_maybe((!exporting).then_some(Message::Export)),
    ]
    .spacing(spacing::XS)
    .align_y(Alignment::Center);

    let mut content = column![
        row![upload_controls, selection_controls]
            .spacing(spacing::LG)
            .align_y(Alignment::Center),
        upload_status(ctx.i18n, session),
        text(export_status(ctx.i18n, session.export_phase()))
            .size(typography::BODY)
            .color(ctx.colors.text_secondary),
    ]
    .spacing(spacing::XS);

    if let Some(notice) = session.notice() {
        content = content.push(
            row![
                text(i18n.tr(notice))
                    .size(typography::BODY)
                    .color(ctx.colors.warning),
                button(text(i18n.tr("button-dismiss")).size(typography::CAPTION))
                    .on_press(Message::DismissNotice),
            ]
            .spacing(spacing::XS)
            .align_y(Alignment::Center),
        );
    }

    container(content)
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}

fn upload_status<'a>(i18n: &I18n, session: &Session) -> Element<'a, Message> {
    let queue = session.queue();
    let status = match queue.phase() {
        UploadPhase::Idle => i18n.tr("upload-status-idle"),
        UploadPhase::NothingSelected => i18n.tr("upload-status-select-first"),
        UploadPhase::Uploading { completed, total } => i18n.tr_with_args(
            "upload-status-uploading",
            &[
                ("completed", FluentValue::from(completed)),
                ("total", FluentValue::from(total)),
            ],
        ),
        UploadPhase::Finished(_) => i18n.tr("upload-status-finished"),
    };

    let mut line = row![text(status).size(typography::BODY)]
        .spacing(spacing::SM)
        .align_y(Alignment::Center);

    if queue.is_running() {
        line = line.push(
            container(progress_bar(0.0..=1.0, queue.ratio())).width(Length::FillPortion(2)),
        );
        if let Some(file) = queue.file_progress() {
            let percent = (file.ratio() * 100.0).round() as i64;
            line = line.push(
                text(i18n.tr_with_args(
                    "upload-file-progress",
                    &[
                        ("name", FluentValue::from(file.key.name.clone())),
                        ("percent", FluentValue::from(percent)),
                    ],
                ))
                .size(typography::CAPTION),
            );
        }
    }

    line.into()
}

/// Text of the export status line.
pub fn export_status(i18n: &I18n, phase: ExportPhase) -> String {
    match phase {
        ExportPhase::Idle => String::new(),
        ExportPhase::NothingSelected => i18n.tr("export-status-select"),
        ExportPhase::ChoosingDestination(_) => i18n.tr("export-status-choosing"),
        ExportPhase::Archiving { count } => i18n.tr_with_args(
            "export-status-archiving",
            &[("count", FluentValue::from(count))],
        ),
        ExportPhase::Saving { done, total } => i18n.tr_with_args(
            "export-status-saving",
            &[
                ("done", FluentValue::from(done)),
                ("total", FluentValue::from(total)),
            ],
        ),
        ExportPhase::ArchiveSaved { count } => i18n.tr_with_args(
            "export-status-archive-saved",
            &[("count", FluentValue::from(count))],
        ),
        ExportPhase::ArchiveFailed => i18n.tr("export-status-archive-failed"),
        ExportPhase::Finished(report) => i18n.tr_with_args(
            "export-status-finished",
            &[
                ("saved", FluentValue::from(report.saved)),
                ("failed", FluentValue::from(report.failed)),
            ],
        ),
    }
}
