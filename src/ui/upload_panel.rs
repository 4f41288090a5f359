// SPDX-License-Identifier: MPL-2.0
//! Read-only list of the upload queue.

use crate::domain::gallery::{UploadStatus, UploadTask};
use crate::i18n::I18n;
use crate::sync::upload::UploadQueue;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::theming::ColorScheme;
use fluent_bundle::FluentValue;
use iced::widget::{column, container, scrollable, text};
use iced::{Color, Element, Length};

/// Label and color of a task's status.
pub fn task_status(i18n: &I18n, colors: &ColorScheme, task: &UploadTask) -> (String, Color) {
    match task.status {
        UploadStatus::Success => (i18n.tr("upload-task-success"), colors.success),
        UploadStatus::Failed => (
            i18n.tr_with_args(
                "upload-task-failed",
                &[("attempts", FluentValue::from(task.attempts))],
            ),
            colors.error,
        ),
        UploadStatus::Pending if task.source.is_none() => {
            (i18n.tr("upload-task-needs-file"), colors.warning)
        }
        UploadStatus::Pending => (i18n.tr("upload-task-pending"), colors.text_secondary),
    }
}

pub fn view<'a, M: 'a>(i18n: &I18n, colors: &ColorScheme, queue: &'a UploadQueue) -> Element<'a, M> {
    let entries = queue.tasks().iter().map(|task| {
        let (status, color) = task_status(i18n, colors, task);
        column![
            text(task.key.name.as_str()).size(typography::BODY),
            text(status).size(typography::CAPTION).color(color),
        ]
        .spacing(spacing::XXS)
        .into()
    });

    let content = column![
        text(i18n.tr("upload-queue-title")).size(typography::TITLE_SM),
        scrollable(column(entries).spacing(spacing::XS)).height(Length::Fill),
    ]
    .spacing(spacing::SM);

    container(content)
        .padding(spacing::SM)
        .width(sizing::QUEUE_PANEL_WIDTH)
        .height(Length::Fill)
        .style(styles::container::panel)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::FileKey;
    use std::path::PathBuf;

    #[test]
    fn failed_task_shows_attempt_count() {
        let mut i18n = I18n::default();
        i18n.set_locale("en-US".parse().expect("valid locale"));
        let colors = ColorScheme::light();
        let mut task = UploadTask::new(FileKey::new("a.jpg", 1), PathBuf::from("a.jpg"));
        task.status = UploadStatus::Failed;
        task.attempts = 5;

        let (label, color) = task_status(&i18n, &colors, &task);

        assert_eq!(label, "Failed after 5 attempts");
        assert_eq!(color, colors.error);
    }

    #[test]
    fn restored_pending_task_asks_for_the_file() {
        let i18n = I18n::default();
        let colors = ColorScheme::dark();
        let mut task = UploadTask::new(FileKey::new("a.jpg", 1), PathBuf::new());
        task.source = None;

        let (_, color) = task_status(&i18n, &colors, &task);
        assert_eq!(color, colors.warning);
    }
}
