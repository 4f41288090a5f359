// SPDX-License-Identifier: MPL-2.0
//! Scrollable thumbnail grid.
//!
//! Every cell shows the thumbnail (or a placeholder) and a checkbox. Clicking
//! the cell or the checkbox flips the selection. Scroll events are reported
//! with the geometry needed by the pagination and visibility triggers.

use crate::app::session::Session;
use crate::i18n::I18n;
use crate::sync::gallery::{GalleryItem, GridLayout, ThumbnailSlot};
use crate::sync::paginator::ScrollMetrics;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::scrollable::Viewport;
use iced::widget::{checkbox, column, container, image, mouse_area, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length};

#[derive(Debug, Clone)]
pub enum Message {
    Scrolled(ScrollMetrics),
    ItemClicked(usize),
    ItemChecked(usize, bool),
}

/// Height of one grid row: thumbnail, checkbox row and cell padding.
pub const ROW_HEIGHT: f32 = sizing::THUMBNAIL + sizing::CELL_FOOTER + 2.0 * spacing::XXS;

/// Grid geometry matching what [`view`] renders.
pub fn layout(columns: usize) -> GridLayout {
    GridLayout {
        columns,
        row_height: ROW_HEIGHT,
        spacing: spacing::XS,
        padding: spacing::XS,
    }
}

fn scroll_metrics(viewport: Viewport) -> ScrollMetrics {
    ScrollMetrics {
        offset_y: viewport.absolute_offset().y,
        viewport_height: viewport.bounds().height,
        content_height: viewport.content_bounds().height,
    }
}

pub fn view<'a>(i18n: &I18n, session: &'a Session) -> Element<'a, Message> {
    let items = session.items();
    if items.is_empty() {
        let label = if session.is_fetching() {
            i18n.tr("gallery-loading")
        } else {
            i18n.tr("gallery-empty")
        };
        return container(text(label).size(typography::TITLE_SM))
            .center(Length::Fill)
            .into();
    }

    let grid = session.settings().layout;
    let columns = grid.columns.max(1);

    let rows = items
        .chunks(columns)
        .enumerate()
        .map(|(row_index, chunk)| {
            let cells = chunk.iter().enumerate().map(|(offset, item)| {
                let index = row_index * columns + offset;
                cell(index, item, session.is_selected(&item.descriptor.original))
            });
            row(cells).spacing(grid.spacing).into()
        });

    let mut content = column(rows)
        .spacing(grid.spacing)
        .padding(grid.padding);
    if session.is_fetching() {
        content = content.push(text(i18n.tr("gallery-loading")).size(typography::CAPTION));
    }

    scrollable(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(|viewport: Viewport| Message::Scrolled(scroll_metrics(viewport)))
        .into()
}

fn cell(index: usize, item: &GalleryItem, selected: bool) -> Element<'_, Message> {
    let thumbnail: Element<'_, Message> = match &item.thumbnail {
        ThumbnailSlot::Ready(handle) => image(handle.clone())
            .width(sizing::THUMBNAIL)
            .height(sizing::THUMBNAIL)
            .content_fit(ContentFit::Cover)
            .into(),
        ThumbnailSlot::Placeholder | ThumbnailSlot::Loading | ThumbnailSlot::Failed => {
            container(text(""))
                .width(sizing::THUMBNAIL)
                .height(sizing::THUMBNAIL)
                .style(styles::container::placeholder)
                .into()
        }
    };

    let footer = row![checkbox(selected).on_toggle(move |checked| Message::ItemChecked(index, checked))]
        .height(sizing::CELL_FOOTER)
        .align_y(Alignment::Center);

    let card = container(column![thumbnail, footer])
        .padding(spacing::XXS)
        .style(styles::container::card(selected));

    mouse_area(card)
        .on_press(Message::ItemClicked(index))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_rendered_row() {
        let grid = layout(3);
        assert_eq!(grid.columns, 3);
        assert!((grid.row_height - (180.0 + 28.0 + 8.0)).abs() < f32::EPSILON);
        assert!((grid.spacing - grid.padding).abs() < f32::EPSILON);
    }
}
