// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application: toolbar on top, gallery grid with the
//! upload queue next to it.

use super::session::Session;
use super::Message;
use crate::i18n::I18n;
use crate::ui::design_tokens::spacing;
use crate::ui::theming::ColorScheme;
use crate::ui::{gallery_grid, toolbar, upload_panel};
use iced::widget::{column, container, row};
use iced::{Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub session: &'a Session,
    pub colors: &'a ColorScheme,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let header = toolbar::view(toolbar::ViewContext {
        i18n: ctx.i18n,
        session: ctx.session,
        colors: ctx.colors,
    })
    .map(Message::Toolbar);

    let grid = gallery_grid::view(ctx.i18n, ctx.session).map(Message::Gallery);
    let queue: Element<'_, Message> =
        upload_panel::view(ctx.i18n, ctx.colors, ctx.session.queue());

    let body = row![
        container(grid).width(Length::Fill).height(Length::Fill),
        queue,
    ]
    .spacing(spacing::XS)
    .height(Length::Fill);

    container(column![header, body].spacing(spacing::XS))
        .padding(spacing::XS)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
