// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{border, opacity, radius};
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Panel surface for the toolbar and the upload queue.
///
/// Derived from the active theme background so it stays readable in both
/// light and dark modes.
pub fn panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    let base = palette.background.weak.color;

    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::SURFACE,
            ..base
        })),
        border: Border {
            radius: radius::MD.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Gallery cell. Checked cells get a primary-colored frame.
pub fn card(selected: bool) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| {
        let palette = theme.extended_palette();
        let (color, width) = if selected {
            (palette.primary.strong.color, border::WIDTH_MD)
        } else {
            (palette.background.strong.color, border::WIDTH_SM)
        };

        container::Style {
            background: Some(Background::Color(palette.background.base.color)),
            border: Border {
                color,
                width,
                radius: radius::SM.into(),
            },
            ..Default::default()
        }
    }
}

/// Placeholder shown until a thumbnail is available.
pub fn placeholder(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_SUBTLE,
            ..palette.background.strong.color
        })),
        ..Default::default()
    }
}
