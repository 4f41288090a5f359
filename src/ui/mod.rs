// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! renders from borrowed session state and emits its own `Message` type,
//! which the application maps into its top-level message.
//!
//! - [`toolbar`] - Upload and export controls with their status lines
//! - [`gallery_grid`] - Scrollable thumbnail grid with selection checkboxes
//! - [`upload_panel`] - Upload queue with per-file status
//! - [`styles`] - Container styles
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management

pub mod design_tokens;
pub mod gallery_grid;
pub mod styles;
pub mod theming;
pub mod toolbar;
pub mod upload_panel;
