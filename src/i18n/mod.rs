// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Fluent bundles are embedded from `assets/i18n/`. The locale is picked from
//! the `--lang` flag, then the config file, then the OS, and falls back to
//! `en-US`. Status lines are stored as message keys and translated at render
//! time.

pub mod fluent;

pub use fluent::I18n;
