// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer - Adapters implementing application ports.
//!
//! - [`http`]: `reqwest` implementation of
//!   [`MediaHost`](crate::application::port::MediaHost)

pub mod http;

pub use http::{HostEndpoints, HttpMediaHost};
