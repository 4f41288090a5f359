// SPDX-License-Identifier: MPL-2.0
//! Widget styles shared by the gallery views.

pub mod container;
