// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Files dropped on the window are queued for upload. Window resizes change
//! how many grid rows are visible, which may require more thumbnails.

use super::Message;
use iced::{event, window, Subscription};

pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, _window_id| match event {
        event::Event::Window(window::Event::FileDropped(path)) => {
            Some(Message::FileDropped(path))
        }
        event::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized(size)),
        _ => None,
    })
}
