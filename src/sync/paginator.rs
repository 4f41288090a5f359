// SPDX-License-Identifier: MPL-2.0
//! Page-by-page retrieval of the gallery listing.
//!
//! At most one page request is in flight. The cursor advances only when a
//! request returns a non-empty page, so an empty or failed page is requested
//! again on the next trigger. [`Paginator::reset`] starts over from the first
//! page and invalidates any response still on its way.

use crate::application::port::{HostResult, PageRequest};
use crate::domain::gallery::{ImageDescriptor, PageCursor, PageSize, ScrollThreshold};

/// Handle of an issued page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub request: PageRequest,
    generation: u64,
}

/// What a page response did to the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// `count` descriptors were appended and the cursor advanced.
    Appended { count: usize },
    /// The backend had nothing more; the cursor stays.
    Exhausted,
    /// The request failed; the cursor stays.
    Failed,
    /// The response belongs to a listing that was reset since.
    Stale,
}

#[derive(Debug)]
pub struct Paginator {
    cursor: PageCursor,
    page_size: PageSize,
    in_flight: Option<PageTicket>,
    generation: u64,
}

impl Paginator {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            cursor: PageCursor::START,
            page_size,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Issues the request for the page at the cursor.
    ///
    /// Returns `None` while another request is in flight.
    pub fn begin(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() {
            tracing::trace!(page = self.cursor.value(), "page request already in flight");
            return None;
        }

        let ticket = PageTicket {
            request: PageRequest {
                page: self.cursor,
                limit: self.page_size,
            },
            generation: self.generation,
        };
        self.in_flight = Some(ticket);
        tracing::debug!(page = self.cursor.value(), limit = self.page_size.value(), "fetching page");
        Some(ticket)
    }

    /// Records the response to `ticket`.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: &HostResult<Vec<ImageDescriptor>>,
    ) -> PageOutcome {
        if ticket.generation != self.generation || self.in_flight != Some(ticket) {
            tracing::debug!(page = ticket.request.page.value(), "discarding stale page");
            return PageOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) if page.is_empty() => {
                tracing::debug!(page = self.cursor.value(), "no more images");
                PageOutcome::Exhausted
            }
            Ok(page) => {
                self.cursor = self.cursor.next();
                PageOutcome::Appended { count: page.len() }
            }
            Err(err) => {
                tracing::warn!(page = self.cursor.value(), %err, "page request failed");
                PageOutcome::Failed
            }
        }
    }

    /// Goes back to the first page and forgets the in-flight request.
    pub fn reset(&mut self) {
        self.cursor = PageCursor::START;
        self.in_flight = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// Vertical geometry of the gallery's scroll area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub offset_y: f32,
    /// Height of the visible area.
    pub viewport_height: f32,
    /// Height of the whole content.
    pub content_height: f32,
}

impl ScrollMetrics {
    /// Distance left between the bottom of the viewport and the end of the content.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        (self.content_height - self.offset_y - self.viewport_height).max(0.0)
    }

    /// True once the remaining distance drops below `threshold`.
    #[must_use]
    pub fn near_end(&self, threshold: ScrollThreshold) -> bool {
        self.remaining() < threshold.value()
    }
}
