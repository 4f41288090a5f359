// SPDX-License-Identifier: MPL-2.0
//! In-memory [`MediaHost`] for unit tests.

use crate::application::port::{
    HostError, HostResult, MediaHost, PageRequest, ProgressFn, UploadFile,
};
use crate::domain::gallery::ImageDescriptor;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    remaining_failures: HashMap<String, u32>,
    upload_calls: HashMap<String, u32>,
    archive_requests: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct FakeMediaHost {
    pages: Vec<Vec<ImageDescriptor>>,
    content: HashMap<String, Vec<u8>>,
    archive_fails: bool,
    state: Mutex<State>,
}

impl FakeMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The upload of `name` fails `times` times before succeeding.
    pub fn fail_uploads(self, name: &str, times: u32) -> Self {
        self.state
            .lock()
            .expect("fake host lock")
            .remaining_failures
            .insert(name.to_string(), times);
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<ImageDescriptor>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_content(mut self, url: &str, bytes: &[u8]) -> Self {
        self.content.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn fail_archive(mut self) -> Self {
        self.archive_fails = true;
        self
    }

    pub fn upload_calls(&self, name: &str) -> u32 {
        let state = self.state.lock().expect("fake host lock");
        state.upload_calls.get(name).copied().unwrap_or(0)
    }

    pub fn total_upload_calls(&self) -> u32 {
        let state = self.state.lock().expect("fake host lock");
        state.upload_calls.values().sum()
    }

    pub fn archive_requests(&self) -> Vec<Vec<String>> {
        self.state
            .lock()
            .expect("fake host lock")
            .archive_requests
            .clone()
    }
}

impl MediaHost for FakeMediaHost {
    fn upload(&self, file: UploadFile, progress: ProgressFn) -> BoxFuture<'_, HostResult<String>> {
        let failed = {
            let mut state = self.state.lock().expect("fake host lock");
            *state.upload_calls.entry(file.name.clone()).or_default() += 1;
            match state.remaining_failures.get_mut(&file.name) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    true
                }
                _ => false,
            }
        };

        Box::pin(async move {
            if failed {
                return Err(HostError::Status(500));
            }
            let total = file.bytes.len() as u64;
            progress(total, total);
            Ok(format!("https://cdn.test/upload/{}", file.name))
        })
    }

    fn list_page(&self, request: PageRequest) -> BoxFuture<'_, HostResult<Vec<ImageDescriptor>>> {
        let page = self
            .pages
            .get(request.page.value() as usize)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(page) })
    }

    fn download_archive(&self, urls: Vec<String>) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        self.state
            .lock()
            .expect("fake host lock")
            .archive_requests
            .push(urls);
        let fails = self.archive_fails;
        Box::pin(async move {
            if fails {
                Err(HostError::Status(500))
            } else {
                Ok(b"PK\x03\x04archive".to_vec())
            }
        })
    }

    fn fetch(&self, url: String) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        let content = self.content.get(&url).cloned();
        Box::pin(async move { content.ok_or(HostError::Status(404)) })
    }
}
