// SPDX-License-Identifier: MPL-2.0
//! Scripted media host shared by the integration tests.

use futures_util::future::BoxFuture;
use iced_gallery::application::port::{
    HostError, HostResult, MediaHost, PageRequest, ProgressFn, UploadFile,
};
use iced_gallery::domain::gallery::ImageDescriptor;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ScriptedHost {
    /// Files whose uploads always fail.
    rejected: HashSet<String>,
    pages: Vec<Vec<ImageDescriptor>>,
    content: HashMap<String, Vec<u8>>,
    uploads: Mutex<HashMap<String, u32>>,
    listed: Mutex<Vec<u32>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, name: &str) -> Self {
        self.rejected.insert(name.to_string());
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

    pub fn upload_calls(&self, name: &str) -> u32 {
        self.uploads
            .lock()
            .expect("host lock")
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    /// Page numbers requested so far, in order.
    pub fn listed_pages(&self) -> Vec<u32> {
        self.listed.lock().expect("host lock").clone()
    }
}

impl MediaHost for ScriptedHost {
    fn upload(&self, file: UploadFile, progress: ProgressFn) -> BoxFuture<'_, HostResult<String>> {
        *self
            .uploads
            .lock()
            .expect("host lock")
            .entry(file.name.clone())
            .or_default() += 1;
        let rejected = self.rejected.contains(&file.name);

        Box::pin(async move {
            if rejected {
                return Err(HostError::Status(503));
            }
            let total = file.bytes.len() as u64;
            progress(total / 2, total);
            progress(total, total);
            Ok(format!("https://media.test/{}", file.name))
        })
    }

    fn list_page(&self, request: PageRequest) -> BoxFuture<'_, HostResult<Vec<ImageDescriptor>>> {
        self.listed
            .lock()
            .expect("host lock")
            .push(request.page.value());
        let page = self
            .pages
            .get(request.page.value() as usize)
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(page) })
    }

    fn download_archive(&self, urls: Vec<String>) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        let body = urls.join("\n").into_bytes();
        Box::pin(async move { Ok(body) })
    }

    fn fetch(&self, url: String) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        let content = self.content.get(&url).cloned();
        Box::pin(async move { content.ok_or(HostError::Status(404)) })
    }
}

pub fn descriptors(prefix: &str, count: usize) -> Vec<ImageDescriptor> {
    (0..count)
        .map(|i| {
            ImageDescriptor::new(
                format!("https://media.test/thumb/{prefix}{i}.jpg"),
                format!("https://media.test/{prefix}{i}.jpg"),
            )
        })
        .collect()
}
