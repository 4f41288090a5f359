// SPDX-License-Identifier: MPL-2.0
//! `reqwest` adapter for the [`MediaHost`] port.
//!
//! Talks to two services: the media hosting API that receives multipart
//! uploads, and the gallery backend that lists images and builds zip archives.

use crate::application::port::{
    HostError, HostResult, MediaHost, PageRequest, ProgressFn, UploadFile,
};
use crate::domain::gallery::ImageDescriptor;
use crate::error::Result;
use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Size of the chunks the upload body is streamed in. Each chunk pulled by
/// the HTTP client produces one progress callback.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

const USER_AGENT: &str = concat!("IcedGallery/", env!("CARGO_PKG_VERSION"));

/// Addresses of the remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEndpoints {
    /// Multipart upload endpoint of the media hosting API.
    pub upload_url: String,
    /// Value of the `upload_preset` form field.
    pub upload_preset: String,
    /// Base URL of the gallery backend (`/images`, `/download`).
    pub api_base_url: String,
}

impl HostEndpoints {
    fn images_url(&self, request: PageRequest) -> String {
        format!(
            "{}/images?page={}&limit={}",
            self.api_base_url.trim_end_matches('/'),
            request.page.value(),
            request.limit.value()
        )
    }

    fn download_url(&self) -> String {
        format!("{}/download", self.api_base_url.trim_end_matches('/'))
    }
}

/// HTTP implementation of [`MediaHost`].
#[derive(Debug, Clone)]
pub struct HttpMediaHost {
    client: reqwest::Client,
    endpoints: HostEndpoints,
}

impl HttpMediaHost {
    /// Builds the HTTP client.
    ///
    /// `timeout` bounds every request, uploads included.
    pub fn new(endpoints: HostEndpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &HostEndpoints {
        &self.endpoints
    }

    async fn get_bytes(&self, url: &str) -> HostResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(network)?;
        let response = ensure_success(response)?;
        let body = response.bytes().await.map_err(network)?;
        Ok(body.to_vec())
    }
}

impl MediaHost for HttpMediaHost {
    fn upload(&self, file: UploadFile, progress: ProgressFn) -> BoxFuture<'_, HostResult<String>> {
        Box::pin(async move {
            let total = file.bytes.len() as u64;
            let part = Part::stream_with_length(progress_body(&file.bytes, progress), total)
                .file_name(file.name.clone());
            let form = Form::new()
                .part("file", part)
                .text("upload_preset", self.endpoints.upload_preset.clone());

            let response = self
                .client
                .post(&self.endpoints.upload_url)
                .multipart(form)
                .send()
                .await
                .map_err(network)?;
            let response = ensure_success(response)?;
            let body = response.bytes().await.map_err(network)?;
            parse_upload_response(&body)
        })
    }

    fn list_page(&self, request: PageRequest) -> BoxFuture<'_, HostResult<Vec<ImageDescriptor>>> {
        Box::pin(async move {
            let body = self.get_bytes(&self.endpoints.images_url(request)).await?;
            parse_listing(&body)
        })
    }

    fn download_archive(&self, urls: Vec<String>) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.endpoints.download_url())
                .json(&ArchiveRequest { files: urls })
                .send()
                .await
                .map_err(network)?;
            let response = ensure_success(response)?;
            let body = response.bytes().await.map_err(network)?;
            Ok(body.to_vec())
        })
    }

    fn fetch(&self, url: String) -> BoxFuture<'_, HostResult<Vec<u8>>> {
        Box::pin(async move { self.get_bytes(&url).await })
    }
}

// =============================================================================
// Wire formats
// =============================================================================

#[derive(Debug, Serialize)]
struct ArchiveRequest {
    files: Vec<String>,
}

/// A listing entry is either a bare URL or a thumbnail/original record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingEntry {
    Url(String),
    Record {
        #[serde(default)]
        thumbnail: Option<String>,
        original: String,
    },
}

impl From<ListingEntry> for ImageDescriptor {
    fn from(entry: ListingEntry) -> Self {
        match entry {
            ListingEntry::Url(url) => ImageDescriptor::from_url(url),
            ListingEntry::Record {
                thumbnail: Some(thumbnail),
                original,
            } => ImageDescriptor::new(thumbnail, original),
            ListingEntry::Record {
                thumbnail: None,
                original,
            } => ImageDescriptor::from_url(original),
        }
    }
}

/// Decodes a listing response body, preserving backend order.
fn parse_listing(body: &[u8]) -> HostResult<Vec<ImageDescriptor>> {
    let entries: Vec<ListingEntry> =
        serde_json::from_slice(body).map_err(|e| HostError::Decode(e.to_string()))?;
    Ok(entries.into_iter().map(ImageDescriptor::from).collect())
}

/// Extracts the stored original's URL from an upload response.
fn parse_upload_response(body: &[u8]) -> HostResult<String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| HostError::Decode(e.to_string()))?;

    ["secure_url", "url"]
        .iter()
        .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .ok_or_else(|| HostError::Decode("missing secure_url in upload response".to_string()))
}

// =============================================================================
// Helpers
// =============================================================================

fn network(err: reqwest::Error) -> HostError {
    match err.status() {
        Some(status) => HostError::Status(status.as_u16()),
        None => HostError::Network(err.to_string()),
    }
}

fn ensure_success(response: reqwest::Response) -> HostResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HostError::Status(status.as_u16()))
    }
}

/// Wraps the file content in a chunked body that reports byte progress as the
/// HTTP client pulls it.
fn progress_body(bytes: &[u8], progress: ProgressFn) -> reqwest::Body {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent: u64 = 0;

    let stream = futures_util::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        progress(sent, total);
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gallery::{PageCursor, PageSize};

    fn endpoints(base: &str) -> HostEndpoints {
        HostEndpoints {
            upload_url: "https://upload.test/v1_1/demo/upload".into(),
            upload_preset: "unsigned_upload".into(),
            api_base_url: base.into(),
        }
    }

    #[test]
    fn images_url_carries_page_and_limit() {
        let request = PageRequest {
            page: PageCursor::START.next().next(),
            limit: PageSize::new(50),
        };
        assert_eq!(
            endpoints("https://api.test/").images_url(request),
            "https://api.test/images?page=2&limit=50"
        );
    }

    #[test]
    fn download_url_trims_trailing_slash() {
        assert_eq!(
            endpoints("https://api.test/").download_url(),
            "https://api.test/download"
        );
    }

    #[test]
    fn listing_accepts_bare_urls_and_records() {
        let body = br#"[
            "https://cdn.test/a.jpg",
            {"thumbnail": "https://cdn.test/t/b.jpg", "original": "https://cdn.test/b.jpg"},
            {"original": "https://cdn.test/c.jpg"}
        ]"#;

        let descriptors = parse_listing(body).expect("valid listing");

        assert_eq!(
            descriptors,
            vec![
                ImageDescriptor::from_url("https://cdn.test/a.jpg"),
                ImageDescriptor::new("https://cdn.test/t/b.jpg", "https://cdn.test/b.jpg"),
                ImageDescriptor::from_url("https://cdn.test/c.jpg"),
            ]
        );
    }

    #[test]
    fn empty_listing_is_an_empty_page() {
        assert!(parse_listing(b"[]").expect("valid listing").is_empty());
    }

    #[test]
    fn listing_rejects_non_array() {
        assert!(matches!(
            parse_listing(br#"{"images": []}"#),
            Err(HostError::Decode(_))
        ));
    }

    #[test]
    fn upload_response_prefers_secure_url() {
        let body = br#"{"url": "http://cdn.test/a.jpg", "secure_url": "https://cdn.test/a.jpg"}"#;
        assert_eq!(
            parse_upload_response(body).expect("url present"),
            "https://cdn.test/a.jpg"
        );
    }

    #[test]
    fn upload_response_falls_back_to_url() {
        let body = br#"{"url": "http://cdn.test/a.jpg"}"#;
        assert_eq!(
            parse_upload_response(body).expect("url present"),
            "http://cdn.test/a.jpg"
        );
    }

    #[test]
    fn upload_response_without_url_is_a_decode_error() {
        assert!(matches!(
            parse_upload_response(br#"{"public_id": "a"}"#),
            Err(HostError::Decode(_))
        ));
    }

    #[test]
    fn client_builds_with_default_settings() {
        let host = HttpMediaHost::new(endpoints("https://api.test"), Duration::from_secs(5))
            .expect("client builds");
        assert_eq!(host.endpoints().upload_preset, "unsigned_upload");
    }
}
