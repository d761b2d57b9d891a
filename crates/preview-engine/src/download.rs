//! Object-URL bookkeeping behind the download anchor.
//!
//! The page hands out each artifact through a URL that owns its bytes until
//! revoked. [`ReplacingLink`] keeps exactly one of those alive: the anchor is
//! pointed at the new URL before the previous one is released, so a click
//! never lands on a revoked URL.

use file_format::Artifact;
use tracing::warn;

use crate::error::PreviewError;
use crate::host::DownloadLink;

/// Creates and releases the URLs the download anchor points at.
pub trait ObjectUrls {
    /// Package `artifact` for download and return a URL that serves it.
    fn create(&mut self, artifact: &Artifact) -> Result<String, PreviewError>;

    fn revoke(&mut self, url: &str);

    /// Point the anchor at `url`, saving as `filename`.
    fn set_anchor(&mut self, url: &str, filename: &str);
}

/// A [`DownloadLink`] that replaces the published URL on every artifact.
#[derive(Debug)]
pub struct ReplacingLink<U> {
    urls: U,
    current: Option<String>,
}

impl<U: ObjectUrls> ReplacingLink<U> {
    pub fn new(urls: U) -> Self {
        Self {
            urls,
            current: None,
        }
    }

    /// The URL the anchor currently points at.
    pub fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn urls(&self) -> &U {
        &self.urls
    }
}

impl<U: ObjectUrls> DownloadLink for ReplacingLink<U> {
    fn publish(&mut self, artifact: Artifact) {
        let url = match self.urls.create(&artifact) {
            Ok(url) => url,
            Err(error) => {
                warn!(%error, filename = %artifact.filename, "download link not updated");
                return;
            }
        };
        self.urls.set_anchor(&url, &artifact.filename);
        if let Some(previous) = self.current.replace(url) {
            self.urls.revoke(&previous);
        }
    }
}
