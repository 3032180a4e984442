use super::plan::PlanError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Request to {url} failed with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server did not report a usable Content-Length for {url}")]
    MissingContentLength { url: String },

    #[error("Chunk {index} of {url}: expected {expected} bytes, received {actual}")]
    LengthMismatch {
        url: String,
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("Fetching {url} did not finish within {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DownloadError::Io { path, source }
    }

    /// True for failures that came from the remote side or the network.
    pub fn is_transfer_error(&self) -> bool {
        matches!(
            self,
            DownloadError::Status { .. }
                | DownloadError::Http { .. }
                | DownloadError::MissingContentLength { .. }
                | DownloadError::LengthMismatch { .. }
                | DownloadError::Timeout { .. }
        )
    }
}
