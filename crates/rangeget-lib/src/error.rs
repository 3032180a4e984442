use crate::download::DownloadError;
use crate::verification::VerificationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeGetError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to hash {path}: {source}")]
    FileDigest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid argument: {details}")]
    CliArgumentValidation { details: String },

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Digest verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::testing::{MOCK_URL, MockTransport};
    use crate::download::{DownloadOptions, Downloader, PlanError};

    #[tokio::test]
    async fn test_planning_error_surfaces_as_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Downloader::new(
            MockTransport::new(b"fake content".to_vec()),
            DownloadOptions {
                parts: 0,
                ..DownloadOptions::default()
            },
        );

        let err: RangeGetError = downloader
            .download(MOCK_URL, dir.path().join("master.zip"))
            .await
            .unwrap_err()
            .into();

        assert!(
            matches!(
                err,
                RangeGetError::Download(DownloadError::Plan(PlanError::InvalidArgument(_)))
            ),
            "unexpected error: {err:?}"
        );
    }
}
