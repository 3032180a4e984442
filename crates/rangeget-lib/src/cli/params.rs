use crate::download::DownloadOptions;
use crate::verification::DigestAlgorithm;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FetchParams {
    pub url: String,
    /// Directory to keep the download in; `None` means a temporary directory.
    pub output_dir: Option<PathBuf>,
    pub file_name: String,
    pub options: DownloadOptions,
    pub algorithm: DigestAlgorithm,
    pub expected_digest: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DigestParams {
    pub path: PathBuf,
    pub algorithm: DigestAlgorithm,
    pub expected_digest: Option<String>,
}
