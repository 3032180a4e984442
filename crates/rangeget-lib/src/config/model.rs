use crate::download::DownloadOptions;
use crate::verification::DigestAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str =
    "https://gitea.radium.group/radium/project-configuration/archive/master.zip";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub source: SourceConfig,
    pub download: DownloadConfig,
    pub digest: DigestConfig,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SourceConfig {
    pub url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DownloadConfig {
    pub parts: usize,
    pub buffer_size: usize,
    pub timeout_secs: Option<u64>,
    pub cleanup_on_failure: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let defaults = DownloadOptions::default();
        Self {
            parts: defaults.parts,
            buffer_size: defaults.buffer_size,
            timeout_secs: defaults.timeout.map(|t| t.as_secs()),
            cleanup_on_failure: defaults.cleanup_on_failure,
        }
    }
}

impl DownloadConfig {
    pub fn to_options(&self) -> DownloadOptions {
        DownloadOptions {
            parts: self.parts,
            buffer_size: self.buffer_size,
            timeout: self.timeout_secs.map(Duration::from_secs),
            cleanup_on_failure: self.cleanup_on_failure,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DigestConfig {
    pub algorithm: DigestAlgorithm,
    /// Hex digest the downloaded file must match.
    pub expected: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    /// Directory to keep the download in. A temporary directory is used when unset.
    pub path: Option<PathBuf>,
    /// File name inside the output directory; derived from the URL when unset.
    pub file_name: Option<String>,
}
