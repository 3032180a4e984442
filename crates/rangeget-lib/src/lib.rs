pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod verification;

pub use config::Config;
pub use download::{DownloadError, DownloadOptions, Downloader};
pub use error::RangeGetError;
