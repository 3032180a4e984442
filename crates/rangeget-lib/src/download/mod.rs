mod chunk;
#[allow(clippy::module_inception)]
mod download;
mod error;
mod observer;
mod plan;
#[cfg(test)]
pub(crate) mod testing;
mod transport;
mod types;

pub use chunk::fetch_chunk;
pub use download::{Downloader, part_path, staging_path};
pub use error::DownloadError;
pub use observer::{DownloadObserver, NoopObserver, SharedDownloadObserver, TracingObserver};
pub use plan::{PlanError, plan};
pub use transport::{ByteStream, HeadResponse, HttpTransport, RangeResponse, ReqwestTransport};
pub use types::{ChunkRange, DownloadOptions, DownloadReport, DownloadStage, TransferPlan};
