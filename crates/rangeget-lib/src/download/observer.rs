use super::error::DownloadError;
use super::types::{ChunkRange, DownloadStage, TransferPlan};
use std::sync::Arc;

/// Receives progress notifications from a [`Downloader`](super::Downloader).
///
/// Every method has an empty default, so implementations only override what
/// they care about. Chunk callbacks may arrive in any order across chunks.
pub trait DownloadObserver: Send + Sync {
    fn stage_changed(&self, _url: &str, _stage: DownloadStage) {}

    fn plan_ready(&self, _url: &str, _plan: &TransferPlan) {}

    fn chunk_started(&self, _range: &ChunkRange) {}

    /// Called after each block of `bytes` is written for chunk `index`.
    fn chunk_progress(&self, _index: usize, _bytes: u64) {}

    fn chunk_finished(&self, _range: &ChunkRange, _result: &Result<u64, DownloadError>) {}
}

pub type SharedDownloadObserver = Arc<dyn DownloadObserver>;

/// Ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl DownloadObserver for NoopObserver {}

/// Forwards notifications to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl DownloadObserver for TracingObserver {
    fn stage_changed(&self, url: &str, stage: DownloadStage) {
        match stage {
            DownloadStage::Failed => tracing::warn!(%url, %stage, "Download stage changed"),
            DownloadStage::Done => tracing::info!(%url, %stage, "Download stage changed"),
            _ => tracing::debug!(%url, %stage, "Download stage changed"),
        }
    }

    fn plan_ready(&self, url: &str, plan: &TransferPlan) {
        tracing::info!(
            %url,
            total_size = plan.total_size(),
            parts = plan.len(),
            "Planned ranged download"
        );
    }

    fn chunk_started(&self, range: &ChunkRange) {
        tracing::debug!(chunk = %range, "Fetching chunk");
    }

    fn chunk_progress(&self, index: usize, bytes: u64) {
        tracing::trace!(index, bytes, "Wrote block");
    }

    fn chunk_finished(&self, range: &ChunkRange, result: &Result<u64, DownloadError>) {
        match result {
            Ok(written) => tracing::debug!(chunk = %range, written, "Chunk finished"),
            Err(err) => tracing::warn!(chunk = %range, "Chunk failed: {:#}", err),
        }
    }
}
