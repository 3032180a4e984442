use super::chunk::fetch_chunk;
use super::error::DownloadError;
use super::observer::{SharedDownloadObserver, TracingObserver};
use super::plan::plan;
use super::transport::HttpTransport;
use super::types::{DownloadOptions, DownloadReport, DownloadStage, TransferPlan};
use futures::future::join_all;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Path of the part file holding chunk `index` of `destination`.
pub fn part_path(destination: &Path, index: usize) -> PathBuf {
    sibling_with_suffix(destination, &format!(".part{index}"))
}

/// Path the parts are merged into before being renamed to `destination`.
pub fn staging_path(destination: &Path) -> PathBuf {
    sibling_with_suffix(destination, ".merging")
}

/// Best-effort removal; failures are logged and otherwise ignored.
async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::trace!(path = %path.display(), "Removed leftover file"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), "Failed to remove leftover file: {}", err),
        }
    }
}

/// Downloads a resource as concurrent byte-range chunks and merges them in order.
pub struct Downloader<T> {
    transport: T,
    options: DownloadOptions,
    observer: SharedDownloadObserver,
}

impl<T: HttpTransport> Downloader<T> {
    pub fn new(transport: T, options: DownloadOptions) -> Self {
        Self {
            transport,
            options,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: SharedDownloadObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Downloads `url` into `destination`.
    ///
    /// `destination` only appears once every chunk has been fetched and merged;
    /// on failure no file exists under that name. Part files are written next
    /// to it and removed afterwards (on failure only when
    /// `cleanup_on_failure` is set).
    pub async fn download(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
    ) -> Result<DownloadReport, DownloadError> {
        let destination = destination.as_ref();
        let result = self.run(url, destination).await;
        if let Err(err) = &result {
            warn!(%url, destination = %destination.display(), "Download failed: {:#}", err);
            self.observer.stage_changed(url, DownloadStage::Failed);
        }
        result
    }

    fn enter(&self, url: &str, stage: DownloadStage) {
        self.observer.stage_changed(url, stage);
    }

    async fn run(&self, url: &str, destination: &Path) -> Result<DownloadReport, DownloadError> {
        self.enter(url, DownloadStage::Sizing);
        let total_size = self.query_size(url).await?;

        self.enter(url, DownloadStage::Planning);
        let plan = plan(total_size, self.options.parts)?;
        self.observer.plan_ready(url, &plan);

        let part_paths = plan
            .chunks()
            .iter()
            .map(|chunk| part_path(destination, chunk.index))
            .collect::<Vec<_>>();

        self.enter(url, DownloadStage::Fetching);
        if let Err(err) = self.fetch_all(url, &plan, &part_paths).await {
            if self.options.cleanup_on_failure {
                remove_files(&part_paths).await;
            }
            return Err(err);
        }

        self.enter(url, DownloadStage::Merging);
        if let Err(err) = merge_parts(&plan, &part_paths, destination).await {
            if self.options.cleanup_on_failure {
                let mut leftovers = part_paths;
                leftovers.push(staging_path(destination));
                remove_files(&leftovers).await;
            }
            return Err(err);
        }

        self.enter(url, DownloadStage::Done);
        info!(%url, destination = %destination.display(), total_size, "Downloaded and merged");
        Ok(DownloadReport {
            destination: destination.to_path_buf(),
            total_size,
            parts: plan.len(),
        })
    }

    async fn query_size(&self, url: &str) -> Result<u64, DownloadError> {
        let head = self.transport.head(url).await?;
        if !(200..300).contains(&head.status) {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: head.status,
            });
        }
        head.content_length
            .ok_or_else(|| DownloadError::MissingContentLength {
                url: url.to_string(),
            })
    }

    /// Runs every chunk fetch to completion, then reports the failure with the
    /// lowest index, if any. A failing chunk does not cancel its siblings; the
    /// timeout, when it fires, drops all of them.
    async fn fetch_all(
        &self,
        url: &str,
        plan: &TransferPlan,
        part_paths: &[PathBuf],
    ) -> Result<(), DownloadError> {
        let fetches = plan
            .chunks()
            .iter()
            .zip(part_paths)
            .map(|(range, path)| async move {
                self.observer.chunk_started(range);
                let result = fetch_chunk(
                    &self.transport,
                    url,
                    range,
                    path,
                    self.options.buffer_size,
                    &*self.observer,
                )
                .await;
                self.observer.chunk_finished(range, &result);
                result
            });

        let gathered = join_all(fetches);
        let outcomes = match self.options.timeout {
            Some(timeout) => tokio::time::timeout(timeout, gathered)
                .await
                .map_err(|_| DownloadError::Timeout {
                    url: url.to_string(),
                    timeout,
                })?,
            None => gathered.await,
        };

        let mut failures = Vec::new();
        for outcome in outcomes {
            if let Err(err) = outcome {
                failures.push(err);
            }
        }

        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(()),
            Some(first) => {
                warn!(%url, failed, parts = plan.len(), "Chunks failed, not merging");
                Err(first)
            }
        }
    }
}

/// Concatenates the part files in index order into `destination`.
///
/// The merge goes through a staging file that is renamed into place at the
/// end, so a failed merge never leaves a truncated file at `destination`.
async fn merge_parts(
    plan: &TransferPlan,
    part_paths: &[PathBuf],
    destination: &Path,
) -> Result<(), DownloadError> {
    let staging = staging_path(destination);
    let file = tokio::fs::File::create(&staging)
        .await
        .map_err(DownloadError::io(&staging))?;
    let mut writer = tokio::io::BufWriter::new(file);

    for (range, part) in plan.chunks().iter().zip(part_paths) {
        let mut reader = tokio::fs::File::open(part)
            .await
            .map_err(DownloadError::io(part))?;
        let copied = tokio::io::copy(&mut reader, &mut writer)
            .await
            .map_err(DownloadError::io(&staging))?;
        tracing::trace!(chunk = %range, copied, "Merged part");

        tokio::fs::remove_file(part)
            .await
            .map_err(DownloadError::io(part))?;
    }

    writer.flush().await.map_err(DownloadError::io(&staging))?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(DownloadError::io(&staging))?;

    tokio::fs::rename(&staging, destination)
        .await
        .map_err(DownloadError::io(destination))
}
