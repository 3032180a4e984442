use super::error::DownloadError;
use super::observer::DownloadObserver;
use super::transport::HttpTransport;
use super::types::ChunkRange;
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Start offset from a `Content-Range: bytes <start>-<end>/<total>` value.
fn content_range_start(value: &str) -> Option<u64> {
    value
        .trim()
        .strip_prefix("bytes ")?
        .split('-')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Fetches one range of `url` into `destination` and returns the bytes written.
///
/// The body is streamed through a `buffer_size` write buffer. Any status other
/// than 200/206 fails before the part file is touched, and a body whose length
/// differs from the range is rejected. Bytes flushed before a failure stay on
/// disk; removing them is the caller's decision.
pub async fn fetch_chunk<T: HttpTransport>(
    transport: &T,
    url: &str,
    range: &ChunkRange,
    destination: &Path,
    buffer_size: usize,
    observer: &dyn DownloadObserver,
) -> Result<u64, DownloadError> {
    if range.is_empty() {
        tokio::fs::File::create(destination)
            .await
            .map_err(DownloadError::io(destination))?;
        tracing::trace!(chunk = %range, path = %destination.display(), "Empty range, created empty part");
        return Ok(0);
    }

    let response = transport.get_range(url, range).await?;
    if response.status != 200 && response.status != 206 {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }

    // Parts are concatenated by index, so a misplaced range would corrupt the
    // artifact without changing its length.
    if let Some(content_range) = response.content_range.as_deref()
        && content_range_start(content_range) != Some(range.start)
    {
        tracing::warn!(
            chunk = %range,
            %content_range,
            "Server returned a Content-Range that does not match the requested range"
        );
    }

    let file = tokio::fs::File::create(destination)
        .await
        .map_err(DownloadError::io(destination))?;
    let mut writer = tokio::io::BufWriter::with_capacity(buffer_size.max(1), file);

    let mut body = response.body;
    let mut written = 0u64;
    while let Some(block) = body.next().await {
        let block = block?;
        let received = written + block.len() as u64;
        if received > range.len {
            writer
                .flush()
                .await
                .map_err(DownloadError::io(destination))?;
            return Err(DownloadError::LengthMismatch {
                url: url.to_string(),
                index: range.index,
                expected: range.len,
                actual: received,
            });
        }

        writer
            .write_all(&block)
            .await
            .map_err(DownloadError::io(destination))?;
        written = received;
        observer.chunk_progress(range.index, block.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(DownloadError::io(destination))?;

    if written != range.len {
        return Err(DownloadError::LengthMismatch {
            url: url.to_string(),
            index: range.index,
            expected: range.len,
            actual: written,
        });
    }

    Ok(written)
}
