use super::error::DownloadError;
use super::transport::{ByteStream, HeadResponse, HttpTransport, RangeResponse};
use super::types::ChunkRange;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub(crate) const MOCK_URL: &str = "http://mock.invalid/archive/master.zip";

/// In-memory server for one resource.
pub(crate) struct MockTransport {
    content: Vec<u8>,
    head_status: u16,
    content_length: Option<u64>,
    failing_chunks: HashMap<usize, u16>,
    stalled_chunks: Vec<usize>,
    ignore_ranges: bool,
    naive_content_range: bool,
    reverse_completion: bool,
    block_size: usize,
    range_headers: Mutex<Vec<Option<String>>>,
    completed: Mutex<Vec<usize>>,
}

impl MockTransport {
    pub(crate) fn new(content: Vec<u8>) -> Self {
        Self {
            content_length: Some(content.len() as u64),
            content,
            head_status: 200,
            failing_chunks: HashMap::new(),
            stalled_chunks: Vec::new(),
            ignore_ranges: false,
            naive_content_range: false,
            reverse_completion: false,
            block_size: 4096,
            range_headers: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_head_status(mut self, status: u16) -> Self {
        self.head_status = status;
        self
    }

    pub(crate) fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }

    pub(crate) fn with_failing_chunk(mut self, index: usize, status: u16) -> Self {
        self.failing_chunks.insert(index, status);
        self
    }

    /// The chunk never answers.
    pub(crate) fn with_stalled_chunk(mut self, index: usize) -> Self {
        self.stalled_chunks.push(index);
        self
    }

    /// Answers every GET with 200 and the whole body.
    pub(crate) fn with_ignored_ranges(mut self) -> Self {
        self.ignore_ranges = true;
        self
    }

    /// Serves `len` bytes from offset 0 tagged `Content-Range: bytes 0-..`.
    pub(crate) fn with_naive_content_range(mut self) -> Self {
        self.naive_content_range = true;
        self
    }

    /// Delays lower chunk indices longer so they complete last.
    pub(crate) fn with_reverse_completion(mut self) -> Self {
        self.reverse_completion = true;
        self
    }

    pub(crate) fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub(crate) fn range_headers(&self) -> Vec<Option<String>> {
        self.range_headers.lock().unwrap().clone()
    }

    /// Chunk indices in the order their responses were produced.
    pub(crate) fn completion_order(&self) -> Vec<usize> {
        self.completed.lock().unwrap().clone()
    }

    fn slice(&self, start: u64, len: u64) -> &[u8] {
        let start = (start as usize).min(self.content.len());
        let end = (start + len as usize).min(self.content.len());
        &self.content[start..end]
    }

    fn body(&self, data: &[u8]) -> ByteStream {
        let blocks = data
            .chunks(self.block_size.max(1))
            .map(|block| Ok::<_, DownloadError>(Bytes::copy_from_slice(block)))
            .collect::<Vec<_>>();
        stream::iter(blocks).boxed()
    }
}

impl HttpTransport for MockTransport {
    async fn head(&self, _url: &str) -> Result<HeadResponse, DownloadError> {
        Ok(HeadResponse {
            status: self.head_status,
            content_length: self.content_length,
        })
    }

    async fn get_range(&self, _url: &str, range: &ChunkRange) -> Result<RangeResponse, DownloadError> {
        self.range_headers.lock().unwrap().push(range.range_header());

        if self.stalled_chunks.contains(&range.index) {
            futures::future::pending::<()>().await;
        }
        if self.reverse_completion {
            tokio::time::sleep(Duration::from_millis(
                10 * (16u64.saturating_sub(range.index as u64)),
            ))
            .await;
        } else {
            tokio::task::yield_now().await;
        }
        self.completed.lock().unwrap().push(range.index);

        if let Some(status) = self.failing_chunks.get(&range.index) {
            return Ok(RangeResponse {
                status: *status,
                content_range: None,
                body: self.body(b"Internal Server Error"),
            });
        }

        let total = self.content.len();
        let response = if self.ignore_ranges {
            RangeResponse {
                status: 200,
                content_range: None,
                body: self.body(&self.content),
            }
        } else if self.naive_content_range {
            RangeResponse {
                status: 206,
                content_range: Some(format!("bytes 0-{}/{}", range.len - 1, total)),
                body: self.body(self.slice(0, range.len)),
            }
        } else {
            let data = self.slice(range.start, range.len);
            let content_range = (!data.is_empty()).then(|| {
                format!(
                    "bytes {}-{}/{}",
                    range.start,
                    range.start + data.len() as u64 - 1,
                    total
                )
            });
            RangeResponse {
                status: 206,
                content_range,
                body: self.body(data),
            }
        };
        Ok(response)
    }
}
