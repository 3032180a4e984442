use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One contiguous byte range of the remote resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: usize,
    pub start: u64,
    pub len: u64,
}

impl ChunkRange {
    /// Inclusive last byte, or `None` for an empty range.
    pub fn end(&self) -> Option<u64> {
        (self.len > 0).then(|| self.start + self.len - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value for the `Range` request header.
    pub fn range_header(&self) -> Option<String> {
        self.end().map(|end| format!("bytes={}-{}", self.start, end))
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "#{} [{}-{}]", self.index, self.start, end),
            None => write!(f, "#{} [empty at {}]", self.index, self.start),
        }
    }
}

/// Ordered, contiguous partition of `total_size` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferPlan {
    pub(crate) total_size: u64,
    pub(crate) chunks: Vec<ChunkRange>,
}

impl TransferPlan {
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn chunks(&self) -> &[ChunkRange] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadStage {
    Sizing,
    Planning,
    Fetching,
    Merging,
    Done,
    Failed,
}

impl fmt::Display for DownloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DownloadStage::Sizing => "sizing",
            DownloadStage::Planning => "planning",
            DownloadStage::Fetching => "fetching",
            DownloadStage::Merging => "merging",
            DownloadStage::Done => "done",
            DownloadStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DownloadOptions {
    /// Number of ranged requests the resource is split into.
    pub parts: usize,
    /// Write buffer used for each part file.
    pub buffer_size: usize,
    /// Upper bound for the whole fetching stage.
    pub timeout: Option<Duration>,
    /// Remove part files left behind by a failed download.
    pub cleanup_on_failure: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            parts: 3,
            buffer_size: 8192,
            timeout: None,
            cleanup_on_failure: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadReport {
    pub destination: PathBuf,
    pub total_size: u64,
    pub parts: usize,
}
