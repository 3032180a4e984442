use super::types::{ChunkRange, TransferPlan};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Splits `total_size` bytes into `parts` contiguous ranges.
///
/// Every range but the last gets `total_size / parts` bytes; the last one
/// also takes the remainder. When `total_size < parts` the leading ranges are
/// empty. A zero-sized resource always yields a single empty range.
pub fn plan(total_size: u64, parts: usize) -> Result<TransferPlan, PlanError> {
    if parts == 0 {
        return Err(PlanError::InvalidArgument(
            "part count must be at least 1".to_string(),
        ));
    }

    if total_size == 0 {
        return Ok(TransferPlan {
            total_size,
            chunks: vec![ChunkRange {
                index: 0,
                start: 0,
                len: 0,
            }],
        });
    }

    let parts_u64 = parts as u64;
    let chunk_size = total_size / parts_u64;

    let chunks = (0..parts_u64)
        .map(|i| {
            let start = i * chunk_size;
            let len = if i == parts_u64 - 1 {
                total_size - start
            } else {
                chunk_size
            };
            ChunkRange {
                index: i as usize,
                start,
                len,
            }
        })
        .collect();

    Ok(TransferPlan { total_size, chunks })
}
