use super::content_digest_hasher::{
    ContentDigestHasher, ContentDigestVerifier, DigestAlgorithm, VerificationError,
};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Size of the blocks read from disk while hashing.
pub const DIGEST_BLOCK_SIZE: usize = 64 * 1024;

async fn feed_file(path: &Path, mut update: impl FnMut(&[u8])) -> std::io::Result<()> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = tokio::io::BufReader::new(file);
    let mut buffer = vec![0u8; DIGEST_BLOCK_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        update(&buffer[..bytes_read]);
    }
    Ok(())
}

/// Streams `path` through `algorithm` and returns the lowercase hex digest.
pub async fn file_digest(
    path: impl AsRef<Path>,
    algorithm: DigestAlgorithm,
) -> std::io::Result<String> {
    let path = path.as_ref();
    let mut hasher = ContentDigestHasher::new(algorithm);
    feed_file(path, |block| hasher.update(block)).await?;

    let digest = hasher.finalize_hex();
    tracing::debug!(path = %path.display(), %algorithm, %digest, "Computed file digest");
    Ok(digest)
}

/// Checks `path` against `expected` (hex) and returns the actual digest on success.
pub async fn verify_file_digest(
    path: impl AsRef<Path>,
    algorithm: DigestAlgorithm,
    expected: &str,
) -> Result<String, VerificationError> {
    let path = path.as_ref();
    let mut verifier = ContentDigestVerifier::from_hex(algorithm, expected)?;
    feed_file(path, |block| verifier.update(block))
        .await
        .map_err(|source| VerificationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    verifier.verify()
}

pub fn bytes_digest(data: impl AsRef<[u8]>, algorithm: DigestAlgorithm) -> String {
    let mut hasher = ContentDigestHasher::new(algorithm);
    hasher.update(data);
    hasher.finalize_hex()
}
