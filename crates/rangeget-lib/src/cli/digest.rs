use crate::cli::DigestParams;
use crate::error::RangeGetError;
use crate::verification::{file_digest, verify_file_digest};

pub async fn run_digest(params: DigestParams) -> Result<String, RangeGetError> {
    let DigestParams {
        path,
        algorithm,
        expected_digest,
    } = params;

    tracing::info!("Calculating {} digest of {}", algorithm, path.display());
    let digest = match expected_digest {
        Some(expected) => {
            let digest = verify_file_digest(&path, algorithm, &expected).await?;
            tracing::info!("Digest matches the expected value");
            digest
        }
        None => file_digest(&path, algorithm)
            .await
            .map_err(|source| RangeGetError::FileDigest {
                path: path.clone(),
                source,
            })?,
    };

    println!("{}  {}", digest, path.display());
    Ok(digest)
}
