use crate::cli::FetchParams;
use crate::download::{Downloader, ReqwestTransport};
use crate::error::RangeGetError;
use crate::verification::{DigestAlgorithm, file_digest, verify_file_digest};
use std::path::PathBuf;
use tracing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub digest: String,
    pub algorithm: DigestAlgorithm,
    pub total_size: u64,
    /// Where the archive was kept; `None` when it lived in a temporary directory.
    pub kept_path: Option<PathBuf>,
}

fn build_transport() -> Result<ReqwestTransport, RangeGetError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("rangeget/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(ReqwestTransport::new(client))
}

pub async fn run_fetch(params: FetchParams) -> Result<FetchSummary, RangeGetError> {
    let FetchParams {
        url,
        output_dir,
        file_name,
        options,
        algorithm,
        expected_digest,
    } = params;

    // Dropping the guard removes the temporary directory and everything in it.
    let (work_dir, temp_dir) = match output_dir {
        Some(dir) => {
            tokio::fs::create_dir_all(&dir).await?;
            (dir, None)
        }
        None => {
            let temp_dir = tempfile::Builder::new().prefix("rangeget-").tempdir()?;
            tracing::debug!("Using temporary directory {}", temp_dir.path().display());
            (temp_dir.path().to_path_buf(), Some(temp_dir))
        }
    };
    let destination = work_dir.join(&file_name);

    tracing::info!(
        "Downloading {} in {} parts to {}",
        url,
        options.parts,
        destination.display()
    );
    let downloader = Downloader::new(build_transport()?, options);
    let report = downloader.download(&url, &destination).await?;

    tracing::info!("Calculating {} digest...", algorithm);
    let digest = match expected_digest {
        Some(expected) => verify_file_digest(&destination, algorithm, &expected).await?,
        None => file_digest(&destination, algorithm)
            .await
            .map_err(|source| RangeGetError::FileDigest {
                path: destination.clone(),
                source,
            })?,
    };

    tracing::info!("{} {}: {}", algorithm, file_name, digest);
    println!("{}  {}", digest, file_name);

    let kept_path = temp_dir.is_none().then_some(destination);
    if kept_path.is_none() {
        tracing::info!("Removing temporary download directory");
    }

    Ok(FetchSummary {
        digest,
        algorithm,
        total_size: report.total_size,
        kept_path,
    })
}
