use crate::cli::args::Command;
use crate::cli::params::{DigestParams, FetchParams};
use crate::config::load_config_or_default;
use crate::error::RangeGetError;
use crate::verification::DigestAlgorithm;
use std::path::PathBuf;
use url::Url;

const FALLBACK_FILE_NAME: &str = "download.bin";

#[derive(Debug, Clone)]
pub enum ResolvedCommand {
    Fetch(FetchParams),
    Digest(DigestParams),
}

fn invalid(details: impl Into<String>) -> RangeGetError {
    RangeGetError::CliArgumentValidation {
        details: details.into(),
    }
}

fn validate_url(url: &str) -> Result<Url, RangeGetError> {
    let parsed = Url::parse(url).map_err(|e| invalid(format!("Invalid URL {url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(invalid(format!(
            "Unsupported URL scheme {scheme:?} in {url}. Only http and https are supported."
        ))),
    }
}

/// Last non-empty path segment of `url`, or a fixed fallback.
pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(str::to_owned)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

fn validate_file_name(file_name: String) -> Result<String, RangeGetError> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
    {
        return Err(invalid(format!(
            "Invalid output file name {file_name:?}. It must be a plain file name."
        )));
    }
    Ok(file_name)
}

fn validate_expected_digest(
    algorithm: DigestAlgorithm,
    expected: Option<String>,
) -> Result<Option<String>, RangeGetError> {
    match expected {
        Some(expected) => {
            algorithm.decode_hex(&expected)?;
            Ok(Some(expected.trim().to_ascii_lowercase()))
        }
        None => Ok(None),
    }
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, RangeGetError> {
    match command {
        Command::Fetch {
            config_path,
            url,
            parts,
            output_dir,
            file_name,
            algorithm,
            expected_digest,
            timeout_secs,
            keep_parts_on_failure,
        } => {
            let app_config = load_config_or_default(config_path.as_deref())?;

            let url = url.unwrap_or(app_config.source.url);
            let parsed_url = validate_url(&url)?;

            let mut download = app_config.download;
            if let Some(parts) = parts {
                download.parts = parts;
            }
            if timeout_secs.is_some() {
                download.timeout_secs = timeout_secs;
            }
            if keep_parts_on_failure {
                download.cleanup_on_failure = false;
            }

            for (name, value) in [
                ("parts", download.parts),
                ("buffer-size", download.buffer_size),
            ] {
                if value == 0 {
                    return Err(invalid(format!("{name} must be greater than 0.")));
                }
            }
            if download.timeout_secs == Some(0) {
                return Err(invalid("timeout must be greater than 0."));
            }

            let algorithm = algorithm.unwrap_or(app_config.digest.algorithm);
            let expected_digest =
                validate_expected_digest(algorithm, expected_digest.or(app_config.digest.expected))?;

            let file_name = validate_file_name(
                file_name
                    .or(app_config.output.file_name)
                    .unwrap_or_else(|| file_name_from_url(&parsed_url)),
            )?;

            Ok(ResolvedCommand::Fetch(FetchParams {
                url,
                output_dir: output_dir.map(PathBuf::from).or(app_config.output.path),
                file_name,
                options: download.to_options(),
                algorithm,
                expected_digest,
            }))
        }
        Command::Digest {
            file,
            algorithm,
            expected_digest,
        } => Ok(ResolvedCommand::Digest(DigestParams {
            path: PathBuf::from(file),
            algorithm,
            expected_digest: validate_expected_digest(algorithm, expected_digest)?,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_URL;
    use std::time::Duration;

    fn fetch(config_path: Option<&str>, url: Option<&str>, parts: Option<usize>) -> Command {
        Command::Fetch {
            config_path: config_path.map(str::to_owned),
            url: url.map(str::to_owned),
            parts,
            output_dir: None,
            file_name: None,
            algorithm: None,
            expected_digest: None,
            timeout_secs: None,
            keep_parts_on_failure: false,
        }
    }

    fn resolve_fetch(command: Command) -> FetchParams {
        match resolve_command(command).unwrap() {
            ResolvedCommand::Fetch(params) => params,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_fetch_uses_reference_archive() {
        let params = resolve_fetch(Command::default_fetch());

        assert_eq!(params.url, DEFAULT_URL);
        assert_eq!(params.file_name, "master.zip");
        assert_eq!(params.options.parts, 3);
        assert!(params.options.cleanup_on_failure);
        assert_eq!(params.output_dir, None);
        assert_eq!(params.algorithm, DigestAlgorithm::Sha256);
    }

    #[test]
    fn test_cli_overrides_win() {
        let params = resolve_fetch(fetch(None, Some("http://localhost:9000/files/"), Some(7)));

        assert_eq!(params.url, "http://localhost:9000/files/");
        assert_eq!(params.file_name, "files");
        assert_eq!(params.options.parts, 7);
    }

    #[test]
    fn test_config_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("rangeget.toml");
        std::fs::write(
            &config_path,
            "[download]\nparts = 4\ntimeout_secs = 15\n\n[output]\nfile_name = \"out.zip\"\n",
        )
        .unwrap();

        let command = fetch(config_path.to_str(), None, None);
        let params = resolve_fetch(command);

        assert_eq!(params.options.parts, 4);
        assert_eq!(params.options.timeout, Some(Duration::from_secs(15)));
        assert_eq!(params.file_name, "out.zip");
    }

    #[test]
    fn test_rejects_zero_parts() {
        assert!(matches!(
            resolve_command(fetch(None, None, Some(0))),
            Err(RangeGetError::CliArgumentValidation { .. })
        ));
    }

    #[test]
    fn test_rejects_non_http_urls() {
        for url in ["ftp://example.com/archive.zip", "not a url"] {
            assert!(matches!(
                resolve_command(fetch(None, Some(url), None)),
                Err(RangeGetError::CliArgumentValidation { .. })
            ));
        }
    }

    #[test]
    fn test_file_name_fallback() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        assert_eq!(file_name_from_url(&url), "download.bin");
    }

    #[test]
    fn test_digest_command_validates_expected_digest() {
        let bad = Command::Digest {
            file: "archive.zip".to_string(),
            algorithm: DigestAlgorithm::Sha256,
            expected_digest: Some("abcd".to_string()),
        };
        assert!(matches!(
            resolve_command(bad),
            Err(RangeGetError::Verification(_))
        ));

        let good = Command::Digest {
            file: "archive.zip".to_string(),
            algorithm: DigestAlgorithm::Md5,
            expected_digest: Some("3D8B639A5CD4967496A67A327719B7AE".to_string()),
        };
        match resolve_command(good).unwrap() {
            ResolvedCommand::Digest(params) => assert_eq!(
                params.expected_digest.as_deref(),
                Some("3d8b639a5cd4967496a67a327719b7ae")
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
