use eyre::Result;
use rangeget_lib::config::{Config, DownloadConfig, OutputConfig, SourceConfig};
use rangeget_lib::download::plan;
use std::path::{Path, PathBuf};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ARCHIVE_PATH: &str = "/radium/project-configuration/archive/master.zip";

pub fn fake_archive() -> Vec<u8> {
    b"fake content".repeat(3)
}

pub fn archive_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), ARCHIVE_PATH)
}

/// Answers HEAD for the archive with `content.len()` as Content-Length.
pub async fn mount_head(server: &MockServer, content: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(ARCHIVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Length", content.len().to_string().as_str())
                .set_body_bytes(content.to_vec()),
        )
        .mount(server)
        .await;
}

/// Mounts one ranged GET per chunk of the transfer plan for `parts`.
///
/// `overrides` replaces the status of the given chunk indices.
pub async fn mount_ranges(
    server: &MockServer,
    content: &[u8],
    parts: usize,
    overrides: &[(usize, u16)],
) -> Result<()> {
    let transfer_plan = plan(content.len() as u64, parts)?;
    for chunk in transfer_plan.chunks() {
        let (Some(range_header), Some(end)) = (chunk.range_header(), chunk.end()) else {
            continue;
        };

        let template = match overrides.iter().find(|(index, _)| *index == chunk.index) {
            Some((_, status)) => ResponseTemplate::new(*status).set_body_string("Internal Server Error"),
            None => ResponseTemplate::new(206)
                .insert_header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", chunk.start, end, content.len()).as_str(),
                )
                .set_body_bytes(content[chunk.start as usize..=end as usize].to_vec()),
        };

        Mock::given(method("GET"))
            .and(path(ARCHIVE_PATH))
            .and(header("Range", range_header.as_str()))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }
    Ok(())
}

/// Starts a server that serves `content` as `parts` ranged responses.
pub async fn start_archive_server(content: &[u8], parts: usize) -> Result<MockServer> {
    let server = MockServer::start().await;
    mount_head(&server, content).await;
    mount_ranges(&server, content, parts, &[]).await?;
    Ok(server)
}

pub fn create_test_config(url: &str, parts: usize, output_dir: Option<&Path>) -> Config {
    Config {
        source: SourceConfig {
            url: url.to_string(),
        },
        download: DownloadConfig {
            parts,
            ..DownloadConfig::default()
        },
        output: OutputConfig {
            path: output_dir.map(Path::to_path_buf),
            file_name: None,
        },
        ..Config::default()
    }
}

/// Writes `config` as JSON into `dir` and returns its path.
pub fn write_test_config(dir: &Path, config: &Config) -> Result<PathBuf> {
    let config_path = dir.join("rangeget.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(config)?)?;
    Ok(config_path)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("rangeget_lib=debug,rangeget_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
