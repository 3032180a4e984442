use crate::verification::DigestAlgorithm;
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber;

#[derive(Debug, Clone)]
pub enum Command {
    Fetch {
        config_path: Option<String>,
        url: Option<String>,
        parts: Option<usize>,
        output_dir: Option<String>,
        file_name: Option<String>,
        algorithm: Option<DigestAlgorithm>,
        expected_digest: Option<String>,
        timeout_secs: Option<u64>,
        keep_parts_on_failure: bool,
    },
    Digest {
        file: String,
        algorithm: DigestAlgorithm,
        expected_digest: Option<String>,
    },
}

impl Command {
    /// `fetch` with everything taken from the configuration defaults.
    pub fn default_fetch() -> Self {
        Command::Fetch {
            config_path: None,
            url: None,
            parts: None,
            output_dir: None,
            file_name: None,
            algorithm: None,
            expected_digest: None,
            timeout_secs: None,
            keep_parts_on_failure: false,
        }
    }
}

pub struct Args {
    pub command: Command,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "rangeget",
    version,
    author = "Nick Guletskii",
    about = "Download an archive as concurrent byte-range chunks, reassemble it and print its digest"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        global = true
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, ClapArgs)]
struct FetchArgs {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Sets a custom config file"
    )]
    config: Option<String>,

    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help = "Overrides the URL of the archive to download"
    )]
    url: Option<String>,

    #[arg(
        short = 'p',
        long = "parts",
        value_name = "N",
        help = "Number of concurrent ranged requests (default: 3)"
    )]
    parts: Option<usize>,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Keeps the download in DIR instead of a temporary directory"
    )]
    output_dir: Option<String>,

    #[arg(
        long = "file-name",
        value_name = "NAME",
        help = "Overrides the file name derived from the URL"
    )]
    file_name: Option<String>,

    #[arg(
        long = "algorithm",
        value_name = "ALGORITHM",
        help = "Digest algorithm (default: sha256)"
    )]
    algorithm: Option<DigestAlgorithm>,

    #[arg(
        long = "expected-digest",
        value_name = "HEX",
        help = "Fails unless the downloaded file has this digest"
    )]
    expected_digest: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help = "Aborts if fetching the chunks takes longer than this"
    )]
    timeout: Option<u64>,

    #[arg(
        long = "keep-parts-on-failure",
        help = "Leaves part files on disk when the download fails"
    )]
    keep_parts_on_failure: bool,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Download the archive in ranged chunks and print its digest (default)
    Fetch(FetchArgs),

    /// Print the digest of a local file
    Digest {
        #[arg(value_name = "FILE", help = "File to hash")]
        file: String,

        #[arg(
            long = "algorithm",
            value_name = "ALGORITHM",
            help = "Digest algorithm",
            default_value_t = DigestAlgorithm::Sha256
        )]
        algorithm: DigestAlgorithm,

        #[arg(
            long = "expected-digest",
            value_name = "HEX",
            help = "Fails unless the file has this digest"
        )]
        expected_digest: Option<String>,
    },
}

fn init_tracing(log_level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    init_tracing(log_level);

    let command = match cli.command {
        None => Command::default_fetch(),
        Some(CliCommand::Fetch(FetchArgs {
            config,
            url,
            parts,
            output_dir,
            file_name,
            algorithm,
            expected_digest,
            timeout,
            keep_parts_on_failure,
        })) => Command::Fetch {
            config_path: config,
            url,
            parts,
            output_dir,
            file_name,
            algorithm,
            expected_digest,
            timeout_secs: timeout,
            keep_parts_on_failure,
        },
        Some(CliCommand::Digest {
            file,
            algorithm,
            expected_digest,
        }) => Command::Digest {
            file,
            algorithm,
            expected_digest,
        },
    };

    Args { command, log_level }
}
