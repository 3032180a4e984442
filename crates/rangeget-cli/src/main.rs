use rangeget_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_digest, run_fetch};
use rangeget_lib::error::RangeGetError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), RangeGetError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Fetch(params) => {
            run_fetch(params).await?;
        }
        ResolvedCommand::Digest(params) => {
            run_digest(params).await?;
        }
    }

    Ok(())
}
