mod args;
mod digest;
mod fetch;
mod params;
mod resolved_command;

pub use args::{Args, Command, parse_args};
pub use digest::run_digest;
pub use fetch::{FetchSummary, run_fetch};
pub use params::{DigestParams, FetchParams};
pub use resolved_command::{ResolvedCommand, file_name_from_url, resolve_command};
