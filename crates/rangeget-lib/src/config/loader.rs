use super::Config;
use crate::error::RangeGetError;
use config::Config as ConfigBuilder;

fn environment() -> config::Environment {
    config::Environment::with_prefix("RANGEGET")
        .prefix_separator("_")
        .separator("__")
}

pub fn load_config(config_path: &str) -> Result<Config, RangeGetError> {
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::with_name(config_path))
        .add_source(environment())
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}

/// Loads `config_path` when given; otherwise only the environment overrides apply.
pub fn load_config_or_default(config_path: Option<&str>) -> Result<Config, RangeGetError> {
    match config_path {
        Some(config_path) => {
            tracing::info!("Loading configuration from {}", config_path);
            load_config(config_path)
        }
        None => ConfigBuilder::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()
            .map_err(Into::into),
    }
}
