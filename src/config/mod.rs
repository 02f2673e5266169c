// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

const ENV_PREFIX: &str = "SERVICE_HEALTH";

/// Load configuration from a file (YAML or JSON), then apply
/// `SERVICE_HEALTH__SECTION__KEY` environment overrides.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;

    let format = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => ::config::FileFormat::Yaml,
        _ => ::config::FileFormat::Json,
    };

    let config: Config = ::config::Config::builder()
        .add_source(::config::File::from_str(&contents, format))
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to assemble config")?
        .try_deserialize()
        .context("Failed to parse config")?;

    config.validate()?;
    Ok(config)
}
