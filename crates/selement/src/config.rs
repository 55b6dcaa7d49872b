//! Layered simulation configuration
//!
//! Priority order (highest last):
//! 1. Compiled defaults (`SimConfig::default()`)
//! 2. RON file: `--config <path>` (required) or `selement.ron` (optional),
//!    read by `SimConfig::load` / `SimConfig::load_or_default`
//! 3. Environment variables prefixed with `SELEMENT_`
//!
//! Example environment variable: `SELEMENT_SPAWNING__MAX_MOBS=3`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment};
use selement_core::SimConfig;

/// File picked up from the working directory when no path is given
const DEFAULT_FILE: &str = "selement.ron";

const ENV_PREFIX: &str = "SELEMENT";

pub fn load(path: Option<&Path>) -> Result<SimConfig> {
    let base = match path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => SimConfig::load_or_default(DEFAULT_FILE)
            .with_context(|| format!("Failed to load config file {DEFAULT_FILE}"))?,
    };
    apply_environment(base, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Overlay environment overrides on an already loaded config
fn apply_environment(base: SimConfig, env: Environment) -> Result<SimConfig> {
    let file = Config::try_from(&base).context("Failed to serialize file configuration")?;

    let config = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()
        .context("Failed to build configuration")?;

    let config: SimConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;
    Ok(config.validated())
}
