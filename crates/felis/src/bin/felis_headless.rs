//! # Felis Headless Host
//!
//! Boots the loader without a game attached and drives the hooks through
//! a short scripted session.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults (client side), info logs
//! ./felis_headless
//!
//! # Config file and dispatch tracing
//! ./felis_headless path/to/felis.toml
//! FELIS_SIDE=server FELIS_TRACE_DISPATCH=1 RUST_LOG=trace ./felis_headless
//! ```
//!
//! Without an argument, `felis.toml` in the working directory is used when
//! it exists.

use std::path::PathBuf;
use std::process::ExitCode;

use felis::api::{ApiResult, FelisConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "felis.toml";

fn load_config() -> ApiResult<FelisConfig> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match explicit {
        Some(path) => FelisConfig::load(path)?,
        None if PathBuf::from(DEFAULT_CONFIG).is_file() => FelisConfig::load(DEFAULT_CONFIG)?,
        None => FelisConfig::default(),
    };
    config.with_env_overrides()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(side = %config.side, trace_dispatch = config.trace_dispatch, "felis headless starting");

    match felis::headless::run(config) {
        Ok(summary) => {
            tracing::info!(
                mods = ?summary.mods,
                ticks = summary.ticks,
                guardian_ticks = summary.guardian_ticks,
                broken = summary.broken.len(),
                suppressed = summary.suppressed.len(),
                "session complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "session failed");
            ExitCode::FAILURE
        }
    }
}
