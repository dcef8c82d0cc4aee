//! # Loader Configuration
//!
//! Read once at startup. Example `felis.toml`:
//!
//! ```toml
//! side = "server"
//! trace_dispatch = true
//!
//! [mods]
//! disabled = ["noisy_mod"]
//! ```
//!
//! Environment variables override the file:
//!
//! | Variable               | Field            | Values              |
//! |------------------------|------------------|---------------------|
//! | `FELIS_SIDE`           | `side`           | `client`, `server`  |
//! | `FELIS_TRACE_DISPATCH` | `trace_dispatch` | `true`, `false`, `1`, `0` |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::side::Side;

/// Overrides [`FelisConfig::side`].
pub const SIDE_ENV: &str = "FELIS_SIDE";

/// Overrides [`FelisConfig::trace_dispatch`].
pub const TRACE_DISPATCH_ENV: &str = "FELIS_TRACE_DISPATCH";

/// Loader configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FelisConfig {
    /// Physical side to initialize.
    pub side: Side,
    /// Log every hook dispatch.
    pub trace_dispatch: bool,
    /// Per-mod settings.
    pub mods: ModsConfig,
}

/// The `[mods]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModsConfig {
    /// Mod ids the loader skips.
    pub disabled: Vec<String>,
}

impl FelisConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`ApiError::Config`] on malformed TOML, unknown keys or bad values.
    pub fn from_toml_str(text: &str) -> ApiResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), side = %config.side, "config loaded");
        Ok(config)
    }

    /// Applies `FELIS_SIDE` and `FELIS_TRACE_DISPATCH` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidSide`] or [`ApiError::InvalidOption`] when a
    /// variable is set to something unparseable.
    pub fn with_env_overrides(self) -> ApiResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed by the
    /// environment variable names.
    ///
    /// # Errors
    ///
    /// Same as [`with_env_overrides`](Self::with_env_overrides).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ApiResult<Self> {
        if let Some(side) = lookup(SIDE_ENV) {
            self.side = side.parse()?;
        }
        if let Some(value) = lookup(TRACE_DISPATCH_ENV) {
            self.trace_dispatch = parse_flag(TRACE_DISPATCH_ENV, &value)?;
        }
        Ok(self)
    }

    /// Returns whether the loader should skip `mod_id`.
    #[must_use]
    pub fn is_disabled(&self, mod_id: &str) -> bool {
        self.mods.disabled.iter().any(|id| id == mod_id)
    }
}

fn parse_flag(key: &'static str, value: &str) -> ApiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::InvalidOption {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FelisConfig::from_toml_str("").unwrap();
        assert_eq!(config, FelisConfig::default());
        assert_eq!(config.side, Side::Client);
        assert!(!config.trace_dispatch);
        assert!(config.mods.disabled.is_empty());
    }

    #[test]
    fn test_full_document() {
        let config = FelisConfig::from_toml_str(
            r#"
            side = "server"
            trace_dispatch = true

            [mods]
            disabled = ["noisy_mod", "old_mod"]
            "#,
        )
        .unwrap();

        assert_eq!(config.side, Side::Server);
        assert!(config.trace_dispatch);
        assert!(config.is_disabled("old_mod"));
        assert!(!config.is_disabled("tabby"));
    }

    #[test]
    fn test_rejects_unknown_keys_and_sides() {
        assert!(matches!(
            FelisConfig::from_toml_str("sied = \"server\""),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            FelisConfig::from_toml_str("side = \"both\""),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = FelisConfig::default()
            .with_overrides(|key| match key {
                SIDE_ENV => Some("server".to_string()),
                TRACE_DISPATCH_ENV => Some("1".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.side, Side::Server);
        assert!(config.trace_dispatch);

        let untouched = FelisConfig::default().with_overrides(|_| None).unwrap();
        assert_eq!(untouched, FelisConfig::default());
    }

    #[test]
    fn test_bad_override_values() {
        let err = FelisConfig::default()
            .with_overrides(|key| (key == SIDE_ENV).then(|| "sideways".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidSide(s) if s == "sideways"));

        let err = FelisConfig::default()
            .with_overrides(|key| (key == TRACE_DISPATCH_ENV).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidOption { key: TRACE_DISPATCH_ENV, .. }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FelisConfig::load("/nonexistent/felis.toml").unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }
}
