//! # API Error Types
//!
//! All errors that can occur while configuring the loader, registering
//! mods or running entrypoints.

use felis_events::EventError;
use semver::{Version, VersionReq};
use thiserror::Error;

use crate::entrypoint::EntrypointKind;

/// Errors that can occur in the API layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Reading the configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A side string was neither `client` nor `server`.
    #[error("invalid side {0:?}, expected \"client\" or \"server\"")]
    InvalidSide(String),

    /// An override carried a value that could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidOption {
        /// The option name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Misuse of the event registry.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Two mods share the same id.
    #[error("duplicate mod id: {0}")]
    DuplicateMod(String),

    /// A mod id contains characters outside `[a-z0-9_-]` or is empty.
    #[error("invalid mod id {0:?}")]
    InvalidModId(String),

    /// An entrypoint returned an error.
    #[error("{entrypoint} entrypoint of mod {mod_id} failed: {reason}")]
    Entrypoint {
        /// The failing mod.
        mod_id: String,
        /// Which entrypoint was running.
        entrypoint: EntrypointKind,
        /// The entrypoint's error message.
        reason: String,
    },

    /// A loader operation was called out of order.
    #[error("loader stage violation: {0}")]
    Stage(&'static str),

    /// Mod metadata uses a schema other than 1.
    #[error("unsupported mod metadata schema {0}")]
    UnsupportedSchema(u32),

    /// A mod requires or breaks itself.
    #[error("mod {0} names itself as a dependency")]
    SelfDependency(String),

    /// A required mod is not loaded.
    #[error("mod {mod_id} requires {dependency} {requirement}, which is not loaded")]
    MissingDependency {
        /// The requiring mod.
        mod_id: String,
        /// The missing mod.
        dependency: String,
        /// Accepted versions.
        requirement: VersionReq,
    },

    /// A required mod is loaded in a version outside the requirement.
    #[error("mod {mod_id} requires {dependency} {requirement}, but {found} is loaded")]
    VersionMismatch {
        /// The requiring mod.
        mod_id: String,
        /// The required mod.
        dependency: String,
        /// Accepted versions.
        requirement: VersionReq,
        /// Loaded version.
        found: Version,
    },

    /// An incompatible mod is loaded.
    #[error("mod {mod_id} breaks with {other} {requirement}, and {found} is loaded")]
    Breaks {
        /// The declaring mod.
        mod_id: String,
        /// The incompatible mod.
        other: String,
        /// Incompatible versions.
        requirement: VersionReq,
        /// Loaded version.
        found: Version,
    },

    /// Requirements form a cycle; the first id is repeated at the end.
    #[error("circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
