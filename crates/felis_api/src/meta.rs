//! # Mod Metadata
//!
//! Every mod describes itself with a schema-1 metadata document, usually
//! shipped as `felis.mod.toml`:
//!
//! ```toml
//! schema = 1
//! modid = "cat_tree"
//! name = "Cat Tree"
//! version = "1.4.0"
//! license = "MIT"
//!
//! [[dependencies.requires]]
//! modid = "felis_guardian"
//! version = ">=0.1, <0.3"
//!
//! [[dependencies.breaks]]
//! modid = "scratch_post"
//! version = "<2.0"
//! ```
//!
//! Versions follow semantic versioning; constraints use Cargo's
//! requirement syntax.

use std::fmt;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// The only metadata schema understood.
pub const SCHEMA_VERSION: u32 = 1;

/// Identity, version and dependencies of one mod.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModMetadata {
    /// Schema of this document, always [`SCHEMA_VERSION`].
    pub schema: u32,
    /// Unique id, `[a-z0-9_-]+`.
    pub modid: String,
    /// Display name.
    pub name: String,
    /// Mod version.
    pub version: Version,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// License identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Relations to other mods.
    #[serde(default)]
    pub dependencies: DependencyMetadata,
}

/// The `[dependencies]` table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyMetadata {
    /// Mods that must be present in a matching version.
    pub requires: Vec<Dependency>,
    /// Mods that must not be present in a matching version.
    pub breaks: Vec<Dependency>,
}

/// One relation to another mod.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// The other mod.
    pub modid: String,
    /// Versions the relation applies to.
    #[serde(default = "any_version")]
    pub version: VersionReq,
}

fn any_version() -> VersionReq {
    VersionReq::STAR
}

impl Dependency {
    /// Creates a relation.
    #[must_use]
    pub fn new(modid: impl Into<String>, version: VersionReq) -> Self {
        Self {
            modid: modid.into(),
            version,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.modid, self.version)
    }
}

impl ModMetadata {
    /// Metadata with no description, license or dependencies.
    #[must_use]
    pub fn new(modid: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        Self {
            schema: SCHEMA_VERSION,
            modid: modid.into(),
            name: name.into(),
            version,
            description: None,
            license: None,
            dependencies: DependencyMetadata::default(),
        }
    }

    /// Parses and validates a metadata document.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Config`] on malformed TOML or bad versions.
    /// - [`ApiError::UnsupportedSchema`] for any schema but 1.
    /// - [`ApiError::InvalidModId`] for a malformed id.
    pub fn from_toml_str(text: &str) -> ApiResult<Self> {
        let metadata: Self = toml::from_str(text)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Checks the schema and every mod id in the document.
    ///
    /// # Errors
    ///
    /// Same as [`from_toml_str`](Self::from_toml_str), minus parsing.
    pub fn validate(&self) -> ApiResult<()> {
        if self.schema != SCHEMA_VERSION {
            return Err(ApiError::UnsupportedSchema(self.schema));
        }
        let ids = std::iter::once(&self.modid).chain(
            self.dependencies
                .requires
                .iter()
                .chain(&self.dependencies.breaks)
                .map(|dep| &dep.modid),
        );
        for id in ids {
            if !is_valid_mod_id(id) {
                return Err(ApiError::InvalidModId(id.clone()));
            }
        }
        Ok(())
    }

    /// Adds a required mod.
    #[must_use]
    pub fn requires(mut self, modid: impl Into<String>, version: VersionReq) -> Self {
        self.dependencies.requires.push(Dependency::new(modid, version));
        self
    }

    /// Adds an incompatible mod.
    #[must_use]
    pub fn breaks(mut self, modid: impl Into<String>, version: VersionReq) -> Self {
        self.dependencies.breaks.push(Dependency::new(modid, version));
        self
    }
}

impl fmt::Display for ModMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.modid, self.version)
    }
}

/// Returns whether `id` matches `[a-z0-9_-]+`.
#[must_use]
pub fn is_valid_mod_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}
