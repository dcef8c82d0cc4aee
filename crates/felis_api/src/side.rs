//! # Physical Sides
//!
//! The physical side is the kind of distribution the game runs from.
//! A physical client also hosts an integrated server, but only the
//! client entrypoints run there; server entrypoints are for dedicated
//! servers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entrypoint::EntrypointKind;
use crate::error::ApiError;

/// Physical side the loader runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Game client, with rendering.
    #[default]
    Client,
    /// Dedicated server.
    Server,
}

impl Side {
    /// The side-specific entrypoint run after the common one.
    #[must_use]
    pub const fn entrypoint(self) -> EntrypointKind {
        match self {
            Self::Client => EntrypointKind::Client,
            Self::Server => EntrypointKind::Server,
        }
    }

    /// Lowercase name, as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            _ => Err(ApiError::InvalidSide(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_side() {
        assert_eq!("client".parse::<Side>().unwrap(), Side::Client);
        assert_eq!(" SERVER ".parse::<Side>().unwrap(), Side::Server);
        assert!(matches!("both".parse::<Side>(), Err(ApiError::InvalidSide(s)) if s == "both"));
    }

    #[test]
    fn test_side_entrypoint() {
        assert_eq!(Side::Client.entrypoint(), EntrypointKind::Client);
        assert_eq!(Side::Server.entrypoint(), EntrypointKind::Server);
    }
}
