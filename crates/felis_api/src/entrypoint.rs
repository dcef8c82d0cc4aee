//! # Entrypoints
//!
//! Mods hook into startup by implementing one or more entrypoint traits.
//! The loader calls them in this order:
//!
//! ```text
//! api_init():   CommonEntrypoint::on_init          (every mod)
//!               fire Loader.entrypointLoaded["common"]
//! side_init():  ClientEntrypoint::on_client_init   (physical client)
//!          or   ServerEntrypoint::on_server_init   (dedicated server)
//!               fire Loader.entrypointLoaded["client" | "server"]
//! ```
//!
//! Entrypoints usually subscribe to events. Subscriptions passed to
//! [`InitContext::track`] are kept by the loader so the mod can be
//! detached later.

use std::error::Error;
use std::fmt;

use felis_events::Subscription;

use crate::events::EventCatalog;
use crate::side::Side;

/// Result of an entrypoint.
pub type EntrypointResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Which entrypoint stage is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntrypointKind {
    /// Runs on both sides.
    Common,
    /// Runs on the physical client.
    Client,
    /// Runs on a dedicated server.
    Server,
}

impl EntrypointKind {
    /// Key used for `Loader.entrypointLoaded`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for EntrypointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What an entrypoint gets to work with.
pub struct InitContext<'a> {
    mod_id: &'a str,
    side: Side,
    events: &'a EventCatalog,
    tracked: Vec<Subscription>,
}

impl<'a> InitContext<'a> {
    pub(crate) const fn new(mod_id: &'a str, side: Side, events: &'a EventCatalog) -> Self {
        Self {
            mod_id,
            side,
            events,
            tracked: Vec::new(),
        }
    }

    /// Id of the mod being initialized.
    #[must_use]
    pub const fn mod_id(&self) -> &'a str {
        self.mod_id
    }

    /// Physical side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// The event catalog.
    #[must_use]
    pub const fn events(&self) -> &'a EventCatalog {
        self.events
    }

    /// Hands a subscription to the loader, which keeps it for the mod.
    pub fn track(&mut self, subscription: Subscription) {
        self.tracked.push(subscription);
    }

    pub(crate) fn into_tracked(self) -> Vec<Subscription> {
        self.tracked
    }
}

impl fmt::Debug for InitContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitContext")
            .field("mod_id", &self.mod_id)
            .field("side", &self.side)
            .field("tracked", &self.tracked.len())
            .finish_non_exhaustive()
    }
}

/// Entrypoint run on both sides.
pub trait CommonEntrypoint: Send + Sync {
    /// Called once during `api_init`.
    ///
    /// # Errors
    ///
    /// Any error aborts loading.
    fn on_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult;
}

/// Entrypoint run on the physical client.
pub trait ClientEntrypoint: Send + Sync {
    /// Called once during `side_init` on a client.
    ///
    /// # Errors
    ///
    /// Any error aborts loading.
    fn on_client_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult;
}

/// Entrypoint run on a dedicated server.
pub trait ServerEntrypoint: Send + Sync {
    /// Called once during `side_init` on a server.
    ///
    /// # Errors
    ///
    /// Any error aborts loading.
    fn on_server_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult;
}

impl<F> CommonEntrypoint for F
where
    F: Fn(&mut InitContext<'_>) -> EntrypointResult + Send + Sync,
{
    fn on_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult {
        self(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BreakBlockContext;

    #[test]
    fn test_keys() {
        assert_eq!(EntrypointKind::Common.key(), "common");
        assert_eq!(EntrypointKind::Client.to_string(), "client");
        assert_eq!(EntrypointKind::Server.to_string(), "server");
    }

    #[test]
    fn test_closure_entrypoint_tracks() {
        let catalog = EventCatalog::new();
        let entry = |ctx: &mut InitContext<'_>| -> EntrypointResult {
            let sub = ctx.events().game.block.broken.subscribe(|_: &BreakBlockContext| {});
            ctx.track(sub);
            Ok(())
        };

        let mut ctx = InitContext::new("tabby", Side::Server, &catalog);
        entry.on_init(&mut ctx).unwrap();

        assert_eq!(ctx.mod_id(), "tabby");
        assert_eq!(ctx.into_tracked().len(), 1);
        assert_eq!(catalog.game.block.broken.subscriber_count(), 1);
    }
}
