//! # Event Catalog
//!
//! The events the host exposes, grouped the way mods address them:
//!
//! ```text
//! EventCatalog
//! ├── game
//! │   ├── player.tick.start   Player.Tick.start   PlayerTickContext
//! │   ├── player.tick.end     Player.Tick.end     PlayerTickContext
//! │   └── block.broken        Block.broken        BreakBlockContext
//! └── loader
//!     └── entrypoint_loaded   Loader.entrypointLoaded   EntrypointLoadedContext
//! ```
//!
//! Every typed handle is also reachable by identifier through
//! [`EventCatalog::registry`].

use std::sync::Arc;

use felis_events::{Event, EventRegistry, EventResult, JointContext};

use crate::context::{BreakBlockContext, PlayerTickContext};

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Fired at the start of every player tick.
pub const PLAYER_TICK_START: &str = "Player.Tick.start";

/// Fired at the end of every player tick.
pub const PLAYER_TICK_END: &str = "Player.Tick.end";

/// Fired before a player breaks a block.
pub const BLOCK_BROKEN: &str = "Block.broken";

/// Fired after each entrypoint stage, keyed by entrypoint key.
pub const ENTRYPOINT_LOADED: &str = "Loader.entrypointLoaded";

/// Context of `Loader.entrypointLoaded`: the entrypoint key
/// (`common`, `client` or `server`) and no payload.
pub type EntrypointLoadedContext = JointContext<String, ()>;

// ============================================================================
// GROUPS
// ============================================================================

/// Player tick events.
#[derive(Debug, Clone)]
pub struct TickEvents {
    /// `Player.Tick.start`
    pub start: Arc<Event<PlayerTickContext>>,
    /// `Player.Tick.end`
    pub end: Arc<Event<PlayerTickContext>>,
}

/// Player events.
#[derive(Debug, Clone)]
pub struct PlayerEvents {
    /// Tick events.
    pub tick: TickEvents,
}

/// Block events.
#[derive(Debug, Clone)]
pub struct BlockEvents {
    /// `Block.broken`
    pub broken: Arc<Event<BreakBlockContext>>,
}

/// Gameplay events.
#[derive(Debug, Clone)]
pub struct GameEvents {
    /// Player events.
    pub player: PlayerEvents,
    /// Block events.
    pub block: BlockEvents,
}

/// Loader lifecycle events.
#[derive(Debug, Clone)]
pub struct LoaderEvents {
    /// `Loader.entrypointLoaded`
    pub entrypoint_loaded: Arc<Event<EntrypointLoadedContext>>,
}

/// All events, as typed handles and as a registry.
#[derive(Debug)]
pub struct EventCatalog {
    /// Gameplay events.
    pub game: GameEvents,
    /// Loader events.
    pub loader: LoaderEvents,
    registry: EventRegistry,
}

impl EventCatalog {
    /// Builds the catalog with no subscribers.
    ///
    /// # Panics
    ///
    /// Never in practice: the identifiers are compile-time constants.
    #[must_use]
    pub fn new() -> Self {
        // The identifiers above are fixed and distinct.
        Self::build().expect("event catalog identifiers are valid and unique")
    }

    fn build() -> EventResult<Self> {
        let mut builder = EventRegistry::builder();

        let game = GameEvents {
            player: PlayerEvents {
                tick: TickEvents {
                    start: builder.register(PLAYER_TICK_START)?,
                    end: builder.register(PLAYER_TICK_END)?,
                },
            },
            block: BlockEvents {
                broken: builder.register(BLOCK_BROKEN)?,
            },
        };
        let loader = LoaderEvents {
            entrypoint_loaded: builder.register(ENTRYPOINT_LOADED)?,
        };

        Ok(Self {
            game,
            loader,
            registry: builder.build(),
        })
    }

    /// Lookup by identifier.
    #[must_use]
    pub const fn registry(&self) -> &EventRegistry {
        &self.registry
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}
