//! # Felis API
//!
//! The game-facing half of Felis: what the host fires, what mods subscribe
//! to and how mods get initialized.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  hooks()  ┌─────────────┐  fire   ┌───────────────┐
//! │  ModLoader   │──────────>│  GameHooks  │────────>│ EventCatalog  │
//! │  (config,    │           │ (host calls)│         │  game.*       │
//! │   mods)      │──────────────────────────────────>│  loader.*     │
//! └──────┬───────┘  entrypointLoaded                 └───────▲───────┘
//!        │ api_init / side_init                              │ subscribe
//!        ▼                                                   │
//! ┌──────────────┐          InitContext::events()            │
//! │ Entrypoints  │───────────────────────────────────────────┘
//! └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use felis_api::{EventCatalog, FelisConfig, ModContainer, ModLoader, InitContext};
//! use felis_events::EventContext;
//!
//! let mut loader = ModLoader::new(FelisConfig::default(), Arc::new(EventCatalog::new()));
//! loader.register(ModContainer::new("no_bedrock").with_common(|ctx: &mut InitContext<'_>| {
//!     let sub = ctx.events().game.block.broken.subscribe(|ctx: &_| {
//!         if ctx.block().path() == "bedrock" {
//!             ctx.cancel();
//!         }
//!     });
//!     ctx.track(sub);
//!     Ok(())
//! }))?;
//! loader.api_init()?;
//! loader.side_init()?;
//! let hooks = loader.hooks();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;
pub mod entrypoint;
pub mod error;
pub mod events;
pub mod hooks;
pub mod loader;
pub mod meta;
pub mod resolve;
pub mod side;
pub mod types;

pub use config::{FelisConfig, ModsConfig};
pub use context::{BreakBlockContext, PlayerTickContext};
pub use entrypoint::{
    ClientEntrypoint, CommonEntrypoint, EntrypointKind, EntrypointResult, InitContext,
    ServerEntrypoint,
};
pub use error::{ApiError, ApiResult};
pub use events::{
    BlockEvents, EntrypointLoadedContext, EventCatalog, GameEvents, LoaderEvents, PlayerEvents,
    TickEvents,
};
pub use hooks::{BlockBreakOutcome, GameHooks};
pub use loader::{LoaderStage, ModContainer, ModLoader};
pub use meta::{Dependency, DependencyMetadata, ModMetadata};
pub use semver::{Version, VersionReq};
pub use side::Side;
pub use types::{BlockId, BlockPos, BlockState, LevelRef, PlayerRef};
