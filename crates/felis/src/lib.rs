//! # Felis
//!
//! Typed, cancellable game events for mods.
//!
//! ## Crates
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          felis                           │
//! │   prelude · demo mod · headless host                     │
//! ├─────────────────────────────┬────────────────────────────┤
//! │         felis_api           │        felis_events        │
//! │  catalog · hooks · loader   │  Event<T> · registry ·     │
//! │  entrypoints · config       │  cancellation              │
//! │             ────────────────┼──────────>                 │
//! └─────────────────────────────┴────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `demo`: the built-in guardian mod
//! - `headless`: a scripted host session driving the hooks
//! - `prelude`: everything a mod usually imports

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod demo;
pub mod headless;

// Re-export the layers
pub use felis_api as api;
pub use felis_events as events;

/// Common imports for mod authors.
pub mod prelude {
    pub use felis_api::{
        BlockBreakOutcome, BlockPos, BlockState, BreakBlockContext, ClientEntrypoint,
        CommonEntrypoint, EntrypointResult, EventCatalog, InitContext, LevelRef, ModContainer,
        ModMetadata, PlayerRef, PlayerTickContext, ServerEntrypoint, Side, Version, VersionReq,
    };
    pub use felis_events::{Event, EventContext, JointContext, Subscription};
}
