//! # Felis Events
//!
//! Typed, cancellable publish/subscribe core for the Felis mod API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐  fire(&ctx)  ┌──────────────────────────────┐
//! │ Instrumentation point│─────────────>│ Event<T>                     │
//! │ (host calls us)      │              │  S1 ─> S2 ─> ... ─> Sn       │
//! └──────────▲───────────┘              │  (registration order)        │
//!            │                          └──────────────┬───────────────┘
//!            │       ctx.is_cancelled()                │ ctx.cancel()
//!            └─────────────────────────────────────────┘
//! ```
//!
//! - [`EventContext`]: payload trait, immutable except for its set-once
//!   [`Cancellation`] flag.
//! - [`Event`]: one named hook, ordered copy-on-write subscriber list.
//! - [`EventRegistry`]: closed catalog resolving dotted identifiers
//!   (`Player.Tick.start`) to events.
//!
//! ## Guarantees
//!
//! 1. Subscribers run in registration order, on the firing thread.
//! 2. Changes to the subscriber list during a dispatch apply to the next one.
//! 3. A failing or panicking subscriber never stops the rest of the chain.
//! 4. Cancellation cannot be undone within a dispatch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use felis_events::{EventRegistry, JointContext};
//!
//! let mut builder = EventRegistry::builder();
//! let loaded = builder.register::<JointContext<String, ()>>("Loader.entrypointLoaded")?;
//! let registry = builder.build();
//!
//! loaded.subscribe_key("common".to_string(), |_| println!("common ready"));
//! registry.fire("Loader.entrypointLoaded", &JointContext::new("common".to_string(), ()))?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod context;
pub mod error;
pub mod event;
pub mod registry;

pub use context::{Cancellation, EventContext, JointContext};
pub use error::{EventError, EventResult};
pub use event::{
    DispatchReport, Event, HandlerOutcome, SubscriberFailure, Subscription, SubscriptionId,
};
pub use registry::{EventRegistry, EventRegistryBuilder};
