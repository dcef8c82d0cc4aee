//! # Event Error Types
//!
//! Errors raised to the caller when the registry is misused.
//! Subscriber failures are never returned as errors; see
//! [`SubscriberFailure`](crate::SubscriberFailure).

use thiserror::Error;

/// Errors that can occur when addressing events by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// No event with this identifier exists in the registry.
    #[error("unknown event identifier: {0}")]
    UnknownEvent(String),

    /// The event exists but carries a different context type.
    #[error("event {event} carries {found}, not {expected}")]
    ContextMismatch {
        /// The event identifier.
        event: &'static str,
        /// The context type the caller asked for.
        expected: &'static str,
        /// The context type the event was registered with.
        found: &'static str,
    },

    /// The same identifier was registered twice while building a registry.
    #[error("event already registered: {0}")]
    DuplicateEvent(&'static str),

    /// The identifier is empty or has an empty dotted segment.
    #[error("invalid event identifier: {0:?}")]
    InvalidName(&'static str),
}

/// Result type for registry operations.
pub type EventResult<T> = Result<T, EventError>;
