//! # Event Contexts
//!
//! Every payload passed through a dispatch implements [`EventContext`].
//! The payload is immutable once built, except for its [`Cancellation`]
//! flag, which subscribers may set and the instrumentation point reads
//! after the dispatch returns.
//!
//! ```text
//! instrumentation point ──build──> context ──fire──> S1 ─> S2 ─> ... ─> Sn
//!          ▲                                          │ cancel()
//!          └──────────── is_cancelled() ──────────────┘
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set-once cancellation flag.
///
/// There is deliberately no way to clear it: once any subscriber cancels,
/// every later read in the same dispatch observes `true`.
#[derive(Default)]
pub struct Cancellation {
    cancelled: AtomicBool,
}

impl Cancellation {
    /// Creates a flag in the not-cancelled state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Marks the occurrence as cancelled. Idempotent.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns whether any party has cancelled.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cancellation").field(&self.is_cancelled()).finish()
    }
}

/// A payload carried through a single dispatch.
///
/// Implementors only provide access to their [`Cancellation`]; the
/// cancel/read operations come for free.
///
/// ```rust,ignore
/// struct ChatContext {
///     message: String,
///     cancellation: Cancellation,
/// }
///
/// impl EventContext for ChatContext {
///     fn cancellation(&self) -> &Cancellation {
///         &self.cancellation
///     }
/// }
/// ```
pub trait EventContext: Send + Sync + 'static {
    /// The flag backing [`cancel`](Self::cancel) and
    /// [`is_cancelled`](Self::is_cancelled).
    fn cancellation(&self) -> &Cancellation;

    /// Requests suppression of the host's default behavior.
    #[inline]
    fn cancel(&self) {
        self.cancellation().cancel();
    }

    /// Returns whether this occurrence has been cancelled so far.
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancellation().is_cancelled()
    }
}

/// A context pairing a key with a value.
///
/// Used by events where subscribers usually care about one key only,
/// see [`Event::subscribe_key`](crate::Event::subscribe_key).
#[derive(Debug)]
pub struct JointContext<K, V> {
    /// Discriminating key.
    pub key: K,
    /// Payload.
    pub value: V,
    cancellation: Cancellation,
}

impl<K, V> JointContext<K, V> {
    /// Creates a not-cancelled context.
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            cancellation: Cancellation::new(),
        }
    }
}

impl<K, V> EventContext for JointContext<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let flag = Cancellation::new();
        assert!(!flag.is_cancelled());

        flag.cancel();
        flag.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_joint_context_cancellation() {
        let ctx = JointContext::new("common", 7u32);
        assert!(!ctx.is_cancelled());

        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.key, "common");
        assert_eq!(ctx.value, 7);
    }

    #[test]
    fn test_debug_shows_state() {
        let flag = Cancellation::new();
        flag.cancel();
        assert_eq!(format!("{flag:?}"), "Cancellation(true)");
    }
}
