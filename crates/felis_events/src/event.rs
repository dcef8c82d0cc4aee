//! # Typed Events
//!
//! An [`Event`] is one named hook with an ordered list of subscribers.
//!
//! ## Dispatch Model
//!
//! - `fire` runs on the caller's thread and returns when every subscriber
//!   has run. Nothing is queued.
//! - The subscriber list is copy-on-write. `fire` takes a snapshot under a
//!   short read lock and iterates it without holding any lock, so handlers
//!   may subscribe or unsubscribe re-entrantly. Such changes apply from the
//!   next `fire` on.
//! - A handler that returns an error or panics is reported and skipped;
//!   the rest of the chain still runs.

use std::any::{type_name, Any};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::context::{EventContext, JointContext};

/// Source of subscription ids. Shared by all events so a token can never
/// match a subscriber of a different event.
static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of one subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: &'static str,
    id: SubscriptionId,
}

impl Subscription {
    /// Identifier of the event this token belongs to.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        self.event
    }

    /// The subscription id.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Return types accepted from handlers.
///
/// Implemented for `()` (infallible handlers) and for `Result<(), E>` with
/// any displayable error, so both of these subscribe fine:
///
/// ```rust,ignore
/// event.subscribe(|ctx: &Ctx| ctx.cancel());
/// event.subscribe(|ctx: &Ctx| -> Result<(), std::io::Error> { Ok(()) });
/// ```
pub trait HandlerOutcome {
    /// Converts into `Err(reason)` on failure.
    ///
    /// # Errors
    ///
    /// Returns the displayed error when the handler failed.
    fn into_outcome(self) -> Result<(), String>;
}

impl HandlerOutcome for () {
    #[inline]
    fn into_outcome(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: fmt::Display> HandlerOutcome for Result<(), E> {
    #[inline]
    fn into_outcome(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

type HandlerFn<T> = dyn Fn(&T) -> Result<(), String> + Send + Sync;

struct Subscriber<T> {
    id: SubscriptionId,
    label: Arc<str>,
    handler: Arc<HandlerFn<T>>,
}

// Manual impl: `T` itself need not be `Clone`.
impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            label: Arc::clone(&self.label),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// A handler that failed during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberFailure {
    /// Event identifier.
    pub event: &'static str,
    /// Label of the failing handler.
    pub handler: String,
    /// Subscription id of the failing handler.
    pub id: SubscriptionId,
    /// Error message or panic payload.
    pub reason: String,
}

impl fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subscriber {} ({}) of {} failed: {}",
            self.handler, self.id, self.event, self.reason
        )
    }
}

/// Summary of one `fire`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Number of handlers invoked.
    pub invoked: usize,
    /// Handlers that returned an error or panicked, in invocation order.
    pub failures: Vec<SubscriberFailure>,
}

impl DispatchReport {
    /// Returns `true` when no handler failed.
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A named hook with an ordered list of subscribers.
///
/// Events are normally created through
/// [`EventRegistryBuilder::register`](crate::EventRegistryBuilder::register)
/// and shared as `Arc<Event<T>>`.
pub struct Event<T: EventContext> {
    /// Stable dotted identifier.
    name: &'static str,
    /// Copy-on-write snapshot of subscribers, in registration order.
    subscribers: RwLock<Arc<Vec<Subscriber<T>>>>,
}

impl<T: EventContext> Event<T> {
    /// Creates an event with no subscribers.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Returns the event identifier.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of current subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Appends a handler, labelled with its type name.
    ///
    /// Registering the same handler twice is allowed; each registration
    /// fires independently.
    pub fn subscribe<F, R>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        self.subscribe_named(type_name::<F>(), handler)
    }

    /// Appends a handler under an explicit label, used in failure reports.
    pub fn subscribe_named<F, R>(&self, label: impl Into<Arc<str>>, handler: F) -> Subscription
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        let id = SubscriptionId::next();
        let subscriber = Subscriber {
            id,
            label: label.into(),
            handler: Arc::new(move |ctx: &T| handler(ctx).into_outcome()),
        };
        tracing::debug!(event = self.name, handler = %subscriber.label, %id, "subscribed");

        let mut guard = self.subscribers.write();
        // Clones the list only if a dispatch still holds the old snapshot.
        Arc::make_mut(&mut *guard).push(subscriber);

        Subscription {
            event: self.name,
            id,
        }
    }

    /// Removes the subscriber behind `subscription`.
    ///
    /// Returns `false` (and does nothing) if it was already removed or
    /// belongs to another event. A dispatch already in progress still
    /// runs the removed handler.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        if subscription.event != self.name {
            return false;
        }

        let mut guard = self.subscribers.write();
        let Some(index) = guard.iter().position(|s| s.id == subscription.id) else {
            return false;
        };
        let removed = Arc::make_mut(&mut *guard).remove(index);
        tracing::debug!(event = self.name, handler = %removed.label, id = %removed.id, "unsubscribed");
        true
    }

    /// Invokes every current subscriber, in registration order, with `ctx`.
    ///
    /// Never short-circuits on cancellation. Failing handlers are logged,
    /// recorded in the report and skipped.
    pub fn fire(&self, ctx: &T) -> DispatchReport {
        let snapshot = Arc::clone(&self.subscribers.read());
        let mut report = DispatchReport::default();

        for subscriber in snapshot.iter() {
            report.invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (subscriber.handler)(ctx)));
            let reason = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(reason)) => reason,
                Err(payload) => panic_message(payload.as_ref()),
            };

            tracing::error!(
                event = self.name,
                handler = %subscriber.label,
                id = %subscriber.id,
                %reason,
                "subscriber failed"
            );
            report.failures.push(SubscriberFailure {
                event: self.name,
                handler: subscriber.label.to_string(),
                id: subscriber.id,
                reason,
            });
        }

        tracing::trace!(
            event = self.name,
            invoked = report.invoked,
            failed = report.failures.len(),
            cancelled = ctx.is_cancelled(),
            "dispatched"
        );
        report
    }
}

impl<K, V> Event<JointContext<K, V>>
where
    K: PartialEq + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Appends a handler that only runs when the context key equals `key`.
    ///
    /// The filter itself counts as an invocation in the [`DispatchReport`].
    pub fn subscribe_key<F, R>(&self, key: K, handler: F) -> Subscription
    where
        F: Fn(&JointContext<K, V>) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        self.subscribe_named(type_name::<F>(), move |ctx: &JointContext<K, V>| {
            if ctx.key == key {
                handler(ctx).into_outcome()
            } else {
                Ok(())
            }
        })
    }
}

impl<T: EventContext> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("context", &type_name::<T>())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
