//! # Event Registry
//!
//! A closed catalog of named events.
//!
//! ## Lifecycle
//!
//! ```text
//! EventRegistryBuilder ──register::<T>(name)──> Arc<Event<T>>   (typed handle)
//!          │
//!          └──build()──> EventRegistry                           (frozen catalog)
//! ```
//!
//! The builder is the only way to add events. Once built, the set of
//! identifiers never changes; only subscriber lists do. Every typed handle
//! handed out by the builder shares its subscriber list with the entry in
//! the registry, so subscribing through either reaches the same handlers.
//!
//! Identifiers are dotted paths (`Player.Tick.start`). The first segment
//! is the category.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::EventContext;
use crate::error::{EventError, EventResult};
use crate::event::{DispatchReport, Event, HandlerOutcome, Subscription};

/// Type-erased view used for operations that do not need the context type.
trait ErasedEvent: Send + Sync {
    fn context_type(&self) -> &'static str;
    fn unsubscribe(&self, subscription: &Subscription) -> bool;
    fn subscriber_count(&self) -> usize;
}

impl<T: EventContext> ErasedEvent for Event<T> {
    fn context_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn unsubscribe(&self, subscription: &Subscription) -> bool {
        Event::unsubscribe(self, subscription)
    }

    fn subscriber_count(&self) -> usize {
        Event::subscriber_count(self)
    }
}

/// One catalog entry. Both fields point at the same `Event<T>`.
#[derive(Clone)]
struct Entry {
    erased: Arc<dyn ErasedEvent>,
    typed: Arc<dyn Any + Send + Sync>,
}

/// Builder for an [`EventRegistry`].
#[derive(Default)]
pub struct EventRegistryBuilder {
    entries: BTreeMap<&'static str, Entry>,
}

impl EventRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event and returns its typed handle.
    ///
    /// # Errors
    ///
    /// - [`EventError::InvalidName`] if the identifier is empty or has an
    ///   empty dotted segment.
    /// - [`EventError::DuplicateEvent`] if the identifier is taken.
    pub fn register<T: EventContext>(&mut self, name: &'static str) -> EventResult<Arc<Event<T>>> {
        if name.is_empty() || name.split('.').any(str::is_empty) {
            return Err(EventError::InvalidName(name));
        }
        if self.entries.contains_key(name) {
            return Err(EventError::DuplicateEvent(name));
        }

        let event = Arc::new(Event::<T>::new(name));
        self.entries.insert(
            name,
            Entry {
                erased: event.clone(),
                typed: event.clone(),
            },
        );
        Ok(event)
    }

    /// Freezes the catalog.
    #[must_use]
    pub fn build(self) -> EventRegistry {
        tracing::debug!(events = self.entries.len(), "event registry built");
        EventRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen catalog of named events.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct EventRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl EventRegistry {
    /// Starts a new catalog.
    #[must_use]
    pub fn builder() -> EventRegistryBuilder {
        EventRegistryBuilder::new()
    }

    fn entry(&self, name: &str) -> EventResult<&Entry> {
        self.entries
            .get(name)
            .ok_or_else(|| EventError::UnknownEvent(name.to_string()))
    }

    /// Resolves a typed handle by identifier.
    ///
    /// # Errors
    ///
    /// - [`EventError::UnknownEvent`] if no such event exists.
    /// - [`EventError::ContextMismatch`] if it carries another context type.
    pub fn event<T: EventContext>(&self, name: &str) -> EventResult<Arc<Event<T>>> {
        let entry = self.entry(name)?;
        Arc::clone(&entry.typed)
            .downcast::<Event<T>>()
            .map_err(|_| EventError::ContextMismatch {
                event: self.canonical(name),
                expected: type_name::<T>(),
                found: entry.erased.context_type(),
            })
    }

    /// Subscribes a handler to the named event.
    ///
    /// # Errors
    ///
    /// Same as [`event`](Self::event). Nothing is registered on error.
    pub fn subscribe<T, F, R>(&self, name: &str, handler: F) -> EventResult<Subscription>
    where
        T: EventContext,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        Ok(self.event::<T>(name)?.subscribe(handler))
    }

    /// Subscribes a labelled handler to the named event.
    ///
    /// # Errors
    ///
    /// Same as [`event`](Self::event). Nothing is registered on error.
    pub fn subscribe_named<T, F, R>(
        &self,
        name: &str,
        label: impl Into<Arc<str>>,
        handler: F,
    ) -> EventResult<Subscription>
    where
        T: EventContext,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        Ok(self.event::<T>(name)?.subscribe_named(label, handler))
    }

    /// Removes a subscription. No-op (returns `false`) if the token was
    /// already used or names an event outside this registry.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.entries
            .get(subscription.event())
            .is_some_and(|entry| entry.erased.unsubscribe(subscription))
    }

    /// Fires the named event.
    ///
    /// # Errors
    ///
    /// Same as [`event`](Self::event). No subscriber runs on error.
    pub fn fire<T: EventContext>(&self, name: &str, ctx: &T) -> EventResult<DispatchReport> {
        Ok(self.event::<T>(name)?.fire(ctx))
    }

    /// Returns whether the identifier exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of events in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for a catalog without events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All identifiers, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Distinct categories (first dotted segment), sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&'static str> {
        let mut categories: Vec<&'static str> = self.names().map(category_of).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Identifiers belonging to `category`, sorted.
    pub fn events_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.names().filter(move |&name| category_of(name) == category)
    }

    /// Current subscriber count of the named event.
    ///
    /// # Errors
    ///
    /// [`EventError::UnknownEvent`] if no such event exists.
    pub fn subscriber_count(&self, name: &str) -> EventResult<usize> {
        Ok(self.entry(name)?.erased.subscriber_count())
    }

    fn canonical(&self, name: &str) -> &'static str {
        self.entries
            .get_key_value(name)
            .map_or("<unknown>", |(key, _)| *key)
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(name, entry)| (name, entry.erased.context_type())),
            )
            .finish()
    }
}

fn category_of(name: &'static str) -> &'static str {
    name.split_once('.').map_or(name, |(category, _)| category)
}
