//! Resource subscription registry
//!
//! Tracks which resource URIs the client is currently subscribed to. The
//! registry never emits notifications itself; the hosting application
//! queries it to decide when to send `notifications/resources/updated`.

use dashmap::DashMap;

/// A concurrent set of subscribed resource URIs.
///
/// All operations are idempotent: duplicate subscribes and unsubscribes of
/// absent entries are no-ops.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: DashMap<String, ()>,
}

impl SubscriptionSet {
    /// Create an empty subscription set.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record a subscription to the given URI.
    pub fn subscribe(&self, uri: impl Into<String>) {
        self.entries.insert(uri.into(), ());
    }

    /// Remove a subscription to the given URI.
    pub fn unsubscribe(&self, uri: &str) {
        self.entries.remove(uri);
    }

    /// Whether the given URI is currently subscribed.
    pub fn is_subscribed(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    /// The number of active subscriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no active subscriptions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
