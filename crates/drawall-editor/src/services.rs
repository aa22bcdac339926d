//! Viewport-side services handed to the driver.

use std::collections::{BTreeMap, BTreeSet};

use drawall_core::handle::SubscriptionId;
use drawall_core::host::HostServices;
use drawall_core::visualizer::Color;
use tracing::trace;

// ---------------------------------------------------------------------------
// On-screen messages
// ---------------------------------------------------------------------------

/// A keyed debug message shown on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OnScreenMessage {
    /// Message body.
    pub text: String,
    /// Text color.
    pub color: Color,
    /// Seconds left before the message disappears.
    pub remaining: f32,
}

/// Keyed on-screen debug messages.
///
/// Adding a message under an existing key replaces it and restarts its
/// timer. [`tick`](Self::tick) ages every message and drops expired ones.
#[derive(Debug, Default)]
pub struct OnScreenMessages {
    entries: BTreeMap<u64, OnScreenMessage>,
}

impl OnScreenMessages {
    /// Add or replace the message under `key`.
    pub fn add(&mut self, key: u64, duration: f32, color: Color, text: String) {
        self.entries.insert(
            key,
            OnScreenMessage {
                text,
                color,
                remaining: duration,
            },
        );
    }

    /// Age messages by `delta_seconds`, dropping the expired ones.
    pub fn tick(&mut self, delta_seconds: f32) {
        for message in self.entries.values_mut() {
            message.remaining -= delta_seconds;
        }
        self.entries.retain(|_, m| m.remaining > 0.0);
    }

    /// The message under `key`.
    pub fn get(&self, key: u64) -> Option<&OnScreenMessage> {
        self.entries.get(&key)
    }

    /// Remove the message under `key`.
    pub fn remove(&mut self, key: u64) -> Option<OnScreenMessage> {
        self.entries.remove(&key)
    }

    /// Messages currently shown, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &OnScreenMessage)> {
        self.entries.iter().map(|(&k, m)| (k, m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EditorServices
// ---------------------------------------------------------------------------

/// The editor's implementation of [`HostServices`].
#[derive(Debug, Default)]
pub struct EditorServices {
    redraw_requests: u64,
    subscriptions: BTreeSet<SubscriptionId>,
    next_subscription: u64,
    messages: OnScreenMessages,
}

impl EditorServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total "redraw all viewports" requests received.
    pub fn redraw_requests(&self) -> u64 {
        self.redraw_requests
    }

    /// Whether anyone listens for object construction.
    pub fn has_object_created_subscribers(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Number of live creation subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn messages(&self) -> &OnScreenMessages {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut OnScreenMessages {
        &mut self.messages
    }
}

impl HostServices for EditorServices {
    fn redraw_all_viewports(&mut self) {
        self.redraw_requests += 1;
    }

    fn subscribe_object_created(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscriptions.insert(id);
        trace!(subscription = id.0, "object-created: subscribed");
        id
    }

    fn unsubscribe_object_created(&mut self, subscription: SubscriptionId) {
        if self.subscriptions.remove(&subscription) {
            trace!(subscription = subscription.0, "object-created: unsubscribed");
        }
    }

    fn add_on_screen_debug_message(&mut self, key: u64, duration: f32, color: Color, text: String) {
        self.messages.add(key, duration, color, text);
    }
}
