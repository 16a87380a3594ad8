//! Host input events and scoped subscriptions.
//!
//! The run loop owns one [`EventSource`]. Anything that wants input subscribes and holds the
//! returned [`Subscription`]; events are only delivered to live subscriptions, and handing the
//! token back through [`EventSource::unsubscribe`] detaches the listener for good.

use std::collections::{BTreeSet, HashSet};

pub use winit::event::VirtualKeyCode as KeyCode;

/// Surface coordinate used for pointer events that land outside the drawable area.
pub const OFF_SURFACE: (u32, u32) = (u32::MAX, u32::MAX);

/// Input as seen by the application, already mapped into surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    PointerMoved { x: u32, y: u32 },
    PointerDown { x: u32, y: u32 },
    PointerUp { x: u32, y: u32 },
    PointerEntered,
    PointerLeft,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Ownership of one live subscription. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription without unsubscribing leaves the listener attached"]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

#[derive(Debug, Default)]
pub struct EventSource {
    next_id: u64,
    live: BTreeSet<SubscriptionId>,
}

impl EventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        Subscription { id }
    }

    /// Detaches `subscription`. Returns false if it was not live on this source.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.live.remove(&subscription.id)
    }

    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.live.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Hands `event` to `deliver` once per live subscription, oldest first.
    pub fn dispatch<F>(&self, event: &HostEvent, mut deliver: F)
    where
        F: FnMut(SubscriptionId, &HostEvent),
    {
        for &id in &self.live {
            deliver(id, event);
        }
    }
}

/// Filters OS key auto-repeat: only the first `Pressed` of a held key becomes a `KeyDown`.
#[derive(Debug, Default)]
pub struct KeyRepeatFilter {
    held: HashSet<KeyCode>,
}

impl KeyRepeatFilter {
    pub fn press(&mut self, key: KeyCode) -> Option<HostEvent> {
        self.held.insert(key).then_some(HostEvent::KeyDown(key))
    }

    pub fn release(&mut self, key: KeyCode) -> HostEvent {
        self.held.remove(&key);
        HostEvent::KeyUp(key)
    }

    /// Releases every held key, e.g. when the window loses focus and the real releases will
    /// never arrive. Returned in key-code order.
    pub fn release_all(&mut self) -> Vec<HostEvent> {
        let mut keys: Vec<KeyCode> = self.held.drain().collect();
        keys.sort_unstable();
        keys.into_iter().map(HostEvent::KeyUp).collect()
    }
}
