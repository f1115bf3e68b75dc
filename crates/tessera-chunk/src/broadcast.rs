//! Coordinator-owned broadcast channels with explicit subscription tokens.
//!
//! A [`Channel`] records *who* listens, not a callback: the host that owns
//! both the channel and the listeners walks [`Channel::subscribers`] and
//! calls the matching handler on each. Subscribing hands out a
//! [`Subscription`] token that must be given back to unsubscribe, so a
//! listener can never be registered twice under the same token or released
//! twice.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tessera_terrain::TileCoord;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Proof of one registration on one [`Channel`].
///
/// Neither `Clone` nor `Copy`: the only way to end the
/// registration is to move the token into [`Channel::unsubscribe`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription token leaks the registration"]
pub struct Subscription {
    channel: u64,
    id: u64,
}

/// An ordered set of listeners keyed by subscription.
#[derive(Debug)]
pub struct Channel<K> {
    id: u64,
    next_id: u64,
    subscribers: BTreeMap<u64, K>,
}

impl<K> Channel<K> {
    /// Creates a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
            subscribers: BTreeMap::new(),
        }
    }

    /// Registers `key` and returns the token that releases it.
    pub fn subscribe(&mut self, key: K) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, key);
        Subscription {
            channel: self.id,
            id,
        }
    }

    /// Releases a registration, returning its key.
    ///
    /// Returns `None` if the token was issued by another channel.
    pub fn unsubscribe(&mut self, token: Subscription) -> Option<K> {
        if token.channel != self.id {
            tracing::warn!(
                "Subscription from channel {} released on channel {}",
                token.channel,
                self.id
            );
            return None;
        }
        self.subscribers.remove(&token.id)
    }

    /// Listener keys in subscription order.
    pub fn subscribers(&self) -> impl Iterator<Item = &K> {
        self.subscribers.values()
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<K: PartialEq> Channel<K> {
    /// Number of registrations held under `key`.
    pub fn count_of(&self, key: &K) -> usize {
        self.subscribers.values().filter(|k| *k == key).count()
    }
}

impl<K> Default for Channel<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// The two broadcasts chunks listen to while active.
#[derive(Debug, Default)]
pub struct GridEvents {
    /// Fired when the displayed [`DrawMode`](crate::DrawMode) changes.
    pub draw_mode_changed: Channel<TileCoord>,
    /// Fired after the set of visible chunks has been recomputed.
    pub visible_set_changed: Channel<TileCoord>,
}

impl GridEvents {
    /// Creates both channels empty.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The tokens an active chunk holds, one per [`GridEvents`] channel.
#[derive(Debug)]
pub(crate) struct ChunkSubscriptions {
    draw_mode: Subscription,
    visible_set: Subscription,
}

impl ChunkSubscriptions {
    pub(crate) fn subscribe(events: &mut GridEvents, coord: TileCoord) -> Self {
        Self {
            draw_mode: events.draw_mode_changed.subscribe(coord),
            visible_set: events.visible_set_changed.subscribe(coord),
        }
    }

    pub(crate) fn release(self, events: &mut GridEvents) {
        events.draw_mode_changed.unsubscribe(self.draw_mode);
        events.visible_set_changed.unsubscribe(self.visible_set);
    }
}
