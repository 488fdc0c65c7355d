// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime change feed.
//!
//! Storage publishes one [`ChangeEvent`] per insert or delete. Subscribers
//! pick the tables and owner they care about; the only thing they are
//! expected to do with an event is throw away a derived view and recompute
//! it from storage.

pub mod event;

pub use event::{ChangeEvent, ChangeKind, Table};

use aletheia_core::UserId;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Events buffered per subscriber before the slowest one starts lagging.
pub const DEFAULT_CAPACITY: usize = 256;

/// Fan-out publisher of record changes.
///
/// Cloning yields another handle onto the same channel.
#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event. Having no subscribers is not an error.
    ///
    /// Returns how many subscribers the event was delivered to.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                debug!(table = %event.table, kind = %event.kind, "change dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Subscribes to every change on `tables` owned by `user_id`.
    ///
    /// An empty `tables` slice means every table.
    pub fn subscribe(&self, user_id: UserId, tables: &[Table]) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            user_id,
            tables: tables.to_vec(),
        }
    }
}

/// A filtered view onto the feed for one owner.
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    user_id: UserId,
    tables: Vec<Table>,
}

impl Subscription {
    fn wants(&self, event: &ChangeEvent) -> bool {
        event.user_id == self.user_id
            && (self.tables.is_empty() || self.tables.contains(&event.table))
    }

    /// Waits for the next matching change.
    ///
    /// Returns `None` once every [`ChangeFeed`] handle has been dropped. A
    /// lagging subscriber skips ahead; the skipped events only ever meant
    /// "recompute", which the next delivered event still triggers.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.wants(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, user = %self.user_id, "change subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
