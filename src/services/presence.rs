//! Process-wide map from user id to live gateway connection. Entries exist
//! only while a connection is up; the map is empty after a restart, so every
//! user appears offline until they reconnect.

use crate::services::gateway::protocol::ServerEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Handle to one live connection's outbound event queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub conn_id: Uuid,
    pub tx: mpsc::Sender<ServerEvent>,
}

#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: DashMap<Uuid, ConnectionHandle>,
}

impl PresenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Registers a connection for a user. Last writer wins: a reconnect
    /// replaces whatever handle was there before.
    pub fn register(&self, user_id: Uuid, handle: ConnectionHandle) {
        self.entries.insert(user_id, handle);
    }

    /// Removes the entry for `user_id`, but only if it still belongs to
    /// `conn_id`. A disconnect racing a fresh reconnect must not evict the
    /// newer connection. Returns whether an entry was removed.
    pub fn unregister(&self, user_id: Uuid, conn_id: Uuid) -> bool {
        self.entries.remove_if(&user_id, |_, handle| handle.conn_id == conn_id).is_some()
    }

    #[must_use]
    pub fn lookup(&self, user_id: Uuid) -> Option<mpsc::Sender<ServerEvent>> {
        self.entries.get(&user_id).map(|entry| entry.tx.clone())
    }

    #[must_use]
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.entries.contains_key(&user_id)
    }

    /// Pushes an event to one user if they are online. Offline targets are
    /// dropped silently: no queuing, no retry.
    pub fn notify(&self, user_id: Uuid, event: ServerEvent) {
        if let Some(tx) = self.lookup(user_id)
            && tx.try_send(event).is_err()
        {
            tracing::debug!(user_id = %user_id, "Dropped event: outbound buffer full or closed");
        }
    }

    /// Fans an event out to every connected user. Non-blocking; peers with a
    /// full outbound buffer miss the event.
    pub fn broadcast(&self, event: &ServerEvent) {
        for entry in &self.entries {
            if entry.tx.try_send(event.clone()).is_err() {
                tracing::debug!(user_id = %entry.key(), "Dropped broadcast: outbound buffer full or closed");
            }
        }
    }
}
