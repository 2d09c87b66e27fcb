//! Room membership and fan-out. A room is an ephemeral group of connections;
//! membership is a connection-level subscription, never persisted.

use crate::services::gateway::protocol::ServerEvent;
use dashmap::DashMap;
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct RoomRelay {
    rooms: DashMap<String, HashMap<Uuid, mpsc::Sender<ServerEvent>>>,
}

impl RoomRelay {
    #[must_use]
    pub fn new() -> Self {
        Self { rooms: DashMap::new() }
    }

    /// Subscribes a connection to a room. Idempotent: re-joining replaces the
    /// stored sender for that connection.
    pub fn join(&self, room_id: &str, conn_id: Uuid, tx: mpsc::Sender<ServerEvent>) {
        self.rooms.entry(room_id.to_string()).or_default().insert(conn_id, tx);
    }

    /// Removes a connection from a room, dropping the room once empty.
    pub fn leave(&self, room_id: &str, conn_id: Uuid) {
        if let Some(mut members) = self.rooms.get_mut(room_id) {
            members.remove(&conn_id);
            let empty = members.is_empty();
            drop(members);
            if empty {
                self.rooms.remove_if(room_id, |_, members| members.is_empty());
            }
        }
    }

    #[must_use]
    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |members| members.len())
    }

    /// Delivers an event to every connection currently in the room, the
    /// sender's own included. Members joining after this instant see nothing;
    /// there is no replay.
    pub fn broadcast(&self, room_id: &str, event: &ServerEvent) {
        if let Some(members) = self.rooms.get(room_id) {
            for (conn_id, tx) in members.iter() {
                if tx.try_send(event.clone()).is_err() {
                    tracing::debug!(conn_id = %conn_id, room_id = %room_id, "Dropped room event: outbound buffer full or closed");
                }
            }
        }
    }
}
