use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::models::ServerMessage;

pub type ConnectionId = String;

/// One live connection: its outbound channel and the room it has joined.
struct PeerHandle {
    room: Option<String>,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

/// Tracks which connections exist and which room each belongs to.
///
/// Membership and delivery share one map, so member counts are always derived
/// from the set of live senders rather than a separately maintained integer.
/// A connection belongs to at most one room at a time; `join` enforces that
/// by reporting the room the connection is moved out of.
pub struct PeerRegistry {
    peers: RwLock<HashMap<ConnectionId, PeerHandle>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a freshly connected peer with its outbound sender.
    pub async fn register(&self, connection_id: &str, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.peers
            .write()
            .await
            .insert(connection_id.to_string(), PeerHandle { room: None, tx });
    }

    /// Drop a peer entirely. Safe to call for unknown ids.
    pub async fn unregister(&self, connection_id: &str) {
        self.peers.write().await.remove(connection_id);
    }

    /// Move a connection into a room. Returns the room it previously belonged
    /// to, if any, so the caller can announce the departure there.
    pub async fn join(&self, connection_id: &str, room_key: &str) -> Option<String> {
        let mut peers = self.peers.write().await;
        let handle = peers.get_mut(connection_id)?;
        handle.room.replace(room_key.to_string())
    }

    /// Remove a connection's membership, returning the room it was in.
    pub async fn leave(&self, connection_id: &str) -> Option<String> {
        let mut peers = self.peers.write().await;
        peers.get_mut(connection_id)?.room.take()
    }

    /// Live member count, derived from the sender map.
    pub async fn count(&self, room_key: &str) -> usize {
        self.peers
            .read()
            .await
            .values()
            .filter(|handle| handle.room.as_deref() == Some(room_key))
            .count()
    }

    pub async fn members(&self, room_key: &str) -> Vec<ConnectionId> {
        self.peers
            .read()
            .await
            .iter()
            .filter(|(_, handle)| handle.room.as_deref() == Some(room_key))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn other_members(&self, room_key: &str, excluding: &str) -> Vec<ConnectionId> {
        self.peers
            .read()
            .await
            .iter()
            .filter(|(id, handle)| {
                handle.room.as_deref() == Some(room_key) && id.as_str() != excluding
            })
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn connection_count(&self) -> usize {
        self.peers.read().await.len()
    }

    pub async fn member_count(&self) -> usize {
        self.peers
            .read()
            .await
            .values()
            .filter(|handle| handle.room.is_some())
            .count()
    }

    /// Deliver a message to one connection. A missing or closed target is
    /// silently dropped; the sender is never surfaced an error.
    pub async fn send_to(&self, connection_id: &str, msg: ServerMessage) {
        let peers = self.peers.read().await;
        match peers.get(connection_id) {
            Some(handle) => {
                if handle.tx.send(msg).is_err() {
                    debug!("Dropping message for closing connection {}", connection_id);
                }
            }
            None => debug!("Dropping message for unknown connection {}", connection_id),
        }
    }

    /// Forward a message to every member of a room except `excluding`, in the
    /// order the server handles them. Per-receiver ordering is preserved by
    /// each connection's own channel.
    pub async fn broadcast(&self, room_key: &str, excluding: Option<&str>, msg: &ServerMessage) {
        let peers = self.peers.read().await;
        for (id, handle) in peers.iter() {
            if handle.room.as_deref() != Some(room_key) {
                continue;
            }
            if excluding == Some(id.as_str()) {
                continue;
            }
            if handle.tx.send(msg.clone()).is_err() {
                debug!("Dropping broadcast for closing connection {}", id);
            }
        }
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
