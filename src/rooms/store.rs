use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Language, RoomState};

/// Authoritative mapping of room key to current room state.
///
/// Owned by the server's `AppState` and handed around by reference; all
/// mutation of a room's fields goes through this type. The write lock is held
/// for the duration of a single field update, so concurrent edits to the same
/// room land in server receipt order with no interleaved partial writes.
pub struct RoomStore {
    rooms: RwLock<HashMap<String, RoomState>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Return the current state of a room, creating it with defaults when the
    /// key has not been seen. Always succeeds.
    pub async fn get_or_create(&self, room_key: &str) -> RoomState {
        let mut rooms = self.rooms.write().await;
        if !rooms.contains_key(room_key) {
            info!("Creating room: {}", room_key);
        }
        rooms
            .entry(room_key.to_string())
            .or_insert_with(RoomState::with_defaults)
            .clone()
    }

    pub async fn snapshot(&self, room_key: &str) -> Option<RoomState> {
        self.rooms.read().await.get(room_key).cloned()
    }

    /// Overwrite the content of an existing room. Unknown keys are a no-op.
    pub async fn set_content(&self, room_key: &str, content: String) {
        if let Some(room) = self.rooms.write().await.get_mut(room_key) {
            room.content = content;
        }
    }

    /// Overwrite the language of an existing room. Unknown keys are a no-op.
    pub async fn set_language(&self, room_key: &str, language: Language) {
        if let Some(room) = self.rooms.write().await.get_mut(room_key) {
            room.language = language;
        }
    }

    /// Overwrite the output lines of an existing room. Unknown keys are a no-op.
    pub async fn set_output(&self, room_key: &str, output: Vec<String>) {
        if let Some(room) = self.rooms.write().await.get_mut(room_key) {
            room.output = output;
        }
    }

    /// Delete a room. Safe to call on a nonexistent key.
    pub async fn remove(&self, room_key: &str) {
        if self.rooms.write().await.remove(room_key).is_some() {
            info!("Removed room: {}", room_key);
        }
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_join_creates_defaults() {
        let store = RoomStore::new();
        let room = store.get_or_create("abc123").await;
        assert_eq!(room.language, Language::Javascript);
        assert_eq!(room.content, Language::Javascript.default_template());
        assert!(room.output.is_empty());
        assert_eq!(store.room_count().await, 1);
    }

    #[tokio::test]
    async fn get_or_create_preserves_existing_state() {
        let store = RoomStore::new();
        store.get_or_create("abc123").await;
        store.set_content("abc123", "print(1)\n".to_string()).await;
        store.set_language("abc123", Language::Python).await;

        let room = store.get_or_create("abc123").await;
        assert_eq!(room.content, "print(1)\n");
        assert_eq!(room.language, Language::Python);
    }

    #[tokio::test]
    async fn updates_to_unknown_rooms_are_noops() {
        let store = RoomStore::new();
        store.set_content("ghost", "x".to_string()).await;
        store.set_language("ghost", Language::Java).await;
        store.set_output("ghost", vec!["line".to_string()]).await;
        assert!(store.snapshot("ghost").await.is_none());
        assert_eq!(store.room_count().await, 0);
    }

    #[tokio::test]
    async fn remove_is_safe_and_forgets_state() {
        let store = RoomStore::new();
        store.remove("never-existed").await;

        store.get_or_create("abc123").await;
        store.set_content("abc123", "edited".to_string()).await;
        store.remove("abc123").await;
        assert!(store.snapshot("abc123").await.is_none());

        // A later join with the same key gets defaults again, not stale state.
        let room = store.get_or_create("abc123").await;
        assert_eq!(room.content, Language::Javascript.default_template());
    }

    #[tokio::test]
    async fn output_overwrite_is_idempotent() {
        let store = RoomStore::new();
        store.get_or_create("abc123").await;
        store.set_output("abc123", Vec::new()).await;
        store.set_output("abc123", Vec::new()).await;
        assert!(store.snapshot("abc123").await.unwrap().output.is_empty());
    }
}
