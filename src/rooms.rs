// Registry of active room tasks, keyed by room id. Rooms are spawned on
// first use (explicit create or first WebSocket attach) and keep their id
// while empty so a room can be rejoined after everyone leaves; an empty
// room's tick loop is stopped, so it costs nothing.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::info;

use crate::room::{RoomCommand, RoomSettings, RoomStatus, room_task};

/// Cheap handle for sending commands into one room task.
#[derive(Clone)]
pub struct RoomHandle {
    pub room_id: Arc<str>,
    pub command_tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Queries the room's player count and lifecycle state. `None` when the
    /// room task is gone.
    pub async fn status(&self) -> Option<RoomStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(RoomCommand::Status { reply: reply_tx })
            .await
            .ok()?;
        reply_rx.await.ok()
    }
}

pub struct RoomRegistry {
    settings: RoomSettings,
    rooms: RwLock<HashMap<String, RoomHandle>>,
}

impl RoomRegistry {
    pub fn new(settings: RoomSettings) -> Self {
        Self {
            settings,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Allocates a fresh short room id and spawns its task.
    pub async fn create_room(&self) -> RoomHandle {
        loop {
            let room_id = generate_room_id();
            let mut rooms = self.rooms.write().await;
            if rooms.contains_key(&room_id) {
                continue;
            }
            let handle = spawn_room(room_id.clone(), self.settings.clone());
            rooms.insert(room_id, handle.clone());
            return handle;
        }
    }

    /// Returns the room for `room_id`, spawning it on first access; rooms
    /// exist implicitly once something addresses them.
    pub async fn get_or_create(&self, room_id: &str) -> RoomHandle {
        if let Some(handle) = self.rooms.read().await.get(room_id) {
            return handle.clone();
        }

        let mut rooms = self.rooms.write().await;
        // Re-check under the write lock; another connection may have raced us.
        if let Some(handle) = rooms.get(room_id) {
            return handle.clone();
        }
        let handle = spawn_room(room_id.to_string(), self.settings.clone());
        rooms.insert(room_id.to_string(), handle.clone());
        handle
    }

    pub async fn get(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub fn max_players(&self) -> usize {
        self.settings.max_players
    }

    pub fn outbound_channel_capacity(&self) -> usize {
        self.settings.outbound_channel_capacity
    }
}

fn spawn_room(room_id: String, settings: RoomSettings) -> RoomHandle {
    let (command_tx, command_rx) = mpsc::channel(settings.command_channel_capacity);
    info!(room_id = %room_id, "spawning room");
    let handle = RoomHandle {
        room_id: Arc::from(room_id.as_str()),
        command_tx,
    };
    tokio::spawn(room_task(room_id, settings, command_rx));
    handle
}

/// Six uppercase alphanumerics, enough for shareable room codes.
fn generate_room_id() -> String {
    let mut rng = rand::rng();
    (0..6)
        .map(|_| {
            const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
            CHARSET[rng.random_range(0..CHARSET.len())] as char
        })
        .collect()
}
