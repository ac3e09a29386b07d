// One room = one actor task owning the sessions, the world and the tick
// cadence. Commands from connection tasks and the fixed-step tick are
// processed on the same task, so ticks never overlap and input application is
// serialized with the simulation without any locking.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::protocol::{GameStateDto, PlayerDto, ServerMessage};
use crate::world::{GameWorld, InputEvent, WorldConfig};

/// Per-room runtime settings; see `config::room_settings` for the env wiring.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    pub max_players: usize,
    pub tick_interval: Duration,
    /// Broadcast a full snapshot every Nth tick to bound bandwidth.
    pub broadcast_interval: u64,
    pub command_channel_capacity: usize,
    pub outbound_channel_capacity: usize,
    pub world: WorldConfig,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            max_players: 4,
            tick_interval: Duration::from_millis(1000 / 60),
            broadcast_interval: 3,
            command_channel_capacity: 1024,
            outbound_channel_capacity: 64,
            world: WorldConfig::default(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum JoinError {
    RoomFull,
}

#[derive(Debug, Clone)]
pub struct RoomStatus {
    pub player_count: usize,
    pub max_players: usize,
    pub game_started: bool,
    pub players: Vec<String>,
}

/// Commands a connection (or the HTTP surface) sends into a room task.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        player_id: String,
        outbound: mpsc::Sender<Utf8Bytes>,
        reply: oneshot::Sender<Result<(), JoinError>>,
    },
    Leave {
        player_id: String,
    },
    Input {
        player_id: String,
        event: InputEvent,
        sequence: u64,
    },
    /// Accepted even for unknown or dead players: the intent is recovering a
    /// stuck room, so identity validation is deliberately relaxed.
    RestartGame {
        player_id: String,
    },
    Ping {
        player_id: String,
        timestamp: Option<u64>,
    },
    Status {
        reply: oneshot::Sender<RoomStatus>,
    },
}

/// Drives one room until every command sender is dropped.
pub async fn room_task(
    room_id: String,
    settings: RoomSettings,
    mut commands: mpsc::Receiver<RoomCommand>,
) {
    let mut room = Room::new(room_id, settings);
    let mut ticker = tokio::time::interval(room.settings.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let was_started = room.started;
        tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(cmd) => room.handle_command(cmd),
                None => break,
            },
            _ = ticker.tick(), if room.started => {
                room.run_tick(now_ms());
            }
        }
        if room.started && !was_started {
            // The loop was stopped; restart the cadence from now rather than
            // bursting through missed ticks.
            ticker.reset();
        }
    }

    info!(room_id = %room.room_id, "room task stopped");
}

struct Room {
    room_id: String,
    settings: RoomSettings,
    world: GameWorld,
    sessions: HashMap<String, mpsc::Sender<Utf8Bytes>>,
    /// True while the tick loop runs (at least one connection present).
    started: bool,
}

impl Room {
    fn new(room_id: String, settings: RoomSettings) -> Self {
        let world = GameWorld::new(settings.world);
        Self {
            room_id,
            settings,
            world,
            sessions: HashMap::new(),
            started: false,
        }
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                player_id,
                outbound,
                reply,
            } => {
                let _ = reply.send(self.handle_join(player_id, outbound));
            }
            RoomCommand::Leave { player_id } => self.handle_leave(&player_id),
            RoomCommand::Input {
                player_id,
                event,
                sequence,
            } => self.world.apply_input(&player_id, event, sequence),
            RoomCommand::RestartGame { player_id } => self.handle_restart(&player_id),
            RoomCommand::Ping {
                player_id,
                timestamp,
            } => self.send_to(&player_id, &ServerMessage::Pong { timestamp }),
            RoomCommand::Status { reply } => {
                let _ = reply.send(RoomStatus {
                    player_count: self.sessions.len(),
                    max_players: self.settings.max_players,
                    game_started: self.started,
                    players: self.world.players.keys().cloned().collect(),
                });
            }
        }
    }

    fn handle_join(
        &mut self,
        player_id: String,
        outbound: mpsc::Sender<Utf8Bytes>,
    ) -> Result<(), JoinError> {
        if self.sessions.len() >= self.settings.max_players {
            info!(room_id = %self.room_id, player_id, "join rejected; room full");
            return Err(JoinError::RoomFull);
        }

        self.sessions.insert(player_id.clone(), outbound);
        let player = self.world.spawn_player(&player_id);
        let joined = ServerMessage::PlayerJoined {
            player_id: player_id.clone(),
            player_state: PlayerDto::from(player),
        };

        let welcome = ServerMessage::Welcome {
            player_id: player_id.clone(),
            game_state: GameStateDto::from(&self.world),
        };

        // Welcome goes to the joiner only; the join notice to everyone else.
        self.send_to(&player_id, &welcome);
        self.broadcast(&joined, Some(&player_id));

        if !self.started {
            self.started = true;
            info!(room_id = %self.room_id, "first player joined; tick loop started");
        }
        info!(
            room_id = %self.room_id,
            player_id,
            players = self.sessions.len(),
            "player joined"
        );
        Ok(())
    }

    /// Shared by graceful close and send-failure cleanup; idempotent.
    fn handle_leave(&mut self, player_id: &str) {
        if self.sessions.remove(player_id).is_none() {
            return;
        }
        self.world.remove_player(player_id);

        self.broadcast(
            &ServerMessage::PlayerLeft {
                player_id: player_id.to_string(),
            },
            None,
        );

        info!(
            room_id = %self.room_id,
            player_id,
            players = self.sessions.len(),
            "player left"
        );
        if self.sessions.is_empty() {
            self.started = false;
            info!(room_id = %self.room_id, "room empty; tick loop stopped");
        }
    }

    fn handle_restart(&mut self, requested_by: &str) {
        info!(room_id = %self.room_id, requested_by, "room reset requested");

        // Halt the tick loop before touching state so no broadcast can
        // observe a half-reset room, then bring it back up once done.
        self.started = false;
        self.world.reset();
        self.broadcast(
            &ServerMessage::GameRestarted {
                message: format!("Game restarted by {requested_by}."),
            },
            None,
        );
        self.started = !self.sessions.is_empty();
    }

    fn run_tick(&mut self, now_ms: u64) {
        self.world.tick(now_ms);

        if self.world.sequence % self.settings.broadcast_interval == 0 {
            let snapshot = ServerMessage::GameState {
                sequence: self.world.sequence,
                state: GameStateDto::from(&self.world),
            };
            self.broadcast(&snapshot, None);
        }
    }

    fn send_to(&mut self, player_id: &str, msg: &ServerMessage) {
        let Some(bytes) = serialize(msg) else { return };
        self.send_bytes(player_id, bytes);
    }

    /// Serialize once, fan out shared bytes to every session except an
    /// optional excluded sender (join/leave notices only; snapshots go to
    /// everyone).
    fn broadcast(&mut self, msg: &ServerMessage, exclude: Option<&str>) {
        let Some(bytes) = serialize(msg) else { return };
        let targets: Vec<String> = self
            .sessions
            .keys()
            .filter(|id| exclude != Some(id.as_str()))
            .cloned()
            .collect();
        for player_id in targets {
            self.send_bytes(&player_id, bytes.clone());
        }
    }

    fn send_bytes(&mut self, player_id: &str, bytes: Utf8Bytes) {
        // The session may already be gone if a cascading leave removed it.
        let Some(tx) = self.sessions.get(player_id) else {
            return;
        };
        let result = tx.try_send(bytes);
        match result {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                // Snapshots are self-contained, so a slow client just misses
                // one; it must not stall the room.
                warn!(room_id = %self.room_id, player_id, "outbound queue full; dropping frame");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(room_id = %self.room_id, player_id, "send failed; treating as disconnect");
                self.handle_leave(player_id);
            }
        }
    }
}

fn serialize(msg: &ServerMessage) -> Option<Utf8Bytes> {
    match serde_json::to_string(msg) {
        Ok(txt) => Some(Utf8Bytes::from(txt)),
        Err(e) => {
            error!(error = %e, "failed to serialize server message");
            None
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
