// WebSocket adapter: upgrades connections, bootstraps them into a room and
// pumps frames both ways. All game state lives in the room task; this side
// only translates wire messages into room commands.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::SinkExt;
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn};

use crate::app_state::AppState;
use crate::config;
use crate::protocol::{ClientMessage, InputPayload, ServerMessage, TypedInput};
use crate::room::{JoinError, RoomCommand};
use crate::rooms::RoomHandle;
use crate::world::InputEvent;

#[derive(Debug, serde::Deserialize)]
pub struct RoomQuery {
    // Room to attach to; falls back to the default room.
    #[serde(default, rename = "roomId")]
    room_id: Option<String>,
    // Stable player identity; generated when the client does not send one.
    #[serde(default, rename = "playerId")]
    player_id: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomQuery>,
) -> impl IntoResponse {
    let room_id = query
        .room_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| config::DEFAULT_ROOM_ID.to_string());
    let player_id = query
        .player_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(generate_player_id);

    // Rooms exist implicitly once addressed.
    let room = state.rooms.get_or_create(&room_id).await;
    let outbound_capacity = state.rooms.outbound_channel_capacity();

    ws.on_upgrade(move |socket| handle_socket(socket, room, player_id, outbound_capacity))
}

async fn handle_socket(
    mut socket: WebSocket,
    room: RoomHandle,
    player_id: String,
    outbound_capacity: usize,
) {
    let span = info_span!("conn", room_id = %room.room_id, player_id = %player_id);
    let _enter = span.enter();

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Utf8Bytes>(outbound_capacity);
    let (reply_tx, reply_rx) = oneshot::channel();
    let join = RoomCommand::Join {
        player_id: player_id.clone(),
        outbound: outbound_tx,
        reply: reply_tx,
    };
    if room.command_tx.send(join).await.is_err() {
        warn!("room task gone before join");
        let _ = socket.close().await;
        return;
    }

    match reply_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(JoinError::RoomFull)) => {
            // A rejected join sees an explicit error frame before close.
            if let Ok(txt) = serde_json::to_string(&ServerMessage::Error {
                message: "Room is full".to_string(),
            }) {
                let _ = socket.send(Message::Text(txt.into())).await;
            }
            let _ = socket.close().await;
            info!("connection rejected; room full");
            return;
        }
        Err(_) => {
            warn!("room dropped the join reply");
            let _ = socket.close().await;
            return;
        }
    }
    info!("client connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if !forward_client_message(&room, &player_id, &text) {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        // Text-only protocol; drop without closing.
                        debug!("binary frame ignored");
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) => break,
                    Some(Err(e)) => {
                        debug!(error = %e, "websocket recv error");
                        break;
                    }
                    None => break,
                }
            }
            outbound = outbound_rx.recv() => {
                match outbound {
                    Some(bytes) => {
                        if socket.send(Message::Text(bytes)).await.is_err() {
                            // The room discovers the closed channel on its
                            // next send and runs the leave path.
                            break;
                        }
                    }
                    // Room dropped this session (send failure already
                    // handled on its side).
                    None => break,
                }
            }
        }
    }

    let _ = room
        .command_tx
        .send(RoomCommand::Leave {
            player_id: player_id.clone(),
        })
        .await;
    let _ = socket.close().await;
    info!("client disconnected");
}

/// Translates one inbound frame into a room command. Malformed or unknown
/// frames are dropped without closing the connection. Returns false once the
/// room task is unreachable.
fn forward_client_message(room: &RoomHandle, player_id: &str, text: &str) -> bool {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            debug!(error = %e, bytes = text.len(), "malformed frame dropped");
            return true;
        }
    };

    let cmd = match msg {
        ClientMessage::Input { input, sequence } => match input.and_then(to_input_event) {
            Some(event) => RoomCommand::Input {
                player_id: player_id.to_string(),
                event,
                sequence,
            },
            None => return true,
        },
        ClientMessage::RestartGame => RoomCommand::RestartGame {
            player_id: player_id.to_string(),
        },
        ClientMessage::Ping { timestamp } => RoomCommand::Ping {
            player_id: player_id.to_string(),
            timestamp,
        },
        ClientMessage::Unknown => {
            // Permissive protocol: unknown command types are silently dropped.
            debug!("unknown message type dropped");
            return true;
        }
    };

    match room.command_tx.try_send(cmd) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            // Inputs are superseded by the next one; dropping is safe.
            warn!(player_id, "room command queue full; dropping message");
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

fn to_input_event(payload: InputPayload) -> Option<InputEvent> {
    match payload {
        InputPayload::Typed(TypedInput::Movement { x, y }) => Some(InputEvent::Movement { x, y }),
        InputPayload::Typed(TypedInput::FireWeapons) => Some(InputEvent::FireWeapons),
        // Still forwarded: the envelope's sequence must be consumed even when
        // the action itself is unrecognized.
        InputPayload::Typed(TypedInput::Unknown) => Some(InputEvent::Other),
        InputPayload::Legacy { direction } => Some(InputEvent::Movement {
            x: direction.x,
            y: direction.y,
        }),
    }
}

fn generate_player_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..8)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();
    format!("player_{suffix}")
}
