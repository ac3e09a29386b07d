// REST surface for the lobby flow: create a room, pre-check a join, read a
// room's status. All responses are JSON with camelCase fields.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app_state::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Builds the WebSocket URL a client should dial for `room_id`, derived from
/// the Host header the request arrived on.
fn ws_url(headers: &HeaderMap, room_id: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("ws://{host}/ws?roomId={room_id}")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    room_id: String,
    ws_url: String,
}

pub async fn create_room(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let handle = state.rooms.create_room().await;
    let room_id = handle.room_id.to_string();
    info!(room_id = %room_id, "room created");
    let ws_url = ws_url(&headers, &room_id);
    Json(CreateRoomResponse { room_id, ws_url }).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    #[serde(default)]
    room_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRoomResponse {
    room_id: String,
    ws_url: String,
    player_count: usize,
}

/// Capacity pre-check before the client dials the WebSocket. The check is
/// advisory; the room itself enforces the cap at join time.
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<JoinRoomRequest>,
) -> Response {
    let Some(room_id) = payload.room_id.filter(|id| !id.trim().is_empty()) else {
        return bad_request("Room ID required");
    };

    // A room nobody has addressed yet is joinable and empty.
    let player_count = match state.rooms.get(&room_id).await {
        Some(handle) => match handle.status().await {
            Some(status) => status.player_count,
            None => 0,
        },
        None => 0,
    };

    if player_count >= state.rooms.max_players() {
        return bad_request("Room is full");
    }

    let ws_url = ws_url(&headers, &room_id);
    Json(JoinRoomResponse {
        room_id,
        ws_url,
        player_count,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct RoomStatusQuery {
    #[serde(default, rename = "roomId")]
    room_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomStatusResponse {
    player_count: usize,
    max_players: usize,
    game_started: bool,
    players: Vec<String>,
}

pub async fn room_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomStatusQuery>,
) -> Response {
    let Some(room_id) = query.room_id.filter(|id| !id.trim().is_empty()) else {
        return bad_request("Room ID required");
    };

    let empty = RoomStatusResponse {
        player_count: 0,
        max_players: state.rooms.max_players(),
        game_started: false,
        players: Vec::new(),
    };

    let body = match state.rooms.get(&room_id).await {
        Some(handle) => match handle.status().await {
            Some(status) => RoomStatusResponse {
                player_count: status.player_count,
                max_players: status.max_players,
                game_started: status.game_started,
                players: status.players,
            },
            None => empty,
        },
        // Rooms exist implicitly; an unaddressed one reads as empty.
        None => empty,
    };

    Json(body).into_response()
}
