use std::{env, time::Duration};

use crate::room::RoomSettings;
use crate::world::WorldConfig;

// Runtime/server configuration (not gameplay tuning). Every knob has a
// baked-in default; env vars override.

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 64;

/// Room id used when a WebSocket connects without one.
pub const DEFAULT_ROOM_ID: &str = "default-room";

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Tick period for a ticks-per-second rate, floored at 1 ms so the interval
/// timer always gets a non-zero period (it panics on zero).
fn tick_interval_from_rate(tick_rate: u64) -> Duration {
    Duration::from_millis((1000 / tick_rate.max(1)).max(1))
}

pub fn room_settings() -> RoomSettings {
    RoomSettings {
        max_players: env_u64("GAME_MAX_PLAYERS", 4) as usize,
        tick_interval: tick_interval_from_rate(env_u64("GAME_TICK_RATE", 60)),
        broadcast_interval: env_u64("GAME_BROADCAST_EVERY", 3).max(1),
        command_channel_capacity: INPUT_CHANNEL_CAPACITY,
        outbound_channel_capacity: OUTBOUND_CHANNEL_CAPACITY,
        world: WorldConfig {
            width: env_f64("GAME_WORLD_WIDTH", 2400.0),
            height: env_f64("GAME_WORLD_HEIGHT", 1800.0),
            enemy_spawn_interval_ms: env_u64("GAME_ENEMY_SPAWN_INTERVAL_MS", 2000),
            auto_fire: env::var("GAME_AUTO_FIRE").map_or(true, |v| v != "0" && v != "false"),
            max_enemies: env_u64("GAME_MAX_ENEMIES", 200) as usize,
        },
    }
}
