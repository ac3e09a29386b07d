// Wire protocol for the room WebSocket: a closed set of inbound commands and
// outbound frames, with DTOs converted from domain types. Payload fields are
// camelCase on the wire; message tags are snake_case.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Enemy, Player, Projectile, Weapon, XpOrb};
use crate::world::GameWorld;

/// Messages a client sends over the WebSocket. Anything with an unrecognized
/// `type` parses to `Unknown` and is dropped by the caller, so old clients
/// never get their connection closed over a message we no longer handle.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Input {
        #[serde(default)]
        input: Option<InputPayload>,
        #[serde(default)]
        sequence: u64,
    },
    RestartGame,
    Ping {
        #[serde(default)]
        timestamp: Option<u64>,
    },
    #[serde(other)]
    Unknown,
}

/// Input sub-payload. Current clients send a tagged form; the legacy form is
/// a bare `{"move": {x, y}}` object and is still accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InputPayload {
    Typed(TypedInput),
    Legacy {
        #[serde(rename = "move")]
        direction: MoveVector,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypedInput {
    Movement {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    FireWeapons,
    /// Unrecognized input sub-type: the envelope (and its sequence) is still
    /// consumed, but nothing is applied.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveVector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Frames the server sends to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Welcome {
        player_id: String,
        game_state: GameStateDto,
    },
    GameState {
        sequence: u64,
        state: GameStateDto,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        player_id: String,
        player_state: PlayerDto,
    },
    #[serde(rename_all = "camelCase")]
    PlayerLeft { player_id: String },
    GameRestarted { message: String },
    Pong { timestamp: Option<u64> },
    Error { message: String },
}

/// Complete, self-contained snapshot of one room. No delta compression: a
/// dropped frame costs nothing because the next one carries everything.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateDto {
    pub players: HashMap<String, PlayerDto>,
    pub enemies: HashMap<String, EnemyDto>,
    pub projectiles: HashMap<String, ProjectileDto>,
    pub xp_orbs: HashMap<String, XpOrbDto>,
    pub sequence: u64,
}

impl From<&GameWorld> for GameStateDto {
    fn from(world: &GameWorld) -> Self {
        Self {
            players: world
                .players
                .iter()
                .map(|(id, p)| (id.clone(), PlayerDto::from(p)))
                .collect(),
            enemies: world
                .enemies
                .iter()
                .map(|(id, e)| (id.clone(), EnemyDto::from(e)))
                .collect(),
            projectiles: world
                .projectiles
                .iter()
                .map(|(id, p)| (id.clone(), ProjectileDto::from(p)))
                .collect(),
            xp_orbs: world
                .xp_orbs
                .iter()
                .map(|(id, o)| (id.clone(), XpOrbDto::from(o)))
                .collect(),
            sequence: world.sequence,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub xp: i32,
    pub xp_to_next_level: i32,
    pub is_dead: bool,
    pub weapons: Vec<WeaponDto>,
    pub last_input_sequence: u64,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            x: player.x,
            y: player.y,
            width: player.width,
            height: player.height,
            health: player.health,
            max_health: player.max_health,
            level: player.level,
            xp: player.xp,
            xp_to_next_level: player.xp_to_next_level,
            is_dead: player.is_dead,
            weapons: player.weapons.iter().map(WeaponDto::from).collect(),
            last_input_sequence: player.last_input_sequence,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponDto {
    pub name: String,
    pub cooldown: u32,
    pub current_cooldown: u32,
    pub projectile_size: f64,
    pub projectile_speed: f64,
    pub damage: i32,
}

impl From<&Weapon> for WeaponDto {
    fn from(weapon: &Weapon) -> Self {
        Self {
            name: weapon.name.clone(),
            cooldown: weapon.cooldown,
            current_cooldown: weapon.current_cooldown,
            projectile_size: weapon.projectile_size,
            projectile_speed: weapon.projectile_speed,
            damage: weapon.damage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub health: i32,
    pub max_health: i32,
    pub speed: f64,
    pub damage: i32,
    pub created_at: u64,
}

impl From<&Enemy> for EnemyDto {
    fn from(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id.clone(),
            x: enemy.x,
            y: enemy.y,
            width: enemy.width,
            height: enemy.height,
            health: enemy.health,
            max_health: enemy.max_health,
            speed: enemy.speed,
            damage: enemy.damage,
            created_at: enemy.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub damage: i32,
    pub owner_id: String,
    pub created_at: u64,
}

impl From<&Projectile> for ProjectileDto {
    fn from(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id.clone(),
            x: projectile.x,
            y: projectile.y,
            vx: projectile.vx,
            vy: projectile.vy,
            width: projectile.width,
            height: projectile.height,
            damage: projectile.damage,
            owner_id: projectile.owner_id.clone(),
            created_at: projectile.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpOrbDto {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: i32,
    pub created_at: u64,
}

impl From<&XpOrb> for XpOrbDto {
    fn from(orb: &XpOrb) -> Self {
        Self {
            id: orb.id.clone(),
            x: orb.x,
            y: orb.y,
            width: orb.width,
            height: orb.height,
            value: orb.value,
            created_at: orb.created_at,
        }
    }
}
