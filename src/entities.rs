// Simulation entity records. All collections keying these live in
// `world::GameWorld`; ids are generated there and never reused.

use crate::geometry::Bounds;
use crate::tuning::{EnemyTuning, OrbTuning, PlayerTuning};

#[derive(Debug, Clone)]
pub struct Weapon {
    pub name: String,
    /// Cooldown period in ticks.
    pub cooldown: u32,
    /// Ticks remaining until the weapon may fire again.
    pub current_cooldown: u32,
    pub projectile_size: f64,
    pub projectile_speed: f64,
    pub damage: i32,
}

#[derive(Debug, Clone)]
pub struct Player {
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
    pub weapons: Vec<Weapon>,
    /// Highest input sequence applied so far; stale input is discarded.
    pub last_input_sequence: u64,
    /// Set by the fire command, consumed by the fire-resolution step.
    pub wants_to_fire: bool,
}

impl Player {
    pub fn new(id: String, x: f64, y: f64) -> Self {
        let tuning = PlayerTuning::default();
        Self {
            id,
            x,
            y,
            width: tuning.size,
            height: tuning.size,
            health: tuning.max_health,
            max_health: tuning.max_health,
            level: 1,
            xp: 0,
            xp_to_next_level: tuning.first_level_xp,
            is_dead: false,
            weapons: crate::tuning::player::starting_loadout(),
            last_input_sequence: 0,
            wants_to_fire: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
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

impl Enemy {
    pub fn new(id: String, x: f64, y: f64, created_at: u64) -> Self {
        let tuning = EnemyTuning::default();
        Self {
            id,
            x,
            y,
            width: tuning.size,
            height: tuning.size,
            health: tuning.max_health,
            max_health: tuning.max_health,
            speed: tuning.speed,
            damage: tuning.contact_damage,
            created_at,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
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

impl Projectile {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct XpOrb {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: i32,
    pub created_at: u64,
}

impl XpOrb {
    pub fn new(id: String, x: f64, y: f64, created_at: u64) -> Self {
        let tuning = OrbTuning::default();
        Self {
            id,
            x,
            y,
            width: tuning.size,
            height: tuning.size,
            value: tuning.value,
            created_at,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}
