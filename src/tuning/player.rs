/// Gameplay tuning for player avatars.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer
/// sizes, etc.).

use crate::entities::Weapon;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Bounding box edge length in world units.
    pub size: f64,

    /// Distance moved per accepted movement command.
    pub speed: f64,

    pub max_health: i32,

    /// XP required to reach level 2; grows by 1.5x per level.
    pub first_level_xp: i32,

    /// Health restored on level-up, capped at max_health.
    pub level_heal: i32,

    /// Half-extent of the random offset around world center on join.
    pub join_jitter: f64,

    /// Half-extent of the random offset around world center on room reset.
    pub reset_jitter: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            speed: 4.0,
            max_health: 100,
            first_level_xp: 10,
            level_heal: 20,
            join_jitter: 50.0,
            reset_jitter: 100.0,
        }
    }
}

/// Weapons every player starts with. Cooldowns are counted in ticks.
pub fn starting_loadout() -> Vec<Weapon> {
    vec![
        Weapon {
            name: "Magic Missile".to_string(),
            cooldown: 120,
            current_cooldown: 0,
            projectile_size: 10.0,
            projectile_speed: 5.0,
            damage: 20,
        },
        Weapon {
            name: "Aiming Bolt".to_string(),
            cooldown: 180,
            current_cooldown: 0,
            projectile_size: 8.0,
            projectile_speed: 4.0,
            damage: 15,
        },
    ]
}
