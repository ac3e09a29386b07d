use std::collections::HashMap;
use std::f64::consts::TAU;

use rand::Rng;
use rand::rngs::StdRng;

use crate::entities::{Enemy, Player, Projectile};
use crate::geometry;
use crate::world::{GameWorld, entity_id};

/// Cooldown decay: every living player's weapons tick down by one, floored
/// at zero.
pub fn decay_cooldowns(world: &mut GameWorld) {
    for player in world.players.values_mut() {
        if player.is_dead {
            continue;
        }
        for weapon in &mut player.weapons {
            weapon.current_cooldown = weapon.current_cooldown.saturating_sub(1);
        }
    }
}

/// Fire resolution: each ready weapon of each eligible player spawns one
/// projectile aimed at the nearest enemy (random heading when none exist).
/// The pending-fire flag is consumed whether or not anything fired.
pub fn fire(world: &mut GameWorld, now_ms: u64) {
    let GameWorld {
        config,
        players,
        enemies,
        projectiles,
        sequence,
        rng,
        ..
    } = world;

    for player in players.values_mut() {
        if player.is_dead {
            continue;
        }

        if config.auto_fire || player.wants_to_fire {
            for weapon_idx in 0..player.weapons.len() {
                if player.weapons[weapon_idx].current_cooldown > 0 {
                    continue;
                }

                let angle = fire_angle(player, enemies, rng);
                let weapon = &player.weapons[weapon_idx];
                let (cx, cy) = player.bounds().center();
                let id = entity_id("proj", *sequence, rng);
                projectiles.insert(
                    id.clone(),
                    Projectile {
                        id,
                        x: cx - weapon.projectile_size / 2.0,
                        y: cy - weapon.projectile_size / 2.0,
                        vx: angle.cos() * weapon.projectile_speed,
                        vy: angle.sin() * weapon.projectile_speed,
                        width: weapon.projectile_size,
                        height: weapon.projectile_size,
                        damage: weapon.damage,
                        owner_id: player.id.clone(),
                        created_at: now_ms,
                    },
                );

                let weapon = &mut player.weapons[weapon_idx];
                weapon.current_cooldown = weapon.cooldown;
            }
        }

        player.wants_to_fire = false;
    }
}

/// Nearest enemy by center-to-center distance wins the aim; an empty world
/// gets a uniformly random angle.
fn fire_angle(player: &Player, enemies: &HashMap<String, Enemy>, rng: &mut StdRng) -> f64 {
    let mut nearest: Option<(f64, f64, f64)> = None; // (distance, center x, center y)
    for enemy in enemies.values() {
        let distance = geometry::center_distance(player.bounds(), enemy.bounds());
        if nearest.is_none_or(|(best, _, _)| distance < best) {
            let (ex, ey) = enemy.bounds().center();
            nearest = Some((distance, ex, ey));
        }
    }

    match nearest {
        Some((_, ex, ey)) => {
            let (px, py) = player.bounds().center();
            (ey - py).atan2(ex - px)
        }
        None => rng.random_range(0.0..TAU),
    }
}
