use std::f64::consts::TAU;

use rand::Rng;

use crate::entities::Enemy;
use crate::geometry;
use crate::tuning::EnemyTuning;
use crate::world::{GameWorld, entity_id};

/// Periodic spawn: one enemy on a fixed ring around a randomly chosen living
/// player, clamped into the world. Skipped while the spawn cap is reached so
/// an overrun room cannot grow without bound.
pub fn spawn(world: &mut GameWorld, now_ms: u64) {
    if now_ms.saturating_sub(world.last_enemy_spawn) < world.config.enemy_spawn_interval_ms {
        return;
    }
    if world.enemies.len() >= world.config.max_enemies {
        return;
    }

    let GameWorld {
        config,
        players,
        enemies,
        rng,
        last_enemy_spawn,
        ..
    } = world;

    let living: Vec<_> = players.values().filter(|p| !p.is_dead).collect();
    if living.is_empty() {
        return;
    }
    let anchor = living[rng.random_range(0..living.len())];
    let (ax, ay) = (anchor.x, anchor.y);

    let tuning = EnemyTuning::default();
    let angle = rng.random_range(0.0..TAU);
    let x = (ax + angle.cos() * tuning.spawn_ring_distance).clamp(0.0, config.width - tuning.size);
    let y = (ay + angle.sin() * tuning.spawn_ring_distance).clamp(0.0, config.height - tuning.size);

    let id = entity_id("enemy", now_ms, rng);
    enemies.insert(id.clone(), Enemy::new(id, x, y, now_ms));
    *last_enemy_spawn = now_ms;
}

/// Chase AI: every enemy steps toward the nearest living player at its fixed
/// speed. With no living players the enemy holds position this tick.
pub fn chase(world: &mut GameWorld) {
    let GameWorld {
        config,
        players,
        enemies,
        ..
    } = world;

    for enemy in enemies.values_mut() {
        let mut nearest: Option<(f64, f64, f64)> = None; // (distance, x, y)
        for player in players.values().filter(|p| !p.is_dead) {
            let distance = geometry::center_distance(enemy.bounds(), player.bounds());
            if nearest.is_none_or(|(best, _, _)| distance < best) {
                nearest = Some((distance, player.x, player.y));
            }
        }
        let Some((_, px, py)) = nearest else {
            continue;
        };

        let angle = (py - enemy.y).atan2(px - enemy.x);
        enemy.x = (enemy.x + angle.cos() * enemy.speed).clamp(0.0, config.width - enemy.width);
        enemy.y = (enemy.y + angle.sin() * enemy.speed).clamp(0.0, config.height - enemy.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldConfig;

    #[test]
    fn spawner_respects_interval_anchor_and_ring() {
        let mut world = GameWorld::with_seed(WorldConfig::default(), 3);
        world.spawn_player("p1");
        let (px, py) = (world.players["p1"].x, world.players["p1"].y);

        spawn(&mut world, 1000);
        assert!(world.enemies.is_empty(), "interval not yet elapsed");

        spawn(&mut world, 2000);
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.last_enemy_spawn, 2000);

        let enemy = world.enemies.values().next().unwrap();
        let ring = EnemyTuning::default().spawn_ring_distance;
        let distance = ((enemy.x - px).powi(2) + (enemy.y - py).powi(2)).sqrt();
        // Clamping can only pull the enemy closer than the ring distance.
        assert!(distance <= ring + 1e-9);
        assert!(distance > ring / 2.0);

        // Next spawn waits for another full interval.
        spawn(&mut world, 2500);
        assert_eq!(world.enemies.len(), 1);
        spawn(&mut world, 4000);
        assert_eq!(world.enemies.len(), 2);
    }

    #[test]
    fn no_spawn_without_living_players() {
        let mut world = GameWorld::with_seed(WorldConfig::default(), 3);
        world.spawn_player("p1");
        world.players.get_mut("p1").unwrap().is_dead = true;

        spawn(&mut world, 10_000);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn spawn_cap_bounds_enemy_growth() {
        let config = WorldConfig {
            max_enemies: 1,
            ..WorldConfig::default()
        };
        let mut world = GameWorld::with_seed(config, 3);
        world.spawn_player("p1");

        spawn(&mut world, 2000);
        spawn(&mut world, 4000);
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn enemies_close_in_on_the_nearest_living_player() {
        let mut world = GameWorld::with_seed(WorldConfig::default(), 3);
        world.spawn_player("near");
        world.spawn_player("far");
        {
            let near = world.players.get_mut("near").unwrap();
            near.x = 500.0;
            near.y = 500.0;
        }
        {
            let far = world.players.get_mut("far").unwrap();
            far.x = 2000.0;
            far.y = 1500.0;
        }

        let enemy = Enemy::new("e1".to_string(), 400.0, 500.0, 0);
        world.enemies.insert(enemy.id.clone(), enemy);

        let before = ((world.enemies["e1"].x - 500.0).powi(2)
            + (world.enemies["e1"].y - 500.0).powi(2))
        .sqrt();
        chase(&mut world);
        let after = ((world.enemies["e1"].x - 500.0).powi(2)
            + (world.enemies["e1"].y - 500.0).powi(2))
        .sqrt();
        assert!(after < before);
    }

    #[test]
    fn enemies_hold_position_with_no_living_players() {
        let mut world = GameWorld::with_seed(WorldConfig::default(), 3);
        let enemy = Enemy::new("e1".to_string(), 400.0, 500.0, 0);
        world.enemies.insert(enemy.id.clone(), enemy);

        chase(&mut world);
        assert_eq!(world.enemies["e1"].x, 400.0);
        assert_eq!(world.enemies["e1"].y, 500.0);
    }
}
