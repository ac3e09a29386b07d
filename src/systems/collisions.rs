use crate::entities::XpOrb;
use crate::geometry::circles_overlap;
use crate::tuning::PlayerTuning;
use crate::world::{GameWorld, entity_id};

/// Contact buffer that makes player/enemy hits feel fair at speed.
const PLAYER_ENEMY_BUFFER: f64 = 5.0;

/// Collision resolution in a fixed order so outcomes are deterministic:
/// projectiles against enemies, then enemies against players, then orb
/// pickups (which also applies leveling).
pub fn resolve(world: &mut GameWorld, now_ms: u64) {
    projectiles_vs_enemies(world, now_ms);
    enemies_vs_players(world);
    orb_pickups(world);
}

fn projectiles_vs_enemies(world: &mut GameWorld, now_ms: u64) {
    let GameWorld {
        projectiles,
        enemies,
        xp_orbs,
        rng,
        ..
    } = world;

    let projectile_ids: Vec<String> = projectiles.keys().cloned().collect();
    for projectile_id in projectile_ids {
        let Some(projectile) = projectiles.get(&projectile_id) else {
            continue;
        };

        // First overlapping enemy wins the hit; projectiles do not pierce.
        let hit = enemies
            .iter()
            .find(|(_, enemy)| circles_overlap(projectile.bounds(), enemy.bounds(), 0.0))
            .map(|(id, _)| id.clone());
        let Some(enemy_id) = hit else {
            continue;
        };

        let damage = projectile.damage;
        projectiles.remove(&projectile_id);

        let Some(enemy) = enemies.get_mut(&enemy_id) else {
            continue;
        };
        enemy.health -= damage;
        if enemy.health <= 0 {
            let (cx, cy) = enemy.bounds().center();
            enemies.remove(&enemy_id);

            let orb_id = entity_id("xp", now_ms, rng);
            xp_orbs.insert(orb_id.clone(), XpOrb::new(orb_id, cx, cy, now_ms));
        }
    }
}

fn enemies_vs_players(world: &mut GameWorld) {
    let GameWorld {
        players, enemies, ..
    } = world;

    for player in players.values_mut() {
        if player.is_dead {
            continue;
        }
        for enemy in enemies.values() {
            if circles_overlap(player.bounds(), enemy.bounds(), PLAYER_ENEMY_BUFFER) {
                player.health -= enemy.damage;
                if player.health <= 0 {
                    player.health = 0;
                    player.is_dead = true;
                    break;
                }
            }
        }
    }
}

fn orb_pickups(world: &mut GameWorld) {
    let GameWorld {
        players, xp_orbs, ..
    } = world;
    let tuning = PlayerTuning::default();

    for player in players.values_mut() {
        if player.is_dead {
            continue;
        }

        let orb_ids: Vec<String> = xp_orbs.keys().cloned().collect();
        for orb_id in orb_ids {
            let Some(orb) = xp_orbs.get(&orb_id) else {
                continue;
            };
            if !circles_overlap(player.bounds(), orb.bounds(), 0.0) {
                continue;
            }

            player.xp += orb.value;
            xp_orbs.remove(&orb_id);

            if player.xp >= player.xp_to_next_level {
                player.level += 1;
                // Carry the remainder instead of resetting to zero.
                player.xp -= player.xp_to_next_level;
                player.xp_to_next_level = (player.xp_to_next_level as f64 * 1.5).floor() as i32;
                player.health = (player.health + tuning.level_heal).min(player.max_health);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Enemy, Projectile};
    use crate::world::WorldConfig;

    fn world() -> GameWorld {
        GameWorld::with_seed(WorldConfig::default(), 9)
    }

    fn projectile_at(id: &str, x: f64, y: f64, damage: i32) -> Projectile {
        Projectile {
            id: id.to_string(),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: 10.0,
            height: 10.0,
            damage,
            owner_id: "p1".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn projectile_hits_at_most_one_of_two_overlapping_enemies() {
        let mut world = world();
        let a = Enemy::new("enemy_a".to_string(), 100.0, 100.0, 0);
        let b = Enemy::new("enemy_b".to_string(), 102.0, 100.0, 0);
        world.enemies.insert(a.id.clone(), a);
        world.enemies.insert(b.id.clone(), b);

        let p = projectile_at("proj_a", 105.0, 105.0, 20);
        world.projectiles.insert(p.id.clone(), p);

        resolve(&mut world, 0);

        assert!(world.projectiles.is_empty(), "projectile consumed on hit");
        let total_health: i32 = world.enemies.values().map(|e| e.health).sum();
        assert_eq!(total_health, 60 + 60 - 20, "exactly one enemy damaged");
    }

    #[test]
    fn killing_blow_drops_an_orb_at_the_enemy_center() {
        let mut world = world();
        let mut enemy = Enemy::new("enemy_a".to_string(), 100.0, 100.0, 0);
        enemy.health = 10;
        let (ecx, ecy) = enemy.bounds().center();
        world.enemies.insert(enemy.id.clone(), enemy);

        let p = projectile_at("proj_a", 105.0, 105.0, 20);
        world.projectiles.insert(p.id.clone(), p);

        resolve(&mut world, 123);

        assert!(world.enemies.is_empty());
        assert_eq!(world.xp_orbs.len(), 1);
        let orb = world.xp_orbs.values().next().unwrap();
        assert_eq!(orb.x, ecx);
        assert_eq!(orb.y, ecy);
        assert_eq!(orb.created_at, 123);
    }

    #[test]
    fn enemy_contact_damages_then_kills_with_clamped_health() {
        let mut world = world();
        world.spawn_player("p1");
        let (px, py) = (world.players["p1"].x, world.players["p1"].y);
        let enemy = Enemy::new("enemy_a".to_string(), px, py, 0);
        world.enemies.insert(enemy.id.clone(), enemy);

        for _ in 0..5 {
            resolve(&mut world, 0);
        }

        let player = &world.players["p1"];
        assert_eq!(player.health, 0);
        assert!(player.is_dead);

        // Dead players take no further damage.
        resolve(&mut world, 0);
        assert_eq!(world.players["p1"].health, 0);
    }

    #[test]
    fn orb_pickup_grants_xp_without_leveling_below_threshold() {
        let mut world = world();
        world.spawn_player("p1");
        let (cx, cy) = world.players["p1"].bounds().center();
        let orb = XpOrb::new("xp_a".to_string(), cx, cy, 0);
        world.xp_orbs.insert(orb.id.clone(), orb);

        resolve(&mut world, 0);

        let player = &world.players["p1"];
        assert_eq!(player.xp, 5);
        assert_eq!(player.level, 1);
        assert!(world.xp_orbs.is_empty());
    }
}
