// Room-scoped simulation state: the entity registry, the input gateway and
// the per-tick update order. One `GameWorld` per room; all access is funnelled
// through the owning room task, so no locking happens here.

use std::collections::HashMap;

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{Enemy, Player, Projectile, XpOrb};
use crate::systems;
use crate::tuning::PlayerTuning;

/// Per-room world parameters supplied by the environment (see `config.rs`).
/// Gameplay balance numbers live in `tuning/` instead.
#[derive(Debug, Clone, Copy)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub enemy_spawn_interval_ms: u64,
    /// When true (the legacy behavior), weapons fire whenever their cooldown
    /// reaches zero regardless of client intent. When false, firing requires
    /// a pending fire_weapons command.
    pub auto_fire: bool,
    /// Spawn cap; the spawner skips while this many enemies are alive.
    pub max_enemies: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2400.0,
            height: 1800.0,
            enemy_spawn_interval_ms: 2000,
            auto_fire: true,
            max_enemies: 200,
        }
    }
}

/// Commands accepted from a connected player after sequence gating.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Movement { x: f64, y: f64 },
    FireWeapons,
    /// Unrecognized action: consumes the sequence, changes nothing else.
    Other,
}

pub struct GameWorld {
    pub config: WorldConfig,
    pub players: HashMap<String, Player>,
    pub enemies: HashMap<String, Enemy>,
    pub projectiles: HashMap<String, Projectile>,
    pub xp_orbs: HashMap<String, XpOrb>,
    /// Monotonic tick counter; also stamped into snapshots.
    pub sequence: u64,
    pub last_enemy_spawn: u64,
    pub(crate) rng: StdRng,
}

impl GameWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(config: WorldConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WorldConfig, rng: StdRng) -> Self {
        Self {
            config,
            players: HashMap::new(),
            enemies: HashMap::new(),
            projectiles: HashMap::new(),
            xp_orbs: HashMap::new(),
            sequence: 0,
            last_enemy_spawn: 0,
            rng,
        }
    }

    /// Creates a fresh player near the world center. A player with the same
    /// id is replaced (a reconnect under the same identity).
    pub fn spawn_player(&mut self, player_id: &str) -> &Player {
        let tuning = PlayerTuning::default();
        let x = self.config.width / 2.0
            + (self.rng.random::<f64>() - 0.5) * tuning.join_jitter * 2.0;
        let y = self.config.height / 2.0
            + (self.rng.random::<f64>() - 0.5) * tuning.join_jitter * 2.0;
        let player = Player::new(player_id.to_string(), x, y);
        self.players.insert(player_id.to_string(), player);
        &self.players[player_id]
    }

    pub fn remove_player(&mut self, player_id: &str) {
        self.players.remove(player_id);
    }

    /// Input gateway: applies a player command or discards it.
    ///
    /// The whole envelope is sequence-gated: stale or duplicate sequences
    /// leave state untouched, as do commands for unknown or dead players.
    pub fn apply_input(&mut self, player_id: &str, event: InputEvent, sequence: u64) {
        let Some(player) = self.players.get_mut(player_id) else {
            return;
        };
        if player.is_dead {
            return;
        }
        if sequence <= player.last_input_sequence {
            return;
        }
        player.last_input_sequence = sequence;

        match event {
            InputEvent::Movement { x, y } => {
                systems::movement::apply(player, x, y, &self.config);
            }
            InputEvent::FireWeapons => {
                player.wants_to_fire = true;
            }
            InputEvent::Other => {}
        }
    }

    /// One fixed-step tick. `now_ms` is wall-clock milliseconds; it only
    /// feeds spawn pacing and TTLs, so tests can drive synthetic time.
    pub fn tick(&mut self, now_ms: u64) {
        self.sequence += 1;

        systems::weapons::decay_cooldowns(self);
        systems::weapons::fire(self, now_ms);
        systems::projectiles::integrate(self);
        systems::enemies::spawn(self, now_ms);
        systems::enemies::chase(self);
        systems::collisions::resolve(self, now_ms);
        systems::cleanup::expire(self, now_ms);
    }

    /// Full-room reset: players keep their identity but return to initial
    /// stats at a fresh spawn point; everything else is cleared.
    pub fn reset(&mut self) {
        let tuning = PlayerTuning::default();
        for player in self.players.values_mut() {
            player.health = tuning.max_health;
            player.max_health = tuning.max_health;
            player.is_dead = false;
            player.level = 1;
            player.xp = 0;
            player.xp_to_next_level = tuning.first_level_xp;
            player.x = self.config.width / 2.0
                + (self.rng.random::<f64>() - 0.5) * tuning.reset_jitter * 2.0;
            player.y = self.config.height / 2.0
                + (self.rng.random::<f64>() - 0.5) * tuning.reset_jitter * 2.0;
            player.wants_to_fire = false;
            for weapon in &mut player.weapons {
                weapon.current_cooldown = 0;
            }
        }

        self.enemies.clear();
        self.projectiles.clear();
        self.xp_orbs.clear();
        self.last_enemy_spawn = 0;
        self.sequence = 0;
    }
}

/// Unique entity id: prefix, a monotonic stamp (tick sequence or wall-clock
/// ms) and a random suffix so ids never collide within a stamp.
pub(crate) fn entity_id(prefix: &str, stamp: u64, rng: &mut StdRng) -> String {
    let suffix: String = (0..9)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();
    format!("{prefix}_{stamp}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> GameWorld {
        GameWorld::with_seed(WorldConfig::default(), 42)
    }

    fn no_spawn_world() -> GameWorld {
        // Keep the spawner quiet so ticks only exercise the steps under test.
        let config = WorldConfig {
            max_enemies: 0,
            ..WorldConfig::default()
        };
        GameWorld::with_seed(config, 42)
    }

    #[test]
    fn stale_and_duplicate_input_is_discarded() {
        let mut world = test_world();
        world.spawn_player("p1");

        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 5);
        let x_after_first = world.players["p1"].x;

        // Duplicate sequence: no movement.
        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 5);
        assert_eq!(world.players["p1"].x, x_after_first);

        // Stale sequence: no movement.
        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 3);
        assert_eq!(world.players["p1"].x, x_after_first);

        // Fresh sequence moves again.
        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 6);
        assert!(world.players["p1"].x > x_after_first);
    }

    #[test]
    fn zero_direction_is_a_no_op() {
        let mut world = test_world();
        world.spawn_player("p1");
        let (x, y) = (world.players["p1"].x, world.players["p1"].y);

        world.apply_input("p1", InputEvent::Movement { x: 0.0, y: 0.0 }, 1);
        assert_eq!(world.players["p1"].x, x);
        assert_eq!(world.players["p1"].y, y);
        // The sequence is still consumed by the envelope.
        assert_eq!(world.players["p1"].last_input_sequence, 1);
    }

    #[test]
    fn movement_clamps_to_world_bounds() {
        let mut world = test_world();
        world.spawn_player("p1");

        for seq in 1..=2000 {
            world.apply_input("p1", InputEvent::Movement { x: -1.0, y: -1.0 }, seq);
        }
        let player = &world.players["p1"];
        assert_eq!(player.x, 0.0);
        assert_eq!(player.y, 0.0);

        for seq in 2001..=4000 {
            world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 1.0 }, seq);
        }
        let player = &world.players["p1"];
        assert_eq!(player.x, world.config.width - player.width);
        assert_eq!(player.y, world.config.height - player.height);
    }

    #[test]
    fn unrecognized_input_still_consumes_the_sequence() {
        let mut world = test_world();
        world.spawn_player("p1");
        let x_before = world.players["p1"].x;

        world.apply_input("p1", InputEvent::Other, 4);
        assert_eq!(world.players["p1"].last_input_sequence, 4);
        assert_eq!(world.players["p1"].x, x_before);

        // A movement replayed at the consumed sequence is stale.
        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 4);
        assert_eq!(world.players["p1"].x, x_before);
    }

    #[test]
    fn input_for_unknown_player_is_ignored() {
        let mut world = test_world();
        world.apply_input("ghost", InputEvent::Movement { x: 1.0, y: 0.0 }, 1);
        assert!(world.players.is_empty());
    }

    #[test]
    fn dead_players_do_not_move_and_health_stays_in_bounds() {
        let mut world = no_spawn_world();
        world.spawn_player("p1");

        // Park an enemy on top of the player and tick until death.
        let (px, py) = (world.players["p1"].x, world.players["p1"].y);
        let enemy = Enemy::new("enemy_test".to_string(), px, py, 0);
        world.enemies.insert(enemy.id.clone(), enemy);

        for tick in 1..=10 {
            world.tick(tick);
            let player = &world.players["p1"];
            assert!(player.health >= 0 && player.health <= player.max_health);
        }

        let player = &world.players["p1"];
        assert!(player.is_dead);
        assert_eq!(player.health, 0);

        // Death is permanent until reset; input is discarded.
        let x_before = world.players["p1"].x;
        world.apply_input("p1", InputEvent::Movement { x: 1.0, y: 0.0 }, 100);
        assert_eq!(world.players["p1"].x, x_before);
    }

    #[test]
    fn leveling_carries_overflow_xp() {
        let mut world = no_spawn_world();
        world.spawn_player("p1");
        {
            let player = world.players.get_mut("p1").unwrap();
            player.xp = 7;
            player.health = 50;
            // Quiet the weapons so the tick only runs the pickup.
            for weapon in &mut player.weapons {
                weapon.current_cooldown = weapon.cooldown;
            }
        }

        let (px, py) = {
            let b = world.players["p1"].bounds();
            b.center()
        };
        let orb = XpOrb::new("xp_test".to_string(), px, py, 0);
        world.xp_orbs.insert(orb.id.clone(), orb);

        world.tick(1);

        let player = &world.players["p1"];
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 2); // 7 + 5 - 10
        assert_eq!(player.xp_to_next_level, 15); // floor(10 * 1.5)
        assert_eq!(player.health, 70); // +20 level heal
        assert!(world.xp_orbs.is_empty());
    }

    #[test]
    fn reset_restores_canonical_state_and_is_idempotent() {
        let mut world = test_world();
        world.spawn_player("p1");
        world.spawn_player("p2");

        {
            let player = world.players.get_mut("p1").unwrap();
            player.health = 0;
            player.is_dead = true;
            player.level = 4;
            player.xp = 9;
            player.xp_to_next_level = 33;
            player.weapons[0].current_cooldown = 50;
        }
        let enemy = Enemy::new("enemy_test".to_string(), 10.0, 10.0, 0);
        world.enemies.insert(enemy.id.clone(), enemy);
        world.sequence = 99;
        world.last_enemy_spawn = 12345;

        for _ in 0..2 {
            world.reset();

            assert_eq!(world.players.len(), 2);
            for player in world.players.values() {
                assert_eq!(player.health, player.max_health);
                assert!(!player.is_dead);
                assert_eq!(player.level, 1);
                assert_eq!(player.xp, 0);
                assert_eq!(player.xp_to_next_level, 10);
                assert!(player.weapons.iter().all(|w| w.current_cooldown == 0));
            }
            assert!(world.enemies.is_empty());
            assert!(world.projectiles.is_empty());
            assert!(world.xp_orbs.is_empty());
            assert_eq!(world.sequence, 0);
            assert_eq!(world.last_enemy_spawn, 0);
        }
    }

    #[test]
    fn entity_ids_are_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = entity_id("proj", 1, &mut rng);
        let b = entity_id("proj", 1, &mut rng);
        assert_ne!(a, b);
        assert!(a.starts_with("proj_1_"));
    }
}
