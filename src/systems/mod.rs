// Simulation steps, in tick order. Each system is a free function over the
// room's `GameWorld` so the update order stays explicit in `GameWorld::tick`.

pub mod cleanup;
pub mod collisions;
pub mod enemies;
pub mod movement;
pub mod projectiles;
pub mod weapons;
