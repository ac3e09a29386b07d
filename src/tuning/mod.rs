// Gameplay tuning layer: fixed balance numbers, separate from runtime config.

pub mod enemy;
pub mod orb;
pub mod player;
pub mod projectile;

pub use enemy::EnemyTuning;
pub use orb::OrbTuning;
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;
