/// Gameplay tuning for projectiles. Size, speed and damage come from the
/// firing weapon; this covers lifetime and despawn bounds.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Lifetime in milliseconds before the projectile is despawned regardless
    /// of position.
    pub ttl_ms: u64,

    /// How far outside the world a projectile may travel before despawning.
    pub bounds_margin: f64,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            ttl_ms: 10_000,
            bounds_margin: 50.0,
        }
    }
}
