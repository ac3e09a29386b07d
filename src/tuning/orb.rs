/// Gameplay tuning for XP orb pickups.

#[derive(Debug, Clone, Copy)]
pub struct OrbTuning {
    /// Bounding box edge length in world units.
    pub size: f64,

    /// XP granted on pickup.
    pub value: i32,

    /// Lifetime in milliseconds before an uncollected orb despawns.
    pub ttl_ms: u64,
}

impl Default for OrbTuning {
    fn default() -> Self {
        Self {
            size: 10.0,
            value: 5,
            ttl_ms: 30_000,
        }
    }
}
