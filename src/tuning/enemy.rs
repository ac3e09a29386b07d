/// Gameplay tuning for chasing enemies.

#[derive(Debug, Clone, Copy)]
pub struct EnemyTuning {
    /// Bounding box edge length in world units.
    pub size: f64,

    pub max_health: i32,

    /// Distance moved toward the nearest living player per tick.
    pub speed: f64,

    /// Damage dealt to a player per tick of contact.
    pub contact_damage: i32,

    /// Distance from the anchor player at which enemies spawn (outside view).
    pub spawn_ring_distance: f64,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 25.0,
            max_health: 60,
            speed: 1.5,
            contact_damage: 20,
            spawn_ring_distance: 400.0,
        }
    }
}
