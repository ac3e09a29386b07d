use crate::tuning::{OrbTuning, ProjectileTuning};
use crate::world::GameWorld;

/// Age-based expiry, independent of position: uncollected orbs and
/// long-lived projectiles are dropped once past their TTL.
pub fn expire(world: &mut GameWorld, now_ms: u64) {
    let orb_ttl = OrbTuning::default().ttl_ms;
    world
        .xp_orbs
        .retain(|_, orb| now_ms.saturating_sub(orb.created_at) <= orb_ttl);

    let projectile_ttl = ProjectileTuning::default().ttl_ms;
    world
        .projectiles
        .retain(|_, p| now_ms.saturating_sub(p.created_at) <= projectile_ttl);
}
