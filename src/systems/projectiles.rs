use crate::tuning::ProjectileTuning;
use crate::world::GameWorld;

/// Straight-line projectile advance, then despawn of anything that left the
/// world by more than the bounds margin. Age-based expiry happens later in
/// the cleanup step.
pub fn integrate(world: &mut GameWorld) {
    for projectile in world.projectiles.values_mut() {
        projectile.x += projectile.vx;
        projectile.y += projectile.vy;
    }

    let margin = ProjectileTuning::default().bounds_margin;
    let (width, height) = (world.config.width, world.config.height);
    world.projectiles.retain(|_, p| {
        p.x >= -margin && p.x <= width + margin && p.y >= -margin && p.y <= height + margin
    });
}
