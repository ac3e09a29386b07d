use crate::entities::Player;
use crate::tuning::PlayerTuning;
use crate::world::WorldConfig;

/// Applies one movement command: normalize the intent vector, step by the
/// player speed, clamp into the world. A zero-length vector is a no-op (the
/// guard also keeps the normalization division safe).
pub fn apply(player: &mut Player, x: f64, y: f64, config: &WorldConfig) {
    let length = (x * x + y * y).sqrt();
    if length <= 0.0 {
        return;
    }

    let speed = PlayerTuning::default().speed;
    player.x += x / length * speed;
    player.y += y / length * speed;

    player.x = player.x.clamp(0.0, config.width - player.width);
    player.y = player.y.clamp(0.0, config.height - player.height);
}
