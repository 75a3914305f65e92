//! Cleanup system: removes spent entities and stray projectiles.

use glam::Vec3;
use hecs::{Entity, World};

use bulwark_core::constants::PROJECTILE_MAX_RANGE;
use bulwark_enemy_ai::Projectile;

/// Remove everything queued by earlier systems, plus projectiles that left
/// the play area.
pub fn run(world: &mut World, origin: Vec3, despawn_buffer: &mut Vec<Entity>) {
    let range_sq = PROJECTILE_MAX_RANGE * PROJECTILE_MAX_RANGE;
    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.position.distance_squared(origin) > range_sq {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
