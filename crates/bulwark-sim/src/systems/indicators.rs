//! Fades shot indicators and retires them once invisible.

use hecs::{Entity, World};

use bulwark_enemy_ai::PathIndicator;

pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for (entity, indicator) in world.query_mut::<&mut PathIndicator>() {
        if indicator.tick().is_none() {
            despawn_buffer.push(entity);
        }
    }
}
