//! Projectile system: ballistic flight and impact against the core or ground.

use glam::Vec3;
use hecs::{Entity, World};

use bulwark_core::collaborators::DefendedCore;
use bulwark_core::constants::{DT, GRAVITY};
use bulwark_core::state::SimStats;
use bulwark_enemy_ai::{HitTarget, Projectile};

use crate::defended::Core;

/// Whether the segment `p0..p1` passes within `radius` of `center`.
pub fn segment_sphere_hit(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> bool {
    let d = p1 - p0;
    let m = p0 - center;
    let a = d.dot(d);
    if a <= 1e-6 {
        return m.length() <= radius;
    }
    let t = (-(m.dot(d)) / a).clamp(0.0, 1.0);
    (p0 + d * t - center).length() <= radius
}

/// Move every projectile one tick and resolve impacts. Spent projectiles are
/// queued in `despawn_buffer`.
pub fn run(
    world: &mut World,
    core: &mut Core,
    stats: &mut SimStats,
    despawn_buffer: &mut Vec<Entity>,
) {
    let center = core.position();
    let radius = core.radius();

    for (entity, projectile) in world.query_mut::<&mut Projectile>() {
        let p0 = projectile.position;
        projectile.velocity.y -= GRAVITY * DT;
        let p1 = p0 + projectile.velocity * DT;
        projectile.position = p1;

        let target = if segment_sphere_hit(p0, p1, center, radius) {
            HitTarget::Core
        } else if p1.y <= 0.0 {
            HitTarget::Other
        } else {
            continue;
        };
        if projectile.resolve_hit(target, core) {
            stats.core_hits += 1;
        }
        despawn_buffer.push(entity);
    }
}
