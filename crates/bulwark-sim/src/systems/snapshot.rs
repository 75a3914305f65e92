//! Snapshot system: reads the world and enemy table into a `SimSnapshot`.
//!
//! Read-only; never modifies the world.

use std::collections::BTreeMap;

use hecs::World;

use bulwark_core::collaborators::RigidBody;
use bulwark_core::state::{EnemyView, ProjectileView, SimSnapshot, SimStats};
use bulwark_core::types::SimTime;
use bulwark_enemy_ai::{PathIndicator, Projectile};

use crate::defended::Core;
use crate::engine::SimEnemy;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    core: &Core,
    enemies: &BTreeMap<u32, SimEnemy>,
    stats: &SimStats,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        core: core.view(),
        enemies: enemies
            .iter()
            .map(|(&id, enemy)| EnemyView {
                id,
                kind: enemy.attack.kind(),
                state: enemy.agent.state(),
                health: enemy.agent.health(),
                position: enemy.agent.body().position(),
            })
            .collect(),
        projectiles: world
            .query::<&Projectile>()
            .iter()
            .map(|(_, p)| ProjectileView {
                position: p.position,
                velocity: p.velocity,
            })
            .collect(),
        indicators: world.query::<&PathIndicator>().iter().count(),
        stats: *stats,
    }
}
