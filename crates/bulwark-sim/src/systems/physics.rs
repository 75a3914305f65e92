//! Body integration and navigation movement for every enemy.

use std::collections::BTreeMap;

use bulwark_core::constants::{DT, GRAVITY};

use crate::engine::SimEnemy;

/// Advance bodies under gravity and walk navigation agents one step.
/// Runs before the AI so agents see this tick's positions.
pub fn run(enemies: &mut BTreeMap<u32, SimEnemy>) {
    for enemy in enemies.values_mut() {
        enemy.agent.body_mut().integrate(DT, GRAVITY);
        enemy.agent.nav_mut().advance(DT);
    }
}
