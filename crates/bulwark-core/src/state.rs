//! Simulation snapshot: the observable state after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{AiState, AttackKind};
use crate::types::SimTime;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub core: CoreView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    /// Shot indicators still fading.
    pub indicators: usize,
    pub stats: SimStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreView {
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: AttackKind,
    pub state: AiState,
    pub health: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Running totals since the simulation started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub enemies_spawned: u32,
    /// Enemies that finished dying.
    pub kills: u32,
    /// Melee attackers spent on a hit.
    pub melee_hits: u32,
    pub projectiles_fired: u32,
    /// Projectiles that struck the core.
    pub core_hits: u32,
}
