//! Per-tick systems.
//!
//! Systems are plain functions over the world and the enemy table. They do
//! not own state; everything they touch is passed in by the engine.

pub mod cleanup;
pub mod enemy_ai;
pub mod indicators;
pub mod physics;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
