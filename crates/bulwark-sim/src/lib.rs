//! Headless simulation for BULWARK.
//!
//! Drives enemy agents against a defended core at a fixed tick rate, with a
//! point-mass body and straight-line navigation standing in for a physics
//! engine and navmesh. Produces a serializable `SimSnapshot` each tick.

pub mod body;
pub mod config;
pub mod defended;
pub mod engine;
pub mod nav;
pub mod systems;

pub use bulwark_core as core;
pub use config::SimConfig;
pub use engine::SimulationEngine;
