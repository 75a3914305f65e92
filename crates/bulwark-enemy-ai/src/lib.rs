//! Enemy AI for BULWARK.
//!
//! [`AiAgent`] is the per-enemy state machine: navigation, ragdoll recovery,
//! stagger, cannonball recovery when knocked off the walkable surface, and
//! the two-stage death. [`Enemy`] pairs an agent with a melee or ranged
//! attack and routes the agent's events to it.
//!
//! Everything is driven from a single fixed-rate tick. Physics, navigation
//! and the defended core are reached through the traits in
//! `bulwark_core::collaborators`.

pub mod agent;
pub mod enemy;
pub mod melee;
pub mod ranged;
pub mod sniper;
pub mod task;

pub use agent::{AgentRig, AiAgent};
pub use enemy::{AttackBehavior, AttackEffect, Enemy, EnemyTick};
pub use melee::MeleeAttacker;
pub use ranged::{HitTarget, PathIndicator, Projectile, RangedAttacker, Shot};
pub use sniper::{SharedSniperHistory, SniperHistory};

#[cfg(test)]
mod tests;
