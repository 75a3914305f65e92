//! Core types and definitions for BULWARK.
//!
//! This crate defines the vocabulary shared across all other crates:
//! enums, time, constants, configuration, errors, events, the simulation snapshot and the traits
//! through which the enemy AI talks to the physics and navigation world.
//! It has no dependency on any engine or runtime framework.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

pub use glam;
