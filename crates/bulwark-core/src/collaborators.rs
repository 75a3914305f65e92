//! Interfaces to the world outside the AI: physics, navigation, collision
//! bounds and the defended core. The embedding engine supplies these.

use glam::{Quat, Vec3};
use rand::{Rng, RngCore};

use crate::error::AgentError;

/// Handle to an externally simulated rigid body.
pub trait RigidBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
    fn mass(&self) -> f32;
    /// Instantaneous change in momentum (kg·m/s).
    fn apply_impulse(&mut self, impulse: Vec3);
    /// Kinematic bodies ignore forces and are moved by assignment only.
    fn set_kinematic(&mut self, kinematic: bool);
    fn set_gravity(&mut self, enabled: bool);
    fn set_collider_enabled(&mut self, enabled: bool);
}

/// Handle to an externally driven path-following agent.
pub trait NavAgent {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    /// Static-obstacle mode: the agent stops moving and carves the surface instead.
    fn set_obstacle_mode(&mut self, enabled: bool);
    /// Teleport the agent without pathing.
    fn warp(&mut self, position: Vec3);
    fn destination(&self) -> Vec3;
    fn set_destination(&mut self, destination: Vec3);
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    /// Where the agent's simulated position is this tick.
    fn next_position(&self) -> Vec3;
    /// Nearest point on the navigable surface within `max_distance` of `near`.
    fn sample_position(&self, near: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Axis-aligned size of the agent's collision volume.
pub trait ColliderBounds {
    /// Full size of the bounding box (meters). Zero when the collider is disabled.
    fn size(&self) -> Vec3;

    fn height(&self) -> f32 {
        self.size().y
    }

    fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    fn max_extent(&self) -> f32 {
        self.max_dimension() * 0.5
    }

    /// Bounding height, failing loudly when the collider reports nothing.
    fn checked_height(&self, purpose: &'static str) -> Result<f32, AgentError> {
        checked(self.size(), self.height(), purpose)
    }

    /// Largest bounding dimension, failing loudly when the collider reports nothing.
    fn checked_max_dimension(&self, purpose: &'static str) -> Result<f32, AgentError> {
        checked(self.size(), self.max_dimension(), purpose)
    }
}

fn checked(size: Vec3, value: f32, purpose: &'static str) -> Result<f32, AgentError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AgentError::DegenerateBounds {
            size: size.to_array(),
            purpose,
        })
    }
}

/// The structure enemies are attacking.
pub trait DefendedCore {
    fn position(&self) -> Vec3;
    fn take_damage(&mut self, amount: f32);
    fn attack_slots(&self) -> &[Vec3];
    fn ranged_attack_slots(&self) -> &[Vec3];

    /// A melee slot chosen uniformly, or the core position if there are none.
    fn random_attack_slot(&self, rng: &mut dyn RngCore) -> Vec3 {
        pick(self.attack_slots(), rng).unwrap_or_else(|| self.position())
    }

    /// A sniper slot chosen uniformly, or the core position if there are none.
    fn random_ranged_attack_slot(&self, rng: &mut dyn RngCore) -> Vec3 {
        pick(self.ranged_attack_slots(), rng).unwrap_or_else(|| self.position())
    }
}

fn pick(slots: &[Vec3], rng: &mut dyn RngCore) -> Option<Vec3> {
    if slots.is_empty() {
        None
    } else {
        Some(slots[rng.gen_range(0..slots.len())])
    }
}
