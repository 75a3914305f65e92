//! Point-mass rigid body over a flat ground plane.

use glam::{Quat, Vec3};

use bulwark_core::collaborators::{ColliderBounds, RigidBody};
use bulwark_core::constants::{ANGULAR_DAMPING, GROUND_FRICTION};

/// Enemy body. Its position is the collider centre, which rests `rest_height`
/// above the ground while the collider is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct SimBody {
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    angular_velocity: Vec3,
    mass: f32,
    rest_height: f32,
    kinematic: bool,
    gravity: bool,
    collider: bool,
}

impl SimBody {
    pub fn new(position: Vec3, mass: f32, rest_height: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            rest_height,
            kinematic: true,
            gravity: true,
            collider: true,
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    pub fn collider_enabled(&self) -> bool {
        self.collider
    }

    pub fn is_grounded(&self) -> bool {
        self.collider && self.position.y <= self.rest_height + 1e-4
    }

    /// Semi-implicit Euler step. Kinematic bodies are left alone.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        if self.kinematic {
            return;
        }
        if self.gravity {
            self.velocity.y -= gravity * dt;
        }
        self.position += self.velocity * dt;

        let spin = self.angular_velocity * dt;
        if spin.length_squared() > 0.0 {
            self.rotation = (Quat::from_scaled_axis(spin) * self.rotation).normalize();
        }
        self.angular_velocity *= ANGULAR_DAMPING;

        // Without a collider the body falls through the floor.
        if self.collider && self.position.y <= self.rest_height {
            self.position.y = self.rest_height;
            self.velocity.y = self.velocity.y.max(0.0);
            self.velocity.x *= GROUND_FRICTION;
            self.velocity.z *= GROUND_FRICTION;
        }
    }
}

impl RigidBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if !self.kinematic {
            self.velocity += impulse / self.mass;
        }
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    fn set_gravity(&mut self, enabled: bool) {
        self.gravity = enabled;
    }

    fn set_collider_enabled(&mut self, enabled: bool) {
        self.collider = enabled;
    }
}

/// Fixed collider box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBounds {
    pub size: Vec3,
}

impl ColliderBounds for SimBounds {
    fn size(&self) -> Vec3 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::constants::{DT, GRAVITY};

    #[test]
    fn test_kinematic_body_ignores_gravity_and_impulses() {
        let mut body = SimBody::new(Vec3::new(0.0, 5.0, 0.0), 1.0, 1.0);
        assert!(body.is_kinematic());
        body.apply_impulse(Vec3::X);
        body.integrate(DT, GRAVITY);
        assert_eq!(body.position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(body.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_falls_and_rests_on_ground() {
        let mut body = SimBody::new(Vec3::new(0.0, 5.0, 0.0), 2.0, 1.0);
        body.set_kinematic(false);
        body.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(body.velocity(), Vec3::new(2.0, 0.0, 0.0));
        for _ in 0..600 {
            body.integrate(DT, GRAVITY);
        }
        assert!(body.is_grounded());
        assert_eq!(body.position().y, 1.0);
        assert!(body.velocity().length() < 1e-3, "friction stops the slide");
    }

    #[test]
    fn test_no_collider_sinks_through_ground() {
        let mut body = SimBody::new(Vec3::new(0.0, 1.0, 0.0), 1.0, 1.0);
        body.set_kinematic(false);
        body.set_collider_enabled(false);
        assert!(!body.collider_enabled());
        for _ in 0..10 {
            body.integrate(DT, GRAVITY);
        }
        assert!(body.position().y < 1.0);
    }
}
