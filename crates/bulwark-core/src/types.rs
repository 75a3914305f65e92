//! Fundamental simulation types.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f32 {
        crate::constants::DT
    }

    /// Monotonic seconds since start.
    pub fn now(&self) -> f64 {
        self.elapsed_secs
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt() as f64;
    }
}

/// Strip pitch and roll from a rotation, keeping only the yaw about +Y.
pub fn upright(rotation: Quat) -> Quat {
    let forward = rotation * Vec3::Z;
    let flat = Vec3::new(forward.x, 0.0, forward.z);
    if flat.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    let yaw = flat.x.atan2(flat.z);
    Quat::from_rotation_y(yaw)
}

/// Yaw-only rotation that faces from `from` toward `to` on the horizontal plane.
pub fn facing(from: Vec3, to: Vec3) -> Option<Quat> {
    let d = to - from;
    let flat = Vec3::new(d.x, 0.0, d.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}

/// Position equality with the tolerance engines use for vector `==`.
pub fn approx_eq(a: Vec3, b: Vec3) -> bool {
    a.distance_squared(b) < 1e-10
}
