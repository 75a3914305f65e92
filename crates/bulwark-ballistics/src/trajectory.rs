//! Trajectory solver.
//!
//! Picks a launch angle from the elevation between origin and target,
//! shaped to keep arcs low, then solves the projectile-range equation for the
//! launch speed. Works on the XZ plane with gravity along -Y.

use glam::Vec3;
use rand::{Rng, RngCore};

use bulwark_core::config::ArcShaping;

/// A launch velocity that lands on the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    /// Launch angle above the horizontal (degrees), after shaping and clamping.
    pub launch_angle_deg: f32,
    /// Launch velocity (m/s).
    pub velocity: Vec3,
    /// Time until the body reaches the target's horizontal position (seconds).
    pub flight_time_secs: f32,
}

/// Why no usable launch velocity came out of the solver. Never fatal:
/// callers fall back to a randomized nudge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoSolution {
    /// Origin and target share a horizontal position.
    Coincident,
    /// The launch angle cannot reach the target (no real root).
    Unreachable { launch_angle_deg: f32 },
    /// A solution exists but is too slow to move the body.
    Negligible {
        launch_angle_deg: f32,
        velocity: Vec3,
    },
}

/// Solve for a launch velocity from `origin` to `target` under `gravity` (m/s², positive).
///
/// Speeds below `min_speed` are reported as [`NoSolution::Negligible`].
pub fn solve(
    origin: Vec3,
    target: Vec3,
    gravity: f32,
    arc: &ArcShaping,
    min_speed: f32,
) -> Result<Trajectory, NoSolution> {
    let to_target = target - origin;
    let planar = Vec3::new(to_target.x, 0.0, to_target.z);
    let distance = planar.length();

    // Also rejects NaN input.
    if !(distance > f32::EPSILON) {
        return Err(NoSolution::Coincident);
    }

    let y_offset = origin.y - target.y;
    let elevation_deg = (-y_offset / distance).atan().to_degrees();
    let launch_angle_deg = arc.launch_angle_deg(elevation_deg);
    let theta = launch_angle_deg.to_radians();

    let v0 = (1.0 / theta.cos())
        * ((0.5 * gravity * distance * distance) / (distance * theta.tan() + y_offset)).sqrt();

    let forward = planar / distance;
    let velocity = forward * (v0 * theta.cos()) + Vec3::Y * (v0 * theta.sin());

    // Intermediate NaNs can cancel, so only the final vector is checked.
    if !velocity.is_finite() {
        return Err(NoSolution::Unreachable { launch_angle_deg });
    }
    if velocity.length() < min_speed {
        return Err(NoSolution::Negligible {
            launch_angle_deg,
            velocity,
        });
    }

    let horizontal_speed = v0 * theta.cos();
    Ok(Trajectory {
        launch_angle_deg,
        velocity,
        flight_time_secs: distance / horizontal_speed,
    })
}

/// Impulse that sets the body moving at `velocity` plus `keep_fraction` of its
/// current velocity. A fraction of 0 replaces the current motion outright.
pub fn launch_impulse(velocity: Vec3, current: Vec3, mass: f32, keep_fraction: f32) -> Vec3 {
    velocity * mass - current * mass * (1.0 - keep_fraction)
}

/// A small horizontal impulse in a random direction.
pub fn random_nudge(rng: &mut dyn RngCore, speed: f32, mass: f32) -> Vec3 {
    let heading = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(heading.sin(), 0.0, heading.cos()) * speed * mass
}

/// Position along a drag-free arc after `t` seconds.
pub fn position_at(origin: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    origin + velocity * t - Vec3::Y * (0.5 * gravity * t * t)
}

/// `count` evenly spaced points along the arc from launch to `flight_time` (inclusive).
pub fn sample_arc(
    origin: Vec3,
    velocity: Vec3,
    gravity: f32,
    flight_time: f32,
    count: usize,
) -> Vec<Vec3> {
    if count < 2 {
        return vec![origin];
    }
    (0..count)
        .map(|i| {
            let t = flight_time * i as f32 / (count - 1) as f32;
            position_at(origin, velocity, gravity, t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::constants::{GRAVITY, LAUNCH_MIN_SPEED};

    fn arc() -> ArcShaping {
        ArcShaping::default()
    }

    /// Height above the target when the body passes the target's horizontal
    /// distance.
    fn height_at_target(origin: Vec3, target: Vec3, traj: &Trajectory) -> f32 {
        position_at(origin, traj.velocity, GRAVITY, traj.flight_time_secs).y - target.y
    }

    #[test]
    fn test_flat_shot_lands_on_target() {
        let origin = Vec3::new(0.0, 0.0, 0.0);
        let target = Vec3::new(10.0, 0.0, 0.0);
        let traj = solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED).unwrap();

        assert!((traj.launch_angle_deg - 50.0).abs() < 1e-3);
        assert!(traj.velocity.x > 0.0 && traj.velocity.y > 0.0);
        assert!(traj.velocity.z.abs() < 1e-4);
        let miss = height_at_target(origin, target, &traj);
        assert!(miss.abs() < 1e-3, "arc should land on target, off by {miss}");
    }

    #[test]
    fn test_shot_uphill_and_downhill() {
        let origin = Vec3::new(1.0, 2.0, -3.0);
        for target in [
            Vec3::new(8.0, 6.0, 4.0),
            Vec3::new(-6.0, -5.0, 10.0),
            Vec3::new(20.0, 0.0, -1.0),
        ] {
            let traj = solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED).unwrap();
            let land = position_at(origin, traj.velocity, GRAVITY, traj.flight_time_secs);
            assert!(
                land.distance(target) < 1e-2,
                "arc to {target:?} landed at {land:?}"
            );
        }
    }

    #[test]
    fn test_bearing_follows_target() {
        let origin = Vec3::ZERO;
        let target = Vec3::new(-4.0, 0.0, -4.0);
        let traj = solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED).unwrap();
        let planar = Vec3::new(traj.velocity.x, 0.0, traj.velocity.z).normalize();
        let expected = Vec3::new(-1.0, 0.0, -1.0).normalize();
        assert!((planar - expected).length() < 1e-4);
    }

    #[test]
    fn test_angle_always_within_clamp() {
        let origin = Vec3::ZERO;
        for i in 0..40 {
            for j in 0..40 {
                let dx = 0.01 + i as f32 * 1.5;
                let dy = -30.0 + j as f32 * 1.5;
                let target = Vec3::new(dx, dy, 0.3 * dx);
                let angle = match solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED) {
                    Ok(t) => t.launch_angle_deg,
                    Err(NoSolution::Unreachable { launch_angle_deg })
                    | Err(NoSolution::Negligible {
                        launch_angle_deg, ..
                    }) => launch_angle_deg,
                    Err(NoSolution::Coincident) => panic!("distance > 0 is never coincident"),
                };
                assert!(
                    (0.01..=89.9).contains(&angle),
                    "angle {angle} out of range for {target:?}"
                );
            }
        }
    }

    #[test]
    fn test_same_position_is_no_solution() {
        let p = Vec3::new(3.0, 1.0, 2.0);
        assert_eq!(
            solve(p, p, GRAVITY, &arc(), LAUNCH_MIN_SPEED),
            Err(NoSolution::Coincident)
        );
        // Directly above also has no planar distance.
        assert_eq!(
            solve(p, p + Vec3::Y * 5.0, GRAVITY, &arc(), LAUNCH_MIN_SPEED),
            Err(NoSolution::Coincident)
        );
    }

    #[test]
    fn test_nearly_vertical_target_is_unreachable() {
        // Elevation ~89.99 deg shapes to the 89.9 clamp, which is below the target line.
        let origin = Vec3::ZERO;
        let target = Vec3::new(0.001, 10.0, 0.0);
        match solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED) {
            Err(NoSolution::Unreachable { launch_angle_deg }) => {
                assert_eq!(launch_angle_deg, 89.9);
            }
            other => panic!("expected unreachable, got {other:?}"),
        }
    }

    #[test]
    fn test_tiny_offset_is_negligible() {
        let origin = Vec3::ZERO;
        let target = Vec3::new(1e-6, -2.0, 0.0);
        assert!(matches!(
            solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED),
            Err(NoSolution::Negligible { .. })
        ));
    }

    #[test]
    fn test_launch_impulse_keep_fraction() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let current = Vec3::new(0.0, -2.0, 1.0);
        // Full replacement: resulting velocity is exactly `v`.
        let j = launch_impulse(v, current, 2.0, 0.0);
        assert_eq!(current + j / 2.0, v);
        // Keep everything: the solved velocity is added on top.
        assert_eq!(launch_impulse(v, current, 2.0, 1.0), Vec3::new(6.0, 8.0, 0.0));
    }

    #[test]
    fn test_sample_arc_endpoints() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let target = Vec3::new(6.0, 1.0, 2.0);
        let traj = solve(origin, target, GRAVITY, &arc(), LAUNCH_MIN_SPEED).unwrap();
        let points = sample_arc(origin, traj.velocity, GRAVITY, traj.flight_time_secs, 8);
        assert_eq!(points.len(), 8);
        assert_eq!(points[0], origin);
        assert!(points[7].distance(target) < 1e-2);
        assert!(points[3].y > origin.y, "arc rises above the endpoints");
    }
}
