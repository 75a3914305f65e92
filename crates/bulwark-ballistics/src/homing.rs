//! Homing launcher.
//!
//! Repeatedly throws a rigid body at a target point with solved arcs until
//! it lands within an acceptable distance, the deadline passes, or the
//! launch is cancelled. Used to cannonball lost agents back onto the mesh.

use glam::Vec3;
use rand::RngCore;
use tracing::{debug, warn};

use bulwark_core::collaborators::RigidBody;
use bulwark_core::config::LauncherConfig;

use crate::trajectory::{launch_impulse, random_nudge, solve, NoSolution};

/// Per-launch bookkeeping, reset on every [`HomingLauncher::fire_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingLauncherState {
    pub target: Vec3,
    pub acceptable_distance: f32,
    /// Simulation time (seconds) after which arrival is forced.
    pub timeout_deadline: f64,
    /// Consecutive solves that produced a negligible velocity.
    pub low_velocity_fire_count: u32,
    pub last_target_distance: f32,
    pub is_closing_in: bool,
}

/// Outcome of one launcher tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    /// No launch in progress.
    Idle,
    /// Still travelling.
    InFlight,
    /// The launch finished and the launcher is idle again. `forced` means the
    /// deadline passed before the body got within the acceptable distance.
    Arrived { forced: bool },
}

/// Where the most recent impulse came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseSource {
    Solved,
    Nudge,
}

/// Re-targetable homing launcher. Always present on its owner, idle when unused.
#[derive(Debug, Clone)]
pub struct HomingLauncher {
    config: LauncherConfig,
    gravity: f32,
    state: Option<HomingLauncherState>,
    last_impulse: Option<ImpulseSource>,
    shots: u32,
}

impl HomingLauncher {
    pub fn new(config: LauncherConfig, gravity: f32) -> Self {
        Self {
            config,
            gravity,
            state: None,
            last_impulse: None,
            shots: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&HomingLauncherState> {
        self.state.as_ref()
    }

    pub fn last_impulse(&self) -> Option<ImpulseSource> {
        self.last_impulse
    }

    /// Impulses applied since the current launch started.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Start homing toward `target`. The first impulse is applied on the next tick.
    ///
    /// Returns true if an active launch was abandoned in favour of this one.
    pub fn fire_to(&mut self, target: Vec3, acceptable_distance: f32, now: f64) -> bool {
        if acceptable_distance == 0.0 {
            warn!(
                ?target,
                "homing launch with zero acceptable distance may never converge"
            );
        }
        let abandoned = self.state.is_some();
        if abandoned {
            debug!(?target, "homing launch retargeted");
        }
        self.state = Some(HomingLauncherState {
            target,
            acceptable_distance: acceptable_distance.max(0.0),
            timeout_deadline: now + self.config.timeout_secs as f64,
            low_velocity_fire_count: 0,
            last_target_distance: f32::INFINITY,
            is_closing_in: false,
        });
        self.last_impulse = None;
        self.shots = 0;
        abandoned
    }

    /// Stop homing. Returns whether a launch was active; cancelling twice is a no-op.
    pub fn cancel(&mut self) -> bool {
        self.state.take().is_some()
    }

    /// Advance one tick: check arrival and timeout, and re-fire when the body
    /// has stopped making progress.
    pub fn tick<B: RigidBody + ?Sized>(
        &mut self,
        body: &mut B,
        now: f64,
        rng: &mut dyn RngCore,
    ) -> LaunchStatus {
        let Some(state) = self.state.as_mut() else {
            return LaunchStatus::Idle;
        };

        let velocity = body.velocity();
        let distance = body.position().distance(state.target);

        // A body rolling along the ground is not approaching anything.
        state.is_closing_in = distance < state.last_target_distance
            && velocity.y.abs() > self.config.closing_vertical_speed;
        state.last_target_distance = distance;

        if distance <= state.acceptable_distance {
            self.state = None;
            return LaunchStatus::Arrived { forced: false };
        }

        if now >= state.timeout_deadline {
            warn!(
                target = ?state.target,
                distance,
                shots = self.shots,
                "homing launch timed out, forcing arrival"
            );
            self.state = None;
            return LaunchStatus::Arrived { forced: true };
        }

        if !state.is_closing_in && velocity.y <= 0.0 {
            self.fire(body, rng);
        }
        LaunchStatus::InFlight
    }

    fn fire<B: RigidBody + ?Sized>(&mut self, body: &mut B, rng: &mut dyn RngCore) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let cfg = &self.config;
        let mass = body.mass();
        let current = body.velocity();

        let source = match solve(
            body.position(),
            state.target,
            self.gravity,
            &cfg.arc,
            cfg.min_launch_speed,
        ) {
            Ok(trajectory) => {
                state.low_velocity_fire_count = 0;
                body.apply_impulse(launch_impulse(
                    trajectory.velocity,
                    current,
                    mass,
                    cfg.keep_fraction,
                ));
                ImpulseSource::Solved
            }
            Err(NoSolution::Negligible { velocity, .. }) => {
                state.low_velocity_fire_count += 1;
                if state.low_velocity_fire_count > cfg.low_velocity_limit {
                    debug!(
                        count = state.low_velocity_fire_count,
                        "negligible launch velocity, nudging instead"
                    );
                    state.low_velocity_fire_count -= 1;
                    body.apply_impulse(random_nudge(rng, cfg.nudge_speed, mass));
                    ImpulseSource::Nudge
                } else {
                    body.apply_impulse(launch_impulse(velocity, current, mass, cfg.keep_fraction));
                    ImpulseSource::Solved
                }
            }
            Err(reason) => {
                debug!(?reason, target = ?state.target, "no launch solution, nudging");
                body.apply_impulse(random_nudge(rng, cfg.nudge_speed, mass));
                ImpulseSource::Nudge
            }
        };
        self.last_impulse = Some(source);
        self.shots += 1;
    }
}
