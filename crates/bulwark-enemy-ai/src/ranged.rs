//! Ranged attacker.
//!
//! Walks to a sniper slot, turns to face the core, lobs a projectile along a
//! solved arc, waits a random interval and repeats. The aim and cooldown are
//! per-tick tasks; leaving Navigating drops them, so a shot that has not been
//! released by then never is.

use glam::Vec3;
use rand::{Rng, RngCore};
use tracing::debug;

use bulwark_ballistics::trajectory::{random_nudge, sample_arc, solve};
use bulwark_core::collaborators::{DefendedCore, NavAgent, RigidBody};
use bulwark_core::config::RangedConfig;
use bulwark_core::constants::{GRAVITY, LAUNCH_MIN_SPEED, LAUNCH_NUDGE_SPEED};
use bulwark_core::types::facing;

use crate::sniper::SharedSniperHistory;
use crate::task::{Delay, Reorient, TaskSlot};

/// A projectile in flight. Moved by the embedding simulation under gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
}

/// What a projectile ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Core,
    Other,
}

impl Projectile {
    /// Apply the hit. Only the core takes damage; anything else just absorbs
    /// the projectile. Returns whether the core was damaged.
    pub fn resolve_hit(&self, target: HitTarget, core: &mut dyn DefendedCore) -> bool {
        match target {
            HitTarget::Core => {
                core.take_damage(self.damage);
                true
            }
            HitTarget::Other => false,
        }
    }
}

/// Visual trace of a shot's arc. Fades in, then out.
#[derive(Debug, Clone, PartialEq)]
pub struct PathIndicator {
    pub points: Vec<Vec3>,
    fade_ticks: u32,
    elapsed: u32,
}

impl PathIndicator {
    pub fn new(points: Vec<Vec3>, fade_ticks: u32) -> Self {
        Self {
            points,
            fade_ticks: fade_ticks.max(1),
            elapsed: 0,
        }
    }

    /// Advance the fade one tick. Returns the opacity for this tick, or `None`
    /// once the indicator has fully faded out.
    pub fn tick(&mut self) -> Option<f32> {
        let total = self.fade_ticks * 2;
        if self.elapsed >= total {
            return None;
        }
        self.elapsed += 1;
        let fade = self.fade_ticks as f32;
        let alpha = if self.elapsed <= self.fade_ticks {
            self.elapsed as f32 / fade
        } else {
            (total - self.elapsed) as f32 / fade
        };
        Some(alpha)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.fade_ticks * 2
    }
}

/// A released shot: the projectile plus the arc it is expected to follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    pub projectile: Projectile,
    pub indicator: PathIndicator,
}

#[derive(Debug, Clone)]
pub struct RangedAttacker {
    config: RangedConfig,
    history: SharedSniperHistory,
    post: Option<Vec3>,
    aim: TaskSlot<Reorient>,
    cooldown: TaskSlot<Delay>,
    shots_fired: u32,
}

impl RangedAttacker {
    /// `history` decides the sharing scope: clone one handle into every
    /// attacker to share it, or give each its own.
    pub fn new(config: RangedConfig, history: SharedSniperHistory) -> Self {
        Self {
            config,
            history,
            post: None,
            aim: TaskSlot::new(),
            cooldown: TaskSlot::new(),
            shots_fired: 0,
        }
    }

    pub fn post(&self) -> Option<Vec3> {
        self.post
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn history(&self) -> &SharedSniperHistory {
        &self.history
    }

    pub fn is_aiming(&self) -> bool {
        self.aim.is_active()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_active()
    }

    /// Choose a sniper slot not picked recently and path to it.
    pub fn seek_post(
        &mut self,
        nav: &mut dyn NavAgent,
        core: &dyn DefendedCore,
        rng: &mut dyn RngCore,
    ) {
        let post = self
            .history
            .choose(core.ranged_attack_slots(), rng)
            .unwrap_or_else(|| core.position());
        nav.set_destination(post);
        self.post = Some(post);
        debug!(?post, "ranged attacker heading to sniper slot");
    }

    /// Start turning toward the core.
    pub fn on_arrive(&mut self, body: &dyn RigidBody, core: &dyn DefendedCore) {
        if self.post.is_none() {
            return;
        }
        self.cooldown.cancel();
        self.begin_aim(body, core);
    }

    /// Drop any aim or cooldown in progress.
    pub fn cancel(&mut self) -> bool {
        let aiming = self.aim.cancel();
        let cooling = self.cooldown.cancel();
        aiming || cooling
    }

    /// Advance the aim/fire/cooldown loop. `navigating` is whether the agent
    /// is still under scripted navigation; anything else cancels the loop.
    pub fn tick(
        &mut self,
        navigating: bool,
        body: &mut dyn RigidBody,
        core: &dyn DefendedCore,
        rng: &mut dyn RngCore,
    ) -> Option<Shot> {
        if !navigating {
            if self.cancel() {
                debug!("ranged attack sequence interrupted");
            }
            return None;
        }

        if let Some(step) = self.cooldown.step() {
            if step.is_done() {
                self.begin_aim(body, core);
            }
            return None;
        }

        let step = self.aim.step()?;
        let done = step.is_done();
        body.set_rotation(step.value());
        if !done {
            return None;
        }

        let shot = self.fire(body.position(), core.position(), rng);
        let [min, max] = self.config.shoot_interval_secs;
        let wait = if max > min { rng.gen_range(min..=max) } else { min };
        self.cooldown.start(Delay::secs(wait));
        Some(shot)
    }

    fn begin_aim(&mut self, body: &dyn RigidBody, core: &dyn DefendedCore) {
        let from = body.rotation();
        let to = facing(body.position(), core.position()).unwrap_or(from);
        self.aim.start(Reorient::new(from, to, self.config.aim_ticks));
    }

    fn fire(&mut self, origin: Vec3, target: Vec3, rng: &mut dyn RngCore) -> Shot {
        let (velocity, flight_time) =
            match solve(origin, target, GRAVITY, &self.config.arc, LAUNCH_MIN_SPEED) {
                Ok(trajectory) => (trajectory.velocity, trajectory.flight_time_secs),
                Err(reason) => {
                    // Unit mass, so the nudge impulse is the launch velocity.
                    let speed = LAUNCH_NUDGE_SPEED.min(self.config.projectile_speed);
                    let velocity = random_nudge(rng, speed, 1.0);
                    debug!(?reason, ?velocity, "no arc to the core, nudging shot");
                    let drop_time = (2.0 * origin.y.max(0.0) / GRAVITY).sqrt();
                    (velocity, drop_time)
                }
            };
        self.shots_fired += 1;
        Shot {
            projectile: Projectile {
                position: origin,
                velocity,
                damage: self.config.damage,
            },
            indicator: PathIndicator::new(
                sample_arc(origin, velocity, GRAVITY, flight_time, self.config.indicator_points),
                self.config.indicator_fade_ticks,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unsolvable_shot_gets_random_horizontal_nudge() {
        let mut attacker =
            RangedAttacker::new(RangedConfig::default(), SharedSniperHistory::new(5));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let origin = Vec3::new(3.0, 1.0, 3.0);
        let overhead = Vec3::new(3.0, 5.0, 3.0);

        let first = attacker.fire(origin, overhead, &mut rng);
        let second = attacker.fire(origin, overhead, &mut rng);
        for shot in [&first, &second] {
            let v = shot.projectile.velocity;
            assert_eq!(v.y, 0.0, "fallback is horizontal");
            assert!((v.length() - LAUNCH_NUDGE_SPEED).abs() < 1e-4);
            assert_eq!(shot.indicator.points.len(), 16);
        }
        assert_ne!(first.projectile.velocity, second.projectile.velocity);
        assert_eq!(attacker.shots_fired(), 2);
    }
}
