//! Enemy agent state machine.
//!
//! An agent is either walked around by its navigation agent (Navigating,
//! PreNavigating, Staggered), thrown around by physics (Ragdolled, DyingFall),
//! or parked (Idle, Lost). Dying states are terminal: once entered, only the
//! agent itself advances them until it sinks out of the world.

use glam::Vec3;
use rand::RngCore;
use tracing::{debug, warn};

use bulwark_ballistics::{HomingLauncher, LaunchStatus};
use bulwark_core::collaborators::{ColliderBounds, NavAgent, RigidBody};
use bulwark_core::config::AgentConfig;
use bulwark_core::constants::{DT, GRAVITY};
use bulwark_core::enums::{AiState, DamageEffect, LostBehavior};
use bulwark_core::error::{AgentError, ConfigError};
use bulwark_core::events::{AgentEvent, AgentSignals};
use bulwark_core::types::{approx_eq, facing, upright, SimTime};

use crate::task::{Delay, Reorient, Sink, Step, TaskSlot, Tween};

/// The collaborators an agent drives: its body, its navigation agent and its
/// collision bounds.
#[derive(Debug)]
pub struct AgentRig<B, N, C> {
    pub body: B,
    pub nav: N,
    pub bounds: C,
}

/// One enemy.
#[derive(Debug)]
pub struct AiAgent<B, N, C> {
    id: u32,
    config: AgentConfig,
    state: AiState,
    health: f32,
    /// Simulation time of the most recent tick.
    now: f64,
    last_transition_time: f64,

    // Settle thresholds, reset on entering a physics state and grown every tick after.
    despawn_velocity_threshold: f32,
    despawn_angular_velocity_threshold: f32,

    pre_stagger_destination: Option<Vec3>,
    stagger_destination: Option<Vec3>,
    /// Last point sampled on the navigable surface after a ragdoll.
    mesh_point: Option<Vec3>,
    last_arrived_position: Option<Vec3>,
    last_nav_position: Vec3,
    /// Frame-to-frame nav movement, only used to pick a stagger direction.
    nav_velocity: Vec3,

    rig: AgentRig<B, N, C>,
    launcher: HomingLauncher,
    reorient: TaskSlot<Reorient>,
    tween: TaskSlot<Tween>,
    sink: TaskSlot<Sink>,
    launch_delay: TaskSlot<Delay>,

    signals: AgentSignals,
    pending: Vec<AgentEvent>,
    destroyed: bool,
}

impl<B, N, C> AiAgent<B, N, C>
where
    B: RigidBody,
    N: NavAgent,
    C: ColliderBounds,
{
    /// Create an agent in `initial` state (Navigating or Ragdolled only).
    pub fn spawn(
        id: u32,
        config: AgentConfig,
        rig: AgentRig<B, N, C>,
        initial: AiState,
        time: &SimTime,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        if !initial.is_valid_initial() {
            return Err(ConfigError::InvalidInitialState(initial).into());
        }

        let last_nav_position = rig.body.position();
        let mut agent = Self {
            id,
            config,
            state: initial,
            health: config.max_health,
            now: time.now(),
            last_transition_time: time.now(),
            despawn_velocity_threshold: config.despawn_velocity_threshold,
            despawn_angular_velocity_threshold: config.despawn_angular_velocity_threshold,
            pre_stagger_destination: None,
            stagger_destination: None,
            mesh_point: None,
            last_arrived_position: None,
            last_nav_position,
            nav_velocity: Vec3::ZERO,
            rig,
            launcher: HomingLauncher::new(config.launcher, GRAVITY),
            reorient: TaskSlot::new(),
            tween: TaskSlot::new(),
            sink: TaskSlot::new(),
            launch_delay: TaskSlot::new(),
            signals: AgentSignals::default(),
            pending: Vec::new(),
            destroyed: false,
        };
        agent.enter(initial, initial)?;
        debug!(agent = id, state = ?initial, "agent spawned");
        Ok(agent)
    }

    // --- Accessors ---

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.config.max_health
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn last_transition_time(&self) -> f64 {
        self.last_transition_time
    }

    pub fn despawn_thresholds(&self) -> (f32, f32) {
        (
            self.despawn_velocity_threshold,
            self.despawn_angular_velocity_threshold,
        )
    }

    pub fn pre_stagger_destination(&self) -> Option<Vec3> {
        self.pre_stagger_destination
    }

    pub fn stagger_destination(&self) -> Option<Vec3> {
        self.stagger_destination
    }

    pub fn mesh_point(&self) -> Option<Vec3> {
        self.mesh_point
    }

    pub fn launcher(&self) -> &HomingLauncher {
        &self.launcher
    }

    pub fn body(&self) -> &B {
        &self.rig.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.rig.body
    }

    pub fn nav(&self) -> &N {
        &self.rig.nav
    }

    pub fn nav_mut(&mut self) -> &mut N {
        &mut self.rig.nav
    }

    pub fn bounds(&self) -> &C {
        &self.rig.bounds
    }

    pub fn signals_mut(&mut self) -> &mut AgentSignals {
        &mut self.signals
    }

    /// Events fired since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<AgentEvent> {
        std::mem::take(&mut self.pending)
    }

    // --- External control ---

    /// Force a state. A no-op once dying, apart from cancelling any launch.
    pub fn set_state(&mut self, next: AiState) -> Result<(), AgentError> {
        self.launcher.cancel();
        if self.state.is_terminal() || self.destroyed {
            return Ok(());
        }
        self.transition(next)
    }

    /// Apply damage. Returns true if this hit killed the agent.
    pub fn take_damage(&mut self, amount: f32, effect: DamageEffect) -> Result<bool, AgentError> {
        let health = (self.health - amount).clamp(0.0, self.config.max_health);
        if self.destroyed || self.state.is_terminal() {
            self.health = health;
            return Ok(false);
        }
        self.health = health;

        if self.health <= 0.0 {
            self.set_state(AiState::DyingFall)?;
            self.fire(AgentEvent::Damage);
            return Ok(true);
        }

        match effect {
            DamageEffect::Ragdoll => self.set_state(AiState::Ragdolled)?,
            DamageEffect::Stagger => self.set_state(AiState::Staggered)?,
            DamageEffect::None => {}
        }
        self.fire(AgentEvent::Damage);
        Ok(false)
    }

    /// Advance one physics tick.
    pub fn tick(&mut self, time: &SimTime, rng: &mut dyn RngCore) -> Result<(), AgentError> {
        if self.destroyed {
            return Ok(());
        }
        self.now = time.now();

        if !self.state.is_terminal()
            && self.rig.body.velocity().y < -self.config.fall_death_speed
        {
            warn!(agent = self.id, "agent fell out of the world");
            self.health = 0.0;
            self.transition(AiState::DyingFall)?;
        }

        if self.state.is_nav_driven() {
            self.rig.body.set_velocity(Vec3::ZERO);
            self.rig.body.set_angular_velocity(Vec3::ZERO);
        } else if self.state.is_physics_driven() {
            self.grow_thresholds();
        }

        match self.state {
            AiState::Navigating => self.tick_navigating(),
            AiState::PreNavigating => self.tick_pre_navigating()?,
            AiState::Ragdolled => self.tick_ragdolled()?,
            AiState::Staggered => self.tick_staggered()?,
            AiState::Lost => self.tick_lost(rng)?,
            AiState::DyingFall => self.tick_dying_fall()?,
            AiState::DyingDecay => self.tick_dying_decay(),
            AiState::Idle => {}
        }
        Ok(())
    }

    // --- Transitions ---

    fn transition(&mut self, next: AiState) -> Result<(), AgentError> {
        let prev = self.state;
        self.exit(prev, next);
        debug!(agent = self.id, from = ?prev, to = ?next, "state transition");
        self.state = next;
        self.last_transition_time = self.now;
        if prev == AiState::Idle && next != AiState::Idle {
            self.fire(AgentEvent::IdleExit);
        }
        self.enter(next, prev)
    }

    fn exit(&mut self, prev: AiState, next: AiState) {
        self.launcher.cancel();
        self.reorient.cancel();
        self.tween.cancel();
        self.launch_delay.cancel();

        if prev == AiState::Staggered && next != AiState::Staggered {
            self.restore_pre_stagger_destination();
        }
    }

    fn enter(&mut self, state: AiState, prev: AiState) -> Result<(), AgentError> {
        match state {
            AiState::Navigating => {
                self.halt_body();
                self.rig.body.set_kinematic(true);
                self.rig.body.set_collider_enabled(true);
                self.resume_navigation();
                self.last_arrived_position = None;
                // Only good for the recovery that sampled it.
                self.mesh_point = None;
                self.last_nav_position = self.rig.nav.next_position();
                self.nav_velocity = Vec3::ZERO;
            }
            AiState::PreNavigating => {
                self.rig.nav.set_enabled(false);
                self.rig.body.set_kinematic(true);
                self.halt_body();

                let lift = self.rig.bounds.checked_height("pre-navigation lift")? * 0.5;
                let position = self.rig.body.position();
                let ground = self
                    .mesh_point
                    .or_else(|| {
                        self.rig
                            .nav
                            .sample_position(position, self.config.mesh_sample_radius)
                    })
                    .unwrap_or(position);
                let rotation = self.rig.body.rotation();
                let ticks = self.config.reorient_ticks;
                self.reorient
                    .start(Reorient::new(rotation, upright(rotation), ticks));
                self.tween
                    .start(Tween::new(position, ground + Vec3::Y * lift, ticks));
            }
            AiState::Ragdolled => {
                self.enable_physics();
            }
            AiState::Idle => {
                self.rig.nav.set_enabled(false);
                self.rig.nav.set_obstacle_mode(true);
                self.rig.body.set_kinematic(true);
                self.halt_body();
            }
            AiState::Staggered => {
                self.halt_body();
                self.rig.body.set_kinematic(true);
                self.rig.body.set_collider_enabled(true);
                let was_navigating = self.rig.nav.is_enabled();
                if !was_navigating {
                    self.resume_navigation();
                }

                let position = self.rig.body.position();
                let retreat = self.nav_velocity.normalize_or_zero();
                let back = position - retreat * self.config.stagger_distance;
                let destination = self
                    .rig
                    .nav
                    .sample_position(back, self.config.stagger_distance)
                    .unwrap_or(position);

                // Stacked staggers keep the destination from before the first one.
                if prev != AiState::Staggered || self.pre_stagger_destination.is_none() {
                    self.pre_stagger_destination = Some(self.rig.nav.destination());
                }
                self.rig.nav.set_destination(destination);
                self.stagger_destination = Some(destination);
            }
            AiState::Lost => self.enter_lost()?,
            AiState::DyingFall => {
                self.enable_physics();
                self.fire(AgentEvent::DyingFall);
            }
            AiState::DyingDecay => {
                let depth = self.rig.bounds.checked_max_dimension("sink depth")?;
                self.fire(AgentEvent::DyingDecay);
                self.rig.nav.set_enabled(false);
                self.rig.nav.set_obstacle_mode(false);
                self.rig.body.set_collider_enabled(false);
                let body = &mut self.rig.body;
                body.set_velocity(body.velocity() * 0.5);
                body.set_angular_velocity(body.angular_velocity() * 0.5);
                body.set_gravity(false);
                self.sink.start(Sink::new(depth, self.config.sink_step));
            }
        }
        Ok(())
    }

    fn enter_lost(&mut self) -> Result<(), AgentError> {
        match self.config.lost_behavior {
            LostBehavior::Idle => {
                self.rig.nav.set_enabled(false);
                self.rig.nav.set_obstacle_mode(false);
                self.rig.body.set_kinematic(true);
                self.halt_body();
                self.fire(AgentEvent::LostIdle);
            }
            LostBehavior::Die => self.transition(AiState::DyingDecay)?,
            LostBehavior::CannonballToMesh => {
                if self.mesh_point.is_none() {
                    warn!(
                        agent = self.id,
                        "lost with no sampled mesh point to return to, sinking instead"
                    );
                    return self.transition(AiState::DyingDecay);
                }
                self.rig.nav.set_enabled(false);
                self.rig.nav.set_obstacle_mode(false);
                self.rig.body.set_kinematic(false);
                self.rig.body.set_gravity(true);
                self.rig.body.set_collider_enabled(true);
                self.launch_delay
                    .start(Delay::secs(self.config.lost_launch_delay_secs));
            }
        }
        Ok(())
    }

    // --- Per-state ticks ---

    fn tick_navigating(&mut self) {
        let position = self.follow_nav();
        self.nav_velocity = (position - self.last_nav_position) / DT;
        self.last_nav_position = position;
        if let Some(rotation) = facing(Vec3::ZERO, self.nav_velocity) {
            self.rig.body.set_rotation(rotation);
        }
        self.check_arrival();
    }

    fn check_arrival(&mut self) {
        let nav = &self.rig.nav;
        let arrived = nav.is_enabled()
            && !nav.path_pending()
            && !nav.has_path()
            && nav.remaining_distance() <= nav.stopping_distance();
        if !arrived {
            return;
        }
        // The query stays true while parked, so only report each arrival spot once.
        let position = nav.next_position();
        if self
            .last_arrived_position
            .map_or(true, |p| !approx_eq(p, position))
        {
            self.last_arrived_position = Some(position);
            self.fire(AgentEvent::Arrive);
        }
    }

    fn tick_pre_navigating(&mut self) -> Result<(), AgentError> {
        if let Some(step) = self.reorient.step() {
            self.rig.body.set_rotation(step.value());
        }
        match self.tween.step() {
            Some(Step::Yield(position)) => self.rig.body.set_position(position),
            Some(Step::Done(position)) => {
                self.rig.body.set_position(position);
                self.transition(AiState::Navigating)?;
            }
            None => self.transition(AiState::Navigating)?,
        }
        Ok(())
    }

    fn tick_ragdolled(&mut self) -> Result<(), AgentError> {
        let elapsed = (self.now - self.last_transition_time) as f32;
        let settled = self.is_settled() && elapsed >= self.config.min_recovery_secs;
        if settled || elapsed >= self.config.max_recovery_secs {
            self.recover_from_ragdoll()?;
        }
        Ok(())
    }

    fn recover_from_ragdoll(&mut self) -> Result<(), AgentError> {
        let position = self.rig.body.position();
        let sample = self
            .rig
            .nav
            .sample_position(position, self.config.mesh_sample_radius);
        if let Some(point) = sample {
            self.mesh_point = Some(point);
        }
        let on_mesh = sample.is_some_and(|point| {
            let offset = point - position;
            Vec3::new(offset.x, 0.0, offset.z).length() <= self.config.mesh_snap_distance
        });
        if on_mesh {
            self.transition(AiState::PreNavigating)
        } else {
            self.transition(AiState::Lost)
        }
    }

    fn tick_staggered(&mut self) -> Result<(), AgentError> {
        let position = self.follow_nav();
        self.last_nav_position = position;
        let elapsed = (self.now - self.last_transition_time) as f32;
        if elapsed >= self.config.stagger_secs {
            self.transition(AiState::Navigating)?;
        }
        Ok(())
    }

    fn tick_lost(&mut self, rng: &mut dyn RngCore) -> Result<(), AgentError> {
        if self.config.lost_behavior != LostBehavior::CannonballToMesh {
            return Ok(());
        }

        if let Some(Step::Done(())) = self.launch_delay.step() {
            let mesh_point = self.mesh_point.unwrap_or_else(|| self.rig.body.position());
            let offset = self
                .rig
                .bounds
                .checked_max_dimension("cannonball landing")?
                * 0.5;
            self.launcher.fire_to(
                mesh_point + Vec3::Y * offset,
                self.config.launcher.acceptable_distance,
                self.now,
            );
            let rotation = self.rig.body.rotation();
            self.reorient.start(Reorient::new(
                rotation,
                upright(rotation),
                self.config.reorient_ticks,
            ));
        }

        if let Some(step) = self.reorient.step() {
            self.rig.body.set_rotation(step.value());
        }

        let status = self.launcher.tick(&mut self.rig.body, self.now, rng);
        if let LaunchStatus::Arrived { forced } = status {
            if forced {
                debug!(agent = self.id, "cannonball timed out, recovering anyway");
            }
            self.transition(AiState::PreNavigating)?;
        }
        Ok(())
    }

    fn tick_dying_fall(&mut self) -> Result<(), AgentError> {
        if self.is_settled() {
            self.transition(AiState::DyingDecay)?;
        }
        Ok(())
    }

    fn tick_dying_decay(&mut self) {
        let Some(step) = self.sink.step() else {
            return;
        };
        let position = self.rig.body.position();
        self.rig.body.set_position(position - Vec3::Y * step.value());
        if step.is_done() {
            debug!(agent = self.id, "agent sank and was removed");
            self.destroyed = true;
            self.fire(AgentEvent::Death);
        }
    }

    // --- Helpers ---

    fn fire(&mut self, event: AgentEvent) {
        self.signals.emit(event);
        self.pending.push(event);
    }

    fn follow_nav(&mut self) -> Vec3 {
        let position = self.rig.nav.next_position();
        self.rig.body.set_position(position);
        position
    }

    fn halt_body(&mut self) {
        self.rig.body.set_velocity(Vec3::ZERO);
        self.rig.body.set_angular_velocity(Vec3::ZERO);
    }

    fn resume_navigation(&mut self) {
        let position = self.rig.body.position();
        self.rig.nav.set_obstacle_mode(false);
        self.rig.nav.warp(position);
        self.rig.nav.set_enabled(true);
    }

    fn enable_physics(&mut self) {
        self.rig.nav.set_enabled(false);
        self.rig.nav.set_obstacle_mode(true);
        self.rig.body.set_kinematic(false);
        self.rig.body.set_gravity(true);
        self.rig.body.set_collider_enabled(true);
        self.despawn_velocity_threshold = self.config.despawn_velocity_threshold;
        self.despawn_angular_velocity_threshold = self.config.despawn_angular_velocity_threshold;
    }

    fn grow_thresholds(&mut self) {
        self.despawn_velocity_threshold *= self.config.threshold_growth;
        self.despawn_angular_velocity_threshold *= self.config.threshold_growth;
    }

    fn is_settled(&self) -> bool {
        self.rig.body.velocity().length() < self.despawn_velocity_threshold
            && self.rig.body.angular_velocity().length() < self.despawn_angular_velocity_threshold
    }

    fn restore_pre_stagger_destination(&mut self) {
        let pre = self.pre_stagger_destination.take();
        let stagger = self.stagger_destination.take();
        if let (Some(pre), Some(stagger)) = (pre, stagger) {
            // Someone else redirected the agent mid-stagger; keep their destination.
            if approx_eq(self.rig.nav.destination(), stagger) {
                self.rig.nav.set_destination(pre);
            }
        }
    }
}
