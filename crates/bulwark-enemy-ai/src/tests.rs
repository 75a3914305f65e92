#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::{Quat, Vec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use bulwark_core::collaborators::{ColliderBounds, DefendedCore, NavAgent, RigidBody};
    use bulwark_core::config::{AgentConfig, MeleeConfig, RangedConfig};
    use bulwark_core::constants::{DT, GRAVITY};
    use bulwark_core::enums::{AiState, DamageEffect, LostBehavior};
    use bulwark_core::error::{AgentError, ConfigError};
    use bulwark_core::events::AgentEvent;
    use bulwark_core::types::SimTime;

    use crate::agent::{AgentRig, AiAgent};
    use crate::enemy::{AttackBehavior, AttackEffect, Enemy, EnemyTick};
    use crate::melee::MeleeAttacker;
    use crate::ranged::{HitTarget, PathIndicator, Projectile, RangedAttacker};
    use crate::sniper::{SharedSniperHistory, SniperHistory};

    // --- Test doubles ---

    /// Point mass that rests on a floor while its collider is on. `frozen`
    /// bodies keep whatever velocity they are given without moving.
    #[derive(Debug)]
    struct TestBody {
        position: Vec3,
        rotation: Quat,
        velocity: Vec3,
        angular_velocity: Vec3,
        kinematic: bool,
        gravity: bool,
        collider: bool,
        floor: f32,
        frozen: bool,
    }

    impl TestBody {
        fn at(position: Vec3) -> Self {
            Self {
                position,
                rotation: Quat::IDENTITY,
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                kinematic: true,
                gravity: false,
                collider: true,
                floor: position.y,
                frozen: false,
            }
        }

        fn integrate(&mut self) {
            if self.kinematic || self.frozen {
                return;
            }
            if self.gravity {
                self.velocity.y -= GRAVITY * DT;
            }
            self.position += self.velocity * DT;
            if self.collider && self.position.y <= self.floor {
                self.position.y = self.floor;
                self.velocity.y = self.velocity.y.max(0.0);
                self.velocity.x *= 0.8;
                self.velocity.z *= 0.8;
            }
            self.angular_velocity *= 0.9;
        }
    }

    impl RigidBody for TestBody {
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
            1.0
        }
        fn apply_impulse(&mut self, impulse: Vec3) {
            self.velocity += impulse / self.mass();
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

    /// Straight-line walker over the square `[-half, half]` on y = 0.
    #[derive(Debug)]
    struct TestNav {
        position: Vec3,
        destination: Vec3,
        enabled: bool,
        obstacle: bool,
        speed: f32,
        half: f32,
    }

    impl TestNav {
        fn at(position: Vec3) -> Self {
            let ground = Vec3::new(position.x, 0.0, position.z);
            Self {
                position: ground,
                destination: ground,
                enabled: false,
                obstacle: false,
                speed: 3.5,
                half: 10.0,
            }
        }

        fn advance(&mut self) {
            if !self.enabled || self.obstacle {
                return;
            }
            let offset = self.destination - self.position;
            if offset.length() <= self.stopping_distance() {
                return;
            }
            let step = (self.speed * DT).min(offset.length());
            self.position += offset.normalize_or_zero() * step;
        }
    }

    impl NavAgent for TestNav {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }
        fn is_enabled(&self) -> bool {
            self.enabled
        }
        fn set_obstacle_mode(&mut self, enabled: bool) {
            self.obstacle = enabled;
        }
        fn warp(&mut self, position: Vec3) {
            self.position = Vec3::new(position.x, 0.0, position.z);
        }
        fn destination(&self) -> Vec3 {
            self.destination
        }
        fn set_destination(&mut self, destination: Vec3) {
            self.destination = destination;
        }
        fn remaining_distance(&self) -> f32 {
            self.position.distance(self.destination)
        }
        fn stopping_distance(&self) -> f32 {
            0.05
        }
        fn has_path(&self) -> bool {
            self.remaining_distance() > self.stopping_distance()
        }
        fn path_pending(&self) -> bool {
            false
        }
        fn next_position(&self) -> Vec3 {
            self.position
        }
        fn sample_position(&self, near: Vec3, max_distance: f32) -> Option<Vec3> {
            let point = Vec3::new(
                near.x.clamp(-self.half, self.half),
                0.0,
                near.z.clamp(-self.half, self.half),
            );
            (point.distance(near) <= max_distance).then_some(point)
        }
    }

    #[derive(Debug)]
    struct TestBounds(Vec3);

    impl ColliderBounds for TestBounds {
        fn size(&self) -> Vec3 {
            self.0
        }
    }

    #[derive(Debug, Default)]
    struct TestCore {
        position: Vec3,
        slots: Vec<Vec3>,
        ranged_slots: Vec<Vec3>,
        damage_taken: f32,
        hits: u32,
    }

    impl DefendedCore for TestCore {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn take_damage(&mut self, amount: f32) {
            self.damage_taken += amount;
            self.hits += 1;
        }
        fn attack_slots(&self) -> &[Vec3] {
            &self.slots
        }
        fn ranged_attack_slots(&self) -> &[Vec3] {
            &self.ranged_slots
        }
    }

    type TestAgent = AiAgent<TestBody, TestNav, TestBounds>;

    const BOX: Vec3 = Vec3::new(1.0, 2.0, 1.0);

    struct Harness {
        time: SimTime,
        rng: ChaCha8Rng,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                time: SimTime::default(),
                rng: ChaCha8Rng::seed_from_u64(7),
            }
        }

        fn try_spawn(
            &self,
            position: Vec3,
            config: AgentConfig,
            size: Vec3,
            initial: AiState,
        ) -> Result<TestAgent, AgentError> {
            let rig = AgentRig {
                body: TestBody::at(position),
                nav: TestNav::at(position),
                bounds: TestBounds(size),
            };
            AiAgent::spawn(1, config, rig, initial, &self.time)
        }

        fn spawn(&self, position: Vec3) -> TestAgent {
            self.try_spawn(position, AgentConfig::default(), BOX, AiState::Navigating)
                .unwrap()
        }

        fn try_step(&mut self, agent: &mut TestAgent) -> Result<(), AgentError> {
            self.time.advance();
            agent.body_mut().integrate();
            agent.nav_mut().advance();
            agent.tick(&self.time, &mut self.rng)
        }

        fn step(&mut self, agent: &mut TestAgent) {
            self.try_step(agent).unwrap();
        }

        fn step_enemy(
            &mut self,
            enemy: &mut Enemy<TestBody, TestNav, TestBounds>,
            core: &mut TestCore,
        ) -> EnemyTick {
            self.time.advance();
            enemy.agent.body_mut().integrate();
            enemy.agent.nav_mut().advance();
            enemy.tick(&self.time, core, &mut self.rng).unwrap()
        }
    }

    fn count(events: &[AgentEvent], wanted: AgentEvent) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    // --- Construction ---

    #[test]
    fn test_spawn_rejects_invalid_initial_state() {
        let harness = Harness::new();
        for state in [AiState::Idle, AiState::Lost, AiState::DyingFall] {
            let err = harness
                .try_spawn(Vec3::ZERO, AgentConfig::default(), BOX, state)
                .unwrap_err();
            assert!(matches!(
                err,
                AgentError::Config(ConfigError::InvalidInitialState(s)) if s == state
            ));
        }
        assert!(harness
            .try_spawn(Vec3::ZERO, AgentConfig::default(), BOX, AiState::Ragdolled)
            .is_ok());
    }

    #[test]
    fn test_spawn_validates_config() {
        let harness = Harness::new();
        let config = AgentConfig {
            min_recovery_secs: 5.0,
            max_recovery_secs: 2.0,
            ..AgentConfig::default()
        };
        let err = harness
            .try_spawn(Vec3::ZERO, config, BOX, AiState::Navigating)
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::Config(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_navigating_spawn_drives_nav() {
        let harness = Harness::new();
        let agent = harness.spawn(Vec3::new(1.0, 0.0, 2.0));
        assert!(agent.nav().is_enabled());
        assert!(agent.body().kinematic);
        assert!(agent.body().collider);
        assert_eq!(agent.health(), agent.max_health());
    }

    // --- Damage ---

    #[test]
    fn test_health_is_clamped() {
        let harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);

        assert!(!agent.take_damage(-5.0, DamageEffect::None).unwrap());
        assert_eq!(agent.health(), 10.0, "healing never exceeds max");

        assert!(!agent.take_damage(3.0, DamageEffect::None).unwrap());
        assert_eq!(agent.health(), 7.0);
        assert_eq!(agent.state(), AiState::Navigating);

        assert!(agent.take_damage(100.0, DamageEffect::None).unwrap());
        assert_eq!(agent.health(), 0.0);
        assert_eq!(agent.state(), AiState::DyingFall);
    }

    #[test]
    fn test_damage_effect_selects_state() {
        let harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        assert_eq!(agent.state(), AiState::Ragdolled);
        assert!(!agent.nav().is_enabled());
        assert!(!agent.body().kinematic);
        assert!(agent.body().gravity);

        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();
        assert_eq!(agent.state(), AiState::Staggered);
        assert_eq!(count(&agent.drain_events(), AgentEvent::Damage), 1);
    }

    #[test]
    fn test_terminal_states_ignore_set_state_and_damage() {
        let harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(10.0, DamageEffect::None).unwrap();
        assert_eq!(agent.state(), AiState::DyingFall);
        agent.drain_events();

        for state in [AiState::Navigating, AiState::Ragdolled, AiState::Idle] {
            agent.set_state(state).unwrap();
            assert_eq!(agent.state(), AiState::DyingFall);
        }
        assert!(!agent.take_damage(5.0, DamageEffect::Ragdoll).unwrap());
        assert_eq!(agent.state(), AiState::DyingFall);
        assert!(agent.drain_events().is_empty(), "no callbacks once dying");
    }

    #[test]
    fn test_fall_death() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.set_state(AiState::Ragdolled).unwrap();
        agent.body_mut().frozen = true;
        agent.body_mut().velocity = Vec3::new(0.0, -60.0, 0.0);
        harness.step(&mut agent);
        assert_eq!(agent.health(), 0.0);
        assert!(agent.state().is_terminal());
        assert_eq!(count(&agent.drain_events(), AgentEvent::DyingFall), 1);
    }

    // --- Scenario: death sequence ---

    #[test]
    fn test_death_sequence_sinks_then_fires_death_once() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);

        let deaths = Rc::new(Cell::new(0));
        let seen = deaths.clone();
        agent
            .signals_mut()
            .on_death
            .subscribe(move || seen.set(seen.get() + 1));

        assert!(agent.take_damage(10.0, DamageEffect::None).unwrap());
        assert_eq!(agent.state(), AiState::DyingFall);

        harness.step(&mut agent);
        assert_eq!(agent.state(), AiState::DyingDecay, "a resting body settles at once");
        assert!(!agent.body().collider);
        assert!(!agent.body().gravity);

        let start_y = agent.body().position.y;
        let mut events = agent.drain_events();
        let mut ticks = 0;
        while !agent.is_destroyed() {
            harness.step(&mut agent);
            events.extend(agent.drain_events());
            ticks += 1;
            assert!(ticks <= 250, "sink never finished");
        }

        // Max dimension 2.0 at 0.01 per tick.
        assert!((199..=201).contains(&ticks), "sank in {ticks} ticks");
        assert!((start_y - agent.body().position.y - 2.0).abs() < 1e-3);
        assert_eq!(count(&events, AgentEvent::DyingFall), 1);
        assert_eq!(count(&events, AgentEvent::DyingDecay), 1);
        assert_eq!(count(&events, AgentEvent::Death), 1);
        assert_eq!(deaths.get(), 1);

        // Destroyed agents stay quiet.
        harness.step(&mut agent);
        assert!(agent.drain_events().is_empty());
    }

    #[test]
    fn test_degenerate_bounds_fail_loudly() {
        let mut harness = Harness::new();
        let mut agent = harness
            .try_spawn(Vec3::ZERO, AgentConfig::default(), Vec3::ZERO, AiState::Navigating)
            .unwrap();
        agent.take_damage(10.0, DamageEffect::None).unwrap();
        let err = harness.try_step(&mut agent).unwrap_err();
        assert!(matches!(err, AgentError::DegenerateBounds { .. }));
    }

    // --- Ragdoll recovery ---

    #[test]
    fn test_ragdoll_recovers_after_min_recovery_when_settled() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();

        for _ in 0..59 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Ragdolled, "min recovery not yet reached");
        harness.step(&mut agent);
        assert_eq!(agent.state(), AiState::PreNavigating);
        assert_eq!(agent.mesh_point(), Some(Vec3::ZERO));

        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
        assert!(agent.nav().is_enabled());
    }

    #[test]
    fn test_max_recovery_forces_ragdoll_exit() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        agent.body_mut().frozen = true;
        agent.body_mut().velocity = Vec3::new(5.0, 0.0, 0.0);

        let (velocity_start, _) = agent.despawn_thresholds();
        for _ in 0..359 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Ragdolled, "still moving, still ragdolled");
        let (velocity_threshold, angular_threshold) = agent.despawn_thresholds();
        assert!(velocity_threshold > velocity_start * 30.0, "thresholds grow every tick");
        assert_eq!(velocity_threshold, angular_threshold);
        harness.step(&mut agent);
        assert_eq!(agent.state(), AiState::PreNavigating);
        assert_eq!(agent.body().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_pre_navigating_lifts_and_uprights() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        agent.body_mut().rotation = Quat::from_rotation_x(1.2) * Quat::from_rotation_y(0.4);
        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::PreNavigating);
        for _ in 0..59 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::PreNavigating);
        assert!((agent.body().position.y - 59.0 / 60.0).abs() < 1e-3, "lifted by half height");

        harness.step(&mut agent);
        assert_eq!(agent.state(), AiState::Navigating);
        let up = agent.body().rotation * Vec3::Y;
        assert!(up.distance(Vec3::Y) < 1e-3, "upright once the lift completes");
    }

    #[test]
    fn test_pre_navigating_after_walking_stays_put() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        for _ in 0..120 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
        assert_eq!(agent.mesh_point(), None, "recovery point dropped once navigating");

        agent.nav_mut().set_destination(Vec3::new(5.0, 0.0, 0.0));
        for _ in 0..150 {
            harness.step(&mut agent);
        }
        assert!((agent.body().position.x - 5.0).abs() < 0.1);

        agent.set_state(AiState::PreNavigating).unwrap();
        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
        assert!(
            (agent.body().position.x - 5.0).abs() < 0.1,
            "lifted in place, not back to the old recovery point"
        );
    }

    #[test]
    fn test_ragdoll_off_mesh_cannonballs_back() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::new(20.0, 1.0, 0.0));
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        agent.body_mut().position = Vec3::new(20.0, 1.0, 0.0);

        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Lost);
        assert_eq!(agent.mesh_point(), Some(Vec3::new(10.0, 0.0, 0.0)));

        let mut reached = false;
        for _ in 0..(8 * 60 + 60) {
            harness.step(&mut agent);
            if agent.state() == AiState::PreNavigating {
                reached = true;
                break;
            }
        }
        assert!(reached, "cannonball recovery never finished");
        assert!(agent.launcher().shots() >= 1);
        assert!(!agent.launcher().is_active());
        assert!((agent.body().position.x - 10.0).abs() < 1.0);

        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
    }

    #[test]
    fn test_lost_without_mesh_point_sinks() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::new(100.0, 0.0, 0.0));
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.mesh_point(), None);
        assert_eq!(agent.state(), AiState::DyingDecay);
    }

    #[test]
    fn test_lost_behaviors() {
        let mut harness = Harness::new();
        let idle = AgentConfig {
            lost_behavior: LostBehavior::Idle,
            ..AgentConfig::default()
        };
        let mut agent = harness
            .try_spawn(Vec3::new(20.0, 0.0, 0.0), idle, BOX, AiState::Ragdolled)
            .unwrap();
        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Lost);
        assert_eq!(count(&agent.drain_events(), AgentEvent::LostIdle), 1);
        for _ in 0..120 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Lost, "idle-lost waits for a reset");

        let die = AgentConfig {
            lost_behavior: LostBehavior::Die,
            ..AgentConfig::default()
        };
        let mut agent = harness
            .try_spawn(Vec3::new(20.0, 0.0, 0.0), die, BOX, AiState::Ragdolled)
            .unwrap();
        for _ in 0..60 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::DyingDecay);
    }

    // --- Stagger ---

    #[test]
    fn test_stagger_round_trip_restores_destination() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        let goal = Vec3::new(8.0, 0.0, 0.0);
        agent.nav_mut().set_destination(goal);
        for _ in 0..10 {
            harness.step(&mut agent);
        }

        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();
        assert_eq!(agent.state(), AiState::Staggered);
        assert_eq!(agent.pre_stagger_destination(), Some(goal));
        let back = agent.stagger_destination().unwrap();
        assert!(back.x < agent.body().position.x, "staggers away from its heading");
        assert_eq!(agent.nav().destination(), back);

        let mut ticks = 0;
        while agent.state() == AiState::Staggered {
            harness.step(&mut agent);
            ticks += 1;
            assert!(ticks <= 40);
        }
        assert_eq!(ticks, 30);
        assert_eq!(agent.state(), AiState::Navigating);
        assert_eq!(agent.nav().destination(), goal);
        assert_eq!(agent.pre_stagger_destination(), None);
    }

    #[test]
    fn test_stagger_keeps_external_redirect() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.nav_mut().set_destination(Vec3::new(8.0, 0.0, 0.0));
        harness.step(&mut agent);
        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();

        let elsewhere = Vec3::new(0.0, 0.0, -6.0);
        agent.nav_mut().set_destination(elsewhere);
        for _ in 0..40 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
        assert_eq!(agent.nav().destination(), elsewhere);
    }

    #[test]
    fn test_stacked_stagger_keeps_first_destination() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        let goal = Vec3::new(8.0, 0.0, 0.0);
        agent.nav_mut().set_destination(goal);
        for _ in 0..5 {
            harness.step(&mut agent);
        }
        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();
        for _ in 0..10 {
            harness.step(&mut agent);
        }
        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();
        assert_eq!(agent.pre_stagger_destination(), Some(goal));

        for _ in 0..40 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Navigating);
        assert_eq!(agent.nav().destination(), goal);
    }

    #[test]
    fn test_leaving_stagger_by_ragdoll_restores_destination() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        let goal = Vec3::new(8.0, 0.0, 0.0);
        agent.nav_mut().set_destination(goal);
        harness.step(&mut agent);
        agent.take_damage(1.0, DamageEffect::Stagger).unwrap();
        agent.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        assert_eq!(agent.state(), AiState::Ragdolled);
        assert_eq!(agent.nav().destination(), goal);
    }

    // --- Arrival and idle ---

    #[test]
    fn test_arrival_fires_once_per_spot() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        let mut events = Vec::new();
        for _ in 0..20 {
            harness.step(&mut agent);
            events.extend(agent.drain_events());
        }
        assert_eq!(count(&events, AgentEvent::Arrive), 1, "parked agent arrives once");

        agent.nav_mut().set_destination(Vec3::new(2.0, 0.0, 0.0));
        events.clear();
        for _ in 0..120 {
            harness.step(&mut agent);
            events.extend(agent.drain_events());
        }
        assert_eq!(count(&events, AgentEvent::Arrive), 1);
        assert!(agent.body().position.distance(Vec3::new(2.0, 0.0, 0.0)) <= 0.05);
    }

    #[test]
    fn test_navigating_faces_movement() {
        let mut harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.nav_mut().set_destination(Vec3::new(5.0, 0.0, 0.0));
        for _ in 0..5 {
            harness.step(&mut agent);
        }
        let forward = agent.body().rotation * Vec3::Z;
        assert!(forward.distance(Vec3::X) < 1e-3);
    }

    #[test]
    fn test_idle_exit_fires_when_leaving_idle() {
        let harness = Harness::new();
        let mut agent = harness.spawn(Vec3::ZERO);
        agent.set_state(AiState::Idle).unwrap();
        assert!(!agent.nav().is_enabled());
        assert!(agent.drain_events().is_empty());

        agent.set_state(AiState::Navigating).unwrap();
        assert_eq!(agent.drain_events(), vec![AgentEvent::IdleExit]);
        assert!(agent.nav().is_enabled());
    }

    #[test]
    fn test_set_state_cancels_launch() {
        let mut harness = Harness::new();
        let mut agent = harness
            .try_spawn(Vec3::new(20.0, 1.0, 0.0), AgentConfig::default(), BOX, AiState::Ragdolled)
            .unwrap();
        for _ in 0..95 {
            harness.step(&mut agent);
        }
        assert_eq!(agent.state(), AiState::Lost);
        assert!(agent.launcher().is_active());
        agent.set_state(AiState::Idle).unwrap();
        assert!(!agent.launcher().is_active());
    }

    // --- Attack behaviors ---

    fn enemy(
        harness: &Harness,
        position: Vec3,
        attack: AttackBehavior,
    ) -> Enemy<TestBody, TestNav, TestBounds> {
        Enemy::new(harness.spawn(position), attack)
    }

    #[test]
    fn test_melee_hits_once_then_despawns() {
        let mut harness = Harness::new();
        let mut core = TestCore {
            position: Vec3::new(0.0, 1.0, 5.0),
            slots: vec![Vec3::new(0.0, 0.0, 3.0)],
            ..TestCore::default()
        };
        let mut enemy = enemy(
            &harness,
            Vec3::new(0.0, 0.0, -5.0),
            AttackBehavior::Melee(MeleeAttacker::new(MeleeConfig::default())),
        );
        enemy.start(&core, &mut harness.rng);
        assert_eq!(enemy.agent.nav().destination(), Vec3::new(0.0, 0.0, 3.0));

        let mut despawned = false;
        for _ in 0..300 {
            let tick = harness.step_enemy(&mut enemy, &mut core);
            if tick.despawn {
                despawned = true;
                break;
            }
        }
        assert!(despawned);
        assert_eq!(core.hits, 1);
        assert_eq!(core.damage_taken, 5.0);
    }

    #[test]
    fn test_melee_second_arrival_is_harmless() {
        let mut core = TestCore {
            slots: vec![Vec3::ONE],
            ..TestCore::default()
        };
        let mut melee = MeleeAttacker::new(MeleeConfig::default());
        assert!(!melee.on_arrive(&mut core), "no slot chosen yet");

        let mut nav = TestNav::at(Vec3::ZERO);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        melee.seek_slot(&mut nav, &core, &mut rng);
        assert!(melee.on_arrive(&mut core));
        assert!(!melee.on_arrive(&mut core));
        assert_eq!(core.hits, 1);
    }

    #[test]
    fn test_idle_exit_reroutes_attacker() {
        let mut harness = Harness::new();
        let mut core = TestCore {
            slots: vec![Vec3::new(4.0, 0.0, 4.0)],
            ..TestCore::default()
        };
        let mut enemy = enemy(
            &harness,
            Vec3::ZERO,
            AttackBehavior::Melee(MeleeAttacker::new(MeleeConfig::default())),
        );
        enemy.agent.set_state(AiState::Idle).unwrap();
        enemy.agent.set_state(AiState::Navigating).unwrap();
        let tick = harness.step_enemy(&mut enemy, &mut core);
        assert_eq!(count(&tick.events, AgentEvent::IdleExit), 1);
        assert_eq!(enemy.agent.nav().destination(), Vec3::new(4.0, 0.0, 4.0));
    }

    fn ranged_setup(harness: &Harness) -> (Enemy<TestBody, TestNav, TestBounds>, TestCore) {
        let core = TestCore {
            position: Vec3::new(0.0, 1.0, 0.0),
            ranged_slots: vec![Vec3::new(8.0, 0.0, 0.0)],
            ..TestCore::default()
        };
        let attacker = RangedAttacker::new(RangedConfig::default(), SharedSniperHistory::new(5));
        let enemy = enemy(harness, Vec3::new(8.0, 0.0, -4.0), AttackBehavior::Ranged(attacker));
        (enemy, core)
    }

    fn ranged(enemy: &Enemy<TestBody, TestNav, TestBounds>) -> &RangedAttacker {
        match &enemy.attack {
            AttackBehavior::Ranged(r) => r,
            AttackBehavior::Melee(_) => unreachable!(),
        }
    }

    #[test]
    fn test_ranged_aims_then_fires_at_interval() {
        let mut harness = Harness::new();
        let (mut enemy, mut core) = ranged_setup(&harness);
        enemy.start(&core, &mut harness.rng);

        let mut first = None;
        for _ in 0..400 {
            let tick = harness.step_enemy(&mut enemy, &mut core);
            if !tick.effects.is_empty() {
                first = Some(tick.effects);
                break;
            }
        }
        let effects = first.expect("never fired");
        assert_eq!(effects.len(), 2);
        let AttackEffect::Indicator(indicator) = &effects[0] else {
            panic!("indicator first");
        };
        let AttackEffect::Projectile(projectile) = &effects[1] else {
            panic!("then the projectile");
        };
        assert_eq!(indicator.points.len(), 16);
        assert!(indicator.points[0].distance(projectile.position) < 1e-5);
        assert!(projectile.velocity.x < 0.0, "lobbed toward the core");
        assert!(projectile.velocity.y > 0.0);
        assert_eq!(projectile.damage, 2.0);
        assert!(ranged(&enemy).is_cooling_down());
        assert!(!ranged(&enemy).is_aiming());

        let forward = enemy.agent.body().rotation * Vec3::Z;
        assert!(forward.distance(-Vec3::X) < 1e-2, "faces the core when firing");

        for _ in 0..320 {
            harness.step_enemy(&mut enemy, &mut core);
        }
        assert_eq!(ranged(&enemy).shots_fired(), 2);
    }

    #[test]
    fn test_ranged_interrupted_aim_never_fires() {
        let mut harness = Harness::new();
        let (mut enemy, mut core) = ranged_setup(&harness);
        enemy.start(&core, &mut harness.rng);

        for _ in 0..400 {
            harness.step_enemy(&mut enemy, &mut core);
            if ranged(&enemy).is_aiming() {
                break;
            }
        }
        assert!(ranged(&enemy).is_aiming());
        for _ in 0..30 {
            harness.step_enemy(&mut enemy, &mut core);
        }

        enemy.take_damage(1.0, DamageEffect::Ragdoll).unwrap();
        for _ in 0..100 {
            let tick = harness.step_enemy(&mut enemy, &mut core);
            assert!(tick.effects.is_empty());
        }
        assert!(!ranged(&enemy).is_aiming());
        assert_eq!(ranged(&enemy).shots_fired(), 0);
    }

    #[test]
    fn test_projectile_only_damages_core() {
        let mut core = TestCore::default();
        let projectile = Projectile {
            position: Vec3::ZERO,
            velocity: Vec3::X,
            damage: 2.0,
        };
        assert!(!projectile.resolve_hit(HitTarget::Other, &mut core));
        assert_eq!(core.hits, 0);
        assert!(projectile.resolve_hit(HitTarget::Core, &mut core));
        assert_eq!(core.damage_taken, 2.0);
    }

    #[test]
    fn test_indicator_fades_in_then_out() {
        let mut indicator = PathIndicator::new(vec![Vec3::ZERO, Vec3::ONE], 3);
        let alphas: Vec<f32> = std::iter::from_fn(|| indicator.tick()).collect();
        let expected = [1.0 / 3.0, 2.0 / 3.0, 1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0];
        assert_eq!(alphas.len(), expected.len());
        for (a, e) in alphas.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6);
        }
        assert!(indicator.is_finished());
    }

    // --- Scenario: sniper history ---

    #[test]
    fn test_sniper_history_avoids_recent_picks() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let six: Vec<Vec3> = (0..6).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mut history = SniperHistory::new(5);
        let mut picks = Vec::new();
        for _ in 0..5 {
            picks.push(history.choose(&six, &mut rng).unwrap());
        }
        for (i, a) in picks.iter().enumerate() {
            assert!(!picks[i + 1..].contains(a), "repeat within five picks");
        }

        let five = &six[..5];
        let mut history = SniperHistory::new(5);
        for _ in 0..5 {
            history.choose(five, &mut rng).unwrap();
        }
        assert_eq!(history.len(), 5);
        let sixth = history.choose(five, &mut rng).unwrap();
        assert!(five.contains(&sixth));
        assert_eq!(history.len(), 1, "exhausted history is cleared before the pick");
        assert!(history.contains(sixth));
    }

    #[test]
    fn test_sniper_history_sharing_is_explicit() {
        let shared = SharedSniperHistory::new(5);
        let a = RangedAttacker::new(RangedConfig::default(), shared.clone());
        let b = RangedAttacker::new(RangedConfig::default(), shared.clone());
        let c = RangedAttacker::new(RangedConfig::default(), SharedSniperHistory::new(5));
        assert!(a.history().same_as(b.history()));
        assert!(!a.history().same_as(c.history()));

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let slots = [Vec3::X, Vec3::Z];
        let first = shared.choose(&slots, &mut rng).unwrap();
        assert!(b.history().contains(first));
        assert!(c.history().is_empty());
    }
}
