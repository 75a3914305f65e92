//! Simulation engine.
//!
//! `SimulationEngine` owns the enemies, the core, the hecs world holding
//! projectiles and shot indicators, and the seeded RNG. Completely headless,
//! so runs are deterministic for a given seed and config.

use std::collections::BTreeMap;

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use bulwark_core::collaborators::DefendedCore;
use bulwark_core::enums::{AiState, AttackKind, DamageEffect};
use bulwark_core::error::{AgentError, ConfigError};
use bulwark_core::state::{SimSnapshot, SimStats};
use bulwark_core::types::SimTime;
use bulwark_enemy_ai::{
    AgentRig, AiAgent, AttackBehavior, Enemy, MeleeAttacker, RangedAttacker, SharedSniperHistory,
};

use crate::body::{SimBody, SimBounds};
use crate::config::SimConfig;
use crate::defended::Core;
use crate::nav::{NavRegion, SimNav};
use crate::systems;
use crate::systems::wave_spawner::WaveSchedule;

/// An enemy wired to the simulated body, navigation and bounds.
pub type SimEnemy = Enemy<SimBody, SimNav, SimBounds>;

pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    config: SimConfig,
    core: Core,
    enemies: BTreeMap<u32, SimEnemy>,
    next_enemy_id: u32,
    wave_schedule: WaveSchedule,
    sniper_history: SharedSniperHistory,
    despawn_buffer: Vec<Entity>,
    removed: Vec<u32>,
    stats: SimStats,
}

impl SimulationEngine {
    /// Create an engine. The configuration is validated first.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            core: Core::new(&config.core),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            wave_schedule: WaveSchedule::new(&config.waves),
            sniper_history: SharedSniperHistory::new(config.ranged.history_len),
            despawn_buffer: Vec::new(),
            removed: Vec::new(),
            stats: SimStats::default(),
            config,
        })
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> Result<SimSnapshot, AgentError> {
        self.run_systems()?;
        self.time.advance();
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.core,
            &self.enemies,
            &self.stats,
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn enemy(&self, id: u32) -> Option<&SimEnemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.enemies.keys().copied()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn sniper_history(&self) -> &SharedSniperHistory {
        &self.sniper_history
    }

    /// The core fell, or every wave has spawned and no enemy is left.
    pub fn is_over(&self) -> bool {
        self.core.is_destroyed() || (self.wave_schedule.is_exhausted() && self.enemies.is_empty())
    }

    /// Place an enemy with `position` on the ground beneath its feet. It
    /// immediately heads for an attack slot.
    pub fn spawn_enemy(
        &mut self,
        kind: AttackKind,
        position: Vec3,
        initial: AiState,
    ) -> Result<u32, AgentError> {
        let id = self.next_enemy_id;
        let size = self.config.enemy.size;
        let rest_height = size.y * 0.5;
        let arena = self.config.arena;

        let rig = AgentRig {
            body: SimBody::new(
                position + Vec3::Y * rest_height,
                self.config.enemy.mass,
                rest_height,
            ),
            nav: SimNav::new(
                NavRegion {
                    half_extent: arena.half_extent,
                },
                position,
                arena.nav_speed,
                arena.stopping_distance,
                rest_height,
            ),
            bounds: SimBounds { size },
        };
        let agent = AiAgent::spawn(id, self.config.agent, rig, initial, &self.time)?;

        let attack = match kind {
            AttackKind::Melee => AttackBehavior::Melee(MeleeAttacker::new(self.config.melee)),
            AttackKind::Ranged => {
                let history = if self.config.shared_sniper_history {
                    self.sniper_history.clone()
                } else {
                    SharedSniperHistory::new(self.config.ranged.history_len)
                };
                AttackBehavior::Ranged(RangedAttacker::new(self.config.ranged, history))
            }
        };

        let mut enemy = Enemy::new(agent, attack);
        enemy.start(&self.core, &mut self.rng);
        self.enemies.insert(id, enemy);
        self.next_enemy_id += 1;
        self.stats.enemies_spawned += 1;
        debug!(enemy = id, ?kind, ?position, ?initial, "enemy spawned");
        Ok(id)
    }

    /// Damage an enemy. `None` if no such enemy, otherwise whether it was killed.
    pub fn damage_enemy(
        &mut self,
        id: u32,
        amount: f32,
        effect: DamageEffect,
    ) -> Result<Option<bool>, AgentError> {
        match self.enemies.get_mut(&id) {
            Some(enemy) => enemy.take_damage(amount, effect).map(Some),
            None => Ok(None),
        }
    }

    /// Force an enemy's state. Returns false if no such enemy.
    pub fn set_enemy_state(&mut self, id: u32, state: AiState) -> Result<bool, AgentError> {
        match self.enemies.get_mut(&id) {
            Some(enemy) => enemy.agent.set_state(state).map(|()| true),
            None => Ok(false),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) -> Result<(), AgentError> {
        // 1. Wave spawning
        let due =
            systems::wave_spawner::run(&mut self.wave_schedule, &mut self.rng, self.time.tick);
        if !due.is_empty() {
            info!(tick = self.time.tick, count = due.len(), "wave spawned");
        }
        for request in due {
            self.spawn_enemy(request.kind, request.position, request.initial_state)?;
        }
        // 2. Body integration and navigation movement
        systems::physics::run(&mut self.enemies);
        // 3. Enemy AI
        systems::enemy_ai::run(
            &mut self.enemies,
            &mut self.world,
            &mut self.core,
            &self.time,
            &mut self.rng,
            &mut self.stats,
            &mut self.removed,
        )?;
        // 4. Projectile flight and impacts
        systems::projectiles::run(
            &mut self.world,
            &mut self.core,
            &mut self.stats,
            &mut self.despawn_buffer,
        );
        // 5. Indicator fades
        systems::indicators::run(&mut self.world, &mut self.despawn_buffer);
        // 6. Cleanup
        let origin = self.core.position();
        systems::cleanup::run(&mut self.world, origin, &mut self.despawn_buffer);
        for id in self.removed.drain(..) {
            self.enemies.remove(&id);
        }
        Ok(())
    }
}
