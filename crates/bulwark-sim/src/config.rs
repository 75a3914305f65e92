//! Simulation configuration, loaded from JSON.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use bulwark_core::config::{AgentConfig, MeleeConfig, RangedConfig};
use bulwark_core::constants::*;
use bulwark_core::enums::{AiState, AttackKind};
use bulwark_core::error::ConfigError;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub arena: ArenaConfig,
    pub core: CoreConfig,
    pub enemy: EnemyConfig,
    pub agent: AgentConfig,
    pub melee: MeleeConfig,
    pub ranged: RangedConfig,
    /// One sniper-position memory for all ranged attackers, or one each.
    pub shared_sniper_history: bool,
    pub waves: Vec<WaveConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: ArenaConfig::default(),
            core: CoreConfig::default(),
            enemy: EnemyConfig::default(),
            agent: AgentConfig::default(),
            melee: MeleeConfig::default(),
            ranged: RangedConfig::default(),
            shared_sniper_history: true,
            waves: default_waves(),
        }
    }
}

/// The square navigable region enemies walk on. The ground plane extends past it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub half_extent: f32,
    pub nav_speed: f32,
    pub stopping_distance: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: ARENA_HALF_EXTENT,
            nav_speed: NAV_SPEED,
            stopping_distance: NAV_STOPPING_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub position: Vec3,
    pub radius: f32,
    pub health: f32,
    pub attack_slots: Vec<Vec3>,
    pub ranged_attack_slots: Vec<Vec3>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let ring = |radius: f32, count: usize| -> Vec<Vec3> {
            (0..count)
                .map(|i| {
                    let angle = std::f32::consts::TAU * i as f32 / count as f32;
                    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
                })
                .collect()
        };
        Self {
            position: Vec3::new(0.0, 1.0, 0.0),
            radius: CORE_RADIUS,
            health: CORE_HEALTH,
            attack_slots: ring(2.0, 8),
            ranged_attack_slots: ring(12.0, 6),
        }
    }
}

/// Physical properties shared by every spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: Vec3,
    pub mass: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: Vec3::from_array(ENEMY_SIZE),
            mass: ENEMY_MASS,
        }
    }
}

/// A group of enemies entering at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub spawn_at_tick: u64,
    pub kind: AttackKind,
    pub count: u32,
    /// Centre of the spawn area, on the ground.
    pub spawn: Vec3,
    /// Enemies are scattered up to this far from `spawn` (meters).
    #[serde(default)]
    pub spread: f32,
    #[serde(default)]
    pub initial_state: AiState,
}

fn default_waves() -> Vec<WaveConfig> {
    vec![
        WaveConfig {
            spawn_at_tick: 0,
            kind: AttackKind::Melee,
            count: 3,
            spawn: Vec3::new(0.0, 0.0, -18.0),
            spread: 4.0,
            initial_state: AiState::Navigating,
        },
        WaveConfig {
            spawn_at_tick: 600, // 10 seconds
            kind: AttackKind::Ranged,
            count: 2,
            spawn: Vec3::new(18.0, 0.0, 0.0),
            spread: 3.0,
            initial_state: AiState::Navigating,
        },
        WaveConfig {
            spawn_at_tick: 1200, // 20 seconds
            kind: AttackKind::Melee,
            count: 4,
            spawn: Vec3::new(-18.0, 0.0, 10.0),
            spread: 4.0,
            initial_state: AiState::Navigating,
        },
    ]
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.half_extent", self.arena.half_extent)?;
        positive("arena.nav_speed", self.arena.nav_speed)?;
        positive("core.radius", self.core.radius)?;
        positive("core.health", self.core.health)?;
        positive("enemy.mass", self.enemy.mass)?;
        if self.enemy.size.min_element() <= 0.0 || !self.enemy.size.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "enemy.size",
                value: self.enemy.size.min_element(),
            });
        }
        if self.arena.stopping_distance < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "arena.stopping_distance",
                value: self.arena.stopping_distance,
            });
        }
        if self.core.attack_slots.is_empty() {
            return Err(ConfigError::Empty {
                field: "core.attack_slots",
            });
        }
        if self.core.ranged_attack_slots.is_empty() {
            return Err(ConfigError::Empty {
                field: "core.ranged_attack_slots",
            });
        }
        for wave in &self.waves {
            if !wave.initial_state.is_valid_initial() {
                return Err(ConfigError::InvalidInitialState(wave.initial_state));
            }
        }
        self.agent.validate()?;
        self.ranged.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Parse and validate a configuration from JSON. Missing fields take defaults.
pub fn from_json_str(json: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_json_str(&text)
}
