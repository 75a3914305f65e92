//! Tunable parameters for agents, launches and attacks.
//!
//! Every struct deserializes with defaults for missing fields, so a config
//! file only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::LostBehavior;
use crate::error::ConfigError;

/// Linear shaping from target elevation to launch angle, with a safe clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcShaping {
    pub slope: f32,
    pub offset_deg: f32,
    pub min_deg: f32,
    pub max_deg: f32,
}

impl Default for ArcShaping {
    fn default() -> Self {
        Self {
            slope: ARC_SLOPE,
            offset_deg: ARC_OFFSET_DEG,
            min_deg: ARC_MIN_DEG,
            max_deg: ARC_MAX_DEG,
        }
    }
}

impl ArcShaping {
    /// Launch angle (degrees) for a raw origin-to-target elevation (degrees).
    pub fn launch_angle_deg(&self, elevation_deg: f32) -> f32 {
        (self.slope * elevation_deg + self.offset_deg).clamp(self.min_deg, self.max_deg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_deg <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "arc.min_deg",
                value: self.min_deg,
            });
        }
        if self.min_deg > self.max_deg || self.max_deg >= 90.0 {
            return Err(ConfigError::InvertedRange {
                field: "arc",
                min: self.min_deg,
                max: self.max_deg,
            });
        }
        Ok(())
    }
}

/// Homing launcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub acceptable_distance: f32,
    pub timeout_secs: f32,
    pub low_velocity_limit: u32,
    pub min_launch_speed: f32,
    pub closing_vertical_speed: f32,
    pub nudge_speed: f32,
    /// Fraction of the current velocity kept by each impulse (0 replaces it).
    pub keep_fraction: f32,
    pub arc: ArcShaping,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            acceptable_distance: LAUNCH_ACCEPTABLE_DISTANCE,
            timeout_secs: LAUNCH_TIMEOUT_SECS,
            low_velocity_limit: LAUNCH_LOW_VELOCITY_LIMIT,
            min_launch_speed: LAUNCH_MIN_SPEED,
            closing_vertical_speed: LAUNCH_CLOSING_VERTICAL_SPEED,
            nudge_speed: LAUNCH_NUDGE_SPEED,
            keep_fraction: 0.0,
            arc: ArcShaping::default(),
        }
    }
}

impl LauncherConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("launcher.timeout_secs", self.timeout_secs)?;
        positive("launcher.nudge_speed", self.nudge_speed)?;
        if self.acceptable_distance < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "launcher.acceptable_distance",
                value: self.acceptable_distance,
            });
        }
        self.arc.validate()
    }
}

/// Enemy agent tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub max_health: f32,
    pub min_recovery_secs: f32,
    pub max_recovery_secs: f32,
    pub stagger_secs: f32,
    pub stagger_distance: f32,
    pub despawn_velocity_threshold: f32,
    pub despawn_angular_velocity_threshold: f32,
    pub threshold_growth: f32,
    pub fall_death_speed: f32,
    pub mesh_snap_distance: f32,
    pub mesh_sample_radius: f32,
    pub lost_launch_delay_secs: f32,
    pub lost_behavior: LostBehavior,
    pub reorient_ticks: u32,
    pub sink_step: f32,
    pub launcher: LauncherConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_health: AGENT_MAX_HEALTH,
            min_recovery_secs: RAGDOLL_MIN_RECOVERY_SECS,
            max_recovery_secs: RAGDOLL_MAX_RECOVERY_SECS,
            stagger_secs: STAGGER_SECS,
            stagger_distance: STAGGER_DISTANCE,
            despawn_velocity_threshold: DESPAWN_VELOCITY_THRESHOLD,
            despawn_angular_velocity_threshold: DESPAWN_ANGULAR_VELOCITY_THRESHOLD,
            threshold_growth: THRESHOLD_GROWTH,
            fall_death_speed: FALL_DEATH_SPEED,
            mesh_snap_distance: MESH_SNAP_DISTANCE,
            mesh_sample_radius: MESH_SAMPLE_RADIUS,
            lost_launch_delay_secs: LOST_LAUNCH_DELAY_SECS,
            lost_behavior: LostBehavior::default(),
            reorient_ticks: REORIENT_TICKS,
            sink_step: SINK_STEP,
            launcher: LauncherConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("agent.max_health", self.max_health)?;
        positive("agent.max_recovery_secs", self.max_recovery_secs)?;
        positive("agent.sink_step", self.sink_step)?;
        positive("agent.mesh_sample_radius", self.mesh_sample_radius)?;
        if self.threshold_growth < 1.0 {
            return Err(ConfigError::InvertedRange {
                field: "agent.threshold_growth",
                min: 1.0,
                max: self.threshold_growth,
            });
        }
        if self.min_recovery_secs > self.max_recovery_secs {
            return Err(ConfigError::InvertedRange {
                field: "agent.recovery_secs",
                min: self.min_recovery_secs,
                max: self.max_recovery_secs,
            });
        }
        if self.reorient_ticks == 0 {
            return Err(ConfigError::NonPositive {
                field: "agent.reorient_ticks",
                value: 0.0,
            });
        }
        self.launcher.validate()
    }
}

/// Melee attacker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeConfig {
    pub damage: f32,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            damage: MELEE_DAMAGE,
        }
    }
}

/// Ranged attacker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedConfig {
    pub damage: f32,
    /// Muzzle speed limit. Caps the random nudge a shot gets when the arc
    /// solver has no answer.
    pub projectile_speed: f32,
    /// Wait between shots, drawn uniformly from `[min, max]` seconds.
    pub shoot_interval_secs: [f32; 2],
    pub aim_ticks: u32,
    pub history_len: usize,
    pub indicator_fade_ticks: u32,
    pub indicator_points: usize,
    pub arc: ArcShaping,
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            damage: RANGED_DAMAGE,
            projectile_speed: RANGED_PROJECTILE_SPEED,
            shoot_interval_secs: [RANGED_SHOOT_INTERVAL_MIN, RANGED_SHOOT_INTERVAL_MAX],
            aim_ticks: RANGED_AIM_TICKS,
            history_len: SNIPER_HISTORY_LEN,
            indicator_fade_ticks: INDICATOR_FADE_TICKS,
            indicator_points: INDICATOR_POINTS,
            arc: ArcShaping::default(),
        }
    }
}

impl RangedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ranged.projectile_speed", self.projectile_speed)?;
        let [min, max] = self.shoot_interval_secs;
        if min < 0.0 || min > max {
            return Err(ConfigError::InvertedRange {
                field: "ranged.shoot_interval_secs",
                min,
                max,
            });
        }
        if self.indicator_points < 2 {
            return Err(ConfigError::NonPositive {
                field: "ranged.indicator_points",
                value: self.indicator_points as f32,
            });
        }
        self.arc.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
