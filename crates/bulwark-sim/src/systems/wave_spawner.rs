//! Wave spawning system: releases scheduled groups of enemies.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use bulwark_core::enums::{AiState, AttackKind};

use crate::config::WaveConfig;

/// A single scheduled wave.
#[derive(Debug, Clone)]
pub struct WaveEntry {
    pub wave: WaveConfig,
    /// Whether this wave has already been spawned.
    pub spawned: bool,
}

/// The complete wave schedule for a run.
#[derive(Debug, Clone, Default)]
pub struct WaveSchedule {
    pub waves: Vec<WaveEntry>,
}

/// One enemy to place in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: AttackKind,
    pub position: Vec3,
    pub initial_state: AiState,
}

impl WaveSchedule {
    pub fn new(waves: &[WaveConfig]) -> Self {
        Self {
            waves: waves
                .iter()
                .cloned()
                .map(|wave| WaveEntry {
                    wave,
                    spawned: false,
                })
                .collect(),
        }
    }

    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves.iter().map(|w| w.wave.count).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.waves.iter().all(|w| w.spawned)
    }
}

/// Check the schedule and return the enemies due this tick.
pub fn run(
    schedule: &mut WaveSchedule,
    rng: &mut ChaCha8Rng,
    current_tick: u64,
) -> Vec<SpawnRequest> {
    let mut requests = Vec::new();
    for entry in &mut schedule.waves {
        if entry.spawned || current_tick < entry.wave.spawn_at_tick {
            continue;
        }
        let wave = &entry.wave;
        for _ in 0..wave.count {
            let offset = if wave.spread > 0.0 {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let radius = wave.spread * rng.gen::<f32>().sqrt();
                Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
            } else {
                Vec3::ZERO
            };
            requests.push(SpawnRequest {
                kind: wave.kind,
                position: wave.spawn + offset,
                initial_state: wave.initial_state,
            });
        }
        entry.spawned = true;
    }
    requests
}
