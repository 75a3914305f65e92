//! Enemy AI system: ticks every agent and turns its output into world changes.

use std::collections::BTreeMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use bulwark_core::error::AgentError;
use bulwark_core::events::AgentEvent;
use bulwark_core::state::SimStats;
use bulwark_core::types::SimTime;
use bulwark_enemy_ai::AttackEffect;

use crate::defended::Core;
use crate::engine::SimEnemy;

/// Tick all enemies in id order. Released shots become projectile and
/// indicator entities; finished enemies are listed in `removed`.
pub fn run(
    enemies: &mut BTreeMap<u32, SimEnemy>,
    world: &mut World,
    core: &mut Core,
    time: &SimTime,
    rng: &mut ChaCha8Rng,
    stats: &mut SimStats,
    removed: &mut Vec<u32>,
) -> Result<(), AgentError> {
    removed.clear();

    for (&id, enemy) in enemies.iter_mut() {
        let tick = enemy.tick(time, core, rng)?;

        for effect in tick.effects {
            match effect {
                AttackEffect::Projectile(projectile) => {
                    world.spawn((projectile,));
                    stats.projectiles_fired += 1;
                }
                AttackEffect::Indicator(indicator) => {
                    world.spawn((indicator,));
                }
            }
        }

        if tick.despawn {
            if tick.events.contains(&AgentEvent::Death) {
                stats.kills += 1;
                info!(enemy = id, kills = stats.kills, "enemy killed");
            } else {
                stats.melee_hits += 1;
                debug!(enemy = id, "melee attacker spent");
            }
            removed.push(id);
        }
    }
    Ok(())
}
