//! Melee attacker: walk to a slot next to the core, hit it once, leave.

use glam::Vec3;
use rand::RngCore;
use tracing::debug;

use bulwark_core::collaborators::{DefendedCore, NavAgent};
use bulwark_core::config::MeleeConfig;

#[derive(Debug, Clone)]
pub struct MeleeAttacker {
    config: MeleeConfig,
    slot: Option<Vec3>,
    has_hit: bool,
}

impl MeleeAttacker {
    pub fn new(config: MeleeConfig) -> Self {
        Self {
            config,
            slot: None,
            has_hit: false,
        }
    }

    pub fn slot(&self) -> Option<Vec3> {
        self.slot
    }

    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    /// Pick a random melee slot and path to it.
    pub fn seek_slot(
        &mut self,
        nav: &mut dyn NavAgent,
        core: &dyn DefendedCore,
        rng: &mut dyn RngCore,
    ) {
        let slot = core.random_attack_slot(rng);
        nav.set_destination(slot);
        self.slot = Some(slot);
    }

    /// Hit the core on arrival. Returns true when the attacker is spent and
    /// should be removed.
    pub fn on_arrive(&mut self, core: &mut dyn DefendedCore) -> bool {
        if self.has_hit || self.slot.is_none() {
            return false;
        }
        core.take_damage(self.config.damage);
        self.has_hit = true;
        debug!(damage = self.config.damage, "melee attacker hit the core");
        true
    }
}
