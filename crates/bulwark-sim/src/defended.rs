//! The core under attack.

use glam::Vec3;
use tracing::info;

use bulwark_core::collaborators::DefendedCore;
use bulwark_core::state::CoreView;

use crate::config::CoreConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Core {
    position: Vec3,
    radius: f32,
    health: f32,
    max_health: f32,
    attack_slots: Vec<Vec3>,
    ranged_attack_slots: Vec<Vec3>,
}

impl Core {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            position: config.position,
            radius: config.radius,
            health: config.health,
            max_health: config.health,
            attack_slots: config.attack_slots.clone(),
            ranged_attack_slots: config.ranged_attack_slots.clone(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn view(&self) -> CoreView {
        CoreView {
            position: self.position,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

impl DefendedCore for Core {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn take_damage(&mut self, amount: f32) {
        if self.is_destroyed() {
            return;
        }
        self.health = (self.health - amount).max(0.0);
        if self.is_destroyed() {
            info!("core destroyed");
        }
    }

    fn attack_slots(&self) -> &[Vec3] {
        &self.attack_slots
    }

    fn ranged_attack_slots(&self) -> &[Vec3] {
        &self.ranged_attack_slots
    }
}
