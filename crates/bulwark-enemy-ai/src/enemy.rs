//! An agent paired with the attack it carries out.

use rand::RngCore;

use bulwark_core::collaborators::{ColliderBounds, DefendedCore, NavAgent, RigidBody};
use bulwark_core::enums::{AiState, AttackKind, DamageEffect};
use bulwark_core::error::AgentError;
use bulwark_core::events::AgentEvent;
use bulwark_core::types::SimTime;

use crate::agent::AiAgent;
use crate::melee::MeleeAttacker;
use crate::ranged::{PathIndicator, Projectile, RangedAttacker};

#[derive(Debug, Clone)]
pub enum AttackBehavior {
    Melee(MeleeAttacker),
    Ranged(RangedAttacker),
}

impl AttackBehavior {
    pub fn kind(&self) -> AttackKind {
        match self {
            AttackBehavior::Melee(_) => AttackKind::Melee,
            AttackBehavior::Ranged(_) => AttackKind::Ranged,
        }
    }
}

/// Something an attack put into the world this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackEffect {
    Projectile(Projectile),
    Indicator(PathIndicator),
}

/// Outcome of one enemy tick.
#[derive(Debug, Default)]
pub struct EnemyTick {
    /// Agent events fired since the previous tick, in order.
    pub events: Vec<AgentEvent>,
    pub effects: Vec<AttackEffect>,
    /// The enemy is finished and should be removed.
    pub despawn: bool,
}

#[derive(Debug)]
pub struct Enemy<B, N, C> {
    pub agent: AiAgent<B, N, C>,
    pub attack: AttackBehavior,
}

impl<B, N, C> Enemy<B, N, C>
where
    B: RigidBody,
    N: NavAgent,
    C: ColliderBounds,
{
    pub fn new(agent: AiAgent<B, N, C>, attack: AttackBehavior) -> Self {
        Self { agent, attack }
    }

    pub fn id(&self) -> u32 {
        self.agent.id()
    }

    /// Pick the first destination. Same as leaving Idle.
    pub fn start(&mut self, core: &dyn DefendedCore, rng: &mut dyn RngCore) {
        self.seek(core, rng);
    }

    pub fn take_damage(&mut self, amount: f32, effect: DamageEffect) -> Result<bool, AgentError> {
        self.agent.take_damage(amount, effect)
    }

    pub fn tick(
        &mut self,
        time: &SimTime,
        core: &mut dyn DefendedCore,
        rng: &mut dyn RngCore,
    ) -> Result<EnemyTick, AgentError> {
        self.agent.tick(time, rng)?;

        let mut out = EnemyTick {
            events: self.agent.drain_events(),
            ..EnemyTick::default()
        };
        for event in out.events.iter().copied() {
            match event {
                AgentEvent::IdleExit => self.seek(core, rng),
                AgentEvent::Arrive => match &mut self.attack {
                    AttackBehavior::Melee(melee) => out.despawn |= melee.on_arrive(core),
                    AttackBehavior::Ranged(ranged) => ranged.on_arrive(self.agent.body(), core),
                },
                AgentEvent::Death => out.despawn = true,
                _ => {}
            }
        }

        if let AttackBehavior::Ranged(ranged) = &mut self.attack {
            let navigating = self.agent.state() == AiState::Navigating;
            if let Some(shot) = ranged.tick(navigating, self.agent.body_mut(), core, rng) {
                out.effects.push(AttackEffect::Indicator(shot.indicator));
                out.effects.push(AttackEffect::Projectile(shot.projectile));
            }
        }

        out.despawn |= self.agent.is_destroyed();
        Ok(out)
    }

    fn seek(&mut self, core: &dyn DefendedCore, rng: &mut dyn RngCore) {
        match &mut self.attack {
            AttackBehavior::Melee(melee) => melee.seek_slot(self.agent.nav_mut(), core, rng),
            AttackBehavior::Ranged(ranged) => ranged.seek_post(self.agent.nav_mut(), core, rng),
        }
    }
}
