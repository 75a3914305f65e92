//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy AI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Following a navigation path.
    #[default]
    Navigating,
    /// Righting itself and lifting back onto the navigable surface.
    PreNavigating,
    /// Movement governed by the physics simulation.
    Ragdolled,
    /// Frozen in place until released externally.
    Idle,
    /// Brief forced retreat.
    Staggered,
    /// Off the navigable surface after a ragdoll.
    Lost,
    /// Killed, falling under physics until settled.
    DyingFall,
    /// Sinking into the ground before removal.
    DyingDecay,
}

impl AiState {
    /// Dying states accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, AiState::DyingFall | AiState::DyingDecay)
    }

    /// An agent may only be spawned navigating or ragdolled.
    pub fn is_valid_initial(self) -> bool {
        matches!(self, AiState::Navigating | AiState::Ragdolled)
    }

    /// States whose body is moved kinematically rather than by physics.
    pub fn is_nav_driven(self) -> bool {
        matches!(
            self,
            AiState::Navigating | AiState::PreNavigating | AiState::Staggered
        )
    }

    /// States that let the physics simulation move the body freely.
    pub fn is_physics_driven(self) -> bool {
        matches!(self, AiState::Ragdolled | AiState::DyingFall)
    }
}

/// Secondary effect carried by a damage event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageEffect {
    #[default]
    None,
    /// Knock the agent into a ragdoll.
    Ragdoll,
    /// Push the agent back a short distance.
    Stagger,
}

/// What an agent does when it ends up off the navigable surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LostBehavior {
    /// Launch ballistically back onto the last sampled mesh point.
    #[default]
    CannonballToMesh,
    /// Freeze and report `LostIdle`.
    Idle,
    /// Sink into the ground and despawn.
    Die,
}

/// Which attack an enemy carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    #[default]
    Melee,
    Ranged,
}
