//! Notifications emitted by enemy agents, and the observer list that carries them.

use serde::{Deserialize, Serialize};

/// Zero-argument notification fired by an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentEvent {
    /// Sink sequence finished; the agent is gone.
    Death,
    /// Agent was killed and began falling.
    DyingFall,
    /// Agent began sinking into the ground.
    DyingDecay,
    /// Agent took non-lethal or lethal damage.
    Damage,
    /// Navigation reached its destination.
    Arrive,
    /// Agent left the Idle state.
    IdleExit,
    /// Agent froze after getting lost.
    LostIdle,
}

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

/// Ordered multicast list of fire-and-forget subscribers.
#[derive(Default)]
pub struct Signal {
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut()>)>,
    next_id: u32,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Subscribers are called in subscription order.
    pub fn subscribe(&mut self, f: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Call every subscriber once.
    pub fn emit(&mut self) {
        for (_, f) in &mut self.subscribers {
            f();
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// One [`Signal`] per agent notification.
#[derive(Debug, Default)]
pub struct AgentSignals {
    pub on_death: Signal,
    pub on_dying_fall: Signal,
    pub on_dying_decay: Signal,
    pub on_damage: Signal,
    pub on_arrive: Signal,
    pub on_idle_exit: Signal,
    pub on_lost_idle: Signal,
}

impl AgentSignals {
    pub fn get_mut(&mut self, event: AgentEvent) -> &mut Signal {
        match event {
            AgentEvent::Death => &mut self.on_death,
            AgentEvent::DyingFall => &mut self.on_dying_fall,
            AgentEvent::DyingDecay => &mut self.on_dying_decay,
            AgentEvent::Damage => &mut self.on_damage,
            AgentEvent::Arrive => &mut self.on_arrive,
            AgentEvent::IdleExit => &mut self.on_idle_exit,
            AgentEvent::LostIdle => &mut self.on_lost_idle,
        }
    }

    pub fn emit(&mut self, event: AgentEvent) {
        self.get_mut(event).emit();
    }
}
