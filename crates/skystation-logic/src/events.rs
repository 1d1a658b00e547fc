//! Fire-and-forget notifications the engine posts to the outside world.
//!
//! The engine only ever calls [`MessageBus::post`]; delivery, achievements
//! and player messaging belong to whoever implements the bus.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PersonDied { person_id: u64, name: String, cause: DeathCause },
    PeripheralBroken { peripheral_id: u32 },
    PerfectDnaFound { box_id: u32 },
    IncomeReceived { amount: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    PoorHealth,
    OldAge,
}

pub trait MessageBus {
    fn post(&mut self, event: GameEvent);
}

/// Bus that simply keeps everything posted to it.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deaths(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::PersonDied { .. }))
            .count()
    }
}

impl MessageBus for EventLog {
    fn post(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
