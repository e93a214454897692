//! Outcome events raised for the presentation layer.

use crate::auction::RoundEnd;
use crate::role::Role;
use crate::types::{AgentId, Position, SimTime};
use serde::Serialize;
use std::fmt;

/// Verdict of a door inquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorVerdict {
    /// A teammate was at the door
    FalseAlarm,
    /// Nobody vouched for the noise
    Investigate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwarmEvent {
    CoordinatorElected { agent: AgentId },
    RoundConcluded { coordinator: AgentId, end: RoundEnd, bids: usize },
    RoleChanged { agent: AgentId, role: Role },
    AssetCompromised { by: AgentId },
    DoorInquiry { agent: AgentId, door: Position, verdict: DoorVerdict },
    TargetCaptured { by: AgentId },
    TargetExtracted,
}

impl SwarmEvent {
    /// Capture and extraction end a run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwarmEvent::TargetCaptured { .. } | SwarmEvent::TargetExtracted
        )
    }
}

impl fmt::Display for SwarmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwarmEvent::CoordinatorElected { agent } => write!(f, "{} elected coordinator", agent),
            SwarmEvent::RoundConcluded {
                coordinator,
                end,
                bids,
            } => write!(f, "{} concluded round ({:?}, {} bids)", coordinator, end, bids),
            SwarmEvent::RoleChanged { agent, role } => write!(f, "{} -> {}", agent, role),
            SwarmEvent::AssetCompromised { by } => write!(f, "asset compromised (seen by {})", by),
            SwarmEvent::DoorInquiry {
                agent,
                door,
                verdict,
            } => write!(f, "{} door inquiry at {}: {:?}", agent, door, verdict),
            SwarmEvent::TargetCaptured { by } => write!(f, "target captured by {}", by),
            SwarmEvent::TargetExtracted => f.write_str("target extracted the asset"),
        }
    }
}

/// Event with the simulation time it was raised at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    pub at: SimTime,
    #[serde(flatten)]
    pub event: SwarmEvent,
}

/// Append-only event log
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<TimedEvent>,
}

impl EventLog {
    pub fn push(&mut self, at: SimTime, event: SwarmEvent) {
        self.events.push(TimedEvent { at, event });
    }

    pub fn events(&self) -> &[TimedEvent] {
        &self.events
    }

    pub fn has_terminal(&self) -> bool {
        self.events.iter().any(|e| e.event.is_terminal())
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SwarmEvent) -> bool,
    {
        self.events.iter().filter(|e| predicate(&e.event)).count()
    }
}
