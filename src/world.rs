//! Shared world state
//!
//! The coordinator slot and the asset-compromised flag are the only
//! process-wide mutable facts. Both live behind one mutex so that every
//! check-and-set is a single critical section, whichever thread or agent
//! performs it.

use crate::types::{AgentId, Position, SimTime};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

/// Result of an attempt to take the coordinator slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Caller now holds the slot; `newly_compromised` is set when this claim
    /// flipped the asset flag
    Claimed { newly_compromised: bool },
    /// Another agent already coordinates a round
    Held(AgentId),
    /// The previous round ended too recently
    CoolingDown,
}

/// Point-in-time copy of the shared facts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub coordinator: Option<AgentId>,
    pub asset_compromised: bool,
    pub last_known_target: Option<Position>,
    pub compromise_transitions: u32,
    pub rounds_started: u32,
}

#[derive(Debug, Default)]
struct WorldInner {
    coordinator: Option<AgentId>,
    asset_compromised: bool,
    last_known_target: Option<Position>,
    compromise_transitions: u32,
    rounds_started: u32,
    last_round_ended_at: Option<SimTime>,
}

/// Process-wide swarm facts, shared through `Arc`
#[derive(Debug, Default)]
pub struct SharedWorldState {
    inner: Mutex<WorldInner>,
}

impl SharedWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the coordinator slot if it is free and the cooldown has passed.
    ///
    /// `compromise_evidence` is folded into the same critical section so the
    /// claim and the monotonic flag update are observed together.
    pub fn try_claim_coordinator(
        &self,
        candidate: AgentId,
        compromise_evidence: bool,
        now: SimTime,
        cooldown: f64,
    ) -> ClaimOutcome {
        let mut inner = self.inner.lock();

        if let Some(holder) = inner.coordinator {
            return ClaimOutcome::Held(holder);
        }
        if let Some(ended) = inner.last_round_ended_at {
            if cooldown > 0.0 && now < ended + cooldown {
                return ClaimOutcome::CoolingDown;
            }
        }

        inner.coordinator = Some(candidate);
        inner.rounds_started += 1;
        let newly_compromised = compromise_evidence && Self::set_compromised(&mut inner);
        info!(agent = %candidate, newly_compromised, "Coordinator slot claimed");
        ClaimOutcome::Claimed { newly_compromised }
    }

    /// Release the slot at the end of a round. Only the holder can release it.
    pub fn release_coordinator(&self, holder: AgentId, now: SimTime) -> bool {
        let mut inner = self.inner.lock();
        if inner.coordinator != Some(holder) {
            return false;
        }
        inner.coordinator = None;
        inner.last_round_ended_at = Some(now);
        info!(agent = %holder, "Coordinator slot released");
        true
    }

    /// Clear the slot when its holder leaves the swarm; no cooldown is started
    pub fn clear_coordinator_if(&self, holder: AgentId) -> bool {
        let mut inner = self.inner.lock();
        if inner.coordinator == Some(holder) {
            inner.coordinator = None;
            info!(agent = %holder, "Coordinator removed mid-round, slot cleared");
            true
        } else {
            false
        }
    }

    pub fn coordinator(&self) -> Option<AgentId> {
        self.inner.lock().coordinator
    }

    /// Set the compromise flag; returns true only for the call that flipped it
    pub fn mark_asset_compromised(&self) -> bool {
        let mut inner = self.inner.lock();
        Self::set_compromised(&mut inner)
    }

    pub fn is_asset_compromised(&self) -> bool {
        self.inner.lock().asset_compromised
    }

    pub fn record_target_position(&self, position: Position) {
        self.inner.lock().last_known_target = Some(position);
    }

    pub fn last_known_target(&self) -> Option<Position> {
        self.inner.lock().last_known_target
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let inner = self.inner.lock();
        WorldSnapshot {
            coordinator: inner.coordinator,
            asset_compromised: inner.asset_compromised,
            last_known_target: inner.last_known_target,
            compromise_transitions: inner.compromise_transitions,
            rounds_started: inner.rounds_started,
        }
    }

    fn set_compromised(inner: &mut WorldInner) -> bool {
        if inner.asset_compromised {
            return false;
        }
        inner.asset_compromised = true;
        inner.compromise_transitions += 1;
        info!("Asset marked compromised");
        true
    }
}
