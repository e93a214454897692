//! Auction Engine
//!
//! Contract-net round owned by the coordinator: call for proposals, bid
//! collection bounded by a deadline, then greedy role assignment.

pub mod assign;

pub use assign::{assign_roles, nearest_chokepoints, Assignment, AssignmentInput, Candidate};

use crate::directory::AgentDirectory;
use crate::role::Role;
use crate::types::{AgentId, Deadline, Position, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Distances reported by a bidder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub to_target: f64,
    /// Infinite once the asset is compromised
    pub to_asset: f64,
    pub to_exit: f64,
}

/// Why a round stopped collecting bids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    AllBidsIn,
    TimedOut,
}

/// Result of concluding a round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub initiator: AgentId,
    pub end: RoundEnd,
    pub assignments: Vec<Assignment>,
    /// Recipients that never replied
    pub missing: Vec<AgentId>,
}

/// One contract-net round
#[derive(Debug, Clone)]
pub struct AuctionRound {
    initiator: AgentId,
    anchor: Position,
    recipients: Vec<AgentId>,
    bids: HashMap<AgentId, Bid>,
    initiator_bid: Option<Bid>,
    started_at: SimTime,
    deadline: Deadline,
    expected_bids: usize,
}

impl AuctionRound {
    /// Open a round; one bid is expected from every recipient
    pub fn new(
        initiator: AgentId,
        anchor: Position,
        recipients: Vec<AgentId>,
        now: SimTime,
        bid_timeout: f64,
    ) -> Self {
        let expected_bids = recipients.len();
        Self {
            initiator,
            anchor,
            recipients,
            bids: HashMap::new(),
            initiator_bid: None,
            started_at: now,
            deadline: Deadline::after(now, bid_timeout),
            expected_bids,
        }
    }

    pub fn initiator(&self) -> AgentId {
        self.initiator
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn recipients(&self) -> &[AgentId] {
        &self.recipients
    }

    pub fn started_at(&self) -> SimTime {
        self.started_at
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn expected_bids(&self) -> usize {
        self.expected_bids
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    pub fn bids(&self) -> &HashMap<AgentId, Bid> {
        &self.bids
    }

    /// Record a reply. Only the first bid from each called agent counts.
    pub fn accept_bid(&mut self, from: AgentId, bid: Bid) -> bool {
        if from == self.initiator || !self.recipients.contains(&from) {
            warn!(initiator = %self.initiator, from = %from, "Ignoring bid from agent outside the round");
            return false;
        }
        if self.bids.contains_key(&from) {
            debug!(from = %from, "Duplicate bid ignored");
            return false;
        }
        debug!(
            initiator = %self.initiator,
            from = %from,
            to_target = bid.to_target,
            to_asset = bid.to_asset,
            to_exit = bid.to_exit,
            received = self.bids.len() + 1,
            expected = self.expected_bids,
            "Bid accepted"
        );
        self.bids.insert(from, bid);
        true
    }

    /// Make the initiator a candidate of its own round. Used when it could
    /// not take Pursue for itself.
    pub fn enter_initiator_bid(&mut self, bid: Bid) {
        self.initiator_bid = Some(bid);
    }

    pub fn is_complete(&self) -> bool {
        self.bids.len() >= self.expected_bids
    }

    pub fn is_expired(&self, now: SimTime) -> bool {
        self.deadline.expired(now)
    }

    /// Ready when every bid is in or the deadline passed
    pub fn ready(&self, now: SimTime) -> Option<RoundEnd> {
        if self.is_complete() {
            Some(RoundEnd::AllBidsIn)
        } else if self.is_expired(now) {
            Some(RoundEnd::TimedOut)
        } else {
            None
        }
    }

    /// Compute role assignments for every reassignable participant.
    ///
    /// Candidates are the auction participants that currently hold Patrol or
    /// Idle, in registration order. An initiator that entered its own bid is
    /// a candidate whatever role it holds.
    pub fn conclude(
        &self,
        end: RoundEnd,
        directory: &AgentDirectory,
        chokepoints: &[Position],
        asset_compromised: bool,
        pursuer_cap: usize,
    ) -> RoundOutcome {
        let candidates: Vec<Candidate> = directory
            .list_all()
            .filter(|r| {
                if r.id == self.initiator {
                    return self.initiator_bid.is_some();
                }
                r.is_auction_participant() && r.role.is_available_for_assignment()
            })
            .map(|r| Candidate {
                id: r.id,
                position: r.position,
            })
            .collect();

        let mut bids = self.bids.clone();
        if let Some(bid) = self.initiator_bid {
            bids.insert(self.initiator, bid);
        }

        let input = AssignmentInput {
            candidates: &candidates,
            bids: &bids,
            current_pursuers: directory.count_with_role(Role::Pursue),
            pursuer_cap,
            asset_compromised,
            chokepoints,
            anchor: self.anchor,
        };
        let assignments = assign_roles(&input);

        let missing = self
            .recipients
            .iter()
            .filter(|id| !self.bids.contains_key(id))
            .copied()
            .collect();

        RoundOutcome {
            initiator: self.initiator,
            end,
            assignments,
            missing,
        }
    }
}
