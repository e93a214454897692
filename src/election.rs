//! Coordinator Election
//!
//! A detection claims the round-scoped coordinator slot, the claimant takes
//! Pursue for itself when the pursuer cap allows, and an auction round is
//! opened toward every other participant.

use crate::auction::AuctionRound;
use crate::config::SwarmConfig;
use crate::directory::{AgentDirectory, Capability};
use crate::error::SwarmError;
use crate::role::Role;
use crate::types::{AgentId, Position, SimTime};
use crate::world::{ClaimOutcome, SharedWorldState};
use tracing::{debug, info};

/// Who is asking and with what evidence
#[derive(Debug, Clone, Copy)]
pub struct ElectionRequest {
    pub candidate: AgentId,
    /// Where the candidate believes the target is
    pub sighted_at: Option<Position>,
    pub target_carries_asset: bool,
    pub now: SimTime,
}

#[derive(Debug)]
pub enum ElectionOutcome {
    Elected {
        round: AuctionRound,
        /// Candidate took Pursue; when false it bids in its own round
        self_assigned: bool,
        newly_compromised: bool,
    },
    /// Another coordinator runs a round; wait for its call for proposals
    CoordinatorActive(AgentId),
    CoolingDown,
}

/// Claim the coordinator slot and open a round.
///
/// The claim, the compromise update and the self-assignment happen before any
/// message leaves, so a second detector in the same tick finds the slot taken.
pub fn try_become_coordinator(
    request: ElectionRequest,
    world: &SharedWorldState,
    directory: &mut AgentDirectory,
    config: &SwarmConfig,
) -> Result<ElectionOutcome, SwarmError> {
    directory.get_or_error(request.candidate)?;

    if let Some(position) = request.sighted_at {
        world.record_target_position(position);
    }

    let newly_compromised = match world.try_claim_coordinator(
        request.candidate,
        request.target_carries_asset,
        request.now,
        config.election_cooldown,
    ) {
        ClaimOutcome::Claimed { newly_compromised } => newly_compromised,
        ClaimOutcome::Held(holder) => {
            debug!(agent = %request.candidate, coordinator = %holder, "Coordinator already active");
            return Ok(ElectionOutcome::CoordinatorActive(holder));
        }
        ClaimOutcome::CoolingDown => {
            debug!(agent = %request.candidate, "Election cooling down");
            return Ok(ElectionOutcome::CoolingDown);
        }
    };

    let current_pursuers = directory.holders_of(Role::Pursue, request.candidate).len();
    let self_assigned = current_pursuers < config.pursuer_cap;
    if self_assigned {
        directory.set_role(request.candidate, Role::Pursue)?;
    }

    let anchor = world
        .last_known_target()
        .or(request.sighted_at)
        .unwrap_or_else(|| {
            directory
                .get(request.candidate)
                .map(|r| r.position)
                .unwrap_or_default()
        });
    let recipients = directory.recipients(Capability::AuctionParticipant, request.candidate);

    info!(
        coordinator = %request.candidate,
        anchor = %anchor,
        recipients = recipients.len(),
        self_assigned,
        "Coordinator elected, opening auction"
    );

    let round = AuctionRound::new(
        request.candidate,
        anchor,
        recipients,
        request.now,
        config.bid_timeout,
    );
    Ok(ElectionOutcome::Elected {
        round,
        self_assigned,
        newly_compromised,
    })
}
