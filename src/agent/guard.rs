//! Patrol guard: the auction-participating swarm member.

use super::door::{DoorInquiry, InquiryStep};
use super::{AgentContext, AgentStatus, SwarmAgent};
use crate::auction::{AuctionRound, Bid, RoundEnd};
use crate::bus::{Content, InformKind, Message, Protocol};
use crate::contract::{MovementActuator, Sighting, TargetDetector};
use crate::directory::Capability;
use crate::election::{try_become_coordinator, ElectionOutcome, ElectionRequest};
use crate::events::SwarmEvent;
use crate::role::{Directive, Role, RoleAssignment, RoleMachine, StepContext};
use crate::types::{AgentId, Position};
use tracing::{debug, info, warn};

pub struct GuardAgent {
    id: AgentId,
    name: String,
    machine: RoleMachine,
    mover: Box<dyn MovementActuator>,
    detector: Box<dyn TargetDetector>,
    round: Option<AuctionRound>,
    /// Camera evidence waiting for the next detection step
    relayed: Option<Position>,
    door: Option<DoorInquiry>,
}

impl GuardAgent {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        route: Vec<Position>,
        mover: Box<dyn MovementActuator>,
        detector: Box<dyn TargetDetector>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            machine: RoleMachine::new(Role::Patrol, route),
            mover,
            detector,
            round: None,
            relayed: None,
            door: None,
        }
    }

    pub fn machine(&self) -> &RoleMachine {
        &self.machine
    }

    pub fn round(&self) -> Option<&AuctionRound> {
        self.round.as_ref()
    }

    pub fn door_inquiry(&self) -> Option<&DoorInquiry> {
        self.door.as_ref()
    }

    fn bid_for(&self, anchor: &Position, ctx: &AgentContext<'_>) -> Bid {
        let here = self.mover.position();
        let to_asset = if ctx.world.is_asset_compromised() {
            f64::INFINITY
        } else {
            here.distance(&ctx.landmarks.asset().position())
        };
        Bid {
            to_target: here.distance(anchor),
            to_asset,
            to_exit: here.distance(&ctx.landmarks.extraction_point()),
        }
    }

    fn perceive(&mut self) -> Option<Sighting> {
        let relayed = self.relayed.take();
        self.detector
            .perceive(&self.mover.position())
            .or_else(|| {
                relayed.map(|position| Sighting {
                    position,
                    carries_asset: false,
                    relayed: true,
                })
            })
    }

    fn apply(&mut self, directives: Vec<Directive>, sighting: Option<Sighting>, ctx: &mut AgentContext<'_>) {
        for directive in directives {
            match directive {
                Directive::MoveTo(point) => self.mover.set_destination(point),
                Directive::SetSpeed(speed) => self.mover.set_speed(speed),
                Directive::Stop => self.mover.stop(),
                Directive::BroadcastTarget(position) => {
                    let pursuers = ctx.directory.holders_of(Role::Pursue, self.id);
                    ctx.broadcast(
                        &pursuers,
                        Content::Inform {
                            kind: InformKind::TargetSighted,
                            position,
                        },
                        Protocol::Pursuit,
                    );
                }
                Directive::ConfirmCompromise => {
                    if ctx.world.mark_asset_compromised() {
                        self.announce_compromise(ctx);
                    }
                }
                Directive::RequestElection => {
                    let carries = sighting.map_or(false, |s| s.carries_asset);
                    self.start_election(sighting.map(|s| s.position), carries, ctx);
                }
                Directive::Captured => {
                    if ctx.events.has_terminal() {
                        continue;
                    }
                    info!(agent = %self.id, "Target captured");
                    ctx.raise(SwarmEvent::TargetCaptured { by: self.id });
                }
            }
        }
    }

    fn announce_compromise(&mut self, ctx: &mut AgentContext<'_>) {
        info!(agent = %self.id, "Asset compromise confirmed");
        ctx.raise(SwarmEvent::AssetCompromised { by: self.id });
        let position = ctx
            .world
            .last_known_target()
            .unwrap_or_else(|| ctx.landmarks.asset().position());
        let peers = ctx.participants();
        ctx.broadcast(
            &peers,
            Content::Inform {
                kind: InformKind::AssetCompromised,
                position,
            },
            Protocol::Compromise,
        );
    }

    fn start_election(
        &mut self,
        sighted_at: Option<Position>,
        target_carries_asset: bool,
        ctx: &mut AgentContext<'_>,
    ) {
        let request = ElectionRequest {
            candidate: self.id,
            sighted_at,
            target_carries_asset,
            now: ctx.now,
        };
        let outcome = match try_become_coordinator(request, ctx.world, ctx.directory, ctx.config) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(agent = %self.id, error = %e, "Election failed");
                return;
            }
        };

        if let ElectionOutcome::Elected {
            mut round,
            self_assigned,
            newly_compromised,
        } = outcome
        {
            ctx.raise(SwarmEvent::CoordinatorElected { agent: self.id });
            if newly_compromised {
                self.announce_compromise(ctx);
            }
            if self_assigned {
                self.machine.assign(RoleAssignment::new(Role::Pursue));
                ctx.raise(SwarmEvent::RoleChanged {
                    agent: self.id,
                    role: Role::Pursue,
                });
            } else {
                let bid = self.bid_for(&round.anchor(), ctx);
                round.enter_initiator_bid(bid);
            }

            let anchor = round.anchor();
            let recipients = round.recipients().to_vec();
            ctx.broadcast(
                &recipients,
                Content::CallForProposal { anchor },
                Protocol::Auction,
            );
            self.round = Some(round);
        }
    }

    fn poll_round(&mut self, ctx: &mut AgentContext<'_>) {
        let end = match &self.round {
            Some(round) => round.ready(ctx.now),
            None => return,
        };
        if let Some(end) = end {
            self.conclude_round(end, ctx);
        }
    }

    fn conclude_round(&mut self, end: RoundEnd, ctx: &mut AgentContext<'_>) {
        let Some(round) = self.round.take() else {
            return;
        };
        let chokepoints = ctx.landmarks.chokepoints();
        let outcome = round.conclude(
            end,
            ctx.directory,
            &chokepoints,
            ctx.world.is_asset_compromised(),
            ctx.config.pursuer_cap,
        );

        if !outcome.missing.is_empty() {
            warn!(coordinator = %self.id, missing = ?outcome.missing, "Round concluded without some bids");
        }
        for assignment in &outcome.assignments {
            if assignment.agent == self.id {
                self.take_own_assignment(assignment.assignment, ctx);
            } else {
                ctx.send(
                    assignment.agent,
                    Content::AssignRole(assignment.assignment),
                    Protocol::Auction,
                );
            }
        }

        ctx.world.release_coordinator(self.id, ctx.now);
        info!(
            coordinator = %self.id,
            end = ?end,
            bids = round.bid_count(),
            expected = round.expected_bids(),
            "Auction round concluded"
        );
        ctx.raise(SwarmEvent::RoundConcluded {
            coordinator: self.id,
            end,
            bids: round.bid_count(),
        });
    }

    /// The coordinator's own outcome applies whatever role it held when it
    /// entered its bid
    fn take_own_assignment(&mut self, assignment: RoleAssignment, ctx: &mut AgentContext<'_>) {
        let current = self.machine.role();
        self.machine.assign(assignment);
        if let Err(e) = ctx.directory.set_role(self.id, assignment.role) {
            warn!(agent = %self.id, error = %e, "Directory role update failed");
        }
        if current != assignment.role {
            ctx.raise(SwarmEvent::RoleChanged {
                agent: self.id,
                role: assignment.role,
            });
        }
    }

    fn poll_door(&mut self, ctx: &mut AgentContext<'_>) {
        let Some(inquiry) = self.door.as_mut() else {
            return;
        };
        let door = inquiry.door();
        let step = inquiry.poll(ctx.now);
        if inquiry.is_finished() {
            self.door = None;
        }
        match step {
            Some(InquiryStep::Decided(verdict)) => {
                debug!(agent = %self.id, door = %door, verdict = ?verdict, "Door inquiry decided");
                ctx.raise(SwarmEvent::DoorInquiry {
                    agent: self.id,
                    door,
                    verdict,
                });
            }
            Some(InquiryStep::Investigate(door)) => {
                let directives = self.machine.investigate(door);
                self.apply(directives, None, ctx);
            }
            None => {}
        }
    }
}

impl SwarmAgent for GuardAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::AuctionParticipant
    }

    fn status(&self) -> AgentStatus {
        AgentStatus {
            position: self.mover.position(),
            role: self.machine.role(),
        }
    }

    fn is_coordinator(&self) -> bool {
        self.round.is_some()
    }

    fn assign_role(&mut self, assignment: RoleAssignment, ctx: &mut AgentContext<'_>) {
        let current = self.machine.role();
        if !current.is_available_for_assignment() {
            debug!(agent = %self.id, role = %current, "Ignoring assignment while holding a round role");
            return;
        }
        self.machine.assign(assignment);
        if let Err(e) = ctx.directory.set_role(self.id, assignment.role) {
            warn!(agent = %self.id, error = %e, "Directory role update failed");
        }
        if current != assignment.role {
            ctx.raise(SwarmEvent::RoleChanged {
                agent: self.id,
                role: assignment.role,
            });
        }
    }

    fn receive(&mut self, message: Message, ctx: &mut AgentContext<'_>) {
        debug!(agent = %self.id, from = %message.sender, performative = %message.performative(), "Handling message");
        match message.content {
            Content::CallForProposal { anchor } => {
                if self.round.is_some() {
                    debug!(agent = %self.id, "Coordinator ignores call for proposals");
                    return;
                }
                let bid = self.bid_for(&anchor, ctx);
                ctx.send(message.sender, Content::Propose(bid), Protocol::Auction);
            }
            Content::Propose(bid) => {
                if ctx.world.coordinator() != Some(self.id) {
                    warn!(agent = %self.id, from = %message.sender, "Bid received while not coordinator");
                    return;
                }
                let complete = match self.round.as_mut() {
                    Some(round) => round.accept_bid(message.sender, bid) && round.is_complete(),
                    None => false,
                };
                if complete {
                    self.conclude_round(RoundEnd::AllBidsIn, ctx);
                }
            }
            Content::AssignRole(assignment) => self.assign_role(assignment, ctx),
            Content::SensorAlert { position } => {
                debug!(agent = %self.id, position = %position, "Camera alert relayed");
                self.relayed = Some(position);
            }
            Content::DoorAsk { door } => {
                if self.mover.position().distance(&door) <= ctx.config.door_confirm_radius {
                    ctx.send(message.sender, Content::DoorConfirm { door }, Protocol::DoorInquiry);
                }
            }
            Content::DoorConfirm { door } => {
                if let Some(inquiry) = self.door.as_mut() {
                    inquiry.confirm(&door);
                }
            }
            Content::Inform { .. } => self.process_mailbox(vec![message], ctx),
        }
    }

    fn process_mailbox(&mut self, messages: Vec<Message>, _ctx: &mut AgentContext<'_>) {
        for message in messages {
            match message.content {
                Content::Inform {
                    kind: InformKind::TargetSighted,
                    position,
                } => self.machine.note_report(position),
                Content::Inform {
                    kind: InformKind::AssetCompromised,
                    ..
                } => {
                    debug!(agent = %self.id, from = %message.sender, "Peer reported asset compromised");
                }
                other => {
                    debug!(agent = %self.id, performative = %other.performative(), "Unexpected buffered message");
                }
            }
        }
    }

    fn step(&mut self, ctx: &mut AgentContext<'_>) {
        let sighting = self.perceive();
        if let Some(s) = sighting {
            ctx.world.record_target_position(s.position);
        }

        let step_ctx = StepContext {
            now: ctx.now,
            config: ctx.config,
            position: self.mover.position(),
            arrived: self.mover.has_arrived(ctx.config.arrival_threshold),
            sighting,
            last_known_target: ctx.world.last_known_target(),
            asset_compromised: ctx.world.is_asset_compromised(),
            landmarks: ctx.landmarks,
        };
        let directives = self.machine.step(&step_ctx);
        self.apply(directives, sighting, ctx);
        if let Err(e) = ctx.directory.set_role(self.id, self.machine.role()) {
            warn!(agent = %self.id, error = %e, "Directory role update failed");
        }

        if let Some(s) = sighting {
            let role = self.machine.role();
            if ctx.world.coordinator().is_none() && !role.is_round_scoped() {
                self.start_election(Some(s.position), s.carries_asset, ctx);
            }
        }

        self.poll_round(ctx);
        self.poll_door(ctx);
    }

    fn advance(&mut self, dt: f64) {
        self.mover.advance(dt);
    }

    fn hear_loud_event(&mut self, at: Position, ctx: &mut AgentContext<'_>) {
        if self.door.is_some() {
            return;
        }
        if self.mover.position().distance(&at) <= ctx.config.door_confirm_radius {
            // our own noise
            return;
        }
        debug!(agent = %self.id, door = %at, "Loud event heard, asking teammates");
        self.door = Some(DoorInquiry::open(at, ctx.now, ctx.config));
        let peers = ctx.participants();
        ctx.broadcast(&peers, Content::DoorAsk { door: at }, Protocol::DoorInquiry);
    }
}
