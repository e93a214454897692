//! Swarm Agents
//!
//! Every swarm member implements `SwarmAgent`. The scheduler only ever sees
//! the trait; auction eligibility comes from the capability, never from the
//! concrete type.

pub mod door;
pub mod guard;
pub mod sensor;

pub use door::{DoorInquiry, InquiryStep};
pub use guard::GuardAgent;
pub use sensor::CameraAgent;

use crate::bus::{Content, Message, Outbox, Protocol};
use crate::config::SwarmConfig;
use crate::contract::LandmarkResolver;
use crate::directory::{AgentDirectory, Capability};
use crate::events::{EventLog, SwarmEvent};
use crate::role::{Role, RoleAssignment};
use crate::types::{AgentId, Position, SimTime};
use crate::world::SharedWorldState;

/// Externally visible state of an agent, mirrored into the directory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentStatus {
    pub position: Position,
    pub role: Role,
}

/// Everything an agent may touch during one step or handler
pub struct AgentContext<'a> {
    pub now: SimTime,
    pub config: &'a SwarmConfig,
    pub world: &'a SharedWorldState,
    pub directory: &'a mut AgentDirectory,
    pub landmarks: &'a dyn LandmarkResolver,
    pub outbox: &'a mut Outbox,
    pub events: &'a mut EventLog,
}

impl AgentContext<'_> {
    pub fn send(&mut self, receiver: AgentId, content: Content, protocol: Protocol) {
        self.outbox.send(receiver, content, protocol);
    }

    pub fn broadcast(&mut self, receivers: &[AgentId], content: Content, protocol: Protocol) {
        for receiver in receivers {
            self.outbox.send(*receiver, content.clone(), protocol);
        }
    }

    /// Every auction participant other than the sender
    pub fn participants(&self) -> Vec<AgentId> {
        self.directory
            .recipients(Capability::AuctionParticipant, self.outbox.sender())
    }

    pub fn raise(&mut self, event: SwarmEvent) {
        self.events.push(self.now, event);
    }
}

/// Behavior contract of a swarm member
pub trait SwarmAgent: Send {
    fn id(&self) -> AgentId;

    fn name(&self) -> &str;

    fn capability(&self) -> Capability;

    fn is_auction_eligible(&self) -> bool {
        self.capability() == Capability::AuctionParticipant
    }

    fn status(&self) -> AgentStatus;

    /// True while this agent owns an open auction round
    fn is_coordinator(&self) -> bool {
        false
    }

    /// Apply a role decided by an auction
    fn assign_role(&mut self, _assignment: RoleAssignment, _ctx: &mut AgentContext<'_>) {}

    /// Handle a protocol-critical message within the tick it was sent
    fn receive(&mut self, message: Message, ctx: &mut AgentContext<'_>);

    /// Consume the informs buffered since the last drain
    fn process_mailbox(&mut self, messages: Vec<Message>, ctx: &mut AgentContext<'_>);

    /// One update pass
    fn step(&mut self, ctx: &mut AgentContext<'_>);

    /// Move the body by one tick
    fn advance(&mut self, _dt: f64) {}

    /// A loud noise such as a door was heard at `at`
    fn hear_loud_event(&mut self, _at: Position, _ctx: &mut AgentContext<'_>) {}
}
