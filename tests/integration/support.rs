#![allow(dead_code)]

use std::sync::Arc;

use patrol_swarm::agent::{AgentContext, AgentStatus, CameraAgent, GuardAgent, SwarmAgent};
use patrol_swarm::bus::{Content, Message, Protocol};
use patrol_swarm::config::SwarmConfig;
use patrol_swarm::directory::Capability;
use patrol_swarm::events::SwarmEvent;
use patrol_swarm::role::{Role, RoleAssignment};
use patrol_swarm::sim::{shared_target, KinematicMover, RangeDetector, SharedTarget, StaticLandmarks};
use patrol_swarm::swarm::Swarm;
use patrol_swarm::types::{AgentId, Position};

pub const DT: f64 = 0.1;
pub const SIGHT: f64 = 2.5;

pub fn pos(x: f64, z: f64) -> Position {
    Position::new(x, 0.0, z)
}

pub fn asset() -> Position {
    pos(0.0, 25.0)
}

pub fn exit() -> Position {
    pos(0.0, -25.0)
}

/// A swarm over fixed landmarks with a hand-placed target
pub struct Field {
    pub swarm: Swarm,
    pub target: SharedTarget,
    pub landmarks: Arc<StaticLandmarks>,
}

impl Field {
    pub fn new(target_at: Position) -> Self {
        Self::with(SwarmConfig::default(), Vec::new(), target_at)
    }

    pub fn with(config: SwarmConfig, chokepoints: Vec<Position>, target_at: Position) -> Self {
        let target = shared_target(target_at);
        let landmarks =
            Arc::new(StaticLandmarks::new(asset(), exit(), chokepoints).with_target(target.clone()));
        let swarm = Swarm::new(config, landmarks.clone());
        Self {
            swarm,
            target,
            landmarks,
        }
    }

    pub fn guard(&mut self, name: &str, at: Position) -> AgentId {
        let target = self.target.clone();
        let speed = self.swarm.config().patrol_speed;
        self.swarm.add_agent(|id| {
            Box::new(GuardAgent::new(
                id,
                name,
                Vec::new(),
                Box::new(KinematicMover::new(at, speed)),
                Box::new(RangeDetector::new(target, SIGHT, 0.0)),
            ))
        })
    }

    pub fn camera(&mut self, name: &str, at: Position, guard: Option<AgentId>) -> AgentId {
        let target = self.target.clone();
        self.swarm.add_agent(|id| {
            Box::new(CameraAgent::new(
                id,
                name,
                at,
                Box::new(RangeDetector::new(target, 10.0, 0.0)),
                guard,
            ))
        })
    }

    pub fn mute(&mut self, name: &str, at: Position) -> AgentId {
        self.swarm.add_agent(|id| {
            Box::new(MuteGuard {
                id,
                name: name.to_string(),
                position: at,
            })
        })
    }

    pub fn move_target(&self, to: Position) {
        self.target.write().position = to;
    }

    pub fn set_carrying(&self, carrying: bool) {
        self.target.write().carrying_asset = carrying;
    }

    /// Tick `n` times, checking the single-coordinator invariant after each tick
    pub fn run(&mut self, n: usize) {
        for _ in 0..n {
            self.swarm.tick(DT);
            assert!(
                self.swarm.coordinators().len() <= 1,
                "more than one coordinator at t={}",
                self.swarm.now()
            );
        }
    }

    pub fn role(&self, id: AgentId) -> Role {
        self.swarm.role_of(id).expect("agent registered")
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SwarmEvent) -> bool,
    {
        self.swarm.events().count(predicate)
    }

    /// Hand an agent a role as if a coordinator had sent it
    pub fn assign(&mut self, from: AgentId, to: AgentId, assignment: RoleAssignment) {
        self.swarm.deliver(Message {
            sender: from,
            receiver: to,
            protocol: Protocol::Auction,
            content: Content::AssignRole(assignment),
        });
    }
}

/// Auction participant that never answers anything
pub struct MuteGuard {
    id: AgentId,
    name: String,
    position: Position,
}

impl SwarmAgent for MuteGuard {
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
            position: self.position,
            role: Role::Patrol,
        }
    }

    fn receive(&mut self, _message: Message, _ctx: &mut AgentContext<'_>) {}

    fn process_mailbox(&mut self, _messages: Vec<Message>, _ctx: &mut AgentContext<'_>) {}

    fn step(&mut self, _ctx: &mut AgentContext<'_>) {}
}
