//! Swarm scheduler
//!
//! Runs the cooperative tick loop. Each agent gets one update pass per tick:
//! mailbox drain, step, then synchronous dispatch of every protocol-critical
//! message it produced before the next agent runs. Bodies move after all
//! agents have stepped.

use crate::agent::{AgentContext, SwarmAgent};
use crate::bus::{BusStats, Envelope, Message, MessageBus, Outbox};
use crate::config::SwarmConfig;
use crate::contract::LandmarkResolver;
use crate::directory::{AgentDirectory, AgentRecord, Capability};
use crate::error::SwarmError;
use crate::events::{EventLog, SwarmEvent};
use crate::role::Role;
use crate::types::{AgentId, Position, SimTime};
use crate::world::SharedWorldState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Role table row
#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub capability: Capability,
    pub role: Role,
    pub position: Position,
    pub coordinator: bool,
}

pub struct Swarm {
    config: SwarmConfig,
    world: Arc<SharedWorldState>,
    directory: AgentDirectory,
    bus: MessageBus,
    agents: BTreeMap<AgentId, Box<dyn SwarmAgent>>,
    landmarks: Arc<dyn LandmarkResolver>,
    events: EventLog,
    clock: SimTime,
    ticks: u64,
    next_id: u32,
}

impl Swarm {
    pub fn new(config: SwarmConfig, landmarks: Arc<dyn LandmarkResolver>) -> Self {
        let world = Arc::new(SharedWorldState::new());
        Self {
            config,
            directory: AgentDirectory::new(world.clone()),
            world,
            bus: MessageBus::new(),
            agents: BTreeMap::new(),
            landmarks,
            events: EventLog::default(),
            clock: 0.0,
            ticks: 0,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn world(&self) -> &Arc<SharedWorldState> {
        &self.world
    }

    pub fn directory(&self) -> &AgentDirectory {
        &self.directory
    }

    pub fn landmarks(&self) -> &Arc<dyn LandmarkResolver> {
        &self.landmarks
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn bus_stats(&self) -> BusStats {
        self.bus.stats()
    }

    /// Informs waiting in the agent's mailbox
    pub fn pending_for(&self, id: AgentId) -> usize {
        self.bus.pending_for(id)
    }

    pub fn agent(&self, id: AgentId) -> Option<&dyn SwarmAgent> {
        self.agents.get(&id).map(|a| a.as_ref())
    }

    /// Add an agent built for the next free id. Ids follow registration order.
    pub fn add_agent<F>(&mut self, build: F) -> AgentId
    where
        F: FnOnce(AgentId) -> Box<dyn SwarmAgent>,
    {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        let agent = build(id);
        let status = agent.status();
        self.directory.register(AgentRecord::new(
            id,
            agent.name(),
            agent.capability(),
            status.position,
            status.role,
        ));
        self.bus.open_mailbox(id);
        info!(agent = %id, name = agent.name(), capability = ?agent.capability(), "Agent joined swarm");
        self.agents.insert(id, agent);
        id
    }

    /// Remove an agent. A coordinator leaving mid-round frees the slot and
    /// the round is abandoned.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<(), SwarmError> {
        self.agents.remove(&id).ok_or(SwarmError::AgentNotFound(id))?;
        self.directory.unregister(id);
        self.bus.close_mailbox(id);
        info!(agent = %id, "Agent left swarm");
        Ok(())
    }

    /// Advance the simulation clock by `dt` and run one pass for every agent
    pub fn tick(&mut self, dt: f64) {
        self.clock += dt;
        self.ticks += 1;
        let now = self.clock;

        let ids: Vec<AgentId> = self.agents.keys().copied().collect();
        for id in ids {
            let inbox = self.bus.drain_mailbox(id);
            self.run_agent(id, now, |agent, ctx| {
                if !inbox.is_empty() {
                    agent.process_mailbox(inbox, ctx);
                }
                agent.step(ctx);
            });
            self.dispatch(now);
        }

        for agent in self.agents.values_mut() {
            agent.advance(dt);
        }
        let ids: Vec<AgentId> = self.agents.keys().copied().collect();
        for id in ids {
            self.sync_status(id);
        }
    }

    /// Inject an externally encoded message. Malformed input is logged and
    /// rejected without touching swarm state.
    pub fn deliver_envelope(&mut self, envelope: &Envelope) -> Result<(), SwarmError> {
        let message = Message::from_envelope(envelope).map_err(|e| {
            warn!(error = %e, content = %envelope.content, "Dropping malformed envelope");
            e
        })?;
        self.deliver(message);
        Ok(())
    }

    /// Route a typed message as if an agent had sent it
    pub fn deliver(&mut self, message: Message) {
        self.bus.post(message, &self.directory);
        self.dispatch(self.clock);
    }

    /// Notify every auction participant of a loud event
    pub fn loud_event(&mut self, at: Position) {
        debug!(at = %at, "Loud event");
        let now = self.clock;
        let ids: Vec<AgentId> = self
            .directory
            .list_by_capability(Capability::AuctionParticipant)
            .iter()
            .map(|r| r.id)
            .collect();
        for id in ids {
            self.run_agent(id, now, |agent, ctx| agent.hear_loud_event(at, ctx));
            self.dispatch(now);
        }
    }

    /// The environment reports the target reached the extraction point with the asset
    pub fn report_extraction(&mut self) {
        info!("Target extracted the asset");
        self.events.push(self.clock, SwarmEvent::TargetExtracted);
    }

    pub fn is_finished(&self) -> bool {
        self.events.has_terminal()
    }

    /// Agents currently owning an open round
    pub fn coordinators(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|(_, a)| a.is_coordinator())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn role_of(&self, id: AgentId) -> Option<Role> {
        self.directory.get(id).map(|r| r.role)
    }

    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.directory
            .list_all()
            .map(|r| AgentSnapshot {
                id: r.id,
                name: r.name.clone(),
                capability: r.capability,
                role: r.role,
                position: r.position,
                coordinator: r.coordinator,
            })
            .collect()
    }

    fn run_agent<F>(&mut self, id: AgentId, now: SimTime, f: F)
    where
        F: FnOnce(&mut dyn SwarmAgent, &mut AgentContext<'_>),
    {
        let Some(agent) = self.agents.get_mut(&id) else {
            debug!(agent = %id, "Agent gone before its turn");
            return;
        };
        let mut outbox = Outbox::new(id);
        {
            let mut ctx = AgentContext {
                now,
                config: &self.config,
                world: &self.world,
                directory: &mut self.directory,
                landmarks: self.landmarks.as_ref(),
                outbox: &mut outbox,
                events: &mut self.events,
            };
            f(agent.as_mut(), &mut ctx);
        }
        self.sync_status(id);
        self.bus.post_all(outbox.take(), &self.directory);
    }

    /// Apply every pending protocol-critical message, including replies they cause
    fn dispatch(&mut self, now: SimTime) {
        while let Some(message) = self.bus.next_immediate() {
            let receiver = message.receiver;
            self.run_agent(receiver, now, |agent, ctx| agent.receive(message, ctx));
        }
    }

    fn sync_status(&mut self, id: AgentId) {
        let Some(agent) = self.agents.get(&id) else {
            return;
        };
        let status = agent.status();
        let coordinator = self.world.coordinator() == Some(id);
        if let Err(e) = self
            .directory
            .update_status(id, status.position, status.role, coordinator)
        {
            warn!(agent = %id, error = %e, "Status sync failed");
        }
    }
}
