//! Agent directory
//!
//! Registry of live swarm members, used for broadcast recipient lists and
//! nearest-agent queries. Records are kept in id order so that every query
//! iterates in registration order.

use crate::error::SwarmError;
use crate::role::Role;
use crate::types::{AgentId, Position};
use crate::world::SharedWorldState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// What an agent can take part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Bids in auctions and can be assigned roles
    AuctionParticipant,
    /// Reports sightings only
    SensorOnly,
}

/// Directory entry for one agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub name: String,
    pub capability: Capability,
    pub position: Position,
    pub role: Role,
    pub coordinator: bool,
}

impl AgentRecord {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        capability: Capability,
        position: Position,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            capability,
            position,
            role,
            coordinator: false,
        }
    }

    pub fn is_auction_participant(&self) -> bool {
        self.capability == Capability::AuctionParticipant
    }
}

/// Registry of live agents
pub struct AgentDirectory {
    agents: BTreeMap<AgentId, AgentRecord>,
    world: Arc<SharedWorldState>,
}

impl AgentDirectory {
    pub fn new(world: Arc<SharedWorldState>) -> Self {
        Self {
            agents: BTreeMap::new(),
            world,
        }
    }

    /// Register an agent; registering the same id again replaces its record
    pub fn register(&mut self, record: AgentRecord) {
        debug!(agent = %record.id, name = %record.name, capability = ?record.capability, "Registering agent");
        self.agents.insert(record.id, record);
    }

    /// Remove an agent. Removing the coordinator clears the shared slot.
    pub fn unregister(&mut self, id: AgentId) -> Option<AgentRecord> {
        let removed = self.agents.remove(&id);
        if removed.is_some() {
            debug!(agent = %id, "Unregistering agent");
            self.world.clear_coordinator_if(id);
        }
        removed
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.agents.get(&id)
    }

    pub fn get_or_error(&self, id: AgentId) -> Result<&AgentRecord, SwarmError> {
        self.get(id).ok_or(SwarmError::AgentNotFound(id))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn list_all(&self) -> impl Iterator<Item = &AgentRecord> {
        self.agents.values()
    }

    pub fn list_by_capability(&self, capability: Capability) -> Vec<&AgentRecord> {
        self.agents
            .values()
            .filter(|r| r.capability == capability)
            .collect()
    }

    pub fn participant_count(&self) -> usize {
        self.agents
            .values()
            .filter(|r| r.is_auction_participant())
            .count()
    }

    /// Broadcast list: every agent with `capability` except `exclude`
    pub fn recipients(&self, capability: Capability, exclude: AgentId) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|r| r.capability == capability && r.id != exclude)
            .map(|r| r.id)
            .collect()
    }

    /// Every holder of `role` except `exclude`
    pub fn holders_of(&self, role: Role, exclude: AgentId) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|r| r.role == role && r.id != exclude)
            .map(|r| r.id)
            .collect()
    }

    pub fn count_with_role(&self, role: Role) -> usize {
        self.agents.values().filter(|r| r.role == role).count()
    }

    /// Refresh the mirrored position, role and coordinator flag of an agent
    pub fn update_status(
        &mut self,
        id: AgentId,
        position: Position,
        role: Role,
        coordinator: bool,
    ) -> Result<(), SwarmError> {
        let record = self
            .agents
            .get_mut(&id)
            .ok_or(SwarmError::AgentNotFound(id))?;
        record.position = position;
        record.role = role;
        record.coordinator = coordinator;
        Ok(())
    }

    pub fn set_role(&mut self, id: AgentId, role: Role) -> Result<(), SwarmError> {
        let record = self
            .agents
            .get_mut(&id)
            .ok_or(SwarmError::AgentNotFound(id))?;
        record.role = role;
        Ok(())
    }

    pub fn world(&self) -> &Arc<SharedWorldState> {
        &self.world
    }
}
