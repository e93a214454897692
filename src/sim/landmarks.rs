//! Fixed landmark set

use super::target::SharedTarget;
use crate::contract::{AssetStatus, LandmarkResolver};
use crate::types::{AgentId, Position};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Landmarks that never move. The asset reads as vanished once the target
/// carries it.
pub struct StaticLandmarks {
    asset: Position,
    extraction: Position,
    chokepoints: Vec<Position>,
    routes: RwLock<BTreeMap<AgentId, Vec<Position>>>,
    target: Option<SharedTarget>,
}

impl StaticLandmarks {
    pub fn new(asset: Position, extraction: Position, chokepoints: Vec<Position>) -> Self {
        Self {
            asset,
            extraction,
            chokepoints,
            routes: RwLock::new(BTreeMap::new()),
            target: None,
        }
    }

    pub fn with_target(mut self, target: SharedTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn assign_route(&self, agent: AgentId, route: Vec<Position>) {
        self.routes.write().insert(agent, route);
    }
}

impl LandmarkResolver for StaticLandmarks {
    fn asset(&self) -> AssetStatus {
        let taken = self
            .target
            .as_ref()
            .map_or(false, |t| t.read().carrying_asset);
        if taken {
            AssetStatus::Vanished {
                last_known: self.asset,
            }
        } else {
            AssetStatus::Present(self.asset)
        }
    }

    fn extraction_point(&self) -> Position {
        self.extraction
    }

    fn chokepoints(&self) -> Vec<Position> {
        self.chokepoints.clone()
    }

    fn patrol_route(&self, agent: AgentId) -> Vec<Position> {
        self.routes.read().get(&agent).cloned().unwrap_or_default()
    }
}
