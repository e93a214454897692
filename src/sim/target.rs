//! Scripted intruder
//!
//! Walks a fixed list of waypoints at constant speed and picks the asset up
//! when it passes within reach of it.

use crate::types::Position;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Ground truth about the target, read by every detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetState {
    pub position: Position,
    pub carrying_asset: bool,
    pub halted: bool,
}

impl TargetState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            carrying_asset: false,
            halted: false,
        }
    }
}

pub type SharedTarget = Arc<RwLock<TargetState>>;

pub fn shared_target(start: Position) -> SharedTarget {
    Arc::new(RwLock::new(TargetState::new(start)))
}

pub struct ScriptedTarget {
    state: SharedTarget,
    waypoints: Vec<Position>,
    next: usize,
    speed: f64,
    asset: Position,
    pickup_radius: f64,
}

impl ScriptedTarget {
    pub fn new(
        state: SharedTarget,
        waypoints: Vec<Position>,
        speed: f64,
        asset: Position,
        pickup_radius: f64,
    ) -> Self {
        Self {
            state,
            waypoints,
            next: 0,
            speed,
            asset,
            pickup_radius,
        }
    }

    pub fn state(&self) -> TargetState {
        *self.state.read()
    }

    pub fn route_finished(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    /// Stop moving for good
    pub fn halt(&self) {
        self.state.write().halted = true;
    }

    pub fn advance(&mut self, dt: f64) {
        let mut state = self.state.write();
        if state.halted {
            return;
        }
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(goal) = self.waypoints.get(self.next) else {
                break;
            };
            let gap = state.position.distance(goal);
            state.position = state.position.step_toward(goal, budget);
            if gap <= budget {
                budget -= gap;
                self.next += 1;
            } else {
                budget = 0.0;
            }
        }

        if !state.carrying_asset && state.position.distance(&self.asset) <= self.pickup_radius {
            info!(at = %state.position, "Target picked up the asset");
            state.carrying_asset = true;
        }
    }
}
