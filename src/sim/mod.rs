//! Simulation harness
//!
//! Drives a swarm against a scripted target with straight-line movers,
//! range detectors and fixed landmarks. Used by the CLI and the
//! integration tests.

pub mod body;
pub mod landmarks;
pub mod scenario;
pub mod target;

pub use body::{KinematicMover, RangeDetector};
pub use landmarks::StaticLandmarks;
pub use scenario::{CameraSpec, GuardSpec, LandmarkSpec, LoudEventSpec, Scenario, SensingSpec, TargetSpec};
pub use target::{shared_target, ScriptedTarget, SharedTarget, TargetState};

use crate::agent::{CameraAgent, GuardAgent};
use crate::config::SwarmConfig;
use crate::contract::LandmarkResolver;
use crate::error::SwarmError;
use crate::events::{SwarmEvent, TimedEvent};
use crate::swarm::{AgentSnapshot, Swarm};
use crate::types::{AgentId, Position, SimTime};
use crate::world::WorldSnapshot;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a simulation run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub ticks: u64,
    pub elapsed: SimTime,
    pub outcome: Option<SwarmEvent>,
    pub agents: Vec<AgentSnapshot>,
    pub events: Vec<TimedEvent>,
    pub world: WorldSnapshot,
    pub target: TargetState,
}

pub struct Simulation {
    name: String,
    swarm: Swarm,
    target: ScriptedTarget,
    extraction: Position,
    loud_events: Vec<LoudEventSpec>,
    next_loud: usize,
    extracted: bool,
    names: HashMap<String, AgentId>,
}

impl Simulation {
    pub fn from_scenario(scenario: &Scenario, config: SwarmConfig) -> Result<Self, SwarmError> {
        scenario.validate()?;
        config.validate()?;

        let state = shared_target(scenario.target.start);
        let landmarks = Arc::new(
            StaticLandmarks::new(
                scenario.landmarks.asset,
                scenario.landmarks.extraction,
                scenario.landmarks.chokepoints.clone(),
            )
            .with_target(state.clone()),
        );
        let sensing = scenario.sensing.clone();
        let patrol_speed = config.patrol_speed;
        let pickup_radius = config.arrival_threshold;
        let mut swarm = Swarm::new(config, landmarks.clone());

        let mut names = HashMap::new();
        for guard in &scenario.guards {
            let id = swarm.add_agent(|id| {
                landmarks.assign_route(id, guard.route.clone());
                Box::new(GuardAgent::new(
                    id,
                    guard.name.clone(),
                    landmarks.patrol_route(id),
                    Box::new(KinematicMover::new(guard.position, patrol_speed)),
                    Box::new(RangeDetector::new(
                        state.clone(),
                        sensing.sight_range,
                        sensing.hearing_range,
                    )),
                ))
            });
            names.insert(guard.name.clone(), id);
        }
        for camera in &scenario.cameras {
            let assigned = camera.guard.as_ref().and_then(|g| names.get(g)).copied();
            let id = swarm.add_agent(|id| {
                Box::new(CameraAgent::new(
                    id,
                    camera.name.clone(),
                    camera.position,
                    Box::new(RangeDetector::new(state.clone(), sensing.camera_range, 0.0)),
                    assigned,
                ))
            });
            names.insert(camera.name.clone(), id);
        }

        let target = ScriptedTarget::new(
            state,
            scenario.target.waypoints.clone(),
            scenario.target.speed,
            scenario.landmarks.asset,
            pickup_radius,
        );
        let mut loud_events = scenario.loud_events.clone();
        loud_events.sort_by(|a, b| a.at.total_cmp(&b.at));

        info!(
            scenario = scenario.display_name(),
            guards = scenario.guards.len(),
            cameras = scenario.cameras.len(),
            "Simulation ready"
        );
        Ok(Self {
            name: scenario.display_name().to_string(),
            swarm,
            target,
            extraction: scenario.landmarks.extraction,
            loud_events,
            next_loud: 0,
            extracted: false,
            names,
        })
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }

    pub fn target(&self) -> TargetState {
        self.target.state()
    }

    /// Id the named guard or camera was registered under
    pub fn agent_id(&self, name: &str) -> Option<AgentId> {
        self.names.get(name).copied()
    }

    /// Run one tick; returns true once the run has ended
    pub fn step(&mut self, dt: f64) -> bool {
        if self.swarm.is_finished() {
            return true;
        }

        self.target.advance(dt);
        self.swarm.tick(dt);

        let now = self.swarm.now();
        while let Some(event) = self.loud_events.get(self.next_loud) {
            if event.at > now {
                break;
            }
            debug!(at = %event.position, time = event.at, "Injecting loud event");
            self.swarm.loud_event(event.position);
            self.next_loud += 1;
        }

        let target = self.target.state();
        if !self.extracted
            && target.carrying_asset
            && target.position.distance(&self.extraction) <= self.swarm.config().arrival_threshold
        {
            self.extracted = true;
            self.swarm.report_extraction();
        }

        let finished = self.swarm.is_finished();
        if finished {
            self.target.halt();
        }
        finished
    }

    pub fn run(&mut self, ticks: u64, dt: f64) -> RunReport {
        for _ in 0..ticks {
            if self.step(dt) {
                break;
            }
        }
        self.report()
    }

    pub fn report(&self) -> RunReport {
        let events = self.swarm.events().events().to_vec();
        let outcome = events
            .iter()
            .find(|e| e.event.is_terminal())
            .map(|e| e.event.clone());
        RunReport {
            scenario: self.name.clone(),
            ticks: self.swarm.ticks(),
            elapsed: self.swarm.now(),
            outcome,
            agents: self.swarm.snapshot(),
            events,
            world: self.swarm.world().snapshot(),
            target: self.target.state(),
        }
    }
}
