//! Scenario files
//!
//! A scenario is a TOML document describing the landmarks, the target's
//! script, the guards and cameras, and any loud events to inject.

use crate::error::SwarmError;
use crate::types::{Position, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub landmarks: LandmarkSpec,
    pub target: TargetSpec,
    #[serde(default)]
    pub sensing: SensingSpec,
    #[serde(default)]
    pub guards: Vec<GuardSpec>,
    #[serde(default)]
    pub cameras: Vec<CameraSpec>,
    #[serde(default)]
    pub loud_events: Vec<LoudEventSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    pub asset: Position,
    pub extraction: Position,
    #[serde(default)]
    pub chokepoints: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub start: Position,
    #[serde(default)]
    pub waypoints: Vec<Position>,
    #[serde(default = "default_target_speed")]
    pub speed: f64,
}

fn default_target_speed() -> f64 {
    4.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensingSpec {
    #[serde(default = "default_sight_range")]
    pub sight_range: f64,
    #[serde(default = "default_hearing_range")]
    pub hearing_range: f64,
    #[serde(default = "default_camera_range")]
    pub camera_range: f64,
}

impl Default for SensingSpec {
    fn default() -> Self {
        Self {
            sight_range: default_sight_range(),
            hearing_range: default_hearing_range(),
            camera_range: default_camera_range(),
        }
    }
}

fn default_sight_range() -> f64 {
    8.0
}

fn default_hearing_range() -> f64 {
    2.0
}

fn default_camera_range() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpec {
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub route: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub name: String,
    pub position: Position,
    /// Name of the guard this camera alerts; unset means broadcast
    #[serde(default)]
    pub guard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudEventSpec {
    pub at: SimTime,
    pub position: Position,
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, SwarmError> {
        let scenario: Scenario = toml::from_str(source)
            .map_err(|e| SwarmError::ScenarioError(format!("Failed to parse scenario: {}", e)))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, SwarmError> {
        let source = fs::read_to_string(path).map_err(|e| {
            SwarmError::ScenarioError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.guards.is_empty() {
            return Err(invalid("scenario needs at least one guard"));
        }

        let mut names = HashSet::new();
        for name in self
            .guards
            .iter()
            .map(|g| &g.name)
            .chain(self.cameras.iter().map(|c| &c.name))
        {
            if name.trim().is_empty() {
                return Err(invalid("agent names cannot be empty"));
            }
            if !names.insert(name.as_str()) {
                return Err(invalid(format!("duplicate agent name {:?}", name)));
            }
        }

        let guard_names: HashSet<&str> = self.guards.iter().map(|g| g.name.as_str()).collect();
        for camera in &self.cameras {
            if let Some(guard) = &camera.guard {
                if !guard_names.contains(guard.as_str()) {
                    return Err(invalid(format!(
                        "camera {:?} is assigned to unknown guard {:?}",
                        camera.name, guard
                    )));
                }
            }
        }

        if !self.target.speed.is_finite() || self.target.speed < 0.0 {
            return Err(invalid("target speed must be a non-negative number"));
        }
        for (label, range) in [
            ("sight_range", self.sensing.sight_range),
            ("hearing_range", self.sensing.hearing_range),
            ("camera_range", self.sensing.camera_range),
        ] {
            if !range.is_finite() || range < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number", label)));
            }
        }
        if self
            .loud_events
            .iter()
            .any(|e| !e.at.is_finite() || e.at < 0.0)
        {
            return Err(invalid("loud event times must be non-negative"));
        }

        if !self.positions().all(|p| finite(&p)) {
            return Err(invalid("positions must be finite"));
        }
        Ok(())
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        [self.landmarks.asset, self.landmarks.extraction, self.target.start]
            .into_iter()
            .chain(self.landmarks.chokepoints.iter().copied())
            .chain(self.target.waypoints.iter().copied())
            .chain(self.guards.iter().flat_map(|g| {
                std::iter::once(g.position).chain(g.route.iter().copied())
            }))
            .chain(self.cameras.iter().map(|c| c.position))
            .chain(self.loud_events.iter().map(|e| e.position))
    }
}

fn finite(p: &Position) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

fn invalid(message: impl Into<String>) -> SwarmError {
    SwarmError::ScenarioError(message.into())
}
