//! Straight-line movers and range-limited senses

use super::target::SharedTarget;
use crate::contract::{MovementActuator, TargetDetector};
use crate::types::Position;

/// Moves straight at its destination; paths are never pending
#[derive(Debug, Clone)]
pub struct KinematicMover {
    position: Position,
    destination: Option<Position>,
    speed: f64,
}

impl KinematicMover {
    pub fn new(position: Position, speed: f64) -> Self {
        Self {
            position,
            destination: None,
            speed: speed.max(0.0),
        }
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }
}

impl MovementActuator for KinematicMover {
    fn position(&self) -> Position {
        self.position
    }

    fn set_destination(&mut self, destination: Position) {
        self.destination = Some(destination);
    }

    fn remaining_distance(&self) -> f64 {
        self.destination
            .map_or(0.0, |d| self.position.distance(&d))
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    fn stop(&mut self) {
        self.destination = None;
    }

    fn advance(&mut self, dt: f64) {
        if let Some(destination) = self.destination {
            self.position = self.position.step_toward(&destination, self.speed * dt);
        }
    }
}

/// Sees within `sight_range` and hears within `hearing_range`. No occlusion.
#[derive(Debug, Clone)]
pub struct RangeDetector {
    target: SharedTarget,
    sight_range: f64,
    hearing_range: f64,
}

impl RangeDetector {
    pub fn new(target: SharedTarget, sight_range: f64, hearing_range: f64) -> Self {
        Self {
            target,
            sight_range,
            hearing_range,
        }
    }

    fn distance_from(&self, observer: &Position) -> f64 {
        self.target.read().position.distance(observer)
    }
}

impl TargetDetector for RangeDetector {
    fn can_see_target(&self, observer: &Position) -> bool {
        self.distance_from(observer) <= self.sight_range
    }

    fn can_hear_target(&self, observer: &Position) -> bool {
        self.distance_from(observer) <= self.hearing_range
    }

    fn target_position(&self) -> Position {
        self.target.read().position
    }

    fn target_carries_asset(&self) -> bool {
        self.target.read().carrying_asset
    }
}
