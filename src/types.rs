//! Core types shared by every layer of the swarm.

use serde::{Deserialize, Serialize};
use std::fmt;

/// AgentId: registration-ordered identifier of a swarm participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// SimTime: simulation clock value in abstract time units
pub type SimTime = f64;

/// Point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Step from `self` toward `target` by at most `max_step`
    pub fn step_toward(&self, target: &Position, max_step: f64) -> Position {
        let remaining = self.distance(target);
        if remaining <= max_step || remaining == 0.0 {
            return *target;
        }
        let ratio = max_step / remaining;
        Position {
            x: self.x + (target.x - self.x) * ratio,
            y: self.y + (target.y - self.y) * ratio,
            z: self.z + (target.z - self.z) * ratio,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Tick-polled point in simulation time after which a wait gives up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub at: SimTime,
}

impl Deadline {
    pub fn after(now: SimTime, duration: f64) -> Self {
        Self { at: now + duration }
    }

    pub fn expired(&self, now: SimTime) -> bool {
        now >= self.at
    }

    pub fn remaining(&self, now: SimTime) -> f64 {
        (self.at - now).max(0.0)
    }
}

/// First minimum in iteration order; NaN and infinite keys never win
pub fn first_minimum<T, I, F>(items: I, key: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> f64,
{
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let value = key(&item);
        if !value.is_finite() {
            continue;
        }
        match &best {
            Some((_, current)) if value >= *current => {}
            _ => best = Some((item, value)),
        }
    }
    best.map(|(item, _)| item)
}
