//! Roles
//!
//! The role catalogue agents are allocated by the auction and the per-agent
//! state machine those roles drive.

pub mod machine;

use crate::error::DecodeError;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use machine::{Activity, Directive, RoleMachine, StepContext};

/// Behavioral assignment of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patrol,
    Pursue,
    GuardAsset,
    GuardExit,
    GuardChokepoint,
    Idle,
}

impl Role {
    /// Roles handed out by an auction round; holders do not start elections on sight
    pub fn is_round_scoped(&self) -> bool {
        matches!(
            self,
            Role::Pursue | Role::GuardAsset | Role::GuardExit | Role::GuardChokepoint
        )
    }

    /// Only Patrol and Idle holders may be reassigned by the auction
    pub fn is_available_for_assignment(&self) -> bool {
        matches!(self, Role::Patrol | Role::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patrol => "patrol",
            Role::Pursue => "pursue",
            Role::GuardAsset => "guard_asset",
            Role::GuardExit => "guard_exit",
            Role::GuardChokepoint => "guard_chokepoint",
            Role::Idle => "idle",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patrol" => Ok(Role::Patrol),
            "pursue" | "chase" => Ok(Role::Pursue),
            "guard_asset" | "treasure" => Ok(Role::GuardAsset),
            "guard_exit" | "exit" => Ok(Role::GuardExit),
            "guard_chokepoint" | "blockage1" | "blockage2" => Ok(Role::GuardChokepoint),
            "idle" => Ok(Role::Idle),
            other => Err(DecodeError::UnknownRole(other.to_string())),
        }
    }
}

/// Role plus the point a chokepoint holder must cover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    #[serde(default)]
    pub target: Option<Position>,
}

impl RoleAssignment {
    pub fn new(role: Role) -> Self {
        Self { role, target: None }
    }

    pub fn chokepoint(point: Position) -> Self {
        Self {
            role: Role::GuardChokepoint,
            target: Some(point),
        }
    }
}
