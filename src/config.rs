//! Configuration
//!
//! Protocol timing and thresholds for the swarm, layered from built-in
//! defaults, an optional TOML file and `SWARM__*` environment variables.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::SwarmError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Swarm-wide protocol settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Time the coordinator waits for bids before assigning with what it has
    #[serde(default = "default_bid_timeout")]
    pub bid_timeout: f64,

    /// Maximum concurrent Pursue holders
    #[serde(default = "default_pursuer_cap")]
    pub pursuer_cap: usize,

    /// Interval between position informs from a pursuer
    #[serde(default = "default_inform_interval")]
    pub inform_interval: f64,

    /// How long a pursuer searches at the last known position
    #[serde(default = "default_search_wait")]
    pub search_wait: f64,

    #[serde(default = "default_arrival_threshold")]
    pub arrival_threshold: f64,

    #[serde(default = "default_capture_radius")]
    pub capture_radius: f64,

    #[serde(default = "default_patrol_speed")]
    pub patrol_speed: f64,

    #[serde(default = "default_chase_speed")]
    pub chase_speed: f64,

    /// Delay after a round before another may start; 0 disables
    #[serde(default)]
    pub election_cooldown: f64,

    /// How long an agent holds off investigating a loud event
    #[serde(default = "default_door_grace")]
    pub door_grace: f64,

    /// How long an agent collects door confirmations
    #[serde(default = "default_door_confirm_timeout")]
    pub door_confirm_timeout: f64,

    /// Agents this close to a door vouch for it
    #[serde(default = "default_door_confirm_radius")]
    pub door_confirm_radius: f64,

    #[serde(default = "default_camera_check_interval")]
    pub camera_check_interval: f64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_bid_timeout() -> f64 {
    5.0
}

fn default_pursuer_cap() -> usize {
    2
}

fn default_inform_interval() -> f64 {
    0.5
}

fn default_search_wait() -> f64 {
    3.0
}

fn default_arrival_threshold() -> f64 {
    1.0
}

fn default_capture_radius() -> f64 {
    1.0
}

fn default_patrol_speed() -> f64 {
    3.0
}

fn default_chase_speed() -> f64 {
    6.0
}

fn default_door_grace() -> f64 {
    2.0
}

fn default_door_confirm_timeout() -> f64 {
    1.0
}

fn default_door_confirm_radius() -> f64 {
    3.0
}

fn default_camera_check_interval() -> f64 {
    0.5
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            bid_timeout: default_bid_timeout(),
            pursuer_cap: default_pursuer_cap(),
            inform_interval: default_inform_interval(),
            search_wait: default_search_wait(),
            arrival_threshold: default_arrival_threshold(),
            capture_radius: default_capture_radius(),
            patrol_speed: default_patrol_speed(),
            chase_speed: default_chase_speed(),
            election_cooldown: 0.0,
            door_grace: default_door_grace(),
            door_confirm_timeout: default_door_confirm_timeout(),
            door_confirm_radius: default_door_confirm_radius(),
            camera_check_interval: default_camera_check_interval(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SwarmConfig {
    /// Reject values the protocol cannot run with
    pub fn validate(&self) -> Result<(), SwarmError> {
        let positive = [
            ("bid_timeout", self.bid_timeout),
            ("inform_interval", self.inform_interval),
            ("arrival_threshold", self.arrival_threshold),
            ("capture_radius", self.capture_radius),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
            ("camera_check_interval", self.camera_check_interval),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SwarmError::ConfigError(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("search_wait", self.search_wait),
            ("election_cooldown", self.election_cooldown),
            ("door_grace", self.door_grace),
            ("door_confirm_timeout", self.door_confirm_timeout),
            ("door_confirm_radius", self.door_confirm_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SwarmError::ConfigError(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.pursuer_cap == 0 {
            return Err(SwarmError::ConfigError(
                "pursuer_cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
