//! Patrol Swarm: Decentralized Role Allocation for Patrol Agents
//!
//! Guards that spot an intruder race for a single coordinator slot; the
//! winner runs a contract-net auction that hands out pursuit and guarding
//! roles, and each guard then drives its own role state machine.

pub mod agent;
pub mod auction;
pub mod bus;
pub mod config;
pub mod contract;
pub mod directory;
pub mod election;
pub mod error;
pub mod events;
pub mod logging;
pub mod role;
pub mod sim;
pub mod swarm;
pub mod tooling;
pub mod types;
pub mod world;

pub use agent::{AgentContext, AgentStatus, CameraAgent, GuardAgent, SwarmAgent};
pub use auction::{AuctionRound, Bid, RoundEnd, RoundOutcome};
pub use bus::{Content, Envelope, Message, MessageBus, Performative, Protocol};
pub use config::{ConfigLoader, SwarmConfig};
pub use contract::{AssetStatus, LandmarkResolver, MovementActuator, Sighting, TargetDetector};
pub use directory::{AgentDirectory, AgentRecord, Capability};
pub use error::{DecodeError, SwarmError};
pub use events::{DoorVerdict, EventLog, SwarmEvent, TimedEvent};
pub use role::{Role, RoleAssignment};
pub use swarm::{AgentSnapshot, Swarm};
pub use types::{AgentId, Position, SimTime};
pub use world::{SharedWorldState, WorldSnapshot};
