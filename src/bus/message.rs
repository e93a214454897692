//! Typed swarm messages and their string envelope form.

use super::codec::{decode_position, decode_triple_allow_infinite, encode_position};
use crate::auction::Bid;
use crate::error::DecodeError;
use crate::role::{Role, RoleAssignment};
use crate::types::{AgentId, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ontology tag stamped on every envelope leaving the core
pub const ONTOLOGY: &str = "guard_communication";

/// Communicative act of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Performative {
    CallForProposal,
    Propose,
    AssignRole,
    Inform,
    SensorAlert,
    DoorAsk,
    DoorConfirm,
}

impl Performative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Performative::CallForProposal => "call_for_proposal",
            Performative::Propose => "propose",
            Performative::AssignRole => "assign_role",
            Performative::Inform => "inform",
            Performative::SensorAlert => "sensor_alert",
            Performative::DoorAsk => "door_ask",
            Performative::DoorConfirm => "door_confirm",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DecodeError> {
        match value.trim() {
            "call_for_proposal" | "CALL_FOR_PROPOSAL" | "REQUEST_BID" | "request_bid" => {
                Ok(Performative::CallForProposal)
            }
            "propose" | "PROPOSE" | "bid_reply" => Ok(Performative::Propose),
            "assign_role" | "ASSIGN_ROLE" => Ok(Performative::AssignRole),
            "inform" | "INFORM" => Ok(Performative::Inform),
            "sensor_alert" | "camera_alert" => Ok(Performative::SensorAlert),
            "door_ask" | "ask" => Ok(Performative::DoorAsk),
            "door_confirm" | "confirm" => Ok(Performative::DoorConfirm),
            other => Err(DecodeError::UnknownPerformative(other.to_string())),
        }
    }

    /// Protocol-critical performatives apply on the synchronous lane
    pub fn delivery(&self) -> Delivery {
        match self {
            Performative::Inform => Delivery::Buffered,
            _ => Delivery::Immediate,
        }
    }
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the bus hands a message to its receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Applied within the tick it is sent
    Immediate,
    /// Parked in the receiver's mailbox until its next drain
    Buffered,
}

/// Conversation a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Auction,
    Pursuit,
    Compromise,
    SensorRelay,
    DoorInquiry,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Auction => "auction",
            Protocol::Pursuit => "pursuit",
            Protocol::Compromise => "compromise",
            Protocol::SensorRelay => "sensor_relay",
            Protocol::DoorInquiry => "door_inquiry",
        }
    }

    /// Unknown protocol tags fall back to `Pursuit`, the plain position-inform lane
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "auction" => Protocol::Auction,
            "compromise" => Protocol::Compromise,
            "sensor_relay" | "camera_protocol" | "camera_alert" => Protocol::SensorRelay,
            "door_inquiry" => Protocol::DoorInquiry,
            _ => Protocol::Pursuit,
        }
    }
}

/// What an inform is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InformKind {
    TargetSighted,
    AssetCompromised,
}

/// Typed payload, one variant per performative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    CallForProposal { anchor: Position },
    Propose(Bid),
    AssignRole(RoleAssignment),
    Inform { kind: InformKind, position: Position },
    SensorAlert { position: Position },
    DoorAsk { door: Position },
    DoorConfirm { door: Position },
}

impl Content {
    pub fn performative(&self) -> Performative {
        match self {
            Content::CallForProposal { .. } => Performative::CallForProposal,
            Content::Propose(_) => Performative::Propose,
            Content::AssignRole(_) => Performative::AssignRole,
            Content::Inform { .. } => Performative::Inform,
            Content::SensorAlert { .. } => Performative::SensorAlert,
            Content::DoorAsk { .. } => Performative::DoorAsk,
            Content::DoorConfirm { .. } => Performative::DoorConfirm,
        }
    }

    fn encode(&self) -> String {
        match self {
            Content::CallForProposal { anchor } => encode_position(anchor),
            Content::Propose(bid) => format!(
                "{};{};{}",
                bid.to_target, bid.to_asset, bid.to_exit
            ),
            Content::AssignRole(assignment) => match assignment.target {
                Some(point) => format!("{}@{}", assignment.role, encode_position(&point)),
                None => assignment.role.to_string(),
            },
            Content::Inform { position, .. }
            | Content::SensorAlert { position }
            | Content::DoorAsk { door: position }
            | Content::DoorConfirm { door: position } => encode_position(position),
        }
    }

    fn decode(
        performative: Performative,
        protocol: Protocol,
        payload: &str,
    ) -> Result<Self, DecodeError> {
        Ok(match performative {
            Performative::CallForProposal => Content::CallForProposal {
                anchor: decode_position(payload)?,
            },
            Performative::Propose => {
                let [to_target, to_asset, to_exit] = decode_triple_allow_infinite(payload)
                    .map_err(|e| DecodeError::InvalidBid(e.to_string()))?;
                Content::Propose(Bid {
                    to_target,
                    to_asset,
                    to_exit,
                })
            }
            Performative::AssignRole => {
                let (role, target) = match payload.split_once('@') {
                    Some((role, point)) => (role, Some(decode_position(point)?)),
                    None => (payload, None),
                };
                let role: Role = role.parse()?;
                Content::AssignRole(RoleAssignment { role, target })
            }
            Performative::Inform => Content::Inform {
                kind: if protocol == Protocol::Compromise {
                    InformKind::AssetCompromised
                } else {
                    InformKind::TargetSighted
                },
                position: decode_position(payload)?,
            },
            Performative::SensorAlert => Content::SensorAlert {
                position: decode_position(payload)?,
            },
            Performative::DoorAsk => Content::DoorAsk {
                door: decode_position(payload)?,
            },
            Performative::DoorConfirm => Content::DoorConfirm {
                door: decode_position(payload)?,
            },
        })
    }
}

/// Message routed between agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: AgentId,
    pub receiver: AgentId,
    pub protocol: Protocol,
    pub content: Content,
}

impl Message {
    pub fn performative(&self) -> Performative {
        self.content.performative()
    }

    pub fn delivery(&self) -> Delivery {
        self.performative().delivery()
    }

    /// Render the string form used in traces and by external peers
    pub fn to_envelope(&self) -> Envelope {
        Envelope {
            performative: self.performative().as_str().to_string(),
            sender: self.sender.to_string(),
            receiver: self.receiver.to_string(),
            content: self.content.encode(),
            protocol: self.protocol.as_str().to_string(),
            ontology: ONTOLOGY.to_string(),
        }
    }

    /// Parse an externally supplied envelope
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, DecodeError> {
        let performative = Performative::parse(&envelope.performative)?;
        let protocol = Protocol::parse(&envelope.protocol);
        let content = Content::decode(performative, protocol, &envelope.content)?;
        Ok(Self {
            sender: parse_agent_ref(&envelope.sender)?,
            receiver: parse_agent_ref(&envelope.receiver)?,
            protocol,
            content,
        })
    }
}

/// String envelope: `{performative, sender, receiver, content, protocol, ontology}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub performative: String,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    pub protocol: String,
    #[serde(default = "default_ontology")]
    pub ontology: String,
}

fn default_ontology() -> String {
    ONTOLOGY.to_string()
}

/// Accepts `agent-7` or a bare `7`
pub fn parse_agent_ref(value: &str) -> Result<AgentId, DecodeError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("agent-").unwrap_or(trimmed);
    digits
        .parse::<u32>()
        .map(AgentId)
        .map_err(|_| DecodeError::BadAgentRef(value.to_string()))
}
