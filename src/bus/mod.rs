//! Message Bus
//!
//! Routes typed messages between agents. Protocol-critical performatives go
//! onto a synchronous lane the scheduler drains before the next agent runs;
//! informs are parked in the receiver's mailbox until its own drain step.

pub mod codec;
pub mod message;

pub use codec::{decode_position, encode_position, encode_position_legacy};
pub use message::{
    Content, Delivery, Envelope, InformKind, Message, Performative, Protocol, ONTOLOGY,
};

use crate::directory::AgentDirectory;
use crate::types::AgentId;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Per-agent buffer of inform messages
#[derive(Debug, Default)]
pub struct Mailbox {
    messages: Vec<Message>,
}

impl Mailbox {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Hand over every buffered message and leave the mailbox empty
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Messages composed by one agent during a step or handler
#[derive(Debug)]
pub struct Outbox {
    sender: AgentId,
    messages: Vec<Message>,
}

impl Outbox {
    pub fn new(sender: AgentId) -> Self {
        Self {
            sender,
            messages: Vec::new(),
        }
    }

    pub fn sender(&self) -> AgentId {
        self.sender
    }

    pub fn send(&mut self, receiver: AgentId, content: Content, protocol: Protocol) {
        self.messages.push(Message {
            sender: self.sender,
            receiver,
            protocol,
            content,
        });
    }

    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Delivery counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusStats {
    pub immediate: usize,
    pub buffered: usize,
    pub dropped: usize,
}

/// Mailboxes plus the synchronous lane
#[derive(Debug, Default)]
pub struct MessageBus {
    mailboxes: HashMap<AgentId, Mailbox>,
    immediate: VecDeque<Message>,
    stats: BusStats,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_mailbox(&mut self, agent: AgentId) {
        self.mailboxes.entry(agent).or_default();
    }

    /// Drop the mailbox and any synchronous traffic still addressed to `agent`
    pub fn close_mailbox(&mut self, agent: AgentId) {
        self.mailboxes.remove(&agent);
        self.immediate.retain(|m| m.receiver != agent);
    }

    /// Route one message. Unknown receivers are logged and dropped.
    pub fn post(&mut self, message: Message, directory: &AgentDirectory) {
        if !directory.contains(message.receiver) {
            warn!(
                sender = %message.sender,
                receiver = %message.receiver,
                performative = %message.performative(),
                "Dropping message for unknown receiver"
            );
            self.stats.dropped += 1;
            return;
        }

        debug!(
            sender = %message.sender,
            receiver = %message.receiver,
            performative = %message.performative(),
            protocol = message.protocol.as_str(),
            "Routing message"
        );

        match message.delivery() {
            Delivery::Immediate => {
                self.stats.immediate += 1;
                self.immediate.push_back(message);
            }
            Delivery::Buffered => match self.mailboxes.get_mut(&message.receiver) {
                Some(mailbox) => {
                    self.stats.buffered += 1;
                    mailbox.push(message);
                }
                None => {
                    warn!(receiver = %message.receiver, "Receiver has no mailbox");
                    self.stats.dropped += 1;
                }
            },
        }
    }

    pub fn post_all(&mut self, messages: Vec<Message>, directory: &AgentDirectory) {
        for message in messages {
            self.post(message, directory);
        }
    }

    /// Next protocol-critical message awaiting synchronous handling
    pub fn next_immediate(&mut self) -> Option<Message> {
        self.immediate.pop_front()
    }

    pub fn drain_mailbox(&mut self, agent: AgentId) -> Vec<Message> {
        self.mailboxes
            .get_mut(&agent)
            .map(Mailbox::drain)
            .unwrap_or_default()
    }

    pub fn pending_for(&self, agent: AgentId) -> usize {
        self.mailboxes.get(&agent).map(Mailbox::len).unwrap_or(0)
    }

    pub fn stats(&self) -> BusStats {
        self.stats.clone()
    }
}
