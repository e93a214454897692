//! Sensor-only camera agent.

use super::{AgentContext, AgentStatus, SwarmAgent};
use crate::bus::{Content, InformKind, Message, Protocol};
use crate::contract::TargetDetector;
use crate::directory::Capability;
use crate::role::Role;
use crate::types::{AgentId, Position, SimTime};
use tracing::{debug, info};

/// Fixed camera. Never bids and is never assigned a role.
pub struct CameraAgent {
    id: AgentId,
    name: String,
    position: Position,
    detector: Box<dyn TargetDetector>,
    assigned_guard: Option<AgentId>,
    next_check: SimTime,
    saw_target: bool,
}

impl CameraAgent {
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        position: Position,
        detector: Box<dyn TargetDetector>,
        assigned_guard: Option<AgentId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            detector,
            assigned_guard,
            next_check: 0.0,
            saw_target: false,
        }
    }

    pub fn assigned_guard(&self) -> Option<AgentId> {
        self.assigned_guard
    }

    fn alert(&self, target: Position, ctx: &mut AgentContext<'_>) {
        match self.assigned_guard.filter(|g| ctx.directory.contains(*g)) {
            Some(guard) => {
                info!(camera = %self.id, guard = %guard, target = %target, "Camera alerting assigned guard");
                ctx.send(
                    guard,
                    Content::SensorAlert { position: target },
                    Protocol::SensorRelay,
                );
            }
            None => {
                info!(camera = %self.id, target = %target, "Camera broadcasting sighting");
                let guards = ctx.participants();
                ctx.broadcast(
                    &guards,
                    Content::Inform {
                        kind: InformKind::TargetSighted,
                        position: target,
                    },
                    Protocol::SensorRelay,
                );
            }
        }
    }
}

impl SwarmAgent for CameraAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> Capability {
        Capability::SensorOnly
    }

    fn status(&self) -> AgentStatus {
        AgentStatus {
            position: self.position,
            role: Role::Idle,
        }
    }

    fn receive(&mut self, message: Message, _ctx: &mut AgentContext<'_>) {
        debug!(camera = %self.id, performative = %message.performative(), "Camera ignores message");
    }

    fn process_mailbox(&mut self, messages: Vec<Message>, _ctx: &mut AgentContext<'_>) {
        if !messages.is_empty() {
            debug!(camera = %self.id, count = messages.len(), "Camera discards buffered messages");
        }
    }

    fn step(&mut self, ctx: &mut AgentContext<'_>) {
        if ctx.now < self.next_check {
            return;
        }
        self.next_check = ctx.now + ctx.config.camera_check_interval;

        let sees = self.detector.can_see_target(&self.position);
        if sees && !self.saw_target {
            let target = self.detector.target_position();
            ctx.world.record_target_position(target);
            self.alert(target, ctx);
        }
        self.saw_target = sees;
    }
}
