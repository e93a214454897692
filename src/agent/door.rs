//! Door inquiry: decide whether a loud event needs investigating.
//!
//! The hearer holds off for a grace period, asks every teammate whether they
//! are at the door and counts confirmations until the confirm deadline.

use crate::config::SwarmConfig;
use crate::events::DoorVerdict;
use crate::types::{Deadline, Position, SimTime};

/// Result of polling an inquiry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InquiryStep {
    /// The confirm window closed with this verdict
    Decided(DoorVerdict),
    /// Grace is over and nobody vouched for the door
    Investigate(Position),
}

#[derive(Debug, Clone)]
pub struct DoorInquiry {
    door: Position,
    grace: Deadline,
    confirm: Deadline,
    confirmations: usize,
    verdict: Option<DoorVerdict>,
    finished: bool,
}

impl DoorInquiry {
    pub fn open(door: Position, now: SimTime, config: &SwarmConfig) -> Self {
        Self {
            door,
            grace: Deadline::after(now, config.door_grace),
            confirm: Deadline::after(now, config.door_confirm_timeout),
            confirmations: 0,
            verdict: None,
            finished: false,
        }
    }

    pub fn door(&self) -> Position {
        self.door
    }

    pub fn confirmations(&self) -> usize {
        self.confirmations
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Count a confirmation for this door; late ones are ignored
    pub fn confirm(&mut self, door: &Position) -> bool {
        if self.verdict.is_some() || door.distance(&self.door) > f64::EPSILON {
            return false;
        }
        self.confirmations += 1;
        true
    }

    pub fn poll(&mut self, now: SimTime) -> Option<InquiryStep> {
        if self.finished {
            return None;
        }
        match self.verdict {
            None if self.confirm.expired(now) => {
                let verdict = if self.confirmations > 0 {
                    self.finished = true;
                    DoorVerdict::FalseAlarm
                } else {
                    DoorVerdict::Investigate
                };
                self.verdict = Some(verdict);
                Some(InquiryStep::Decided(verdict))
            }
            Some(DoorVerdict::Investigate) if self.grace.expired(now) => {
                self.finished = true;
                Some(InquiryStep::Investigate(self.door))
            }
            _ => None,
        }
    }
}
