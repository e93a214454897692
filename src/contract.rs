//! Collaborator contracts
//!
//! Movement, detection and landmark lookup are supplied by the host
//! environment. The swarm only talks to them through these traits.

use crate::types::{AgentId, Position};

/// Path executor attached to one agent
pub trait MovementActuator: Send {
    fn position(&self) -> Position;

    fn set_destination(&mut self, destination: Position);

    /// Distance left to the current destination; zero when there is none
    fn remaining_distance(&self) -> f64;

    /// True while a freshly requested path is still being computed
    fn path_pending(&self) -> bool;

    fn speed(&self) -> f64;

    fn set_speed(&mut self, speed: f64);

    fn stop(&mut self);

    /// Advance the body by one tick
    fn advance(&mut self, dt: f64);

    fn has_arrived(&self, threshold: f64) -> bool {
        !self.path_pending() && self.remaining_distance() <= threshold
    }
}

/// What an observer learns about the target in one check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    pub position: Position,
    /// Only ever true for a visual sighting
    pub carries_asset: bool,
    /// Evidence passed on by another agent rather than perceived directly
    pub relayed: bool,
}

/// Visual and auditory target sensors of one agent
pub trait TargetDetector: Send {
    fn can_see_target(&self, observer: &Position) -> bool;

    fn can_hear_target(&self, observer: &Position) -> bool;

    /// Where the target currently is; only meaningful while perceptible
    fn target_position(&self) -> Position;

    fn target_carries_asset(&self) -> bool;

    /// OR of both senses. Asset carriage can only be confirmed by sight.
    fn perceive(&self, observer: &Position) -> Option<Sighting> {
        let seen = self.can_see_target(observer);
        if !seen && !self.can_hear_target(observer) {
            return None;
        }
        Some(Sighting {
            position: self.target_position(),
            carries_asset: seen && self.target_carries_asset(),
            relayed: false,
        })
    }
}

/// Where the guarded asset is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetStatus {
    Present(Position),
    /// The landmark is gone; bids fall back to where it was last seen
    Vanished { last_known: Position },
}

impl AssetStatus {
    pub fn position(&self) -> Position {
        match self {
            AssetStatus::Present(p) => *p,
            AssetStatus::Vanished { last_known } => *last_known,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, AssetStatus::Vanished { .. })
    }
}

/// Scene landmark lookup shared by every agent
pub trait LandmarkResolver: Send + Sync {
    fn asset(&self) -> AssetStatus;

    fn extraction_point(&self) -> Position;

    fn chokepoints(&self) -> Vec<Position>;

    /// Ordered waypoints the agent cycles through while patrolling
    fn patrol_route(&self, agent: AgentId) -> Vec<Position>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        see: bool,
        hear: bool,
        carrying: bool,
    }

    impl TargetDetector for Fixed {
        fn can_see_target(&self, _: &Position) -> bool {
            self.see
        }
        fn can_hear_target(&self, _: &Position) -> bool {
            self.hear
        }
        fn target_position(&self) -> Position {
            Position::new(1.0, 0.0, 2.0)
        }
        fn target_carries_asset(&self) -> bool {
            self.carrying
        }
    }

    #[test]
    fn test_hearing_alone_cannot_confirm_carrier() {
        let detector = Fixed {
            see: false,
            hear: true,
            carrying: true,
        };
        let sighting = detector.perceive(&Position::default()).unwrap();
        assert!(!sighting.carries_asset);
    }

    #[test]
    fn test_nothing_perceived() {
        let detector = Fixed {
            see: false,
            hear: false,
            carrying: true,
        };
        assert!(detector.perceive(&Position::default()).is_none());
    }

    #[test]
    fn test_vanished_asset_keeps_last_position() {
        let status = AssetStatus::Vanished {
            last_known: Position::new(3.0, 0.0, 3.0),
        };
        assert!(status.is_missing());
        assert_eq!(status.position(), Position::new(3.0, 0.0, 3.0));
    }
}
