//! Per-agent role state machine
//!
//! The machine decides, the agent acts: `step` returns directives that the
//! owning agent turns into actuator calls, messages and shared-state updates.
//! Role changes only record the new role; entry actions run at the start of
//! the next step.

use super::{Role, RoleAssignment};
use crate::config::SwarmConfig;
use crate::contract::{LandmarkResolver, Sighting};
use crate::types::{first_minimum, Deadline, Position, SimTime};
use tracing::debug;

/// What the agent is doing inside its role
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Idle,
    Patrolling,
    Chasing,
    /// Waiting at the last known target position
    Searching { deadline: Deadline },
    Travelling { to: Position },
    /// Stopped and looking out; a sighting may trigger a reaction
    Watching,
    /// Stopped at a post
    Holding,
    /// Walking to a door nobody vouched for
    Investigating { door: Position },
}

/// Action requested by the machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    MoveTo(Position),
    SetSpeed(f64),
    Stop,
    /// Inform every other pursuer of the target position
    BroadcastTarget(Position),
    /// Evidence that the asset is gone
    ConfirmCompromise,
    /// Start a fresh round regardless of the current role
    RequestElection,
    Captured,
}

/// Inputs for one step
pub struct StepContext<'a> {
    pub now: SimTime,
    pub config: &'a SwarmConfig,
    pub position: Position,
    /// Actuator reports the current destination reached
    pub arrived: bool,
    pub sighting: Option<Sighting>,
    pub last_known_target: Option<Position>,
    pub asset_compromised: bool,
    pub landmarks: &'a dyn LandmarkResolver,
}

#[derive(Debug, Clone)]
pub struct RoleMachine {
    role: Role,
    chokepoint: Option<Position>,
    activity: Activity,
    entry_pending: bool,
    route: Vec<Position>,
    waypoint: usize,
    best_known: Option<Position>,
    report_fresh: bool,
    last_inform_at: Option<SimTime>,
}

impl RoleMachine {
    pub fn new(role: Role, route: Vec<Position>) -> Self {
        Self {
            role,
            chokepoint: None,
            activity: Activity::Idle,
            entry_pending: true,
            route,
            waypoint: 0,
            best_known: None,
            report_fresh: false,
            last_inform_at: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn chokepoint(&self) -> Option<Position> {
        self.chokepoint
    }

    pub fn best_known(&self) -> Option<Position> {
        self.best_known
    }

    pub fn entry_pending(&self) -> bool {
        self.entry_pending
    }

    /// Take a new role; movement changes on the next step
    pub fn assign(&mut self, assignment: RoleAssignment) {
        debug!(from = %self.role, to = %assignment.role, "Role assigned");
        self.role = assignment.role;
        self.chokepoint = assignment.target;
        self.entry_pending = true;
    }

    /// Target position reported by a teammate
    pub fn note_report(&mut self, position: Position) {
        self.best_known = Some(position);
        self.report_fresh = true;
    }

    /// Divert to an unexplained noise. Only agents free for assignment go.
    pub fn investigate(&mut self, door: Position) -> Vec<Directive> {
        if !self.role.is_available_for_assignment() || self.entry_pending {
            return Vec::new();
        }
        self.activity = Activity::Investigating { door };
        vec![Directive::MoveTo(door)]
    }

    pub fn step(&mut self, ctx: &StepContext<'_>) -> Vec<Directive> {
        let mut out = Vec::new();

        if let Some(sighting) = ctx.sighting {
            self.best_known = Some(sighting.position);
            if !sighting.relayed
                && ctx.position.distance(&sighting.position) <= ctx.config.capture_radius
            {
                out.push(Directive::Captured);
            }
        }

        if self.entry_pending {
            self.enter(ctx, &mut out);
        } else {
            match self.role {
                Role::Patrol | Role::Idle => self.patrol_step(ctx, &mut out),
                Role::Pursue => self.pursue_step(ctx, &mut out),
                Role::GuardAsset => self.guard_asset_step(ctx, &mut out),
                Role::GuardExit => self.hold_step(ctx, &mut out),
                Role::GuardChokepoint => self.chokepoint_step(ctx, &mut out),
            }
        }

        self.report_fresh = false;
        out
    }

    fn enter(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        self.entry_pending = false;
        let speed = if self.role == Role::Pursue {
            ctx.config.chase_speed
        } else {
            ctx.config.patrol_speed
        };
        out.push(Directive::SetSpeed(speed));

        match self.role {
            Role::Patrol if !self.route.is_empty() => {
                self.waypoint %= self.route.len();
                self.activity = Activity::Patrolling;
                out.push(Directive::MoveTo(self.route[self.waypoint]));
            }
            Role::Patrol | Role::Idle => {
                self.activity = Activity::Idle;
                out.push(Directive::Stop);
            }
            Role::Pursue => {
                self.last_inform_at = None;
                let goal = ctx
                    .sighting
                    .map(|s| s.position)
                    .or(self.best_known)
                    .or(ctx.last_known_target);
                match goal {
                    Some(goal) => {
                        self.best_known = Some(goal);
                        self.activity = Activity::Chasing;
                        out.push(Directive::MoveTo(goal));
                    }
                    None => self.begin_search(ctx, out),
                }
            }
            Role::GuardAsset => self.travel(ctx.landmarks.asset().position(), out),
            Role::GuardExit => self.travel(ctx.landmarks.extraction_point(), out),
            Role::GuardChokepoint => {
                let point = self.chokepoint.or_else(|| {
                    first_minimum(ctx.landmarks.chokepoints(), |p| p.distance(&ctx.position))
                });
                match point {
                    Some(point) => {
                        self.chokepoint = Some(point);
                        self.travel(point, out);
                    }
                    None => {
                        self.activity = Activity::Holding;
                        out.push(Directive::Stop);
                    }
                }
            }
        }
    }

    fn travel(&mut self, to: Position, out: &mut Vec<Directive>) {
        self.activity = Activity::Travelling { to };
        out.push(Directive::MoveTo(to));
    }

    fn begin_search(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        self.activity = Activity::Searching {
            deadline: Deadline::after(ctx.now, ctx.config.search_wait),
        };
        out.push(Directive::Stop);
    }

    fn patrol_step(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        match self.activity {
            Activity::Patrolling if ctx.arrived && !self.route.is_empty() => {
                self.waypoint = (self.waypoint + 1) % self.route.len();
                out.push(Directive::MoveTo(self.route[self.waypoint]));
            }
            Activity::Investigating { .. } if ctx.arrived => {
                // nothing found, back to the route
                self.entry_pending = true;
            }
            _ => {}
        }
    }

    fn pursue_step(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        if let Some(sighting) = ctx.sighting {
            self.activity = Activity::Chasing;
            out.push(Directive::MoveTo(sighting.position));
            if sighting.carries_asset && !ctx.asset_compromised {
                out.push(Directive::ConfirmCompromise);
            }
            let due = self
                .last_inform_at
                .map_or(true, |last| ctx.now - last >= ctx.config.inform_interval);
            if due {
                self.last_inform_at = Some(ctx.now);
                out.push(Directive::BroadcastTarget(sighting.position));
            }
            return;
        }

        match self.activity {
            Activity::Chasing => match self.best_known {
                Some(goal) if self.report_fresh => out.push(Directive::MoveTo(goal)),
                Some(_) if ctx.arrived => self.begin_search(ctx, out),
                Some(_) => {}
                None => self.begin_search(ctx, out),
            },
            Activity::Searching { deadline } => {
                if let (true, Some(goal)) = (self.report_fresh, self.best_known) {
                    self.activity = Activity::Chasing;
                    out.push(Directive::MoveTo(goal));
                } else if deadline.expired(ctx.now) {
                    self.search_exhausted(ctx);
                }
            }
            _ => {}
        }
    }

    /// Lost the target: seal a chokepoint if the asset is already gone,
    /// otherwise go and check on the asset
    fn search_exhausted(&mut self, ctx: &StepContext<'_>) {
        if ctx.asset_compromised {
            let anchor = ctx
                .last_known_target
                .or(self.best_known)
                .unwrap_or(ctx.position);
            match first_minimum(ctx.landmarks.chokepoints(), |p| p.distance(&anchor)) {
                Some(point) => self.assign(RoleAssignment::chokepoint(point)),
                None => self.assign(RoleAssignment::new(Role::GuardExit)),
            }
        } else {
            self.assign(RoleAssignment::new(Role::GuardAsset));
        }
    }

    fn guard_asset_step(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        if let Activity::Travelling { .. } = self.activity {
            if !ctx.arrived {
                return;
            }
            self.activity = Activity::Watching;
            out.push(Directive::Stop);

            let carrier_seen = ctx.sighting.map_or(false, |s| s.carries_asset);
            if ctx.landmarks.asset().is_missing() || carrier_seen {
                out.push(Directive::ConfirmCompromise);
                out.push(Directive::RequestElection);
            }
        }
    }

    fn hold_step(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        if let Activity::Travelling { .. } = self.activity {
            if ctx.arrived {
                self.activity = Activity::Holding;
                out.push(Directive::Stop);
            }
        }
    }

    fn chokepoint_step(&mut self, ctx: &StepContext<'_>, out: &mut Vec<Directive>) {
        match self.activity {
            Activity::Travelling { .. } if ctx.arrived => {
                self.activity = Activity::Watching;
                out.push(Directive::Stop);
            }
            Activity::Watching if ctx.sighting.is_some() => {
                self.assign(RoleAssignment::new(Role::Pursue));
            }
            _ => {}
        }
    }
}
