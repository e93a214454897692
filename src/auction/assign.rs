//! Greedy role assignment for a concluded auction round.

use super::Bid;
use crate::role::{Role, RoleAssignment};
use crate::types::{first_minimum, AgentId, Position};
use std::collections::HashMap;

/// Agent eligible for reassignment, in registration order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: AgentId,
    pub position: Position,
}

/// Everything the assignment pass reads
#[derive(Debug, Clone)]
pub struct AssignmentInput<'a> {
    pub candidates: &'a [Candidate],
    pub bids: &'a HashMap<AgentId, Bid>,
    /// Pursue holders already active, coordinator included
    pub current_pursuers: usize,
    pub pursuer_cap: usize,
    pub asset_compromised: bool,
    pub chokepoints: &'a [Position],
    pub anchor: Position,
}

/// One role decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub agent: AgentId,
    pub assignment: RoleAssignment,
}

/// Assign roles in priority order: Pursue, GuardAsset, GuardExit, then two
/// GuardChokepoint slots. Each pick takes the first minimum in candidate order
/// and removes that agent from the pool. Candidates without a bid and whoever
/// is left at the end get Patrol.
///
/// GuardAsset is only filled while at least two bidders remain, so a lone
/// remaining bidder covers the exit instead.
pub fn assign_roles(input: &AssignmentInput<'_>) -> Vec<Assignment> {
    let mut pool: Vec<(Candidate, Bid)> = input
        .candidates
        .iter()
        .filter_map(|c| input.bids.get(&c.id).map(|bid| (*c, *bid)))
        .collect();
    let mut picked: HashMap<AgentId, RoleAssignment> = HashMap::new();

    if input.current_pursuers < input.pursuer_cap {
        if let Some(id) = take_min(&mut pool, |(_, bid)| bid.to_target) {
            picked.insert(id, RoleAssignment::new(Role::Pursue));
        }
    }

    if !input.asset_compromised && pool.len() >= 2 {
        if let Some(id) = take_min(&mut pool, |(_, bid)| bid.to_asset) {
            picked.insert(id, RoleAssignment::new(Role::GuardAsset));
        }
    }

    if let Some(id) = take_min(&mut pool, |(_, bid)| bid.to_exit) {
        picked.insert(id, RoleAssignment::new(Role::GuardExit));
    }

    if input.asset_compromised && input.chokepoints.len() >= 2 && pool.len() >= 2 {
        for point in nearest_chokepoints(input.chokepoints, &input.anchor) {
            if let Some(id) = take_min(&mut pool, |(c, _)| c.position.distance(&point)) {
                picked.insert(id, RoleAssignment::chokepoint(point));
            }
        }
    }

    input
        .candidates
        .iter()
        .map(|c| Assignment {
            agent: c.id,
            assignment: picked
                .get(&c.id)
                .copied()
                .unwrap_or_else(|| RoleAssignment::new(Role::Patrol)),
        })
        .collect()
}

/// The two chokepoints nearest `anchor`, ties kept in landmark order
pub fn nearest_chokepoints(chokepoints: &[Position], anchor: &Position) -> Vec<Position> {
    let mut ordered: Vec<(usize, f64)> = chokepoints
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(anchor)))
        .collect();
    ordered.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    ordered
        .into_iter()
        .take(2)
        .map(|(i, _)| chokepoints[i])
        .collect()
}

fn take_min<F>(pool: &mut Vec<(Candidate, Bid)>, key: F) -> Option<AgentId>
where
    F: Fn(&(Candidate, Bid)) -> f64,
{
    let index = first_minimum(0..pool.len(), |i| key(&pool[*i]))?;
    Some(pool.remove(index).0.id)
}
