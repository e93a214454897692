use patrol_swarm::config::SwarmConfig;
use patrol_swarm::events::SwarmEvent;
use patrol_swarm::role::{Role, RoleAssignment};

use crate::integration::support::{asset, pos, Field};

#[test]
fn chokepoint_holder_switches_to_pursue_on_sight() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g = field.guard("g", pos(0.0, 0.0));
    let peer = field.guard("peer", pos(0.0, 40.0));

    field.assign(peer, g, RoleAssignment::chokepoint(pos(3.0, 0.0)));
    assert_eq!(field.role(g), Role::GuardChokepoint);

    field.run(15);
    assert_eq!(field.role(g), Role::GuardChokepoint);

    field.move_target(pos(4.0, 0.0));
    field.run(1);

    assert_eq!(field.role(g), Role::Pursue);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 0);
    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::CoordinatorElected { .. })),
        0
    );
}

#[test]
fn lost_target_sends_pursuer_to_check_the_asset() {
    let mut field = Field::new(pos(2.0, 0.0));
    let g = field.guard("g", pos(0.0, 0.0));

    field.run(1);
    assert_eq!(field.role(g), Role::Pursue);

    field.move_target(pos(100.0, 100.0));
    field.run(50);
    assert_eq!(field.role(g), Role::GuardAsset);
}

#[test]
fn lost_target_after_compromise_sends_pursuer_to_chokepoint() {
    let mut field = Field::with(
        SwarmConfig::default(),
        vec![pos(10.0, 0.0), pos(-30.0, 0.0)],
        pos(2.0, 0.0),
    );
    let g = field.guard("g", pos(0.0, 0.0));
    assert!(field.swarm.world().mark_asset_compromised());

    field.run(1);
    assert_eq!(field.role(g), Role::Pursue);

    field.move_target(pos(100.0, 100.0));
    field.run(50);
    assert_eq!(field.role(g), Role::GuardChokepoint);
}

#[test]
fn lost_target_after_compromise_without_chokepoints_guards_exit() {
    let mut field = Field::new(pos(2.0, 0.0));
    let g = field.guard("g", pos(0.0, 0.0));
    field.swarm.world().mark_asset_compromised();

    field.run(1);
    field.move_target(pos(100.0, 100.0));
    field.run(50);
    assert_eq!(field.role(g), Role::GuardExit);
}

#[test]
fn guard_finding_asset_gone_reports_compromise_and_elects() {
    let mut field = Field::new(pos(100.0, 100.0));
    field.set_carrying(true);
    let g = field.guard("g", pos(0.0, 20.0));
    let h = field.guard("h", pos(0.0, -20.0));

    field.assign(h, g, RoleAssignment::new(Role::GuardAsset));
    field.run(30);

    let world = field.swarm.world().snapshot();
    assert!(world.asset_compromised);
    assert_eq!(world.compromise_transitions, 1);
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::AssetCompromised { by: g }),
        1
    );
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::CoordinatorElected { agent: g }),
        1
    );
    assert_eq!(field.role(g), Role::Pursue);
    assert_eq!(field.role(h), Role::Pursue);
    assert!(field.swarm.bus_stats().buffered >= 1);
    assert!(field
        .swarm
        .directory()
        .get(g)
        .map(|r| r.position.distance(&asset()) <= 1.0)
        .unwrap_or(false));
}

#[test]
fn pursuer_keeps_teammates_informed() {
    let mut field = Field::new(pos(2.0, 0.0));
    field.guard("a", pos(0.0, 0.0));
    field.guard("b", pos(0.0, 20.0));

    field.run(3);

    assert!(field.swarm.bus_stats().buffered >= 1);
}

#[test]
fn assignment_ignored_while_holding_round_role() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g = field.guard("g", pos(0.0, 0.0));
    let peer = field.guard("peer", pos(0.0, 40.0));

    field.assign(peer, g, RoleAssignment::new(Role::GuardExit));
    field.assign(peer, g, RoleAssignment::new(Role::GuardAsset));

    assert_eq!(field.role(g), Role::GuardExit);
}

#[test]
fn guard_at_emptied_asset_is_reassigned_by_its_own_round() {
    let mut field = Field::with(
        SwarmConfig::default(),
        vec![pos(10.0, 0.0), pos(-10.0, 0.0)],
        pos(100.0, 100.0),
    );
    field.set_carrying(true);
    let g = field.guard("g", pos(0.0, 20.0));
    let q = field.guard("q", pos(0.0, -20.0));
    let r = field.guard("r", pos(0.0, -22.0));
    let p1 = field.guard("p1", pos(30.0, 0.0));
    let p2 = field.guard("p2", pos(-30.0, 0.0));

    field.assign(q, g, RoleAssignment::new(Role::GuardAsset));
    field.assign(q, p1, RoleAssignment::new(Role::Pursue));
    field.assign(q, p2, RoleAssignment::new(Role::Pursue));
    field.run(40);

    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::CoordinatorElected { agent: g }),
        1
    );
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::AssetCompromised { by: g }),
        1
    );
    assert_eq!(field.role(g), Role::GuardChokepoint);
    assert_eq!(field.role(q), Role::GuardChokepoint);
    assert_eq!(field.role(r), Role::GuardExit);
    assert_eq!(field.swarm.directory().count_with_role(Role::GuardAsset), 0);
}

#[test]
fn capture_is_reported_once() {
    let mut field = Field::new(pos(0.5, 0.0));
    let g = field.guard("g", pos(0.0, 0.0));

    field.run(5);

    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::TargetCaptured { .. })),
        1
    );
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::TargetCaptured { by: g }),
        1
    );
    assert!(field.swarm.is_finished());
}
