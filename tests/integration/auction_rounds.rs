use patrol_swarm::auction::RoundEnd;
use patrol_swarm::config::SwarmConfig;
use patrol_swarm::events::SwarmEvent;
use patrol_swarm::role::Role;

use crate::integration::support::{pos, Field};

#[test]
fn three_guards_split_pursuit_and_exit() {
    let mut field = Field::new(pos(2.0, 0.0));
    let a = field.guard("a", pos(0.0, 0.0));
    let b = field.guard("b", pos(5.0, 0.0));
    let c = field.guard("c", pos(15.0, 0.0));

    field.run(1);

    assert_eq!(field.role(a), Role::Pursue);
    assert_eq!(field.role(b), Role::Pursue);
    assert_eq!(field.role(c), Role::GuardExit);
    assert_eq!(
        field.count_events(|e| matches!(
            e,
            SwarmEvent::RoundConcluded {
                end: RoundEnd::AllBidsIn,
                bids: 2,
                ..
            }
        )),
        1
    );
}

#[test]
fn missing_bid_times_out_and_defaults_to_patrol() {
    let mut field = Field::new(pos(2.0, 0.0));
    field.guard("a", pos(0.0, 0.0));
    let b = field.guard("b", pos(0.0, 20.0));
    let m = field.mute("m", pos(0.0, -20.0));

    field.run(1);
    field.move_target(pos(100.0, 100.0));
    assert_eq!(field.role(b), Role::Patrol);
    assert!(field.swarm.world().coordinator().is_some());

    field.run(20);
    assert!(field.swarm.world().coordinator().is_some());

    field.run(40);
    assert!(field.swarm.world().coordinator().is_none());
    assert_eq!(
        field.count_events(|e| matches!(
            e,
            SwarmEvent::RoundConcluded {
                end: RoundEnd::TimedOut,
                bids: 1,
                ..
            }
        )),
        1
    );
    assert_eq!(field.role(b), Role::Pursue);
    assert_eq!(field.role(m), Role::Patrol);
}

#[test]
fn pursuer_cap_holds_after_round() {
    let mut field = Field::new(pos(2.0, 0.0));
    let ids = [
        field.guard("a", pos(0.0, 0.0)),
        field.guard("b", pos(5.0, 0.0)),
        field.guard("c", pos(6.0, 0.0)),
        field.guard("d", pos(0.0, 20.0)),
        field.guard("e", pos(0.0, -20.0)),
        field.guard("f", pos(30.0, 0.0)),
    ];

    field.run(1);

    let roles: Vec<Role> = ids.iter().map(|id| field.role(*id)).collect();
    let pursuers = roles.iter().filter(|r| **r == Role::Pursue).count();
    assert_eq!(pursuers, 2);
    assert_eq!(roles[3], Role::GuardAsset);
    assert_eq!(roles[4], Role::GuardExit);
    for role in &roles {
        assert!(matches!(
            role,
            Role::Pursue | Role::GuardAsset | Role::GuardExit | Role::Patrol
        ));
    }
    assert_eq!(roles.iter().filter(|r| **r == Role::Patrol).count(), 2);
}

#[test]
fn coordinator_over_cap_bids_in_its_own_round() {
    let config = SwarmConfig {
        pursuer_cap: 1,
        ..SwarmConfig::default()
    };
    let mut field = Field::with(config, Vec::new(), pos(2.0, 0.0));
    let a = field.guard("a", pos(0.0, 0.0));
    let b = field.guard("b", pos(0.0, 20.0));
    let c = field.guard("c", pos(0.0, -20.0));
    let x = field.guard("x", pos(40.0, 0.0));

    field.run(1);
    assert_eq!(field.role(a), Role::Pursue);
    assert_eq!(field.role(b), Role::GuardAsset);
    assert_eq!(field.role(c), Role::GuardExit);
    assert_eq!(field.role(x), Role::Patrol);

    field.move_target(pos(42.0, 0.0));
    field.run(1);

    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::CoordinatorElected { agent: x }),
        1
    );
    assert_eq!(field.role(a), Role::Pursue);
    assert_eq!(field.role(x), Role::GuardExit);
    assert_eq!(field.swarm.directory().count_with_role(Role::Pursue), 1);
}

#[test]
fn camera_is_never_called_for_bids() {
    let mut field = Field::new(pos(2.0, 0.0));
    field.guard("a", pos(0.0, 0.0));
    let cam = field.camera("cam", pos(50.0, 50.0), None);

    field.run(1);

    assert_eq!(
        field.count_events(|e| matches!(
            e,
            SwarmEvent::RoundConcluded {
                end: RoundEnd::AllBidsIn,
                bids: 0,
                ..
            }
        )),
        1
    );
    assert_eq!(field.role(cam), Role::Idle);
}
