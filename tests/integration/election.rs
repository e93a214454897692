use patrol_swarm::config::SwarmConfig;
use patrol_swarm::error::SwarmError;
use patrol_swarm::events::SwarmEvent;
use patrol_swarm::role::Role;

use crate::integration::support::{pos, Field};

#[test]
fn simultaneous_detectors_elect_one_coordinator() {
    let mut field = Field::new(pos(2.0, 0.0));
    let a = field.guard("a", pos(0.0, 0.0));
    let b = field.guard("b", pos(4.0, 0.0));
    let c = field.guard("c", pos(0.0, 20.0));

    field.run(1);

    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::CoordinatorElected { .. })),
        1
    );
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::CoordinatorElected { agent: a }),
        1
    );
    assert_eq!(field.role(a), Role::Pursue);
    assert_eq!(field.role(b), Role::Pursue);
    assert_eq!(field.role(c), Role::GuardExit);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 1);
    assert!(field.swarm.world().coordinator().is_none());
}

#[test]
fn coordinator_slot_is_released_after_round() {
    let mut field = Field::new(pos(2.0, 0.0));
    field.guard("a", pos(0.0, 0.0));
    field.guard("b", pos(0.0, 20.0));

    field.run(1);

    assert!(field.swarm.coordinators().is_empty());
    assert!(field.swarm.world().coordinator().is_none());
    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::RoundConcluded { bids: 1, .. })),
        1
    );
}

#[test]
fn cooldown_delays_next_election() {
    let config = SwarmConfig {
        election_cooldown: 10.0,
        ..SwarmConfig::default()
    };
    let mut field = Field::with(config, Vec::new(), pos(2.0, 0.0));
    field.guard("a", pos(0.0, 0.0));
    field.guard("b", pos(5.0, 0.0));
    field.guard("c", pos(0.0, 20.0));
    field.guard("d", pos(0.0, -20.0));
    let e = field.guard("e", pos(40.0, 0.0));

    field.run(1);
    assert_eq!(field.role(e), Role::Patrol);

    field.move_target(pos(42.0, 0.0));
    field.run(50);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 1);
    assert_eq!(field.role(e), Role::Patrol);

    field.run(60);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 2);
    assert_eq!(
        field.count_events(|ev| *ev == SwarmEvent::CoordinatorElected { agent: e }),
        1
    );
}

#[test]
fn coordinator_leaving_mid_round_clears_slot() {
    let mut field = Field::new(pos(2.0, 0.0));
    let a = field.guard("a", pos(0.0, 0.0));
    field.mute("m", pos(0.0, 20.0));
    let b = field.guard("b", pos(30.0, 0.0));

    field.run(1);
    assert_eq!(field.swarm.world().coordinator(), Some(a));
    assert_eq!(field.swarm.coordinators(), vec![a]);

    field.swarm.remove_agent(a).unwrap();
    assert!(field.swarm.world().coordinator().is_none());
    assert!(field.swarm.coordinators().is_empty());
    assert!(!field.swarm.directory().contains(a));

    let err = field.swarm.remove_agent(a).unwrap_err();
    assert!(matches!(err, SwarmError::AgentNotFound(id) if id == a));

    field.move_target(pos(32.0, 0.0));
    field.run(1);
    assert_eq!(field.swarm.world().coordinator(), Some(b));
    assert_eq!(field.role(b), Role::Pursue);
}
