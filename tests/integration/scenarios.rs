use patrol_swarm::bus::{Envelope, ONTOLOGY};
use patrol_swarm::config::SwarmConfig;
use patrol_swarm::error::SwarmError;
use patrol_swarm::events::{DoorVerdict, SwarmEvent};
use patrol_swarm::role::Role;
use patrol_swarm::sim::{Scenario, Simulation};

use crate::integration::support::{pos, Field};

const CAPTURE: &str = r#"
name = "capture"

[landmarks]
asset = { x = 0.0, y = 0.0, z = 25.0 }
extraction = { x = 0.0, y = 0.0, z = -25.0 }

[target]
start = { x = 0.0, y = 0.0, z = 0.0 }
waypoints = [{ x = 10.0, y = 0.0, z = 0.0 }]
speed = 1.0

[sensing]
sight_range = 8.0
hearing_range = 0.0

[[guards]]
name = "warden"
position = { x = 10.0, y = 0.0, z = 0.0 }
"#;

const EXTRACTION: &str = r#"
name = "heist"

[landmarks]
asset = { x = 10.0, y = 0.0, z = 0.0 }
extraction = { x = 20.0, y = 0.0, z = 0.0 }

[target]
start = { x = 0.0, y = 0.0, z = 0.0 }
waypoints = [{ x = 10.0, y = 0.0, z = 0.0 }, { x = 20.0, y = 0.0, z = 0.0 }]
speed = 5.0

[sensing]
sight_range = 1.0
hearing_range = 0.0
camera_range = 1.0

[[guards]]
name = "sleepy"
position = { x = 0.0, y = 0.0, z = 100.0 }
"#;

#[test]
fn target_walking_into_guard_is_captured() {
    let scenario = Scenario::from_toml_str(CAPTURE).unwrap();
    let mut sim = Simulation::from_scenario(&scenario, SwarmConfig::default()).unwrap();
    let warden = sim.agent_id("warden").unwrap();

    let report = sim.run(200, 0.1);

    assert_eq!(report.outcome, Some(SwarmEvent::TargetCaptured { by: warden }));
    assert!(report.ticks < 200);
    assert!(report.target.halted);
    assert!(report
        .events
        .iter()
        .any(|e| e.event == SwarmEvent::CoordinatorElected { agent: warden }));
}

#[test]
fn unguarded_asset_is_extracted() {
    let scenario = Scenario::from_toml_str(EXTRACTION).unwrap();
    let mut sim = Simulation::from_scenario(&scenario, SwarmConfig::default()).unwrap();

    let report = sim.run(200, 0.1);

    assert_eq!(report.outcome, Some(SwarmEvent::TargetExtracted));
    assert!(report.target.carrying_asset);
    assert!(report.ticks < 200);
    assert!(!report.world.asset_compromised);

    let ticks = report.ticks;
    assert!(sim.step(0.1));
    assert_eq!(sim.swarm().ticks(), ticks);
}

#[test]
fn camera_alert_drives_assigned_guard_into_election() {
    let mut field = Field::new(pos(100.0, 0.0));
    let g1 = field.guard("g1", pos(50.0, 0.0));
    let g2 = field.guard("g2", pos(0.0, 20.0));
    let cam = field.camera("cam", pos(95.0, 0.0), Some(g1));

    field.run(1);
    assert_eq!(field.role(g1), Role::Patrol);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 0);
    assert_eq!(field.swarm.world().last_known_target(), Some(pos(100.0, 0.0)));

    field.run(1);
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::CoordinatorElected { agent: g1 }),
        1
    );
    assert_eq!(field.role(g1), Role::Pursue);
    assert_eq!(field.role(g2), Role::Pursue);
    assert_eq!(field.role(cam), Role::Idle);
}

#[test]
fn camera_without_guard_informs_everyone() {
    let mut field = Field::new(pos(100.0, 0.0));
    field.guard("g1", pos(50.0, 0.0));
    field.guard("g2", pos(0.0, 20.0));
    field.camera("cam", pos(95.0, 0.0), None);

    field.run(1);

    assert_eq!(field.swarm.bus_stats().buffered, 2);
    assert_eq!(field.swarm.world().snapshot().rounds_started, 0);

    field.run(5);
    assert_eq!(field.swarm.bus_stats().buffered, 2);
}

#[test]
fn door_noise_vouched_for_by_teammate_is_false_alarm() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g1 = field.guard("g1", pos(0.0, 0.0));
    field.guard("g2", pos(10.0, 0.0));
    let g3 = field.guard("g3", pos(20.0, 0.0));

    field.swarm.loud_event(pos(10.5, 0.0));
    field.run(11);

    let false_alarms = field.count_events(|e| {
        matches!(
            e,
            SwarmEvent::DoorInquiry {
                verdict: DoorVerdict::FalseAlarm,
                ..
            }
        )
    });
    assert_eq!(false_alarms, 2);
    for agent in [g1, g3] {
        assert_eq!(
            field.count_events(|e| matches!(e, SwarmEvent::DoorInquiry { agent: a, .. } if *a == agent)),
            1
        );
    }
}

#[test]
fn unexplained_door_noise_is_investigated() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g1 = field.guard("g1", pos(0.0, 0.0));
    field.guard("g2", pos(0.0, 30.0));
    let door = pos(10.5, 0.0);

    field.swarm.loud_event(door);
    field.run(11);
    assert_eq!(
        field.count_events(|e| matches!(
            e,
            SwarmEvent::DoorInquiry {
                verdict: DoorVerdict::Investigate,
                ..
            }
        )),
        2
    );

    field.run(70);
    let position = field.swarm.directory().get(g1).unwrap().position;
    assert!(position.distance(&door) <= 1.5);
    assert_eq!(field.role(g1), Role::Patrol);
}

#[test]
fn malformed_envelope_leaves_state_unchanged() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g1 = field.guard("g1", pos(0.0, 0.0));
    field.guard("g2", pos(0.0, 20.0));
    field.run(1);
    let before = field.swarm.snapshot();
    let stats = field.swarm.bus_stats();

    let envelope = Envelope {
        performative: "inform".to_string(),
        sender: "agent-2".to_string(),
        receiver: "agent-1".to_string(),
        content: "1.0,abc,3.0".to_string(),
        protocol: "pursuit".to_string(),
        ontology: ONTOLOGY.to_string(),
    };
    let err = field.swarm.deliver_envelope(&envelope).unwrap_err();

    assert!(matches!(err, SwarmError::Decode(_)));
    assert_eq!(field.swarm.bus_stats(), stats);
    let after = field.swarm.snapshot();
    assert_eq!(after.len(), before.len());
    assert_eq!(field.role(g1), Role::Patrol);
}

#[test]
fn well_formed_envelope_is_routed() {
    let mut field = Field::new(pos(100.0, 100.0));
    let g1 = field.guard("g1", pos(0.0, 0.0));
    field.guard("g2", pos(0.0, 20.0));

    let envelope = Envelope {
        performative: "assign_role".to_string(),
        sender: "agent-2".to_string(),
        receiver: g1.to_string(),
        content: "guard_exit".to_string(),
        protocol: "auction".to_string(),
        ontology: ONTOLOGY.to_string(),
    };
    field.swarm.deliver_envelope(&envelope).unwrap();

    assert_eq!(field.role(g1), Role::GuardExit);
}

#[test]
fn compromise_is_confirmed_exactly_once() {
    let mut field = Field::new(pos(2.0, 0.0));
    field.set_carrying(true);
    let a = field.guard("a", pos(0.0, 0.0));
    let b = field.guard("b", pos(0.0, -10.0));
    let c = field.guard("c", pos(0.0, -20.0));
    let d = field.guard("d", pos(40.0, 0.0));

    field.run(1);
    assert!(field.swarm.world().is_asset_compromised());
    assert!(field.swarm.bus_stats().buffered >= 3);
    assert_eq!(field.role(a), Role::Pursue);
    assert_eq!(field.role(b), Role::Pursue);
    assert_eq!(field.role(c), Role::GuardExit);
    assert_eq!(field.role(d), Role::Patrol);

    field.move_target(pos(42.0, 0.0));
    field.run(1);

    let world = field.swarm.world().snapshot();
    assert!(world.asset_compromised);
    assert_eq!(world.compromise_transitions, 1);
    assert_eq!(world.rounds_started, 2);
    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::AssetCompromised { .. })),
        1
    );
    assert_eq!(
        field.count_events(|e| *e == SwarmEvent::AssetCompromised { by: a }),
        1
    );
    assert_eq!(
        field.count_events(|e| matches!(e, SwarmEvent::RoundConcluded { .. })),
        2
    );
    assert_eq!(field.role(d), Role::GuardExit);
    assert_eq!(field.swarm.directory().count_with_role(Role::GuardAsset), 0);
}
