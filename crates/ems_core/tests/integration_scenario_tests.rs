mod support;

use ems_core::clock::{EventKind, NEVER};
use ems_core::ecs::TriageClass;
use ems_core::runner::StepOutcome;
use ems_core::scenario::SelectionPolicyKind;
use ems_core::survival::sll_surv;
use ems_core::telemetry::SimTelemetry;
use ems_core::test_helpers::patients_of;
use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

#[test]
fn single_delayed_patient_takes_three_events() {
    let mut world = TestWorldBuilder::new()
        .with_patients(0, 1)
        .with_hospitals(&[(1.0, 0, 1)])
        .build();
    let mut runner = ScheduleRunner::new();

    let steps = runner.run_full(&mut world);
    assert_eq!(steps, 3);

    let telemetry = world.resource::<SimTelemetry>();
    let kinds: Vec<EventKind> = telemetry.events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Pickup, EventKind::Dropoff, EventKind::Departure]
    );
    // Travel 1.5 plus 180 of treatment.
    let expected = sll_surv(181.5, TriageClass::Delayed);
    assert!((telemetry.total_survival_probability - expected).abs() < 1e-12);
    assert_eq!(telemetry.served, 1);
}

#[test]
fn second_patient_waits_for_the_only_server() {
    let mut world = TestWorldBuilder::new()
        .with_patients(2, 0)
        .with_hospitals(&[(1.0, 1, 0)])
        .build();
    let mut runner = ScheduleRunner::new();

    // pickup, dropoff, pickup, dropoff
    for _ in 0..4 {
        assert!(matches!(runner.run_one(&mut world), StepOutcome::Processed(_)));
    }
    let patients = patients_of(&world);
    assert_eq!(patients[0].1.departure_time, 91.5);
    assert!(patients[1].1.is_queued());
    assert_eq!(patients[1].1.departure_time, NEVER);

    let departure = runner.run_one(&mut world);
    assert!(matches!(
        departure,
        StepOutcome::Processed(e) if e.kind == EventKind::Departure && e.timestamp == 91.5
    ));
    let patients = patients_of(&world);
    assert!(patients[1].1.is_admitted());
    assert_eq!(patients[1].1.departure_time, 181.5);

    runner.run_full(&mut world);
    assert_eq!(world.resource::<SimTelemetry>().served, 2);
}

#[test]
fn fifo_ends_pick_opposite_patients_first() {
    let first_pickup = |policy: SelectionPolicyKind| {
        let mut world = TestWorldBuilder::new()
            .with_patients(2, 2)
            .with_policy(policy)
            .build();
        let mut runner = ScheduleRunner::new();
        runner.run_one(&mut world);
        world.resource::<SimTelemetry>().events[0].patient
    };

    assert_eq!(first_pickup(SelectionPolicyKind::FifoHead), 0);
    assert_eq!(first_pickup(SelectionPolicyKind::FifoTail), 3);
}

#[test]
fn pickup_wins_ties_against_departure() {
    // Distance 40 makes a leg 60 minutes: the third pickup and the first
    // departure both fall at t = 240.
    let mut world = TestWorldBuilder::new()
        .with_patients(0, 3)
        .with_hospitals(&[(40.0, 0, 3)])
        .build();
    let mut runner = ScheduleRunner::new();
    runner.run_full(&mut world);

    let telemetry = world.resource::<SimTelemetry>();
    let trace: Vec<(f64, EventKind)> = telemetry.events.iter().map(|e| (e.time, e.kind)).collect();
    assert_eq!(
        trace,
        vec![
            (0.0, EventKind::Pickup),
            (60.0, EventKind::Dropoff),
            (120.0, EventKind::Pickup),
            (180.0, EventKind::Dropoff),
            (240.0, EventKind::Pickup),
            (240.0, EventKind::Departure),
            (300.0, EventKind::Dropoff),
            (360.0, EventKind::Departure),
            (480.0, EventKind::Departure),
        ]
    );
}
