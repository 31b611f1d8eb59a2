//! Property tests for engine-wide invariants
//!
//! Random configurations are driven by random command sequences; the
//! invariants are checked after every step.

use elevator_dispatch_core::{percentile, Orchestrator, SimConfig};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Command {
    Tick,
    AddRequest(usize, usize),
    ToggleDoor(usize),
    SpawnBurst(usize, usize),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        6 => Just(Command::Tick),
        2 => (0usize..14, 0usize..14).prop_map(|(o, d)| Command::AddRequest(o, d)),
        1 => (0usize..5).prop_map(Command::ToggleDoor),
        1 => (0usize..14, 0usize..4).prop_map(|(f, n)| Command::SpawnBurst(f, n)),
    ]
}

fn config() -> impl Strategy<Value = SimConfig> {
    (2usize..12, 1usize..5, 1usize..6, 0.0f64..1.5, any::<u64>(), 1u64..4).prop_map(
        |(floors, elevators, capacity, rate, seed, tick_steps)| SimConfig {
            floors,
            elevators,
            capacity_per_elevator: capacity,
            arrival_rates: vec![rate; floors],
            random_seed: seed,
            tick_ms: tick_steps * 100,
            batch_window_ms: 600,
            ..SimConfig::default()
        },
    )
}

fn apply(orchestrator: &mut Orchestrator, command: &Command) {
    match *command {
        Command::Tick => {
            orchestrator.tick();
        }
        Command::AddRequest(origin, dest) => {
            orchestrator.add_request(origin, dest);
        }
        Command::ToggleDoor(i) => {
            orchestrator.toggle_door(&format!("E{}", i + 1));
        }
        Command::SpawnBurst(floor, count) => {
            orchestrator.spawn_burst(floor, count);
        }
    }
}

fn check_invariants(orchestrator: &Orchestrator) -> Result<(), TestCaseError> {
    let riding = orchestrator.passengers().riding_count();
    let total_load: usize = orchestrator.elevators().iter().map(|e| e.load).sum();
    prop_assert_eq!(total_load, riding, "load must equal riding passengers");

    for e in orchestrator.elevators() {
        let unique: HashSet<usize> = e.queue.iter().copied().collect();
        prop_assert_eq!(unique.len(), e.queue.len(), "duplicate stop in {:?}", e.queue);
        prop_assert!(e.load <= e.capacity);
        prop_assert_eq!(e.load, e.passengers.len());
        prop_assert!(e.current_floor >= 0.0);
        prop_assert!(e.current_floor <= (orchestrator.config().floors - 1) as f64);
        prop_assert!(e.queue.iter().all(|&f| f < orchestrator.config().floors));
    }

    for lobby in orchestrator.lobbies() {
        for request in &lobby.pending_requests {
            prop_assert_eq!(request.origin, lobby.floor);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_invariants_hold_every_step(
        config in config(),
        commands in prop::collection::vec(command(), 1..400),
    ) {
        let mut orchestrator = Orchestrator::new(config).unwrap();
        let tick_ms = orchestrator.config().tick_ms;

        for command in &commands {
            let before = orchestrator.sim_time();
            apply(&mut orchestrator, command);

            let expected = match command {
                Command::Tick => before + tick_ms,
                _ => before,
            };
            prop_assert_eq!(orchestrator.sim_time(), expected);
            check_invariants(&orchestrator)?;
        }
    }

    #[test]
    fn prop_same_seed_same_history(
        config in config(),
        commands in prop::collection::vec(command(), 1..200),
    ) {
        let mut a = Orchestrator::new(config.clone()).unwrap();
        let mut b = Orchestrator::new(config).unwrap();

        for command in &commands {
            apply(&mut a, command);
            apply(&mut b, command);
        }

        prop_assert_eq!(a.event_log().to_vec(), b.event_log().to_vec());
        prop_assert_eq!(a.elevators(), b.elevators());
        prop_assert_eq!(a.metrics(), b.metrics());
    }

    #[test]
    fn prop_percentile_is_a_sample_within_bounds(
        samples in prop::collection::vec(0u64..100_000, 1..200),
        p in 0.0f64..=100.0,
    ) {
        let value = percentile(&samples, p);
        let min = *samples.iter().min().unwrap();
        let max = *samples.iter().max().unwrap();

        prop_assert!(samples.contains(&value));
        prop_assert!(value >= min && value <= max);
    }

    #[test]
    fn prop_percentile_is_monotonic_in_p(
        samples in prop::collection::vec(0u64..100_000, 1..200),
    ) {
        prop_assert!(percentile(&samples, 50.0) <= percentile(&samples, 90.0));
        prop_assert!(percentile(&samples, 90.0) <= percentile(&samples, 95.0));
    }
}

#[test]
fn test_percentile_reference_values() {
    assert_eq!(percentile(&[100, 200, 300, 400], 50.0), 200);
    assert_eq!(percentile(&[], 90.0), 0);
    assert_eq!(percentile(&[400, 100, 300, 200], 95.0), 400);
    assert_eq!(percentile(&[7], 0.0), 7);
}
