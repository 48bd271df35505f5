use std::time::{Duration, Instant};

use floater::{
    FlightState, NormalizedPath, Point, SensorReading, Stage, StageOpts, Viewport,
};

fn straight_paths() -> Vec<NormalizedPath> {
    vec![
        NormalizedPath::from_points(vec![
            Point::new(0.0, 0.5),
            Point::new(0.5, 0.5),
            Point::new(1.0, 0.5),
        ])
        .unwrap(),
    ]
}

fn seeded_stage(viewport_px: u32) -> Stage {
    Stage::new(
        straight_paths(),
        Viewport::new(viewport_px, viewport_px).unwrap(),
        StageOpts {
            seed: Some(42),
            ..StageOpts::default()
        },
    )
}

#[test]
fn poll_spawns_two_flights_with_reported_speeds() {
    let mut stage = seeded_stage(100);
    stage.ingest(
        SensorReading {
            pm25: 5.0,
            pm10: 20.0,
        },
        Instant::now(),
    );
    assert_eq!(stage.flights().len(), 2);
    assert_eq!(stage.flights()[0].speed(), 5.0);
    assert_eq!(stage.flights()[1].speed(), 20.0);
}

#[test]
fn progress_is_monotone_over_the_flight() {
    // Path length 100px, speed 10, ratio 200: nominal completion at 2000ms.
    let mut stage = seeded_stage(100);
    let t0 = Instant::now();
    stage.ingest(
        SensorReading {
            pm25: 10.0,
            pm10: 10.0,
        },
        t0,
    );

    let mut last = vec![0.0; 2];
    for ms in (0..2000).step_by(100) {
        stage.step(t0 + Duration::from_millis(ms));
        for (i, flight) in stage.flights().iter().enumerate() {
            let FlightState::Active { progress } = flight.state() else {
                panic!("flight {i} not active at {ms}ms");
            };
            assert!(progress >= last[i], "progress regressed at {ms}ms");
            last[i] = progress;
        }
    }
}

#[test]
fn flights_are_removed_on_first_completed_step_and_never_return() {
    let mut stage = seeded_stage(100);
    let t0 = Instant::now();
    stage.ingest(
        SensorReading {
            pm25: 10.0,
            pm10: 10.0,
        },
        t0,
    );

    // Just before nominal completion both flights still draw.
    let dots = stage.step(t0 + Duration::from_millis(1990));
    assert_eq!(dots.len(), 2);

    // First step past completion retires them.
    let dots = stage.step(t0 + Duration::from_millis(2010));
    assert!(dots.is_empty());
    assert!(stage.flights().is_empty());

    // And they stay gone on later frames.
    for ms in [2020u64, 2100, 5000] {
        assert!(stage.step(t0 + Duration::from_millis(ms)).is_empty());
    }
}

#[test]
fn faster_speed_finishes_first() {
    let mut stage = seeded_stage(100);
    let t0 = Instant::now();
    stage.ingest(
        SensorReading {
            pm25: 5.0,
            pm10: 20.0,
        },
        t0,
    );

    // At 600ms: speed 20 has progress 0.6, speed 5 has 0.15.
    stage.step(t0 + Duration::from_millis(600));
    let states: Vec<FlightState> = stage.flights().iter().map(|f| f.state()).collect();
    let (FlightState::Active { progress: slow }, FlightState::Active { progress: fast }) =
        (states[0], states[1])
    else {
        panic!("expected two active flights, got {states:?}");
    };
    assert!(fast > slow);

    // At 1100ms the fast flight (nominal 1000ms) is gone, the slow one is not.
    stage.step(t0 + Duration::from_millis(1100));
    assert_eq!(stage.flights().len(), 1);
    assert_eq!(stage.flights()[0].speed(), 5.0);
}
