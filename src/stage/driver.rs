use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::core::Viewport;
use crate::paths::loader::NormalizedPath;
use crate::paths::sized::SizedPath;
use crate::sensor::poller::SensorReading;
use crate::stage::flight::{Dot, Flight, FlightState};

/// Tunables for the animation driver.
///
/// Dots advance `speed / speed_ratio` pixels per millisecond and have a
/// `dot_radius` base radius before the per-flight pulse.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageOpts {
    pub speed_ratio: f64,
    pub dot_radius: f64,
    /// Fixed RNG seed for deterministic path/offset picks; `None` seeds from
    /// the OS.
    pub seed: Option<u64>,
}

impl Default for StageOpts {
    fn default() -> Self {
        Self {
            speed_ratio: 200.0,
            dot_radius: 2.0,
            seed: None,
        }
    }
}

/// Owned animation state: the loaded paths, the current sized set and the
/// list of active flights.
///
/// All mutation happens from the single-threaded frame loop; completed sensor
/// polls are merged in via [`Stage::ingest`].
pub struct Stage {
    normalized: Vec<NormalizedPath>,
    sized: Vec<Arc<SizedPath>>,
    flights: Vec<Flight>,
    opts: StageOpts,
    rng: StdRng,
}

impl Stage {
    pub fn new(normalized: Vec<NormalizedPath>, viewport: Viewport, opts: StageOpts) -> Self {
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let sized = size_paths(&normalized, viewport);
        Self {
            normalized,
            sized,
            flights: Vec::new(),
            opts,
            rng,
        }
    }

    /// Rebuild the sized path set for a new viewport, replacing the prior
    /// set. Flights already in the air keep the geometry they started with.
    pub fn resize(&mut self, viewport: Viewport) {
        self.sized = size_paths(&self.normalized, viewport);
    }

    /// Merge one successful sensor poll: spawn two flights on independently
    /// random paths, with speeds taken from PM2.5 and PM10 respectively.
    pub fn ingest(&mut self, reading: SensorReading, now: Instant) {
        if self.sized.is_empty() {
            tracing::warn!("sensor reading arrived but no paths are loaded; nothing to spawn");
            return;
        }
        for speed in [reading.pm25, reading.pm10] {
            let idx = self.rng.gen_range(0..self.sized.len());
            let phase_offset: f64 = self.rng.r#gen();
            self.flights
                .push(Flight::new(self.sized[idx].clone(), now, speed, phase_offset));
        }
        tracing::debug!(
            pm25 = reading.pm25,
            pm10 = reading.pm10,
            active = self.flights.len(),
            "spawned flights"
        );
    }

    /// Advance every flight, retire the completed ones, and return the draw
    /// list for the survivors.
    pub fn step(&mut self, now: Instant) -> Vec<Dot> {
        let ratio = self.opts.speed_ratio;
        for flight in &mut self.flights {
            flight.advance(now, ratio);
        }
        self.flights.retain(|f| f.state() != FlightState::Done);
        self.flights
            .iter()
            .filter_map(|f| f.sample(self.opts.dot_radius))
            .collect()
    }

    /// Flights currently in the air, in spawn order.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// The current sized path set.
    pub fn paths(&self) -> &[Arc<SizedPath>] {
        &self.sized
    }
}

fn size_paths(normalized: &[NormalizedPath], viewport: Viewport) -> Vec<Arc<SizedPath>> {
    normalized
        .iter()
        .map(|p| Arc::new(p.resize(viewport)))
        .collect()
}
