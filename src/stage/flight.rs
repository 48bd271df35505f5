use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Instant;

use crate::foundation::core::Point;
use crate::paths::sized::SizedPath;

/// Explicit lifecycle of one active animation.
///
/// `Pending` covers the gap between spawn and the first step; `Done` flights
/// are retired by the driver and never sampled again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlightState {
    Pending,
    Active { progress: f64 },
    Done,
}

/// One dot travelling along a sized path: a shared curve handle, a start
/// timestamp, a sensor-derived speed and a random phase offset.
#[derive(Clone, Debug)]
pub struct Flight {
    path: Arc<SizedPath>,
    started_at: Instant,
    speed: f64,
    phase_offset: f64,
    state: FlightState,
}

/// A renderable sample of an active flight.
#[derive(Clone, Copy, Debug)]
pub struct Dot {
    /// Curve position in pixel space.
    pub center: Point,
    /// Radius in pixels, pulsing with progress.
    pub radius: f64,
    /// Opacity in [0, 1], rising then falling over the flight.
    pub alpha: f64,
}

impl Flight {
    pub fn new(path: Arc<SizedPath>, started_at: Instant, speed: f64, phase_offset: f64) -> Self {
        Self {
            path,
            started_at,
            speed,
            phase_offset,
            state: FlightState::Pending,
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn path(&self) -> &Arc<SizedPath> {
        &self.path
    }

    /// Recompute progress from elapsed wall-clock time.
    ///
    /// Distance travelled is `speed / speed_ratio` pixels per millisecond;
    /// progress is that distance over the curve's arc length. Zero-length
    /// curves complete immediately.
    pub fn advance(&mut self, now: Instant, speed_ratio: f64) -> FlightState {
        let elapsed_ms = now.saturating_duration_since(self.started_at).as_secs_f64() * 1000.0;
        let dist = self.speed / speed_ratio * elapsed_ms;
        let length = self.path.length();
        let progress = if length > 0.0 { dist / length } else { 1.0 };
        self.state = if progress >= 1.0 {
            FlightState::Done
        } else {
            FlightState::Active { progress }
        };
        self.state
    }

    /// Sample the dot for the current state.
    ///
    /// Returns `None` unless the flight is active, or when the curve yields a
    /// non-finite position (degenerate geometry is skipped, not drawn).
    pub fn sample(&self, dot_radius: f64) -> Option<Dot> {
        let FlightState::Active { progress } = self.state else {
            return None;
        };
        let center = self.path.point_at(progress)?;
        if !(center.x.is_finite() && center.y.is_finite()) {
            return None;
        }

        let pulse = (progress * PI).sin();
        let shimmer = 0.85 + 0.15 * (((progress + self.phase_offset) * PI * 3.0).sin() + 1.0);
        let size = (0.7 + 0.3 * pulse) * shimmer;
        Some(Dot {
            center,
            radius: dot_radius * size,
            alpha: pulse,
        })
    }
}
