use std::time::{Duration, Instant};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Viewport};
use crate::foundation::error::FloaterResult;
use crate::paths::loader::NormalizedPath;
use crate::render::cpu::{RendererOpts, TrailRenderer};
use crate::sensor::poller::{PollerOpts, SensorClient, SensorPoller};
use crate::stage::driver::{Stage, StageOpts};

/// Options for an animation session.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    pub viewport: Viewport,
    pub fps: Fps,
    /// Wall-clock run length in milliseconds; `None` runs until the process
    /// is interrupted.
    pub max_duration_ms: Option<u64>,
    pub stage: StageOpts,
    pub renderer: RendererOpts,
    pub poller: PollerOpts,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 960,
                height: 540,
            },
            fps: Fps { num: 60, den: 1 },
            max_duration_ms: None,
            stage: StageOpts::default(),
            renderer: RendererOpts::default(),
            poller: PollerOpts::default(),
        }
    }
}

/// Counters reported by [`AnimationSession::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Sensor readings merged into the stage.
    pub readings: u64,
}

/// The recurring frame callback and the polling timer, owned as one object.
///
/// Per frame: tick the poller, merge completed polls into the stage, step
/// the stage, render, push the frame, sleep to the configured cadence. All
/// animation-state mutation happens on the calling thread.
pub struct AnimationSession {
    stage: Stage,
    renderer: TrailRenderer,
    poller: SensorPoller,
    viewport: Viewport,
    fps: Fps,
    max_duration: Option<Duration>,
}

impl AnimationSession {
    pub fn new(
        paths: Vec<NormalizedPath>,
        client: SensorClient,
        opts: SessionOpts,
    ) -> FloaterResult<Self> {
        let renderer = TrailRenderer::new(opts.viewport, opts.renderer)?;
        let stage = Stage::new(paths, opts.viewport, opts.stage);
        let poller = SensorPoller::new(client, opts.poller);
        Ok(Self {
            stage,
            renderer,
            poller,
            viewport: opts.viewport,
            fps: opts.fps,
            max_duration: opts.max_duration_ms.map(Duration::from_millis),
        })
    }

    /// Rebuild sized paths and render buffers for a new viewport. Call
    /// between frames; flights in the air keep their original geometry.
    pub fn resize(&mut self, viewport: Viewport) -> FloaterResult<()> {
        self.renderer.resize(viewport)?;
        self.stage.resize(viewport);
        self.viewport = viewport;
        Ok(())
    }

    /// Run the frame loop, pushing every frame into `sink`.
    ///
    /// Returns after `max_duration_ms` of wall-clock time (at least one
    /// frame is always rendered), or never when unset.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> FloaterResult<SessionStats> {
        sink.begin(SinkConfig {
            width: self.viewport.width,
            height: self.viewport.height,
            fps: self.fps,
        })?;

        let frame_dt = Duration::from_secs_f64(self.fps.frame_duration_secs());
        let started = Instant::now();
        let mut next_frame = started;
        let mut stats = SessionStats::default();

        loop {
            let now = Instant::now();
            self.poller.tick(now);
            for reading in self.poller.drain() {
                self.stage.ingest(reading, now);
                stats.readings += 1;
            }

            let dots = self.stage.step(now);
            let frame = self.renderer.render(&dots)?;
            sink.push_frame(FrameIndex(stats.frames), &frame)?;
            stats.frames += 1;

            if let Some(max) = self.max_duration
                && started.elapsed() >= max
            {
                break;
            }

            next_frame += frame_dt;
            let now = Instant::now();
            if next_frame > now {
                std::thread::sleep(next_frame - now);
            } else {
                // Fell behind; skip the sleep rather than spiral.
                next_frame = now;
            }
        }

        sink.end()?;
        tracing::debug!(
            frames = stats.frames,
            readings = stats.readings,
            "session finished"
        );
        Ok(stats)
    }

    /// The stage, for inspection.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }
}
