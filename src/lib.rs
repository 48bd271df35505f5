//! Floater renders an ambient air-quality visualization: dots travel along
//! pre-defined curved vector paths at speeds driven by periodically polled
//! PM2.5/PM10 sensor readings, leaving a fading trail.
//!
//! The pieces compose in three layers:
//!
//! - Load an SVG into [`NormalizedPath`]s and size them to a [`Viewport`]
//! - Drive a [`Stage`] of flights from [`SensorPoller`] readings
//! - Rasterize each frame with [`TrailRenderer`] into a [`FrameSink`]
//!
//! [`AnimationSession`] wires all of that into a single wall-clock loop.
#![forbid(unsafe_code)]

mod foundation;

pub mod encode;
pub mod paths;
pub mod render;
pub mod sensor;
pub mod session;
pub mod stage;

pub use crate::foundation::core::{Fps, FrameIndex, Point, Vec2, Viewport};
pub use crate::foundation::error::{FloaterError, FloaterResult};

pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::paths::loader::{NormalizedPath, load_vector_paths, parse_vector_paths};
pub use crate::paths::sized::SizedPath;
pub use crate::render::FrameRGBA;
pub use crate::render::cpu::{RendererOpts, TrailRenderer};
pub use crate::sensor::poller::{PollerOpts, SensorClient, SensorPoller, SensorReading};
pub use crate::session::run::{AnimationSession, SessionOpts, SessionStats};
pub use crate::stage::driver::{Stage, StageOpts};
pub use crate::stage::flight::{Dot, Flight, FlightState};
