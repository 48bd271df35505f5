use crate::foundation::error::{FloaterError, FloaterResult};

pub use kurbo::{CubicBez, Point, Vec2};

/// Absolute 0-based frame index in session timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output surface dimensions in pixels.
///
/// Sized paths and the renderer are rebuilt against a new `Viewport` on
/// resize; flights spawned earlier keep the geometry they started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a validated viewport with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> FloaterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FloaterError::validation("Viewport dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FloaterResult<Self> {
        if den == 0 {
            return Err(FloaterError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FloaterError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}
