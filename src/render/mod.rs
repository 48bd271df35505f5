//! CPU rasterization of the fading-trail animation.

pub mod blur;
pub mod composite;
pub mod cpu;

/// One rendered frame: straight RGBA8 output once presented over an opaque
/// clear color, premultiplied otherwise.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub data: Vec<u8>,
}
