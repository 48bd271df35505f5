use std::path::PathBuf;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{FloaterError, FloaterResult};
use crate::render::FrameRGBA;

/// Writes each frame as `frame_XXXXX.png` under a target directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    frames_written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frames_written: 0,
        }
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> FloaterResult<()> {
        self.frames_written = 0;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            FloaterError::render(format!(
                "failed to create output dir '{}': {e}",
                self.dir.display()
            ))
        })
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FloaterResult<()> {
        let path = self.dir.join(format!("frame_{:05}.png", idx.0));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| FloaterError::render(format!("failed to write '{}': {e}", path.display())))?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> FloaterResult<()> {
        Ok(())
    }
}
