use vello_cpu::kurbo::{Affine, BezPath, Circle, Shape};

use crate::foundation::core::Viewport;
use crate::foundation::error::{FloaterError, FloaterResult};
use crate::render::{FrameRGBA, blur, composite};
use crate::stage::flight::Dot;

/// Options for the trail renderer.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Opacity at which the previous frame persists under the new one.
    pub trail_retain: f32,
    /// Straight RGBA the frame is presented over; `None` leaves the output
    /// premultiplied-transparent where nothing was drawn.
    pub clear_rgba: Option<[u8; 4]>,
    /// Present-pass gaussian blur radius in pixels; 0 disables.
    pub blur_radius_px: u32,
    /// Present-pass gaussian sigma.
    pub blur_sigma: f32,
    /// Straight RGB of the dots.
    pub dot_rgb: [u8; 3],
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            trail_retain: 0.99,
            clear_rgba: None,
            blur_radius_px: 1,
            blur_sigma: 0.8,
            dot_rgb: [225, 225, 225],
        }
    }
}

/// CPU renderer reproducing the fading-trail effect: a back buffer carries
/// the previous frame, each new frame draws it at less-than-full opacity,
/// adds the current dots on top and snapshots the result back.
pub struct TrailRenderer {
    width: u32,
    height: u32,
    opts: RendererOpts,
    ctx: Option<vello_cpu::RenderContext>,
    dot_layer: vello_cpu::Pixmap,
    back: Vec<u8>,
    work: Vec<u8>,
}

impl TrailRenderer {
    pub fn new(viewport: Viewport, opts: RendererOpts) -> FloaterResult<Self> {
        let (w16, h16) = dims_u16(viewport)?;
        let len = (viewport.width as usize) * (viewport.height as usize) * 4;
        Ok(Self {
            width: viewport.width,
            height: viewport.height,
            opts,
            ctx: None,
            dot_layer: vello_cpu::Pixmap::new(w16, h16),
            back: vec![0u8; len],
            work: vec![0u8; len],
        })
    }

    pub fn opts(&self) -> RendererOpts {
        self.opts
    }

    /// Reallocate for a new viewport. The accumulated trail is discarded.
    pub fn resize(&mut self, viewport: Viewport) -> FloaterResult<()> {
        *self = Self::new(viewport, self.opts)?;
        Ok(())
    }

    /// Rasterize one frame.
    ///
    /// The previous frame persists at `trail_retain` opacity, the dots draw
    /// on top, and that result becomes the next frame's backdrop before the
    /// presented copy is composited over the clear color and optionally
    /// blurred.
    pub fn render(&mut self, dots: &[Dot]) -> FloaterResult<FrameRGBA> {
        self.work.copy_from_slice(&self.back);
        composite::fade_in_place(&mut self.work, self.opts.trail_retain)?;

        self.rasterize_dots(dots)?;
        composite::over_in_place(&mut self.work, self.dot_layer.data_as_u8_slice(), 1.0)?;

        self.back.copy_from_slice(&self.work);

        let presented = match self.opts.clear_rgba {
            Some(clear) => {
                let mut buf = premul_fill(clear, self.back.len());
                composite::over_in_place(&mut buf, &self.work, 1.0)?;
                buf
            }
            None => self.work.clone(),
        };
        let data = if self.opts.blur_radius_px > 0 {
            blur::blur_rgba8_premul(
                &presented,
                self.width,
                self.height,
                self.opts.blur_radius_px,
                self.opts.blur_sigma,
            )?
        } else {
            presented
        };

        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data,
        })
    }

    fn rasterize_dots(&mut self, dots: &[Dot]) -> FloaterResult<()> {
        self.dot_layer.data_as_u8_slice_mut().fill(0);
        if dots.is_empty() {
            return Ok(());
        }

        let w16 = self.dot_layer.width();
        let h16 = self.dot_layer.height();
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        ctx.set_transform(Affine::IDENTITY);

        let [r, g, b] = self.opts.dot_rgb;
        for dot in dots {
            // Degenerate curve positions are skipped, not drawn.
            if !(dot.center.x.is_finite() && dot.center.y.is_finite()) || !dot.radius.is_finite() {
                continue;
            }
            let alpha = (dot.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            if alpha == 0 || dot.radius <= 0.0 {
                continue;
            }
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, alpha));
            let circle = Circle::new((dot.center.x, dot.center.y), dot.radius);
            let mut path = BezPath::new();
            for el in circle.path_elements(0.1) {
                path.push(el);
            }
            ctx.fill_path(&path);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.dot_layer);
        self.ctx = Some(ctx);
        Ok(())
    }
}

fn dims_u16(viewport: Viewport) -> FloaterResult<(u16, u16)> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(FloaterError::render("viewport dimensions must be > 0"));
    }
    let w = viewport
        .width
        .try_into()
        .map_err(|_| FloaterError::render("viewport width exceeds u16"))?;
    let h = viewport
        .height
        .try_into()
        .map_err(|_| FloaterError::render("viewport height exceeds u16"))?;
    Ok((w, h))
}

fn premul_fill(rgba: [u8; 4], len: usize) -> Vec<u8> {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
    [premul(r), premul(g), premul(b), a].repeat(len / 4)
}
