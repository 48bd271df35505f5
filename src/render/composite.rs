use crate::foundation::error::{FloaterError, FloaterResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8, with an extra opacity multiplier on
/// the source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = mul_div255(u16::from(dst[3]), inv).saturating_add(sa);
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite `src` over `dst` pixel-by-pixel.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> FloaterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(FloaterError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Attenuate a premultiplied buffer in place, as drawing it at `opacity`
/// onto a cleared surface would. This is the trail-retention step.
pub fn fade_in_place(buf: &mut [u8], opacity: f32) -> FloaterResult<()> {
    if !buf.len().is_multiple_of(4) {
        return Err(FloaterError::render("fade_in_place expects an rgba8 buffer"));
    }
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    for c in buf.iter_mut() {
        *c = mul_div255(u16::from(*c), op);
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
