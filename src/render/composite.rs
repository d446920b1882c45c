use crate::foundation::error::{GlyphfallError, GlyphfallResult};

pub type PremulRgba8 = [u8; 4];

/// Premultiply a straight RGB color at `alpha` (0..=1).
pub fn premul(rgb: [u8; 3], alpha: f32) -> PremulRgba8 {
    let a = unit_to_u8(alpha);
    let af = u16::from(a);
    [
        mul_div255(u16::from(rgb[0]), af) as u8,
        mul_div255(u16::from(rgb[1]), af) as u8,
        mul_div255(u16::from(rgb[2]), af) as u8,
        a,
    ]
}

/// Source-over of premultiplied `src` onto premultiplied `dst`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = u16::from(unit_to_u8(opacity));
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - sa;

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> GlyphfallResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GlyphfallError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite one solid premultiplied color over the pixel rectangle
/// `[x0, x1) x [y0, y1)` of a `width`-wide RGBA8 buffer.
pub fn fill_span_over(
    dst: &mut [u8],
    width: u32,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    color: PremulRgba8,
) {
    if color[3] == 0 || x0 >= x1 || y0 >= y1 {
        return;
    }
    let stride = width as usize * 4;
    for y in y0..y1 {
        let row = y as usize * stride;
        let start = row + x0 as usize * 4;
        let end = row + x1 as usize * 4;
        let Some(span) = dst.get_mut(start..end) else {
            return;
        };
        for px in span.chunks_exact_mut(4) {
            let out = over([px[0], px[1], px[2], px[3]], color, 1.0);
            px.copy_from_slice(&out);
        }
    }
}

fn unit_to_u8(v: f32) -> u8 {
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

fn add_sat_u8(a: u16, b: u16) -> u8 {
    (a + b).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
