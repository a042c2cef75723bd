use crate::foundation::core::Rgba8Premul;
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel as `[r, g, b, a]`.
pub type PremulRgba8 = [u8; 4];

/// Source-over compositing of premultiplied pixels with an extra opacity multiplier.
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
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// "source-in" fill: keep the source coverage, replace its colour with `color`.
pub fn source_in(src: PremulRgba8, color: Rgba8Premul) -> PremulRgba8 {
    let a = u16::from(src[3]);
    [
        mul_div255(u16::from(color.r), a),
        mul_div255(u16::from(color.g), a),
        mul_div255(u16::from(color.b), a),
        mul_div255(u16::from(color.a), a),
    ]
}

/// Convert one premultiplied pixel back to straight alpha.
pub fn unpremultiply(px: PremulRgba8) -> PremulRgba8 {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let a16 = u16::from(a);
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

/// Premultiply a straight-alpha RGBA8 buffer in place.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
