//! Scanline primitives: one horizontal pixel run per call.
//!
//! Every shape the rasterizer draws decomposes into these spans. Each
//! operation auto-swaps its endpoints (carrying the per-endpoint data with
//! them), clips against the destination clip rectangle while advancing all
//! stepped quantities across the clipped prefix so interpolation stays
//! continuous at clip edges, then walks the run left to right.

use crate::fixed::Interp;
use crate::palette::ShadeTable;
use crate::surface::{blend_channel, Surface};
use crate::Color;

/// Clip an inclusive x-range against the destination clip rect.
///
/// Returns the clipped range plus the number of pixels trimmed from the
/// left, so callers can advance their interpolators to compensate. `None`
/// when the span lies fully outside the clip rect.
#[inline]
fn clip_span(dest: &Surface, x1: i32, x2: i32, y: i32) -> Option<(i32, i32, i32)> {
    if x2 < dest.clip_xmin()
        || x1 > dest.clip_xmax()
        || y < dest.clip_ymin()
        || y > dest.clip_ymax()
    {
        return None;
    }
    let skipped = (dest.clip_xmin() - x1).max(0);
    Some((x1 + skipped, x2.min(dest.clip_xmax()), skipped))
}

// ============================================================================
// Solid
// ============================================================================

/// Draw a horizontal run of one color.
pub fn solid_span(dest: &mut Surface, x1: i32, x2: i32, y: i32, color: u32) {
    let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    let Some((x1, x2, _)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    for x in x1..=x2 {
        dest.put_pixel(x, y, color);
    }
}

/// Draw a horizontal run of one color, alpha-blended onto the destination.
pub fn solid_span_alpha(dest: &mut Surface, x1: i32, x2: i32, y: i32, color: u32, alpha: u8) {
    if alpha == 255 {
        solid_span(dest, x1, x2, y, color);
        return;
    }
    let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
    let Some((x1, x2, _)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    let src = dest.get_rgb(color);
    let a = u16::from(alpha);
    for x in x1..=x2 {
        let dst = dest.get_rgb(dest.get_pixel(x, y));
        let v = dest.map_rgb(
            blend_channel(src.r, dst.r, a),
            blend_channel(src.g, dst.g, a),
            blend_channel(src.b, dst.b, a),
        );
        dest.put_pixel(x, y, v);
    }
}

// ============================================================================
// Two-color fade
// ============================================================================

/// Draw a horizontal run fading linearly from `c1` at x1 to `c2` at x2.
pub fn faded_span(dest: &mut Surface, x1: i32, x2: i32, y: i32, c1: Color, c2: Color) {
    let (x1, x2, c1, c2) = if x1 <= x2 {
        (x1, x2, c1, c2)
    } else {
        (x2, x1, c2, c1)
    };
    let len = x2 - x1;
    let mut r = Interp::span(i32::from(c1.r), i32::from(c2.r), len);
    let mut g = Interp::span(i32::from(c1.g), i32::from(c2.g), len);
    let mut b = Interp::span(i32::from(c1.b), i32::from(c2.b), len);

    let Some((cx1, cx2, skipped)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    r.advance_by(skipped);
    g.advance_by(skipped);
    b.advance_by(skipped);

    for x in cx1..=cx2 {
        let v = dest.map_rgb(r.value_u8(), g.value_u8(), b.value_u8());
        dest.put_pixel(x, y, v);
        r.advance();
        g.advance();
        b.advance();
    }
}

/// Two-color fade with a constant alpha blend on top.
pub fn faded_span_alpha(
    dest: &mut Surface,
    x1: i32,
    x2: i32,
    y: i32,
    c1: Color,
    c2: Color,
    alpha: u8,
) {
    if alpha == 255 {
        faded_span(dest, x1, x2, y, c1, c2);
        return;
    }
    let (x1, x2, c1, c2) = if x1 <= x2 {
        (x1, x2, c1, c2)
    } else {
        (x2, x1, c2, c1)
    };
    let len = x2 - x1;
    let mut r = Interp::span(i32::from(c1.r), i32::from(c2.r), len);
    let mut g = Interp::span(i32::from(c1.g), i32::from(c2.g), len);
    let mut b = Interp::span(i32::from(c1.b), i32::from(c2.b), len);

    let Some((cx1, cx2, skipped)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    r.advance_by(skipped);
    g.advance_by(skipped);
    b.advance_by(skipped);

    let a = u16::from(alpha);
    for x in cx1..=cx2 {
        let dst = dest.get_rgb(dest.get_pixel(x, y));
        let v = dest.map_rgb(
            blend_channel(r.value_u8(), dst.r, a),
            blend_channel(g.value_u8(), dst.g, a),
            blend_channel(b.value_u8(), dst.b, a),
        );
        dest.put_pixel(x, y, v);
        r.advance();
        g.advance();
        b.advance();
    }
}

// ============================================================================
// Textured
// ============================================================================

/// Draw a horizontal run sampling `source` along the line (sx1,sy1)-(sx2,sy2).
///
/// Same-depth surfaces take the fast raw-copy path; mismatched depths
/// translate each pixel through 8-bit channels. Source pixels matching a
/// registered color key leave the destination untouched.
pub fn textured_span(
    dest: &mut Surface,
    x1: i32,
    x2: i32,
    y: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
) {
    let (x1, x2, sx1, sy1, sx2, sy2) = if x1 <= x2 {
        (x1, x2, sx1, sy1, sx2, sy2)
    } else {
        (x2, x1, sx2, sy2, sx1, sy1)
    };
    let len = x2 - x1;
    let mut srcx = Interp::span(sx1, sx2, len);
    let mut srcy = Interp::span(sy1, sy2, len);

    let Some((cx1, cx2, skipped)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    srcx.advance_by(skipped);
    srcy.advance_by(skipped);

    let keyed = !source.color_keys().is_empty();
    if dest.format().bytes_per_pixel == source.format().bytes_per_pixel {
        // Fast mode: copy the raw pixel value
        for x in cx1..=cx2 {
            let value = source.get_pixel(srcx.value(), srcy.value());
            if !keyed || !source.is_color_key(value) {
                dest.put_pixel(x, y, value);
            }
            srcx.advance();
            srcy.advance();
        }
    } else {
        // Slow mode: translate every pixel color
        for x in cx1..=cx2 {
            let value = source.get_pixel(srcx.value(), srcy.value());
            if !keyed || !source.is_color_key(value) {
                let c = source.get_rgb(value);
                dest.put_pixel(x, y, dest.map_rgb(c.r, c.g, c.b));
            }
            srcx.advance();
            srcy.advance();
        }
    }
}

/// Textured run with per-pixel intensity shading.
///
/// Intensity is a 16-bit fraction (0..=65535); each channel is multiplied
/// by it and shifted right 16, clamped to [0, 255].
pub fn shaded_textured_span(
    dest: &mut Surface,
    x1: i32,
    x2: i32,
    y: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    i1: u16,
    i2: u16,
) {
    let (x1, x2, sx1, sy1, sx2, sy2, i1, i2) = if x1 <= x2 {
        (x1, x2, sx1, sy1, sx2, sy2, i1, i2)
    } else {
        (x2, x1, sx2, sy2, sx1, sy1, i2, i1)
    };
    let len = x2 - x1;
    let mut srcx = Interp::span(sx1, sx2, len);
    let mut srcy = Interp::span(sy1, sy2, len);
    let mut ii = Interp::span(i32::from(i1), i32::from(i2), len);

    let Some((cx1, cx2, skipped)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    srcx.advance_by(skipped);
    srcy.advance_by(skipped);
    ii.advance_by(skipped);

    let keyed = !source.color_keys().is_empty();
    for x in cx1..=cx2 {
        let value = source.get_pixel(srcx.value(), srcy.value());
        if !keyed || !source.is_color_key(value) {
            let intensity = ii.value().clamp(0, 65535) as u16;
            let c = source.get_rgb(value).scaled(intensity);
            dest.put_pixel(x, y, dest.map_rgb(c.r, c.g, c.b));
        }
        srcx.advance();
        srcy.advance();
        ii.advance();
    }
}

/// Textured run shaded through a precomputed palette table.
///
/// Both surfaces must be 8-bit indexed for the table path (destination
/// index = `table[intensity >> 8][source index]`); any other format falls
/// back to the multiply path of [`shaded_textured_span`].
pub fn lut_textured_span(
    dest: &mut Surface,
    x1: i32,
    x2: i32,
    y: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    i1: u16,
    i2: u16,
    table: &ShadeTable,
) {
    if dest.format().bytes_per_pixel != 1 || source.format().bytes_per_pixel != 1 {
        shaded_textured_span(dest, x1, x2, y, source, sx1, sy1, sx2, sy2, i1, i2);
        return;
    }
    let (x1, x2, sx1, sy1, sx2, sy2, i1, i2) = if x1 <= x2 {
        (x1, x2, sx1, sy1, sx2, sy2, i1, i2)
    } else {
        (x2, x1, sx2, sy2, sx1, sy1, i2, i1)
    };
    let len = x2 - x1;
    let mut srcx = Interp::span(sx1, sx2, len);
    let mut srcy = Interp::span(sy1, sy2, len);
    let mut ii = Interp::span(i32::from(i1), i32::from(i2), len);

    let Some((cx1, cx2, skipped)) = clip_span(dest, x1, x2, y) else {
        return;
    };
    srcx.advance_by(skipped);
    srcy.advance_by(skipped);
    ii.advance_by(skipped);

    let keyed = !source.color_keys().is_empty();
    for x in cx1..=cx2 {
        let value = source.get_pixel(srcx.value(), srcy.value());
        if !keyed || !source.is_color_key(value) {
            let row = (ii.value().clamp(0, 65535) >> 8) as u8;
            dest.put_pixel(x, y, u32::from(table.shade(row, value as u8)));
        }
        srcx.advance();
        srcy.advance();
        ii.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use crate::surface::{PixelFormat, Rect};

    fn surf(w: u32, h: u32) -> Surface {
        Surface::new(w, h, PixelFormat::argb8888())
    }

    #[test]
    fn solid_span_swaps_and_fills() {
        let mut s = surf(10, 4);
        let red = s.map_rgb(255, 0, 0);
        solid_span(&mut s, 7, 2, 1, red);
        for x in 2..=7 {
            assert_eq!(s.get_pixel(x, 1), red);
        }
        assert_eq!(s.get_pixel(1, 1), 0);
        assert_eq!(s.get_pixel(8, 1), 0);
    }

    #[test]
    fn span_outside_clip_writes_nothing() {
        let mut s = surf(10, 10);
        s.set_clip(Rect::new(2, 2, 4, 4));
        solid_span(&mut s, 0, 9, 0, 0xFFFF_FFFF); // y above clip
        solid_span(&mut s, 7, 9, 3, 0xFFFF_FFFF); // x right of clip
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(s.get_pixel(x, y), 0);
            }
        }
    }

    #[test]
    fn faded_span_endpoints() {
        let mut s = surf(16, 1);
        faded_span(&mut s, 0, 15, 0, Color::new(0, 0, 0), Color::new(240, 120, 60));
        assert_eq!(s.get_rgb(s.get_pixel(0, 0)), Color::new(0, 0, 0));
        // both endpoints are exact
        assert_eq!(s.get_rgb(s.get_pixel(15, 0)), Color::new(240, 120, 60));
        // monotonic left to right
        let mut prev = 0;
        for x in 0..16 {
            let r = s.get_rgb(s.get_pixel(x, 0)).r;
            assert!(r >= prev);
            prev = r;
        }
    }

    #[test]
    fn clipped_fade_matches_unclipped() {
        // Interpolated values at the clip boundary must equal the values the
        // unclipped span computes at the same x.
        let c1 = Color::new(10, 200, 30);
        let c2 = Color::new(250, 40, 130);
        let mut full = surf(40, 1);
        faded_span(&mut full, 0, 39, 0, c1, c2);

        let mut clipped = surf(40, 1);
        clipped.set_clip(Rect::new(13, 0, 10, 1));
        faded_span(&mut clipped, 0, 39, 0, c1, c2);

        for x in 0..40 {
            if (13..23).contains(&x) {
                assert_eq!(clipped.get_pixel(x, 0), full.get_pixel(x, 0), "x={x}");
            } else {
                assert_eq!(clipped.get_pixel(x, 0), 0, "x={x}");
            }
        }
    }

    #[test]
    fn textured_span_one_to_one_copies() {
        let mut src = surf(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                src.put_pixel(x, y, (x * 31 + y * 7 + 1) as u32);
            }
        }
        let mut dst = surf(8, 8);
        textured_span(&mut dst, 0, 7, 3, &src, 0, 3, 7, 3);
        for x in 0..8 {
            assert_eq!(dst.get_pixel(x, 3), src.get_pixel(x, 3));
        }
    }

    #[test]
    fn color_key_leaves_destination_unmodified() {
        let mut src = surf(4, 1);
        let key = src.map_rgb(255, 0, 255);
        for x in 0..4 {
            src.put_pixel(x, 0, if x == 2 { key } else { 77 });
        }
        src.add_color_key(key);

        let mut dst = surf(4, 1);
        let bg = dst.map_rgb(1, 2, 3);
        dst.fill(bg);
        textured_span(&mut dst, 0, 3, 0, &src, 0, 0, 3, 0);
        assert_eq!(dst.get_pixel(0, 0), 77);
        assert_eq!(dst.get_pixel(2, 0), bg); // keyed pixel untouched
    }

    #[test]
    fn all_key_source_writes_nothing() {
        let mut src = surf(4, 1);
        src.fill(5);
        src.add_color_key(5);
        let mut dst = surf(4, 1);
        dst.fill(9);
        textured_span(&mut dst, 0, 3, 0, &src, 0, 0, 3, 0);
        for x in 0..4 {
            assert_eq!(dst.get_pixel(x, 0), 9);
        }
    }

    #[test]
    fn cross_format_translate_keeps_color() {
        let mut src = Surface::new(4, 1, PixelFormat::rgb888());
        let v = src.map_rgb(200, 100, 40);
        src.fill(v);
        let mut dst = surf(4, 1);
        textured_span(&mut dst, 0, 3, 0, &src, 0, 0, 3, 0);
        assert_eq!(dst.get_rgb(dst.get_pixel(1, 0)), Color::new(200, 100, 40));
    }

    #[test]
    fn shaded_span_scales_channels() {
        let mut src = surf(8, 1);
        src.fill(src.map_rgb(200, 100, 40));
        let mut dst = surf(8, 1);
        // constant half intensity
        shaded_textured_span(&mut dst, 0, 7, 0, &src, 0, 0, 7, 0, 32768, 32768);
        let c = dst.get_rgb(dst.get_pixel(4, 0));
        assert!(u8::abs_diff(c.r, 100) <= 1, "{c:?}");
        assert!(u8::abs_diff(c.g, 50) <= 1, "{c:?}");
        assert!(u8::abs_diff(c.b, 20) <= 1, "{c:?}");
    }

    #[test]
    fn lut_span_uses_table_on_indexed_surfaces() {
        let fmt = PixelFormat::indexed8(Palette::grayscale());
        let mut src = Surface::new(8, 1, fmt.clone());
        src.fill(200);
        let mut dst = Surface::new(8, 1, fmt);
        let table = ShadeTable::from_fn(|i, idx| if i >= 128 { idx } else { idx / 2 });
        lut_textured_span(&mut dst, 0, 7, 0, &src, 0, 0, 7, 0, 65535, 65535, &table);
        assert_eq!(dst.get_pixel(3, 0), 200);
        lut_textured_span(&mut dst, 0, 7, 0, &src, 0, 0, 7, 0, 0, 0, &table);
        assert_eq!(dst.get_pixel(3, 0), 100);
    }

    #[test]
    fn alpha_span_blends_halfway() {
        let mut s = surf(4, 1);
        s.fill(s.map_rgb(0, 0, 0));
        let white = s.map_rgb(255, 255, 255);
        solid_span_alpha(&mut s, 0, 3, 0, white, 128);
        let c = s.get_rgb(s.get_pixel(1, 0));
        assert!(u8::abs_diff(c.r, 128) <= 2, "{c:?}");
    }
}
