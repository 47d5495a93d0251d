//! Line drawing: Bresenham outlines and Wu anti-aliased edges.
//!
//! The filled-shape rasterizers use these to stroke shape outlines so that
//! adjacent fills sharing an edge meet without gaps.

use crate::fixed::Interp;
use crate::surface::Surface;
use crate::Color;

/// Draw a Bresenham line, clipped per pixel.
pub fn line(dest: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, color: u32) {
    let dx = (x2 - x1).abs();
    let dy = -((y2 - y1).abs());
    let sx = if x1 < x2 { 1i32 } else { -1i32 };
    let sy = if y1 < y2 { 1i32 } else { -1i32 };
    let mut err = dx + dy;
    let mut x = x1;
    let mut y = y1;

    loop {
        dest.plot(x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Bresenham line alpha-blended onto the destination.
pub fn line_alpha(dest: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, color: u32, alpha: u8) {
    if alpha == 255 {
        line(dest, x1, y1, x2, y2, color);
        return;
    }
    let c = dest.get_rgb(color);
    let dx = (x2 - x1).abs();
    let dy = -((y2 - y1).abs());
    let sx = if x1 < x2 { 1i32 } else { -1i32 };
    let sy = if y1 < y2 { 1i32 } else { -1i32 };
    let mut err = dx + dy;
    let mut x = x1;
    let mut y = y1;

    loop {
        dest.blend_pixel(x, y, c.r, c.g, c.b, alpha);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Bresenham line fading from `c1` at one end to `c2` at the other.
pub fn faded_line(dest: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, c1: Color, c2: Color) {
    let dx = (x2 - x1).abs();
    let dy = -((y2 - y1).abs());
    let sx = if x1 < x2 { 1i32 } else { -1i32 };
    let sy = if y1 < y2 { 1i32 } else { -1i32 };
    let len = dx.max(-dy);
    let mut r = Interp::span(i32::from(c1.r), i32::from(c2.r), len);
    let mut g = Interp::span(i32::from(c1.g), i32::from(c2.g), len);
    let mut b = Interp::span(i32::from(c1.b), i32::from(c2.b), len);
    let mut err = dx + dy;
    let mut x = x1;
    let mut y = y1;

    loop {
        let v = dest.map_rgb(r.value_u8(), g.value_u8(), b.value_u8());
        dest.plot(x, y, v);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        r.advance();
        g.advance();
        b.advance();
    }
}

// ============================================================================
// Anti-aliased (Wu)
// ============================================================================

/// Draw a Wu anti-aliased line, with `alpha` scaling the edge coverage.
pub fn aa_line(dest: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, color: u32, alpha: u8) {
    let c = dest.get_rgb(color);
    wu_line(dest, x1, y1, x2, y2, alpha, |_| c);
}

/// Wu anti-aliased line fading from `c1` to `c2`.
pub fn aa_faded_line(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    c1: Color,
    c2: Color,
    alpha: u8,
) {
    let lerp = |a: u8, b: u8, t: f32| -> u8 {
        (f32::from(a) + (f32::from(b) - f32::from(a)) * t) as u8
    };
    wu_line(dest, x1, y1, x2, y2, alpha, |t| {
        Color::new(lerp(c1.r, c2.r, t), lerp(c1.g, c2.g, t), lerp(c1.b, c2.b, t))
    });
}

/// Wu's algorithm; `color_at` receives the position along the line in [0, 1]
/// measured from the (x1,y1) endpoint.
fn wu_line(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    alpha: u8,
    color_at: impl Fn(f32) -> Color,
) {
    let (mut x0, mut y0, mut x1f, mut y1f) = (x1 as f32, y1 as f32, x2 as f32, y2 as f32);
    let steep = (y1f - y0).abs() > (x1f - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1f, &mut y1f);
    }
    let mut reversed = false;
    if x0 > x1f {
        std::mem::swap(&mut x0, &mut x1f);
        std::mem::swap(&mut y0, &mut y1f);
        reversed = true;
    }

    let dx = x1f - x0;
    let dy = y1f - y0;
    let gradient = if dx.abs() < 0.001 { 1.0 } else { dy / dx };
    let scale = f32::from(alpha) / 255.0;
    let span = dx.max(1.0);
    let pos = |x: f32| -> f32 {
        let t = ((x - x0) / span).clamp(0.0, 1.0);
        if reversed { 1.0 - t } else { t }
    };
    let mut put = |px: i32, py: i32, c: Color, cov: f32| {
        let a = (cov * scale * 255.0) as u8;
        if steep {
            dest.blend_pixel(py, px, c.r, c.g, c.b, a);
        } else {
            dest.blend_pixel(px, py, c.r, c.g, c.b, a);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = 1.0 - (x0 + 0.5).fract();
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    let fpart = yend.fract();
    let c = color_at(pos(xend));
    put(xpxl1, ypxl1, c, (1.0 - fpart) * xgap);
    put(xpxl1, ypxl1 + 1, c, fpart * xgap);
    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1f.round();
    let yend = y1f + gradient * (xend - x1f);
    let xgap = (x1f + 0.5).fract();
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    let fpart = yend.fract();
    let c = color_at(pos(xend));
    put(xpxl2, ypxl2, c, (1.0 - fpart) * xgap);
    put(xpxl2, ypxl2 + 1, c, fpart * xgap);

    // Main line body
    for x in (xpxl1 + 1)..xpxl2 {
        let fpart = intery.fract();
        let ipart = intery.floor() as i32;
        let c = color_at(pos(x as f32));
        put(x, ipart, c, 1.0 - fpart);
        put(x, ipart + 1, c, fpart);
        intery += gradient;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelFormat;

    fn surf(w: u32, h: u32) -> Surface {
        Surface::new(w, h, PixelFormat::argb8888())
    }

    #[test]
    fn horizontal_line_covers_run() {
        let mut s = surf(10, 3);
        let c = s.map_rgb(255, 255, 255);
        line(&mut s, 1, 1, 8, 1, c);
        for x in 1..=8 {
            assert_eq!(s.get_pixel(x, 1), c);
        }
        assert_eq!(s.get_pixel(0, 1), 0);
        assert_eq!(s.get_pixel(9, 1), 0);
    }

    #[test]
    fn diagonal_line_hits_both_endpoints() {
        let mut s = surf(8, 8);
        let c = s.map_rgb(10, 20, 30);
        line(&mut s, 0, 0, 7, 7, c);
        assert_eq!(s.get_pixel(0, 0), c);
        assert_eq!(s.get_pixel(7, 7), c);
        for i in 0..8 {
            assert_eq!(s.get_pixel(i, i), c);
        }
    }

    #[test]
    fn out_of_bounds_line_is_clipped_not_wrapped() {
        let mut s = surf(4, 4);
        line(&mut s, -3, 2, 8, 2, 0xFFFF_FFFF);
        for y in 0..4 {
            for x in 0..4 {
                let expect = if y == 2 { 0xFFFF_FFFF } else { 0 };
                assert_eq!(s.get_pixel(x, y), expect);
            }
        }
    }

    #[test]
    fn faded_line_endpoint_colors() {
        let mut s = surf(20, 1);
        faded_line(&mut s, 0, 0, 19, 0, Color::new(0, 0, 0), Color::new(200, 100, 60));
        assert_eq!(s.get_rgb(s.get_pixel(0, 0)), Color::new(0, 0, 0));
        assert_eq!(s.get_rgb(s.get_pixel(19, 0)), Color::new(200, 100, 60));
    }

    #[test]
    fn aa_line_touches_endpoint_neighborhood_only() {
        let mut s = surf(12, 12);
        let white = s.map_rgb(255, 255, 255);
        aa_line(&mut s, 2, 2, 9, 5, white, 255);
        // endpoint pixels got some coverage
        assert_ne!(s.get_pixel(2, 2), 0);
        assert_ne!(s.get_pixel(9, 5), 0);
        // far corner untouched
        assert_eq!(s.get_pixel(11, 11), 0);
        assert_eq!(s.get_pixel(0, 11), 0);
    }

    #[test]
    fn aa_faded_line_carries_colors_to_ends() {
        let mut s = surf(20, 4);
        aa_faded_line(&mut s, 0, 1, 19, 1, Color::new(255, 0, 0), Color::new(0, 0, 255), 255);
        let start = s.get_rgb(s.get_pixel(1, 1));
        let end = s.get_rgb(s.get_pixel(18, 1));
        assert!(start.r > start.b, "{start:?}");
        assert!(end.b > end.r, "{end:?}");
    }

    #[test]
    fn alpha_zero_line_leaves_surface_unchanged() {
        let mut s = surf(8, 8);
        s.fill(s.map_rgb(7, 7, 7));
        let before = s.as_bytes().to_vec();
        let red = s.map_rgb(255, 0, 0);
        line_alpha(&mut s, 0, 0, 7, 7, red, 0);
        assert_eq!(s.as_bytes(), &before[..]);
    }
}
