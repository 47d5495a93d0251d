//! Triangle and quadrilateral rasterizers.
//!
//! Filled shapes trace their outline edges with fixed-point steppers and
//! hand each scanline to the span drawers in [`crate::scanline`]. A
//! triangle is split at its middle vertex into an upper and a lower half;
//! a quad is split twice, giving an upper, middle, and lower band. A
//! zero-height half collapses to a single un-stepped scanline between its
//! two vertices.
//!
//! Fill operations are silent no-ops when the shape is degenerate or the
//! destination is locked. On success the shape's bounding box is pushed to
//! the destination's dirty-rectangle list.

use crate::fixed::Interp;
use crate::line::{aa_faded_line, aa_line, faded_line, line, line_alpha};
use crate::palette::ShadeTable;
use crate::scanline::{
    faded_span, faded_span_alpha, lut_textured_span, shaded_textured_span, solid_span,
    solid_span_alpha, textured_span,
};
use crate::surface::{Rect, Surface};
use crate::Color;

// ============================================================================
// Edge steppers
// ============================================================================

/// Per-edge color ramp: one interpolator per channel, stepped per scanline.
struct Fade {
    r: Interp,
    g: Interp,
    b: Interp,
}

impl Fade {
    fn span(from: Color, to: Color, len: i32) -> Self {
        Self {
            r: Interp::span(i32::from(from.r), i32::from(to.r), len),
            g: Interp::span(i32::from(from.g), i32::from(to.g), len),
            b: Interp::span(i32::from(from.b), i32::from(to.b), len),
        }
    }

    fn value(&self) -> Color {
        Color::new(self.r.value_u8(), self.g.value_u8(), self.b.value_u8())
    }

    fn advance(&mut self) {
        self.r.advance();
        self.g.advance();
        self.b.advance();
    }
}

/// Per-edge texture coordinate ramp.
struct Tex {
    x: Interp,
    y: Interp,
}

impl Tex {
    fn span(from: (i32, i32), to: (i32, i32), len: i32) -> Self {
        Self {
            x: Interp::span(from.0, to.0, len),
            y: Interp::span(from.1, to.1, len),
        }
    }

    fn value(&self) -> (i32, i32) {
        (self.x.value(), self.y.value())
    }

    fn advance(&mut self) {
        self.x.advance();
        self.y.advance();
    }
}

fn push_trigon_update(dest: &mut Surface, x1: i32, x2: i32, x3: i32, y1: i32, y3: i32) {
    let xmin = x1.min(x2).min(x3);
    let xmax = x1.max(x2).max(x3);
    dest.push_update(Rect::from_bounds(xmin, y1, xmax, y3));
}

fn push_rect_update(dest: &mut Surface, xs: [i32; 4], y1: i32, y4: i32) {
    let xmin = xs[0].min(xs[1]).min(xs[2]).min(xs[3]);
    let xmax = xs[0].max(xs[1]).max(xs[2]).max(xs[3]);
    dest.push_update(Rect::from_bounds(xmin, y1, xmax, y4));
}

/// Sort three `(x, y, payload)` vertices by y, stable for equal y.
fn sort3<T: Copy>(v: &mut [(i32, i32, T); 3]) {
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
    if v[1].1 > v[2].1 {
        v.swap(1, 2);
    }
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
}

/// Sort four `(x, y, payload)` vertices by y, stable for equal y.
fn sort4<T: Copy>(v: &mut [(i32, i32, T); 4]) {
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
    if v[1].1 > v[2].1 {
        v.swap(1, 2);
    }
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
    if v[2].1 > v[3].1 {
        v.swap(2, 3);
    }
    if v[1].1 > v[2].1 {
        v.swap(1, 2);
    }
    if v[0].1 > v[1].1 {
        v.swap(0, 1);
    }
}

// ============================================================================
// Outlines
// ============================================================================

/// Draw the outline of a triangle.
pub fn trigon(dest: &mut Surface, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32, color: u32) {
    line(dest, x1, y1, x2, y2, color);
    line(dest, x1, y1, x3, y3, color);
    line(dest, x3, y3, x2, y2, color);
}

/// Draw the outline of a triangle, alpha-blended.
pub fn trigon_alpha(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    color: u32,
    alpha: u8,
) {
    line_alpha(dest, x1, y1, x2, y2, color, alpha);
    line_alpha(dest, x1, y1, x3, y3, color, alpha);
    line_alpha(dest, x3, y3, x2, y2, color, alpha);
}

/// Draw an anti-aliased triangle outline.
pub fn aa_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    color: u32,
    alpha: u8,
) {
    aa_line(dest, x1, y1, x2, y2, color, alpha);
    aa_line(dest, x1, y1, x3, y3, color, alpha);
    aa_line(dest, x3, y3, x2, y2, color, alpha);
}

// ============================================================================
// Filled triangles
// ============================================================================

/// Fill a triangle with one color.
pub fn fill_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    color: u32,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [(x1, y1, ()), (x2, y2, ()), (x3, y3, ())];
    sort3(&mut v);
    let [(x1, y1, ()), (x2, y2, ()), (x3, y3, ())] = v;
    if dest.lock().is_err() {
        return;
    }

    // Long edge, top vertex to bottom vertex
    let mut xb = Interp::span(x1, x3, y3 - y1);

    if y1 == y2 {
        solid_span(dest, x1, x2, y1, color);
        xb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        for y in y1..=y2 {
            solid_span(dest, xa.value(), xb.value(), y, color);
            xa.advance();
            xb.advance();
        }
    }

    if y2 == y3 {
        solid_span(dest, x2, x3, y2, color);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        xc.advance();
        for y in (y2 + 1)..=y3 {
            solid_span(dest, xb.value(), xc.value(), y, color);
            xb.advance();
            xc.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Fill a triangle with one color, alpha-blended onto the destination.
pub fn fill_trigon_alpha(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    color: u32,
    alpha: u8,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [(x1, y1, ()), (x2, y2, ()), (x3, y3, ())];
    sort3(&mut v);
    let [(x1, y1, ()), (x2, y2, ()), (x3, y3, ())] = v;
    if dest.lock().is_err() {
        return;
    }

    let mut xb = Interp::span(x1, x3, y3 - y1);

    if y1 == y2 {
        solid_span_alpha(dest, x1, x2, y1, color, alpha);
        xb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        for y in y1..=y2 {
            solid_span_alpha(dest, xa.value(), xb.value(), y, color, alpha);
            xa.advance();
            xb.advance();
        }
    }

    if y2 == y3 {
        solid_span_alpha(dest, x2, x3, y2, color, alpha);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        xc.advance();
        for y in (y2 + 1)..=y3 {
            solid_span_alpha(dest, xb.value(), xc.value(), y, color, alpha);
            xb.advance();
            xc.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Fill a triangle Gouraud-shaded between three packed per-vertex colors.
///
/// The colors are unpacked through the destination's pixel format.
pub fn faded_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    c1: u32,
    c2: u32,
    c3: u32,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [
        (x1, y1, dest.get_rgb(c1)),
        (x2, y2, dest.get_rgb(c2)),
        (x3, y3, dest.get_rgb(c3)),
    ];
    sort3(&mut v);
    let [(x1, y1, c1), (x2, y2, c2), (x3, y3, c3)] = v;
    if dest.lock().is_err() {
        return;
    }

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut fb = Fade::span(c1, c3, y3 - y1);

    if y1 == y2 {
        faded_span(dest, x1, x2, y1, c1, c2);
        xb.advance();
        fb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut fa = Fade::span(c1, c2, y2 - y1);
        for y in y1..=y2 {
            faded_span(dest, xa.value(), xb.value(), y, fa.value(), fb.value());
            xa.advance();
            xb.advance();
            fa.advance();
            fb.advance();
        }
    }

    if y2 == y3 {
        faded_span(dest, x2, x3, y2, c2, c3);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        let mut fc = Fade::span(c2, c3, y3 - y2);
        xc.advance();
        fc.advance();
        for y in (y2 + 1)..=y3 {
            faded_span(dest, xb.value(), xc.value(), y, fb.value(), fc.value());
            xb.advance();
            xc.advance();
            fb.advance();
            fc.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Fill a triangle sampling `source` at three per-vertex texture coordinates.
pub fn textured_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1)),
        (x2, y2, (sx2, sy2)),
        (x3, y3, (sx3, sy3)),
    ];
    sort3(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3)] = v;
    if dest.lock().is_err() {
        return;
    }

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span(s1, s3, y3 - y1);

    if y1 == y2 {
        textured_span(dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1);
        xb.advance();
        tb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span(s1, s2, y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            textured_span(dest, xa.value(), xb.value(), y, source, ax, ay, bx, by);
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
        }
    }

    if y2 == y3 {
        textured_span(dest, x2, x3, y2, source, s2.0, s2.1, s3.0, s3.1);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        let mut tc = Tex::span(s2, s3, y3 - y2);
        xc.advance();
        tc.advance();
        for y in (y2 + 1)..=y3 {
            let (bx, by) = tb.value();
            let (cx, cy) = tc.value();
            textured_span(dest, xb.value(), xc.value(), y, source, bx, by, cx, cy);
            xb.advance();
            xc.advance();
            tb.advance();
            tc.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Textured triangle with a per-vertex 16-bit intensity multiplied into
/// every sampled texel.
pub fn shaded_textured_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
    i1: u16,
    i2: u16,
    i3: u16,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1, i1)),
        (x2, y2, (sx2, sy2, i2)),
        (x3, y3, (sx3, sy3, i3)),
    ];
    sort3(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3)] = v;
    if dest.lock().is_err() {
        return;
    }

    let intensity = |i: &Interp| i.value().clamp(0, 65535) as u16;

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span((s1.0, s1.1), (s3.0, s3.1), y3 - y1);
    let mut ib = Interp::span(i32::from(s1.2), i32::from(s3.2), y3 - y1);

    if y1 == y2 {
        shaded_textured_span(dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1, s1.2, s2.2);
        xb.advance();
        tb.advance();
        ib.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span((s1.0, s1.1), (s2.0, s2.1), y2 - y1);
        let mut ia = Interp::span(i32::from(s1.2), i32::from(s2.2), y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            shaded_textured_span(
                dest,
                xa.value(),
                xb.value(),
                y,
                source,
                ax,
                ay,
                bx,
                by,
                intensity(&ia),
                intensity(&ib),
            );
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
            ia.advance();
            ib.advance();
        }
    }

    if y2 == y3 {
        shaded_textured_span(dest, x2, x3, y2, source, s2.0, s2.1, s3.0, s3.1, s2.2, s3.2);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        let mut tc = Tex::span((s2.0, s2.1), (s3.0, s3.1), y3 - y2);
        let mut ic = Interp::span(i32::from(s2.2), i32::from(s3.2), y3 - y2);
        xc.advance();
        tc.advance();
        ic.advance();
        for y in (y2 + 1)..=y3 {
            let (bx, by) = tb.value();
            let (cx, cy) = tc.value();
            shaded_textured_span(
                dest,
                xb.value(),
                xc.value(),
                y,
                source,
                bx,
                by,
                cx,
                cy,
                intensity(&ib),
                intensity(&ic),
            );
            xb.advance();
            xc.advance();
            tb.advance();
            tc.advance();
            ib.advance();
            ic.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Textured triangle shaded through a precomputed palette table; both
/// surfaces should be 8-bit indexed for the table to apply.
pub fn lut_textured_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
    i1: u16,
    i2: u16,
    i3: u16,
    table: &ShadeTable,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1, i1)),
        (x2, y2, (sx2, sy2, i2)),
        (x3, y3, (sx3, sy3, i3)),
    ];
    sort3(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3)] = v;
    if dest.lock().is_err() {
        return;
    }

    let intensity = |i: &Interp| i.value().clamp(0, 65535) as u16;

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span((s1.0, s1.1), (s3.0, s3.1), y3 - y1);
    let mut ib = Interp::span(i32::from(s1.2), i32::from(s3.2), y3 - y1);

    if y1 == y2 {
        lut_textured_span(
            dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1, s1.2, s2.2, table,
        );
        xb.advance();
        tb.advance();
        ib.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span((s1.0, s1.1), (s2.0, s2.1), y2 - y1);
        let mut ia = Interp::span(i32::from(s1.2), i32::from(s2.2), y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            lut_textured_span(
                dest,
                xa.value(),
                xb.value(),
                y,
                source,
                ax,
                ay,
                bx,
                by,
                intensity(&ia),
                intensity(&ib),
                table,
            );
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
            ia.advance();
            ib.advance();
        }
    }

    if y2 == y3 {
        lut_textured_span(
            dest, x2, x3, y2, source, s2.0, s2.1, s3.0, s3.1, s2.2, s3.2, table,
        );
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        let mut tc = Tex::span((s2.0, s2.1), (s3.0, s3.1), y3 - y2);
        let mut ic = Interp::span(i32::from(s2.2), i32::from(s3.2), y3 - y2);
        xc.advance();
        tc.advance();
        ic.advance();
        for y in (y2 + 1)..=y3 {
            let (bx, by) = tb.value();
            let (cx, cy) = tc.value();
            lut_textured_span(
                dest,
                xb.value(),
                xc.value(),
                y,
                source,
                bx,
                by,
                cx,
                cy,
                intensity(&ib),
                intensity(&ic),
                table,
            );
            xb.advance();
            xc.advance();
            tb.advance();
            tc.advance();
            ib.advance();
            ic.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

/// Fill a triangle Gouraud-shaded between three unpacked per-vertex colors,
/// with an alpha blend on top. Drawn as two shaded halves of Bresenham-free
/// spans, so pixels are blended exactly once.
pub fn faded_trigon_alpha(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    c1: u32,
    c2: u32,
    c3: u32,
    alpha: u8,
) {
    if y1 == y3 {
        return;
    }
    let mut v = [
        (x1, y1, dest.get_rgb(c1)),
        (x2, y2, dest.get_rgb(c2)),
        (x3, y3, dest.get_rgb(c3)),
    ];
    sort3(&mut v);
    let [(x1, y1, c1), (x2, y2, c2), (x3, y3, c3)] = v;
    if dest.lock().is_err() {
        return;
    }

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut fb = Fade::span(c1, c3, y3 - y1);

    if y1 == y2 {
        faded_span_alpha(dest, x1, x2, y1, c1, c2, alpha);
        xb.advance();
        fb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut fa = Fade::span(c1, c2, y2 - y1);
        for y in y1..=y2 {
            faded_span_alpha(
                dest,
                xa.value(),
                xb.value(),
                y,
                fa.value(),
                fb.value(),
                alpha,
            );
            xa.advance();
            xb.advance();
            fa.advance();
            fb.advance();
        }
    }

    if y2 == y3 {
        faded_span_alpha(dest, x2, x3, y2, c2, c3, alpha);
    } else {
        let mut xc = Interp::span(x2, x3, y3 - y2);
        let mut fc = Fade::span(c2, c3, y3 - y2);
        xc.advance();
        fc.advance();
        for y in (y2 + 1)..=y3 {
            faded_span_alpha(
                dest,
                xb.value(),
                xc.value(),
                y,
                fb.value(),
                fc.value(),
                alpha,
            );
            xb.advance();
            xc.advance();
            fb.advance();
            fc.advance();
        }
    }

    dest.unlock();
    push_trigon_update(dest, x1, x2, x3, y1, y3);
}

// ============================================================================
// Quadrilaterals
// ============================================================================

/// Fill a quad sampling `source` at four per-vertex texture coordinates.
///
/// With an axis-aligned destination quad and matching source coordinates
/// this is a plain 1:1 blit; skewed coordinates rotate or shear the texture.
#[allow(clippy::too_many_lines)]
pub fn textured_rect(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    x4: i32,
    y4: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
    sx4: i32,
    sy4: i32,
) {
    if y1 == y3 || y1 == y4 || y4 == y2 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1)),
        (x2, y2, (sx2, sy2)),
        (x3, y3, (sx3, sy3)),
        (x4, y4, (sx4, sy4)),
    ];
    sort4(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3), (x4, y4, s4)] = v;
    if dest.lock().is_err() {
        return;
    }

    // Edge v1-v3 spans the upper and middle bands; v2-v4 the middle and
    // lower. The short v1-v2 and v3-v4 edges close each end.
    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span(s1, s3, y3 - y1);
    let mut xc = Interp::span(x2, x4, y4 - y2);
    let mut tc = Tex::span(s2, s4, y4 - y2);

    if y1 == y2 {
        textured_span(dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1);
        xb.advance();
        tb.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span(s1, s2, y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            textured_span(dest, xa.value(), xb.value(), y, source, ax, ay, bx, by);
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
        }
    }

    xc.advance();
    tc.advance();
    for y in (y2 + 1)..=y3 {
        let (bx, by) = tb.value();
        let (cx, cy) = tc.value();
        textured_span(dest, xb.value(), xc.value(), y, source, bx, by, cx, cy);
        xb.advance();
        xc.advance();
        tb.advance();
        tc.advance();
    }

    if y3 == y4 {
        textured_span(dest, x3, x4, y3, source, s3.0, s3.1, s4.0, s4.1);
    } else {
        let mut xd = Interp::span(x3, x4, y4 - y3);
        let mut td = Tex::span(s3, s4, y4 - y3);
        xd.advance();
        td.advance();
        for y in (y3 + 1)..=y4 {
            let (cx, cy) = tc.value();
            let (dx, dy) = td.value();
            textured_span(dest, xc.value(), xd.value(), y, source, cx, cy, dx, dy);
            xc.advance();
            xd.advance();
            tc.advance();
            td.advance();
        }
    }

    dest.unlock();
    push_rect_update(dest, [x1, x2, x3, x4], y1, y4);
}

/// Textured quad shaded left to right: `i1` applies to vertices 1 and 3,
/// `i2` to vertices 2 and 4, interpolated along each scanline.
#[allow(clippy::too_many_lines)]
pub fn shaded_textured_rect(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    x4: i32,
    y4: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
    sx4: i32,
    sy4: i32,
    i1: u16,
    i2: u16,
) {
    if y1 == y3 || y1 == y4 || y4 == y2 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1, i1)),
        (x2, y2, (sx2, sy2, i2)),
        (x3, y3, (sx3, sy3, i1)),
        (x4, y4, (sx4, sy4, i2)),
    ];
    sort4(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3), (x4, y4, s4)] = v;
    if dest.lock().is_err() {
        return;
    }

    let intensity = |i: &Interp| i.value().clamp(0, 65535) as u16;

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span((s1.0, s1.1), (s3.0, s3.1), y3 - y1);
    let mut ib = Interp::span(i32::from(s1.2), i32::from(s3.2), y3 - y1);
    let mut xc = Interp::span(x2, x4, y4 - y2);
    let mut tc = Tex::span((s2.0, s2.1), (s4.0, s4.1), y4 - y2);
    let mut ic = Interp::span(i32::from(s2.2), i32::from(s4.2), y4 - y2);

    if y1 == y2 {
        shaded_textured_span(dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1, s1.2, s2.2);
        xb.advance();
        tb.advance();
        ib.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span((s1.0, s1.1), (s2.0, s2.1), y2 - y1);
        let mut ia = Interp::span(i32::from(s1.2), i32::from(s2.2), y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            shaded_textured_span(
                dest,
                xa.value(),
                xb.value(),
                y,
                source,
                ax,
                ay,
                bx,
                by,
                intensity(&ia),
                intensity(&ib),
            );
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
            ia.advance();
            ib.advance();
        }
    }

    xc.advance();
    tc.advance();
    ic.advance();
    for y in (y2 + 1)..=y3 {
        let (bx, by) = tb.value();
        let (cx, cy) = tc.value();
        shaded_textured_span(
            dest,
            xb.value(),
            xc.value(),
            y,
            source,
            bx,
            by,
            cx,
            cy,
            intensity(&ib),
            intensity(&ic),
        );
        xb.advance();
        xc.advance();
        tb.advance();
        tc.advance();
        ib.advance();
        ic.advance();
    }

    if y3 == y4 {
        shaded_textured_span(dest, x3, x4, y3, source, s3.0, s3.1, s4.0, s4.1, s3.2, s4.2);
    } else {
        let mut xd = Interp::span(x3, x4, y4 - y3);
        let mut td = Tex::span((s3.0, s3.1), (s4.0, s4.1), y4 - y3);
        let mut id = Interp::span(i32::from(s3.2), i32::from(s4.2), y4 - y3);
        xd.advance();
        td.advance();
        id.advance();
        for y in (y3 + 1)..=y4 {
            let (cx, cy) = tc.value();
            let (dx, dy) = td.value();
            shaded_textured_span(
                dest,
                xc.value(),
                xd.value(),
                y,
                source,
                cx,
                cy,
                dx,
                dy,
                intensity(&ic),
                intensity(&id),
            );
            xc.advance();
            xd.advance();
            tc.advance();
            td.advance();
            ic.advance();
            id.advance();
        }
    }

    dest.unlock();
    push_rect_update(dest, [x1, x2, x3, x4], y1, y4);
}

/// Left-to-right shaded quad drawn through a precomputed palette table.
#[allow(clippy::too_many_lines)]
pub fn lut_textured_rect(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    x4: i32,
    y4: i32,
    source: &Surface,
    sx1: i32,
    sy1: i32,
    sx2: i32,
    sy2: i32,
    sx3: i32,
    sy3: i32,
    sx4: i32,
    sy4: i32,
    i1: u16,
    i2: u16,
    table: &ShadeTable,
) {
    if y1 == y3 || y1 == y4 || y4 == y2 {
        return;
    }
    let mut v = [
        (x1, y1, (sx1, sy1, i1)),
        (x2, y2, (sx2, sy2, i2)),
        (x3, y3, (sx3, sy3, i1)),
        (x4, y4, (sx4, sy4, i2)),
    ];
    sort4(&mut v);
    let [(x1, y1, s1), (x2, y2, s2), (x3, y3, s3), (x4, y4, s4)] = v;
    if dest.lock().is_err() {
        return;
    }

    let intensity = |i: &Interp| i.value().clamp(0, 65535) as u16;

    let mut xb = Interp::span(x1, x3, y3 - y1);
    let mut tb = Tex::span((s1.0, s1.1), (s3.0, s3.1), y3 - y1);
    let mut ib = Interp::span(i32::from(s1.2), i32::from(s3.2), y3 - y1);
    let mut xc = Interp::span(x2, x4, y4 - y2);
    let mut tc = Tex::span((s2.0, s2.1), (s4.0, s4.1), y4 - y2);
    let mut ic = Interp::span(i32::from(s2.2), i32::from(s4.2), y4 - y2);

    if y1 == y2 {
        lut_textured_span(
            dest, x1, x2, y1, source, s1.0, s1.1, s2.0, s2.1, s1.2, s2.2, table,
        );
        xb.advance();
        tb.advance();
        ib.advance();
    } else {
        let mut xa = Interp::span(x1, x2, y2 - y1);
        let mut ta = Tex::span((s1.0, s1.1), (s2.0, s2.1), y2 - y1);
        let mut ia = Interp::span(i32::from(s1.2), i32::from(s2.2), y2 - y1);
        for y in y1..=y2 {
            let (ax, ay) = ta.value();
            let (bx, by) = tb.value();
            lut_textured_span(
                dest,
                xa.value(),
                xb.value(),
                y,
                source,
                ax,
                ay,
                bx,
                by,
                intensity(&ia),
                intensity(&ib),
                table,
            );
            xa.advance();
            xb.advance();
            ta.advance();
            tb.advance();
            ia.advance();
            ib.advance();
        }
    }

    xc.advance();
    tc.advance();
    ic.advance();
    for y in (y2 + 1)..=y3 {
        let (bx, by) = tb.value();
        let (cx, cy) = tc.value();
        lut_textured_span(
            dest,
            xb.value(),
            xc.value(),
            y,
            source,
            bx,
            by,
            cx,
            cy,
            intensity(&ib),
            intensity(&ic),
            table,
        );
        xb.advance();
        xc.advance();
        tb.advance();
        tc.advance();
        ib.advance();
        ic.advance();
    }

    if y3 == y4 {
        lut_textured_span(
            dest, x3, x4, y3, source, s3.0, s3.1, s4.0, s4.1, s3.2, s4.2, table,
        );
    } else {
        let mut xd = Interp::span(x3, x4, y4 - y3);
        let mut td = Tex::span((s3.0, s3.1), (s4.0, s4.1), y4 - y3);
        let mut id = Interp::span(i32::from(s3.2), i32::from(s4.2), y4 - y3);
        xd.advance();
        td.advance();
        id.advance();
        for y in (y3 + 1)..=y4 {
            let (cx, cy) = tc.value();
            let (dx, dy) = td.value();
            lut_textured_span(
                dest,
                xc.value(),
                xd.value(),
                y,
                source,
                cx,
                cy,
                dx,
                dy,
                intensity(&ic),
                intensity(&id),
                table,
            );
            xc.advance();
            xd.advance();
            tc.advance();
            td.advance();
            ic.advance();
            id.advance();
        }
    }

    dest.unlock();
    push_rect_update(dest, [x1, x2, x3, x4], y1, y4);
}

/// Gouraud-shaded triangle outline: each edge fades between its vertex colors.
pub fn faded_trigon_outline(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    c1: Color,
    c2: Color,
    c3: Color,
) {
    faded_line(dest, x1, y1, x2, y2, c1, c2);
    faded_line(dest, x1, y1, x3, y3, c1, c3);
    faded_line(dest, x3, y3, x2, y2, c3, c2);
}

/// Anti-aliased Gouraud triangle outline.
pub fn aa_faded_trigon(
    dest: &mut Surface,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    x3: i32,
    y3: i32,
    c1: Color,
    c2: Color,
    c3: Color,
    alpha: u8,
) {
    aa_faded_line(dest, x1, y1, x2, y2, c1, c2, alpha);
    aa_faded_line(dest, x1, y1, x3, y3, c1, c3, alpha);
    aa_faded_line(dest, x3, y3, x2, y2, c3, c2, alpha);
}
