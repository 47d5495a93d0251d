//! Arbitrary polygon fills.
//!
//! A polygon is decomposed into directed edges normalized so `y1 <= y2`.
//! For each scanline the active edges are collected into an index list,
//! radix-sorted by their current x crossing, cleaned of duplicate
//! crossings at shared vertices, and paired off into filled spans.
//!
//! Horizontal edges never enter the active list; they are covered by the
//! outline stroke instead, so opaque fills stay correct while alpha fills
//! draw slightly widened spans to compensate for the missing outline.
//!
//! Unlike the silent triangle rasterizers these operations report invalid
//! input: fewer than three vertices, any negative coordinate, or a locked
//! destination all return an error before any pixel is touched.

use crate::fixed::Interp;
use crate::line::{aa_faded_line, aa_line, faded_line, line};
use crate::scanline::{faded_span, faded_span_alpha, solid_span, solid_span_alpha};
use crate::surface::{Rect, Surface};
use crate::{Color, DrawError};

// ============================================================================
// Edges
// ============================================================================

/// Per-edge color ramp, stepped per scanline alongside the x crossing.
struct ShadeRamp {
    r: Interp,
    g: Interp,
    b: Interp,
    current: Color,
}

/// A directed polygon edge with `y1 <= y2`.
struct Edge {
    y1: i32,
    y2: i32,
    fx: Interp,
    x: i32,
    shade: Option<ShadeRamp>,
}

impl Edge {
    /// Latch the crossing for the current scanline and step to the next.
    fn update(&mut self) {
        self.x = self.fx.value();
        self.fx.advance();
        if let Some(s) = &mut self.shade {
            s.current = Color::new(s.r.value_u8(), s.g.value_u8(), s.b.value_u8());
            s.r.advance();
            s.g.advance();
            s.b.advance();
        }
    }

    fn color(&self) -> Color {
        self.shade.as_ref().map_or(Color::new(0, 0, 0), |s| s.current)
    }
}

struct Bounds {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

/// Decompose a closed vertex loop into normalized edges, rejecting bad
/// input before anything is drawn.
fn build_edges(
    points: &[(i32, i32)],
    colors: Option<&[Color]>,
) -> Result<(Vec<Edge>, Bounds), DrawError> {
    if points.len() < 3 {
        return Err(DrawError::TooFewVertices);
    }
    if let Some(colors) = colors {
        if colors.len() != points.len() {
            return Err(DrawError::TooFewVertices);
        }
    }

    let n = points.len();
    let mut edges = Vec::with_capacity(n);
    let mut bounds = Bounds {
        xmin: points[0].0,
        ymin: points[0].1,
        xmax: points[0].0,
        ymax: points[0].1,
    };

    for i in 0..n {
        let (mut x1, mut y1) = points[i];
        let (mut x2, mut y2) = points[(i + 1) % n];
        let (mut c1, mut c2) = match colors {
            Some(c) => (c[i], c[(i + 1) % n]),
            None => (Color::new(0, 0, 0), Color::new(0, 0, 0)),
        };
        if y1 > y2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut c1, &mut c2);
        }
        if y1 < 0 || x1 < 0 || x2 < 0 {
            return Err(DrawError::NegativeCoordinate);
        }

        bounds.xmin = bounds.xmin.min(x1).min(x2);
        bounds.xmax = bounds.xmax.max(x1).max(x2);
        bounds.ymin = bounds.ymin.min(y1);
        bounds.ymax = bounds.ymax.max(y2);

        edges.push(Edge {
            y1,
            y2,
            fx: Interp::span(x1, x2, y2 - y1),
            x: x1,
            shade: colors.map(|_| ShadeRamp {
                r: Interp::span(i32::from(c1.r), i32::from(c2.r), y2 - y1),
                g: Interp::span(i32::from(c1.g), i32::from(c2.g), y2 - y1),
                b: Interp::span(i32::from(c1.b), i32::from(c2.b), y2 - y1),
                current: c1,
            }),
        });
    }

    Ok((edges, bounds))
}

/// Stable 4-pass base-16 radix sort of edge indices by current crossing x.
fn sort_by_crossing(order: &mut Vec<usize>, edges: &[Edge]) {
    let mut buckets: [Vec<usize>; 16] = Default::default();
    for pass in 0..4 {
        let shift = 4 * pass;
        for &i in order.iter() {
            buckets[((edges[i].x >> shift) & 0xF) as usize].push(i);
        }
        order.clear();
        for bucket in &mut buckets {
            order.append(bucket);
        }
    }
}

/// Collect, sort and pair edge crossings for every scanline in the range,
/// handing each pair to `span`. With `skip_negative` set, inverted pairs
/// (possible at pinch points already covered by the outline) are dropped.
fn scan_spans(
    dest: &mut Surface,
    edges: &mut [Edge],
    ymin: i32,
    ymax: i32,
    skip_negative: bool,
    mut span: impl FnMut(&mut Surface, i32, i32, i32, Color, Color),
) {
    let mut order: Vec<usize> = Vec::with_capacity(edges.len());

    for sy in ymin..=ymax {
        order.clear();
        for (i, e) in edges.iter_mut().enumerate() {
            if e.y1 <= sy && sy <= e.y2 && e.y1 != e.y2 {
                e.update();
                order.push(i);
            }
        }
        if order.is_empty() {
            continue;
        }
        sort_by_crossing(&mut order, edges);

        // A vertex where one edge ends and the next begins crosses the
        // scanline once, not twice.
        let mut k = 0;
        while k + 1 < order.len() {
            let a = &edges[order[k]];
            let b = &edges[order[k + 1]];
            if (sy == a.y1 || sy == a.y2)
                && (sy == b.y1 || sy == b.y2)
                && ((sy == a.y1) != (sy == b.y1))
            {
                order.remove(k + 1);
            }
            k += 1;
        }

        let mut first: Option<usize> = None;
        for &i in &order {
            match first.take() {
                None => first = Some(i),
                Some(f) => {
                    let x1 = edges[f].x + 1;
                    let x2 = edges[i].x;
                    if x2 < x1 && skip_negative {
                        continue;
                    }
                    span(dest, x1, x2, sy, edges[f].color(), edges[i].color());
                }
            }
        }
    }
}

fn stroke_outline(dest: &mut Surface, points: &[(i32, i32)], mut seg: impl FnMut(&mut Surface, (i32, i32), (i32, i32))) {
    let n = points.len();
    for i in 0..n {
        seg(dest, points[i], points[(i + 1) % n]);
    }
}

// ============================================================================
// Fill operations
// ============================================================================

/// Fill a closed polygon with one color. The outline is stroked first, so
/// pinched or self-touching shapes come out fully covered.
pub fn fill_polygon(dest: &mut Surface, points: &[(i32, i32)], color: u32) -> Result<(), DrawError> {
    fill_polygon_alpha(dest, points, color, 255)
}

/// Fill a closed polygon with one color, alpha-blended onto the
/// destination. Opaque calls stroke the outline; translucent calls widen
/// each span instead so no pixel is blended twice.
pub fn fill_polygon_alpha(
    dest: &mut Surface,
    points: &[(i32, i32)],
    color: u32,
    alpha: u8,
) -> Result<(), DrawError> {
    let (mut edges, bounds) = build_edges(points, None)?;
    dest.lock()?;

    let opaque = alpha == 255;
    if opaque {
        stroke_outline(dest, points, |d, (x1, y1), (x2, y2)| {
            line(d, x1, y1, x2, y2, color);
        });
    }
    scan_spans(dest, &mut edges, bounds.ymin, bounds.ymax, opaque, |d, x1, x2, sy, _, _| {
        if opaque {
            solid_span(d, x1, x2, sy, color);
        } else {
            solid_span_alpha(d, x1 - 1, x2, sy, color, alpha);
        }
    });

    dest.unlock();
    dest.push_update(Rect::from_bounds(bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax));
    Ok(())
}

/// Fill a closed polygon Gouraud-shaded between per-vertex colors.
/// `colors` must hold one color per vertex; a length mismatch is reported
/// as [`DrawError::TooFewVertices`], the same way a short vertex list is.
pub fn faded_polygon(
    dest: &mut Surface,
    points: &[(i32, i32)],
    colors: &[Color],
) -> Result<(), DrawError> {
    faded_polygon_alpha(dest, points, colors, 255)
}

/// Gouraud-shaded polygon fill with a constant alpha blend on top.
pub fn faded_polygon_alpha(
    dest: &mut Surface,
    points: &[(i32, i32)],
    colors: &[Color],
    alpha: u8,
) -> Result<(), DrawError> {
    let (mut edges, bounds) = build_edges(points, Some(colors))?;
    dest.lock()?;

    let opaque = alpha == 255;
    if opaque {
        let n = points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            faded_line(
                dest,
                points[i].0,
                points[i].1,
                points[j].0,
                points[j].1,
                colors[i],
                colors[j],
            );
        }
    }
    scan_spans(dest, &mut edges, bounds.ymin, bounds.ymax, opaque, |d, x1, x2, sy, c1, c2| {
        if opaque {
            faded_span(d, x1, x2, sy, c1, c2);
        } else {
            faded_span_alpha(d, x1 - 1, x2, sy, c1, c2, alpha);
        }
    });

    dest.unlock();
    dest.push_update(Rect::from_bounds(bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax));
    Ok(())
}

/// Polygon fill with an anti-aliased outline.
pub fn aa_fill_polygon(
    dest: &mut Surface,
    points: &[(i32, i32)],
    color: u32,
) -> Result<(), DrawError> {
    let (mut edges, bounds) = build_edges(points, None)?;
    dest.lock()?;

    stroke_outline(dest, points, |d, (x1, y1), (x2, y2)| {
        aa_line(d, x1, y1, x2, y2, color, 255);
    });
    scan_spans(dest, &mut edges, bounds.ymin, bounds.ymax, true, |d, x1, x2, sy, _, _| {
        solid_span(d, x1, x2, sy, color);
    });

    dest.unlock();
    dest.push_update(Rect::from_bounds(bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax));
    Ok(())
}

/// Gouraud-shaded polygon fill with an anti-aliased outline.
pub fn aa_faded_polygon(
    dest: &mut Surface,
    points: &[(i32, i32)],
    colors: &[Color],
) -> Result<(), DrawError> {
    let (mut edges, bounds) = build_edges(points, Some(colors))?;
    dest.lock()?;

    let n = points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        aa_faded_line(
            dest,
            points[i].0,
            points[i].1,
            points[j].0,
            points[j].1,
            colors[i],
            colors[j],
            255,
        );
    }
    scan_spans(dest, &mut edges, bounds.ymin, bounds.ymax, true, |d, x1, x2, sy, c1, c2| {
        faded_span(d, x1, x2, sy, c1, c2);
    });

    dest.unlock();
    dest.push_update(Rect::from_bounds(bounds.xmin, bounds.ymin, bounds.xmax, bounds.ymax));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelFormat;

    fn surf(w: u32, h: u32) -> Surface {
        Surface::new(w, h, PixelFormat::argb8888())
    }

    fn count_colored(s: &Surface) -> usize {
        let mut n = 0;
        for y in 0..s.height() {
            for x in 0..s.width() {
                if s.get_pixel(x, y) != 0 {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn too_few_vertices_is_an_error_and_draws_nothing() {
        let mut s = surf(10, 10);
        let r = fill_polygon(&mut s, &[(1, 1), (8, 8)], 0xFFFF_FFFF);
        assert_eq!(r, Err(DrawError::TooFewVertices));
        assert_eq!(count_colored(&s), 0);
    }

    #[test]
    fn negative_coordinate_is_rejected_before_drawing() {
        let mut s = surf(10, 10);
        let r = fill_polygon(&mut s, &[(1, 1), (8, 1), (-4, 8)], 0xFFFF_FFFF);
        assert_eq!(r, Err(DrawError::NegativeCoordinate));
        assert_eq!(count_colored(&s), 0);
    }

    #[test]
    fn locked_destination_reports_busy() {
        let mut s = surf(10, 10);
        s.lock().unwrap();
        let r = fill_polygon(&mut s, &[(1, 1), (8, 1), (4, 8)], 0xFFFF_FFFF);
        assert_eq!(r, Err(DrawError::SurfaceBusy));
    }

    #[test]
    fn axis_aligned_square_fills_completely() {
        let mut s = surf(14, 14);
        let c = s.map_rgb(255, 255, 255);
        fill_polygon(&mut s, &[(2, 2), (10, 2), (10, 10), (2, 10)], c).unwrap();
        for y in 0..14 {
            for x in 0..14 {
                let inside = (2..=10).contains(&x) && (2..=10).contains(&y);
                assert_eq!(s.get_pixel(x, y) == c, inside, "({x},{y})");
            }
        }
    }

    #[test]
    fn diamond_scanline_through_side_vertices_is_one_span() {
        // At the widest scanline two edges end and two begin; the duplicate
        // crossings must collapse so the row fills edge to edge.
        let mut s = surf(14, 14);
        let c = s.map_rgb(0, 255, 0);
        fill_polygon(&mut s, &[(6, 0), (12, 6), (6, 12), (0, 6)], c).unwrap();
        for x in 0..=12 {
            assert_eq!(s.get_pixel(x, 6), c, "x={x}");
        }
        assert_eq!(s.get_pixel(13, 6), 0);
    }

    #[test]
    fn fill_matches_ray_cast_interior() {
        let pts = [(3, 1), (16, 3), (18, 12), (9, 17), (1, 9)];
        let mut s = surf(20, 20);
        let c = s.map_rgb(255, 0, 0);
        fill_polygon(&mut s, &pts, c).unwrap();

        // Distance-buffered even-odd test against the polygon
        let inside = |px: f64, py: f64| {
            let mut hit = false;
            let n = pts.len();
            for i in 0..n {
                let (x1, y1) = (f64::from(pts[i].0), f64::from(pts[i].1));
                let (x2, y2) = (f64::from(pts[(i + 1) % n].0), f64::from(pts[(i + 1) % n].1));
                if (y1 > py) != (y2 > py) && px < x1 + (py - y1) / (y2 - y1) * (x2 - x1) {
                    hit = !hit;
                }
            }
            hit
        };
        let near_edge = |px: f64, py: f64| {
            let n = pts.len();
            (0..n).any(|i| {
                let (x1, y1) = (f64::from(pts[i].0), f64::from(pts[i].1));
                let (x2, y2) = (f64::from(pts[(i + 1) % n].0), f64::from(pts[(i + 1) % n].1));
                let (dx, dy) = (x2 - x1, y2 - y1);
                let t = (((px - x1) * dx + (py - y1) * dy) / (dx * dx + dy * dy)).clamp(0.0, 1.0);
                let (ex, ey) = (x1 + t * dx - px, y1 + t * dy - py);
                ex * ex + ey * ey < 2.25
            })
        };

        for y in 0..20 {
            for x in 0..20 {
                let (px, py) = (f64::from(x), f64::from(y));
                if near_edge(px, py) {
                    continue; // boundary pixels may go either way
                }
                let filled = s.get_pixel(x, y) == c;
                assert_eq!(filled, inside(px, py), "({x},{y})");
            }
        }
    }

    #[test]
    fn alpha_fill_stays_inside_bounding_box() {
        let mut s = surf(20, 20);
        let c = s.map_rgb(255, 255, 255);
        fill_polygon_alpha(&mut s, &[(4, 3), (15, 5), (9, 14)], c, 100).unwrap();
        assert!(count_colored(&s) > 0);
        for y in 0..20 {
            for x in 0..20 {
                if s.get_pixel(x, y) != 0 {
                    assert!((3..=15).contains(&x) && (3..=14).contains(&y), "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn faded_polygon_corner_colors_dominate() {
        let mut s = surf(20, 20);
        let colors = [
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
            Color::new(255, 255, 255),
        ];
        faded_polygon(&mut s, &[(1, 1), (18, 1), (18, 18), (1, 18)], &colors).unwrap();
        let c = s.get_rgb(s.get_pixel(2, 2));
        assert!(c.r > c.g && c.r > c.b, "{c:?}");
        let c = s.get_rgb(s.get_pixel(17, 2));
        assert!(c.g > c.r && c.g > c.b, "{c:?}");
        let c = s.get_rgb(s.get_pixel(17, 17));
        assert!(c.b > c.r && c.b > c.g, "{c:?}");
    }

    #[test]
    fn color_count_must_match_vertex_count() {
        let mut s = surf(10, 10);
        let r = faded_polygon(&mut s, &[(1, 1), (8, 1), (4, 8)], &[Color::new(255, 0, 0)]);
        assert_eq!(r, Err(DrawError::TooFewVertices));
    }

    #[test]
    fn horizontal_edge_row_is_underdrawn_on_the_alpha_path() {
        // Horizontal edges never enter the active list, so the scanline
        // holding the step of this L shape pairs off at the inner corner
        // and leaves the top row of the lower-right block unpainted.
        // Opaque fills hide this under the outline stroke; translucent
        // fills have no outline and expose it.
        let mut s = surf(12, 12);
        let c = s.map_rgb(255, 255, 255);
        fill_polygon_alpha(&mut s, &[(0, 0), (4, 0), (4, 4), (8, 4), (8, 8), (0, 8)], c, 128)
            .unwrap();
        for x in 0..=4 {
            assert_ne!(s.get_pixel(x, 4), 0, "x={x}");
        }
        for x in 5..=8 {
            assert_eq!(s.get_pixel(x, 4), 0, "x={x}");
        }
        // the row below the step is spanned edge to edge
        for x in 0..=8 {
            assert_ne!(s.get_pixel(x, 5), 0, "x={x}");
        }
    }

    #[test]
    fn fill_pushes_one_dirty_rect() {
        let mut s = surf(20, 20);
        s.enable_updates();
        fill_polygon(&mut s, &[(2, 3), (14, 3), (8, 11)], 0xFFFF_FFFF).unwrap();
        let updates = s.take_updates();
        assert_eq!(updates.len(), 1);
        let r = updates[0];
        assert_eq!((r.x, r.y, r.w, r.h), (2, 3, 13, 9));
    }

    #[test]
    fn error_paths_push_no_dirty_rect() {
        let mut s = surf(20, 20);
        s.enable_updates();
        let _ = fill_polygon(&mut s, &[(2, 3), (14, 3)], 0xFFFF_FFFF);
        let _ = fill_polygon(&mut s, &[(2, 3), (14, 3), (-1, 9)], 0xFFFF_FFFF);
        assert!(s.take_updates().is_empty());
    }

    #[test]
    fn aa_fill_covers_interior() {
        let mut s = surf(20, 20);
        let c = s.map_rgb(200, 200, 200);
        aa_fill_polygon(&mut s, &[(2, 2), (17, 2), (17, 17), (2, 17)], c).unwrap();
        for y in 4..=15 {
            for x in 4..=15 {
                assert_eq!(s.get_pixel(x, y), c, "({x},{y})");
            }
        }
    }
}
