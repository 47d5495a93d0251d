//! Scanline software rasterizer.
//!
//! Draws solid, alpha-blended, gouraud-shaded and textured triangles, quads
//! and n-vertex polygons into caller-owned [`Surface`] pixel buffers of 8,
//! 16, 24 or 32 bits per pixel. Everything is plain call-and-return: a draw
//! call decomposes its shape into horizontal spans, walks them top to bottom
//! with 16.16 fixed-point interpolation and writes pixels through the
//! surface's format. No threads, no hidden state between calls.
//!
//! Surfaces carry their own clip rectangle, optional color keys for
//! transparent texture reads, and an opt-in dirty-rectangle accumulator so a
//! compositor can blit only what changed.

pub mod fixed;
pub mod line;
pub mod palette;
pub mod polygon;
pub mod scanline;
pub mod surface;
pub mod trigon;

#[cfg(feature = "display")]
pub mod display;

pub use palette::{Color, Palette, ShadeTable};
pub use surface::{PixelFormat, Rect, Surface};

use std::fmt;

/// Why a draw call refused to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawError {
    /// Polygon with fewer than 3 vertices.
    TooFewVertices,
    /// A vertex with a negative coordinate; polygon input is not clipped.
    NegativeCoordinate,
    /// The destination surface is already locked by the caller.
    SurfaceBusy,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::TooFewVertices => write!(f, "polygon needs at least 3 vertices"),
            DrawError::NegativeCoordinate => write!(f, "negative vertex coordinate"),
            DrawError::SurfaceBusy => write!(f, "surface is locked"),
        }
    }
}

impl std::error::Error for DrawError {}
