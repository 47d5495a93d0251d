//! Pixel surfaces: the destination (and texture source) of every draw call.
//!
//! A [`Surface`] is a caller-owned rectangular pixel buffer with a defined
//! [`PixelFormat`] (1, 2, 3 or 4 bytes per pixel with per-channel
//! shift/loss, or 8-bit indexed through a palette), a clip rectangle that
//! bounds all drawing, an optional set of color keys marking transparent
//! texture pixels, and an opt-in dirty-rectangle accumulator.
//!
//! The rasterizer never allocates or frees surfaces; it locks one for the
//! duration of a draw and reads/writes pixels through the bit-depth
//! dispatched accessors here.

use crate::palette::{Color, Palette};
use crate::DrawError;

// ============================================================================
// Rect
// ============================================================================

/// An integer rectangle; used for clip bounds and dirty-rect reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect spanning inclusive bounds.
    pub fn from_bounds(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            x: xmin,
            y: ymin,
            w: xmax - xmin + 1,
            h: ymax - ymin + 1,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

// ============================================================================
// PixelFormat
// ============================================================================

/// Channel layout of a surface: bytes per pixel plus shift/loss/mask per
/// channel, or a palette for 1-byte indexed mode.
#[derive(Debug, Clone)]
pub struct PixelFormat {
    pub bytes_per_pixel: u32,
    pub r_shift: u32,
    pub g_shift: u32,
    pub b_shift: u32,
    pub r_loss: u32,
    pub g_loss: u32,
    pub b_loss: u32,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
    pub a_mask: u32,
    pub palette: Option<Palette>,
}

impl PixelFormat {
    /// 8-bit indexed mode; all color mapping goes through the palette.
    pub fn indexed8(palette: Palette) -> Self {
        Self {
            bytes_per_pixel: 1,
            r_shift: 0,
            g_shift: 0,
            b_shift: 0,
            r_loss: 8,
            g_loss: 8,
            b_loss: 8,
            r_mask: 0,
            g_mask: 0,
            b_mask: 0,
            a_mask: 0,
            palette: Some(palette),
        }
    }

    /// 16-bit 5-6-5.
    pub fn rgb565() -> Self {
        Self {
            bytes_per_pixel: 2,
            r_shift: 11,
            g_shift: 5,
            b_shift: 0,
            r_loss: 3,
            g_loss: 2,
            b_loss: 3,
            r_mask: 0xF800,
            g_mask: 0x07E0,
            b_mask: 0x001F,
            a_mask: 0,
            palette: None,
        }
    }

    /// 24-bit packed RGB.
    pub fn rgb888() -> Self {
        Self {
            bytes_per_pixel: 3,
            r_shift: 16,
            g_shift: 8,
            b_shift: 0,
            r_loss: 0,
            g_loss: 0,
            b_loss: 0,
            r_mask: 0x00FF_0000,
            g_mask: 0x0000_FF00,
            b_mask: 0x0000_00FF,
            a_mask: 0,
            palette: None,
        }
    }

    /// 32-bit ARGB with an opaque alpha byte.
    pub fn argb8888() -> Self {
        Self {
            bytes_per_pixel: 4,
            r_shift: 16,
            g_shift: 8,
            b_shift: 0,
            r_loss: 0,
            g_loss: 0,
            b_loss: 0,
            r_mask: 0x00FF_0000,
            g_mask: 0x0000_FF00,
            b_mask: 0x0000_00FF,
            a_mask: 0xFF00_0000,
            palette: None,
        }
    }

    /// Pack 8-bit channels into this format's pixel value.
    ///
    /// Indexed mode maps through the palette by nearest match.
    #[inline]
    pub fn map_rgb(&self, r: u8, g: u8, b: u8) -> u32 {
        if let Some(pal) = &self.palette {
            return u32::from(pal.nearest(r, g, b));
        }
        (u32::from(r) >> self.r_loss) << self.r_shift
            | (u32::from(g) >> self.g_loss) << self.g_shift
            | (u32::from(b) >> self.b_loss) << self.b_shift
            | self.a_mask
    }

    /// Unpack a pixel value into 8-bit channels.
    #[inline]
    pub fn get_rgb(&self, value: u32) -> Color {
        if let Some(pal) = &self.palette {
            return pal.color(value as u8);
        }
        Color {
            r: (((value & self.r_mask) >> self.r_shift) << self.r_loss) as u8,
            g: (((value & self.g_mask) >> self.g_shift) << self.g_loss) as u8,
            b: (((value & self.b_mask) >> self.b_shift) << self.b_loss) as u8,
        }
    }
}

// ============================================================================
// Surface
// ============================================================================

/// A rectangular pixel buffer with format, clip rect, color keys and an
/// optional dirty-rect accumulator.
pub struct Surface {
    width: i32,
    height: i32,
    pitch: usize,
    format: PixelFormat,
    pixels: Vec<u8>,
    clip_xmin: i32,
    clip_xmax: i32,
    clip_ymin: i32,
    clip_ymax: i32,
    color_keys: Vec<u32>,
    locked: bool,
    updates: Option<Vec<Rect>>,
}

impl Surface {
    /// Create a surface with the given format, cleared to zero.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let pitch = (width * format.bytes_per_pixel) as usize;
        Self {
            width: width as i32,
            height: height as i32,
            pitch,
            pixels: vec![0; pitch * height as usize],
            format,
            clip_xmin: 0,
            clip_xmax: width as i32 - 1,
            clip_ymin: 0,
            clip_ymax: height as i32 - 1,
            color_keys: Vec::new(),
            locked: false,
            updates: None,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Raw bytes, e.g. for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    // ========================================================================
    // Locking
    // ========================================================================

    /// Acquire the surface for direct pixel access.
    ///
    /// Every drawing entry point brackets its pixel writes with
    /// `lock`/`unlock`; a surface the caller has left locked makes the draw
    /// abort with [`DrawError::SurfaceBusy`] before any pixel is touched.
    pub fn lock(&mut self) -> Result<(), DrawError> {
        if self.locked {
            return Err(DrawError::SurfaceBusy);
        }
        self.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // ========================================================================
    // Clip rectangle
    // ========================================================================

    /// Set the clip rectangle, clamped to the surface bounds.
    pub fn set_clip(&mut self, rect: Rect) {
        self.clip_xmin = rect.x.max(0);
        self.clip_ymin = rect.y.max(0);
        self.clip_xmax = (rect.x + rect.w - 1).min(self.width - 1);
        self.clip_ymax = (rect.y + rect.h - 1).min(self.height - 1);
    }

    /// Reset the clip rectangle to the full surface.
    pub fn reset_clip(&mut self) {
        self.clip_xmin = 0;
        self.clip_ymin = 0;
        self.clip_xmax = self.width - 1;
        self.clip_ymax = self.height - 1;
    }

    #[inline]
    pub fn clip_xmin(&self) -> i32 {
        self.clip_xmin
    }

    #[inline]
    pub fn clip_xmax(&self) -> i32 {
        self.clip_xmax
    }

    #[inline]
    pub fn clip_ymin(&self) -> i32 {
        self.clip_ymin
    }

    #[inline]
    pub fn clip_ymax(&self) -> i32 {
        self.clip_ymax
    }

    // ========================================================================
    // Color keys
    // ========================================================================

    /// Register a pixel value to treat as transparent when this surface is
    /// used as a texture source.
    pub fn add_color_key(&mut self, value: u32) {
        if !self.color_keys.contains(&value) {
            self.color_keys.push(value);
        }
    }

    pub fn clear_color_keys(&mut self) {
        self.color_keys.clear();
    }

    #[inline]
    pub fn color_keys(&self) -> &[u32] {
        &self.color_keys
    }

    #[inline]
    pub fn is_color_key(&self, value: u32) -> bool {
        self.color_keys.contains(&value)
    }

    // ========================================================================
    // Dirty rectangles
    // ========================================================================

    /// Start accumulating the bounding rect of every shape-level draw.
    pub fn enable_updates(&mut self) {
        if self.updates.is_none() {
            self.updates = Some(Vec::new());
        }
    }

    /// Stop accumulating and drop anything pending.
    pub fn disable_updates(&mut self) {
        self.updates = None;
    }

    /// Drain the accumulated dirty rects.
    pub fn take_updates(&mut self) -> Vec<Rect> {
        match &mut self.updates {
            Some(v) => std::mem::take(v),
            None => Vec::new(),
        }
    }

    /// Record a touched rectangle; no-op unless updates are enabled.
    pub(crate) fn push_update(&mut self, rect: Rect) {
        if let Some(v) = &mut self.updates {
            v.push(rect);
        }
    }

    // ========================================================================
    // Pixel access
    // ========================================================================

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.pitch + x as usize * self.format.bytes_per_pixel as usize
    }

    /// Read a pixel value; 0 if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> u32 {
        if !self.in_bounds(x, y) {
            return 0;
        }
        let o = self.offset(x, y);
        let p = &self.pixels;
        match self.format.bytes_per_pixel {
            1 => u32::from(p[o]),
            2 => u32::from(p[o]) | u32::from(p[o + 1]) << 8,
            3 => u32::from(p[o]) | u32::from(p[o + 1]) << 8 | u32::from(p[o + 2]) << 16,
            _ => {
                u32::from(p[o])
                    | u32::from(p[o + 1]) << 8
                    | u32::from(p[o + 2]) << 16
                    | u32::from(p[o + 3]) << 24
            },
        }
    }

    /// Write a pixel value (bounds checked, ignores the clip rect).
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, value: u32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let o = self.offset(x, y);
        let p = &mut self.pixels;
        match self.format.bytes_per_pixel {
            1 => p[o] = value as u8,
            2 => {
                p[o] = value as u8;
                p[o + 1] = (value >> 8) as u8;
            },
            3 => {
                p[o] = value as u8;
                p[o + 1] = (value >> 8) as u8;
                p[o + 2] = (value >> 16) as u8;
            },
            _ => {
                p[o] = value as u8;
                p[o + 1] = (value >> 8) as u8;
                p[o + 2] = (value >> 16) as u8;
                p[o + 3] = (value >> 24) as u8;
            },
        }
    }

    /// Write a pixel value respecting the clip rectangle; the line and
    /// outline drawers plot through this.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, value: u32) {
        if x < self.clip_xmin || x > self.clip_xmax || y < self.clip_ymin || y > self.clip_ymax {
            return;
        }
        self.put_pixel(x, y, value);
    }

    /// Alpha-blend 8-bit channels onto a pixel, respecting the clip rect.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, alpha: u8) {
        if x < self.clip_xmin || x > self.clip_xmax || y < self.clip_ymin || y > self.clip_ymax {
            return;
        }
        let dst = self.format.get_rgb(self.get_pixel(x, y));
        let a = u16::from(alpha);
        let v = self.format.map_rgb(
            blend_channel(r, dst.r, a),
            blend_channel(g, dst.g, a),
            blend_channel(b, dst.b, a),
        );
        self.put_pixel(x, y, v);
    }

    /// Pack 8-bit channels via this surface's format.
    #[inline]
    pub fn map_rgb(&self, r: u8, g: u8, b: u8) -> u32 {
        self.format.map_rgb(r, g, b)
    }

    /// Unpack a pixel value via this surface's format.
    #[inline]
    pub fn get_rgb(&self, value: u32) -> Color {
        self.format.get_rgb(value)
    }

    /// Fill the whole surface with one pixel value, ignoring the clip rect.
    pub fn fill(&mut self, value: u32) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.put_pixel(x, y, value);
            }
        }
    }
}

/// Alpha blend a single color channel.
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255.
#[inline]
pub(crate) fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = u16::from(src) * alpha + u16::from(dst) * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_get_round_trip_all_formats() {
        for fmt in [
            PixelFormat::argb8888(),
            PixelFormat::rgb888(),
            PixelFormat::rgb565(),
        ] {
            let v = fmt.map_rgb(200, 100, 40);
            let c = fmt.get_rgb(v);
            // 565 loses low bits; everything else is exact
            assert!(u8::abs_diff(c.r, 200) < 8, "{c:?}");
            assert!(u8::abs_diff(c.g, 100) < 4, "{c:?}");
            assert!(u8::abs_diff(c.b, 40) < 8, "{c:?}");
        }
    }

    #[test]
    fn indexed_maps_through_palette() {
        let fmt = PixelFormat::indexed8(Palette::grayscale());
        assert_eq!(fmt.map_rgb(128, 128, 128), 128);
        assert_eq!(fmt.get_rgb(77), Color::new(77, 77, 77));
    }

    #[test]
    fn pixel_round_trip_per_bpp() {
        let cases: [(PixelFormat, u32); 4] = [
            (PixelFormat::indexed8(Palette::grayscale()), 0xAB),
            (PixelFormat::rgb565(), 0xBEEF),
            (PixelFormat::rgb888(), 0x00AB_CDEF),
            (PixelFormat::argb8888(), 0xFFAB_CDEF),
        ];
        for (fmt, value) in cases {
            let mut s = Surface::new(8, 8, fmt);
            s.put_pixel(3, 5, value);
            assert_eq!(s.get_pixel(3, 5), value);
            assert_eq!(s.get_pixel(0, 0), 0);
        }
    }

    #[test]
    fn out_of_bounds_access_is_safe() {
        let mut s = Surface::new(4, 4, PixelFormat::argb8888());
        s.put_pixel(-1, 0, 123);
        s.put_pixel(0, 99, 123);
        assert_eq!(s.get_pixel(-1, 0), 0);
        assert_eq!(s.get_pixel(4, 0), 0);
    }

    #[test]
    fn plot_respects_clip() {
        let mut s = Surface::new(10, 10, PixelFormat::argb8888());
        s.set_clip(Rect::new(2, 2, 4, 4));
        s.plot(0, 0, 0xFFFF_FFFF);
        s.plot(3, 3, 0xFFFF_FFFF);
        s.plot(6, 3, 0xFFFF_FFFF); // just outside clip xmax=5
        assert_eq!(s.get_pixel(0, 0), 0);
        assert_eq!(s.get_pixel(3, 3), 0xFFFF_FFFF);
        assert_eq!(s.get_pixel(6, 3), 0);
    }

    #[test]
    fn set_clip_clamps_to_bounds() {
        let mut s = Surface::new(10, 10, PixelFormat::argb8888());
        s.set_clip(Rect::new(-5, -5, 100, 100));
        assert_eq!(s.clip_xmin(), 0);
        assert_eq!(s.clip_xmax(), 9);
        assert_eq!(s.clip_ymin(), 0);
        assert_eq!(s.clip_ymax(), 9);
    }

    #[test]
    fn lock_is_exclusive() {
        let mut s = Surface::new(2, 2, PixelFormat::argb8888());
        assert!(s.lock().is_ok());
        assert_eq!(s.lock(), Err(crate::DrawError::SurfaceBusy));
        s.unlock();
        assert!(s.lock().is_ok());
    }

    #[test]
    fn updates_accumulate_only_when_enabled() {
        let mut s = Surface::new(8, 8, PixelFormat::argb8888());
        s.push_update(Rect::new(0, 0, 1, 1));
        assert!(s.take_updates().is_empty());
        s.enable_updates();
        s.push_update(Rect::new(1, 2, 3, 4));
        let ups = s.take_updates();
        assert_eq!(ups, vec![Rect::new(1, 2, 3, 4)]);
        assert!(s.take_updates().is_empty());
    }

    #[test]
    fn color_keys_deduplicate() {
        let mut s = Surface::new(2, 2, PixelFormat::argb8888());
        s.add_color_key(7);
        s.add_color_key(7);
        s.add_color_key(9);
        assert_eq!(s.color_keys(), &[7, 9]);
        assert!(s.is_color_key(7));
        assert!(!s.is_color_key(8));
    }
}
