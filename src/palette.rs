//! Palettes and the precomputed shading table for 8-bit indexed surfaces.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale all channels by a 16-bit intensity fraction (65535 ~ 1.0).
    #[inline]
    pub fn scaled(self, intensity: u16) -> Self {
        let f = u32::from(intensity);
        Self {
            r: ((u32::from(self.r) * f) >> 16).min(255) as u8,
            g: ((u32::from(self.g) * f) >> 16).min(255) as u8,
            b: ((u32::from(self.b) * f) >> 16).min(255) as u8,
        }
    }
}

/// A color table for indexed (1 byte per pixel) surfaces, up to 256 entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// A 256-entry grayscale ramp; handy default for tests and tools.
    pub fn grayscale() -> Self {
        Self {
            colors: (0..=255).map(|v| Color::new(v, v, v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, black if out of range.
    #[inline]
    pub fn color(&self, index: u8) -> Color {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or(Color::new(0, 0, 0))
    }

    /// Index of the palette color closest to (r, g, b) by squared distance.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        let mut best = 0usize;
        let mut best_d = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let dr = i32::from(c.r) - i32::from(r);
            let dg = i32::from(c.g) - i32::from(g);
            let db = i32::from(c.b) - i32::from(b);
            let d = (dr * dr + dg * dg + db * db) as u32;
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best as u8
    }

    /// Load a palette from a JSON file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let data = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&data).map_err(|e| e.to_string())
    }

    /// Save the palette as JSON.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }
}

// ============================================================================
// Shading table
// ============================================================================

/// Precomputed (intensity byte, source index) -> destination index table.
///
/// Avoids per-pixel channel multiplication in 8-bit paletted mode: row `i`
/// holds, for every palette index, the index of the palette color closest to
/// that color scaled by intensity `i/255`.
pub struct ShadeTable {
    rows: Vec<[u8; 256]>,
}

impl ShadeTable {
    /// Build the full 256x256 table from a palette.
    pub fn build(palette: &Palette) -> Self {
        let mut rows = vec![[0u8; 256]; 256];
        for (i, row) in rows.iter_mut().enumerate() {
            // 8-bit intensity widened to the 16-bit fraction used everywhere else
            let intensity = ((i as u16) << 8) | i as u16;
            for (idx, slot) in row.iter_mut().enumerate() {
                let c = palette.color(idx as u8).scaled(intensity);
                *slot = palette.nearest(c.r, c.g, c.b);
            }
        }
        Self { rows }
    }

    /// Build from an arbitrary mapping; used by callers with their own ramp.
    pub fn from_fn(mut f: impl FnMut(u8, u8) -> u8) -> Self {
        let mut rows = vec![[0u8; 256]; 256];
        for (i, row) in rows.iter_mut().enumerate() {
            for (idx, slot) in row.iter_mut().enumerate() {
                *slot = f(i as u8, idx as u8);
            }
        }
        Self { rows }
    }

    /// Destination index for a source index under an intensity byte.
    #[inline]
    pub fn shade(&self, intensity: u8, index: u8) -> u8 {
        self.rows[intensity as usize][index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_full_intensity_is_near_identity() {
        let c = Color::new(200, 100, 50);
        let s = c.scaled(65535);
        // 65535/65536 loses at most one count per channel
        assert!(c.r - s.r <= 1 && c.g - s.g <= 1 && c.b - s.b <= 1);
        assert_eq!(c.scaled(0), Color::new(0, 0, 0));
    }

    #[test]
    fn nearest_finds_exact_entries() {
        let pal = Palette::new(vec![
            Color::new(0, 0, 0),
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
        ]);
        assert_eq!(pal.nearest(250, 10, 10), 1);
        assert_eq!(pal.nearest(0, 0, 0), 0);
        assert_eq!(pal.nearest(10, 10, 200), 3);
    }

    #[test]
    fn shade_table_grayscale_scales_down() {
        let table = ShadeTable::build(&Palette::grayscale());
        // Full intensity maps an index to (nearly) itself
        assert!(table.shade(255, 200) >= 199);
        // Zero intensity maps everything to black
        assert_eq!(table.shade(0, 200), 0);
        // Half intensity lands near half the value
        let half = table.shade(128, 200);
        assert!((95..=106).contains(&half), "half = {half}");
    }

    #[test]
    fn palette_json_round_trip() {
        let pal = Palette::new(vec![Color::new(1, 2, 3), Color::new(250, 251, 252)]);
        let json = serde_json::to_string(&pal).unwrap();
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back.colors, pal.colors);
    }
}
