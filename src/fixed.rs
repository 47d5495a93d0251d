//! 16.16 fixed-point interpolation.
//!
//! Every coordinate, texture coordinate, color channel and intensity the
//! rasterizer steps across a span or down an edge goes through [`Interp`]:
//! a starting value shifted left 16 bits and a per-step delta computed once
//! with a single division, then added per pixel or per scanline.

/// Fractional bits of the fixed-point representation.
pub const FRAC_BITS: u32 = 16;

/// Half a unit; used to bias accumulators so truncation rounds to nearest.
const HALF: i64 = 1 << (FRAC_BITS - 1);

/// A linearly interpolated quantity.
///
/// The accumulator is biased by half a unit so that after `len` steps the
/// sampled value is exactly `end` (plain floor stepping can undershoot by
/// one for lengths up to a few thousand).
#[derive(Debug, Clone, Copy)]
pub struct Interp {
    acc: i64,
    step: i64,
}

impl Interp {
    /// Interpolate from `start` to `end` over `len` steps.
    ///
    /// `len <= 0` yields a degenerate interpolator that stays at `start`
    /// forever; the division by zero is prevented by construction.
    #[inline]
    pub fn span(start: i32, end: i32, len: i32) -> Self {
        let step = if len > 0 {
            ((i64::from(end) - i64::from(start)) << FRAC_BITS) / i64::from(len)
        } else {
            0
        };
        Self {
            acc: (i64::from(start) << FRAC_BITS) + HALF,
            step,
        }
    }

    /// A constant value (step 0).
    #[inline]
    pub fn flat(value: i32) -> Self {
        Self {
            acc: (i64::from(value) << FRAC_BITS) + HALF,
            step: 0,
        }
    }

    /// Current integer value.
    #[inline]
    pub fn value(&self) -> i32 {
        (self.acc >> FRAC_BITS) as i32
    }

    /// Current value clamped to a byte, for color channels.
    #[inline]
    pub fn value_u8(&self) -> u8 {
        self.value().clamp(0, 255) as u8
    }

    /// Advance one step.
    #[inline]
    pub fn advance(&mut self) {
        self.acc += self.step;
    }

    /// Advance `n` steps at once; used to compensate for clipped prefixes.
    #[inline]
    pub fn advance_by(&mut self, n: i32) {
        self.acc += self.step * i64::from(n);
    }

    /// The raw per-step delta.
    #[inline]
    pub fn step(&self) -> i64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        // Interpolating A -> B over len steps must land exactly on B.
        for &(a, b) in &[(0, 1), (0, 255), (255, 0), (-40, 1999), (123, 123)] {
            for &len in &[1, 2, 3, 7, 100, 719, 2000] {
                let mut it = Interp::span(a, b, len);
                assert_eq!(it.value(), a, "start of {a}->{b} over {len}");
                for _ in 0..len {
                    it.advance();
                }
                assert_eq!(it.value(), b, "end of {a}->{b} over {len}");
            }
        }
    }

    #[test]
    fn zero_length_span_stays_at_start() {
        let mut it = Interp::span(42, 9000, 0);
        assert_eq!(it.step(), 0);
        it.advance();
        it.advance();
        assert_eq!(it.value(), 42);
    }

    #[test]
    fn advance_by_matches_repeated_advance() {
        let mut a = Interp::span(3, 977, 53);
        let mut b = Interp::span(3, 977, 53);
        for _ in 0..17 {
            a.advance();
        }
        b.advance_by(17);
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn intensity_range_does_not_overflow() {
        // Full 16-bit intensity sweep over a long edge.
        let mut it = Interp::span(0, 65535, 2000);
        for _ in 0..2000 {
            it.advance();
        }
        assert_eq!(it.value(), 65535);
    }

    #[test]
    fn flat_is_constant() {
        let mut it = Interp::flat(-7);
        it.advance_by(1000);
        assert_eq!(it.value(), -7);
    }
}
