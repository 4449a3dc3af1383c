//! Parameter types for encode operations.
//!
//! These describe *what* to encode, not *how*. The backend turns them into
//! calls on a concrete encoder.
//!
//! - [`Quality`]: normalized lossy quality in `[0, 1]`, clamped on construction.
//!   Encoders with an integer scale read it through [`Quality::percent`].

/// Normalized encoder quality (0 = smallest, 1 = best).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f32);

impl Quality {
    pub const MIN: Quality = Quality(0.0);
    pub const MAX: Quality = Quality(1.0);

    /// Clamp into `[0, 1]`. NaN becomes 0.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Quality on a 0-100 scale, as libwebp expects it.
    pub fn percent(self) -> f32 {
        self.0 * 100.0
    }

    /// Quality on the JPEG encoder's 1-100 scale.
    pub fn jpeg(self) -> u8 {
        (self.percent().round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(1.5).value(), 1.0);
        assert_eq!(Quality::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn quality_default_is_0_9() {
        assert_eq!(Quality::default().value(), 0.9);
    }

    #[test]
    fn jpeg_scale_never_hits_zero() {
        assert_eq!(Quality::MIN.jpeg(), 1);
        assert_eq!(Quality::new(0.5).jpeg(), 50);
        assert_eq!(Quality::MAX.jpeg(), 100);
    }

    #[test]
    fn percent_scale() {
        assert_eq!(Quality::new(0.25).percent(), 25.0);
    }
}
