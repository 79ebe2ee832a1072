//! sRGB to Oklab conversion and perceptual distance
//!
//! Oklab is used project-wide as the perceptual space. Distances between two
//! colors are plain Euclidean distances over `(l, a, b)`, where `l` runs from
//! 0 (black) to 1 (white).

use palette::{FromColor, Srgb};

/// A color in the Oklab perceptual space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Perceived lightness in `[0, 1]`
    pub l: f64,
    /// Green/red opponent axis
    pub a: f64,
    /// Blue/yellow opponent axis
    pub b: f64,
}

impl Oklab {
    /// Create a color from raw Oklab coordinates
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert an 8-bit sRGB triple
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        let srgb: Srgb<f64> = Srgb::new(r, g, b).into_format();
        let lab: palette::Oklab<f64> = palette::Oklab::from_color(srgb);
        Self::new(lab.l, lab.a, lab.b)
    }

    /// Euclidean distance to another color
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance, cheaper when only ordering matters
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        db.mul_add(db, dl.mul_add(dl, da * da))
    }

    /// Colorfulness, the radius on the `a`/`b` plane
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle in degrees within `[0, 360)`
    pub fn hue_degrees(&self) -> f64 {
        self.b.atan2(self.a).to_degrees().rem_euclid(360.0)
    }
}

/// Smallest angular difference between two hues, in degrees
pub fn hue_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}
