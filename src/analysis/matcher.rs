//! Nearest palette color lookup under Euclidean Oklab distance

use crate::analysis::palette::{Palette, PaletteEntry};
use crate::io::configuration::GRAYSCALE_CHROMA;
use crate::math::Oklab;
use crate::math::oklab::hue_difference;

/// Perceptual nearest-color search over a shared palette
///
/// Holds only a palette handle, so one matcher can be shared across threads.
#[derive(Debug, Clone)]
pub struct ColorMatcher {
    palette: Palette,
}

impl ColorMatcher {
    /// Create a matcher over `palette`
    pub fn new(palette: &Palette) -> Self {
        Self {
            palette: palette.clone(),
        }
    }

    /// The palette being searched
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Index of the entry closest to `rgb`
    ///
    /// Ties resolve to the earliest entry in palette order.
    pub fn nearest_index(&self, rgb: [u8; 3]) -> usize {
        self.nearest_oklab_index(&Oklab::from_rgb(rgb))
    }

    /// Index of the entry closest to an Oklab color
    pub fn nearest_oklab_index(&self, color: &Oklab) -> usize {
        self.closest(color).map_or(0, |(index, _)| index)
    }

    /// Entry closest to `rgb`, `None` only for a palette with no entries
    pub fn nearest(&self, rgb: [u8; 3]) -> Option<&PaletteEntry> {
        self.closest(&Oklab::from_rgb(rgb)).map(|(_, entry)| entry)
    }

    fn closest(&self, color: &Oklab) -> Option<(usize, &PaletteEntry)> {
        let mut best: Option<(usize, &PaletteEntry, f64)> = None;

        for (index, entry) in self.palette.iter().enumerate() {
            let distance = color.distance_squared(&entry.oklab);
            // Strict comparison keeps the earliest of equally close entries
            if best.is_none_or(|(_, _, best_distance)| distance < best_distance) {
                best = Some((index, entry, distance));
            }
        }

        best.map(|(index, entry, _)| (index, entry))
    }

    /// Explain how `rgb` relates to a palette entry
    pub fn match_details(rgb: [u8; 3], entry: &PaletteEntry) -> MatchDetails {
        let input = analyze_color(rgb);
        let candidate = analyze_color(entry.rgb);
        let oklab = Oklab::from_rgb(rgb);

        MatchDetails {
            distance: oklab.distance(&entry.oklab),
            lightness_diff: (input.lightness - candidate.lightness).abs(),
            chroma_diff: (input.chroma - candidate.chroma).abs(),
            hue_diff: hue_difference(input.hue_degrees, candidate.hue_degrees),
            is_grayscale_match: input.is_grayscale && candidate.is_grayscale,
        }
    }
}

/// Summary of a color's perceptual properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAnalysis {
    /// Mean of the three channels, `0..=255`
    pub brightness: f64,
    /// Oklab lightness
    pub lightness: f64,
    /// Oklab chroma
    pub chroma: f64,
    /// Oklab hue angle in degrees
    pub hue_degrees: f64,
    /// Chroma below the grayscale threshold
    pub is_grayscale: bool,
}

/// Diagnostic comparison between an input color and a palette entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchDetails {
    /// Oklab Euclidean distance
    pub distance: f64,
    /// Absolute lightness difference
    pub lightness_diff: f64,
    /// Absolute chroma difference
    pub chroma_diff: f64,
    /// Smallest hue angle between the two colors, in degrees
    pub hue_diff: f64,
    /// Both colors read as grayscale
    pub is_grayscale_match: bool,
}

/// Analyze an sRGB color
pub fn analyze_color(rgb: [u8; 3]) -> ColorAnalysis {
    let oklab = Oklab::from_rgb(rgb);
    let chroma = oklab.chroma();
    let brightness = rgb.iter().map(|&c| f64::from(c)).sum::<f64>() / 3.0;

    ColorAnalysis {
        brightness,
        lightness: oklab.l,
        chroma,
        hue_degrees: oklab.hue_degrees(),
        is_grayscale: chroma < GRAYSCALE_CHROMA,
    }
}
