//! Hue-grouped display layout of a palette
//!
//! This is a derived view for presenting a palette to people. Matching always
//! uses the palette's own order.

use crate::analysis::palette::{Palette, PaletteEntry};
use crate::io::configuration::DISPLAY_GRAY_SATURATION;
use std::collections::BTreeMap;

/// Hue, saturation and lightness of an sRGB color
///
/// Hue is in degrees `[0, 360)`, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue angle in degrees
    pub h: f64,
    /// Saturation percentage
    pub s: f64,
    /// Lightness percentage
    pub l: f64,
}

impl Hsl {
    /// Convert from 8-bit sRGB
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = f64::midpoint(max, min);

        if (max - min).abs() < f64::EPSILON {
            return Self {
                h: 0.0,
                s: 0.0,
                l: l * 100.0,
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self {
            h: h * 60.0,
            s: s * 100.0,
            l: l * 100.0,
        }
    }
}

impl Palette {
    /// Hue-grouped rows for presenting this palette, see [`display_rows`]
    pub fn display_rows(&self, bucket_degrees: f64, max_per_row: usize) -> Vec<Vec<PaletteEntry>> {
        display_rows(self, bucket_degrees, max_per_row)
    }
}

// Grays sort after every hue bucket
const GRAY_BUCKET: u32 = u32::MAX;

/// Group colors into hue buckets sorted dark to light, then reflow into rows
///
/// Low-saturation colors share one trailing bucket. Each row holds at most
/// `max_per_row` entries; a zero row width is treated as one.
pub fn display_rows(palette: &Palette, bucket_degrees: f64, max_per_row: usize) -> Vec<Vec<PaletteEntry>> {
    let bucket_degrees = if bucket_degrees > 0.0 { bucket_degrees } else { 360.0 };
    let mut buckets: BTreeMap<u32, Vec<(Hsl, &PaletteEntry)>> = BTreeMap::new();

    for entry in palette.iter() {
        let hsl = Hsl::from_rgb(entry.rgb);
        let bucket = if hsl.s < DISPLAY_GRAY_SATURATION {
            GRAY_BUCKET
        } else {
            (hsl.h / bucket_degrees).floor() as u32
        };
        buckets.entry(bucket).or_default().push((hsl, entry));
    }

    let ordered: Vec<PaletteEntry> = buckets
        .into_values()
        .flat_map(|mut bucket| {
            bucket.sort_by(|a, b| a.0.l.total_cmp(&b.0.l));
            bucket.into_iter().map(|(_, entry)| entry.clone())
        })
        .collect();

    ordered
        .chunks(max_per_row.max(1))
        .map(<[PaletteEntry]>::to_vec)
        .collect()
}
