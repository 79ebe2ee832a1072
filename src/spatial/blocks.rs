//! Partitioning of a source image into per-tile pixel blocks
//!
//! Block `(x, y)` of a `W x H` grid spans columns
//! `[floor(x * iw / W), floor((x + 1) * iw / W))` and the matching rows. Each
//! block is split into quadrants at its own midlines.

use crate::io::error::{MosaicError, Result};
use crate::spatial::source::SourceImage;
use std::ops::Range;

/// Quadrant positions in their fixed index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadrantPosition {
    /// Index 0
    TopLeft,
    /// Index 1
    TopRight,
    /// Index 2
    BottomLeft,
    /// Index 3
    BottomRight,
}

impl QuadrantPosition {
    /// All positions, indexed as TL=0, TR=1, BL=2, BR=3
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Fixed index of this position
    pub const fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }

    /// Position for a fixed index, if in range
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::TopLeft),
            1 => Some(Self::TopRight),
            2 => Some(Self::BottomLeft),
            3 => Some(Self::BottomRight),
            _ => None,
        }
    }

    const fn locate(is_top: bool, is_left: bool) -> Self {
        match (is_top, is_left) {
            (true, true) => Self::TopLeft,
            (true, false) => Self::TopRight,
            (false, true) => Self::BottomLeft,
            (false, false) => Self::BottomRight,
        }
    }
}

/// Color accumulator for one quadrant of a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quadrant {
    /// Channel sums over opaque pixels
    pub rgb_sum: [u64; 3],
    /// Number of opaque pixels
    pub opaque_count: u64,
    /// Number of transparent pixels
    pub transparent_count: u64,
}

impl Quadrant {
    fn add(&mut self, rgb: [u8; 3]) {
        for (sum, channel) in self.rgb_sum.iter_mut().zip(rgb) {
            *sum += u64::from(channel);
        }
        self.opaque_count += 1;
    }

    /// Rounded average over opaque pixels, `None` when there are none
    pub fn average(&self) -> Option<[u8; 3]> {
        average_rgb(self.rgb_sum, self.opaque_count)
    }

    /// Sum of per-pixel brightness `(r + g + b) / 3` over opaque pixels
    pub fn brightness_sum(&self) -> f64 {
        self.rgb_sum.iter().map(|&sum| sum as f64).sum::<f64>() / 3.0
    }
}

/// Aggregated pixel statistics for one output cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    /// Grid column of this block
    pub grid_x: u32,
    /// Grid row of this block
    pub grid_y: u32,
    /// Source pixel columns covered
    pub columns: Range<u32>,
    /// Source pixel rows covered
    pub rows: Range<u32>,
    /// Quadrant accumulators in TL, TR, BL, BR order
    pub quadrants: [Quadrant; 4],
}

impl PixelBlock {
    /// Total number of pixels in the block
    pub fn pixel_count(&self) -> u64 {
        self.quadrants
            .iter()
            .map(|q| q.opaque_count + q.transparent_count)
            .sum()
    }

    /// Number of pixels below the alpha threshold
    pub fn transparent_count(&self) -> u64 {
        self.quadrants.iter().map(|q| q.transparent_count).sum()
    }

    /// Number of opaque pixels
    pub fn opaque_count(&self) -> u64 {
        self.quadrants.iter().map(|q| q.opaque_count).sum()
    }

    /// Fraction of transparent pixels, 1.0 for a block with no pixels
    pub fn transparent_fraction(&self) -> f64 {
        let total = self.pixel_count();
        if total == 0 {
            return 1.0;
        }
        self.transparent_count() as f64 / total as f64
    }

    /// Whether the block is transparent enough to become an empty tile
    pub fn is_blank(&self, transparency_cutoff: f64) -> bool {
        self.opaque_count() == 0 || self.transparent_fraction() > transparency_cutoff
    }

    /// Rounded average color over all opaque pixels in the block
    pub fn main_color(&self) -> Option<[u8; 3]> {
        let mut sum = [0u64; 3];
        for quadrant in &self.quadrants {
            for (total, part) in sum.iter_mut().zip(quadrant.rgb_sum) {
                *total += part;
            }
        }
        average_rgb(sum, self.opaque_count())
    }

    /// Average color of each quadrant, falling back to the block average
    /// for quadrants without opaque pixels
    pub fn quadrant_colors(&self) -> Option<[[u8; 3]; 4]> {
        let main = self.main_color()?;
        Some(self.quadrants.map(|q| q.average().unwrap_or(main)))
    }

    /// Quadrant accumulator at a fixed position
    pub const fn quadrant(&self, position: QuadrantPosition) -> &Quadrant {
        match position {
            QuadrantPosition::TopLeft => &self.quadrants[0],
            QuadrantPosition::TopRight => &self.quadrants[1],
            QuadrantPosition::BottomLeft => &self.quadrants[2],
            QuadrantPosition::BottomRight => &self.quadrants[3],
        }
    }
}

/// Samples fixed-size blocks out of a source image
#[derive(Debug)]
pub struct BlockSampler<'a> {
    image: &'a SourceImage,
    grid_width: u32,
    grid_height: u32,
    alpha_threshold: u8,
}

impl<'a> BlockSampler<'a> {
    /// Create a sampler dividing `image` into a `grid_width x grid_height` grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either grid dimension is zero
    pub fn new(
        image: &'a SourceImage,
        grid_width: u32,
        grid_height: u32,
        alpha_threshold: u8,
    ) -> Result<Self> {
        if grid_width == 0 || grid_height == 0 {
            return Err(MosaicError::InvalidDimensions {
                width: grid_width,
                height: grid_height,
            });
        }
        Ok(Self {
            image,
            grid_width,
            grid_height,
            alpha_threshold,
        })
    }

    /// Pixel columns covered by grid column `x`
    pub fn column_span(&self, x: u32) -> Range<u32> {
        subdivide(x, self.grid_width, self.image.width())
    }

    /// Pixel rows covered by grid row `y`
    pub fn row_span(&self, y: u32) -> Range<u32> {
        subdivide(y, self.grid_height, self.image.height())
    }

    /// Accumulate the block at grid position `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` if the grid position lies outside the grid
    pub fn sample(&self, x: u32, y: u32) -> Result<PixelBlock> {
        if x >= self.grid_width || y >= self.grid_height {
            return Err(MosaicError::PixelOutOfBounds {
                x,
                y,
                dimensions: (self.grid_width, self.grid_height),
            });
        }

        let columns = self.column_span(x);
        let rows = self.row_span(y);
        let block_width = columns.end - columns.start;
        let block_height = rows.end - rows.start;
        let mut quadrants = [Quadrant::default(); 4];

        for j in rows.clone() {
            let is_top = 2 * (j - rows.start) < block_height;
            for i in columns.clone() {
                let is_left = 2 * (i - columns.start) < block_width;
                let [r, g, b, a] = self.image.pixel(i, j)?;
                let position = QuadrantPosition::locate(is_top, is_left);

                if let Some(quadrant) = quadrants.get_mut(position.index()) {
                    if a < self.alpha_threshold {
                        quadrant.transparent_count += 1;
                    } else {
                        quadrant.add([r, g, b]);
                    }
                }
            }
        }

        Ok(PixelBlock {
            grid_x: x,
            grid_y: y,
            columns,
            rows,
            quadrants,
        })
    }
}

// Linear subdivision; an empty span widens to the single pixel at its start
fn subdivide(index: u32, cells: u32, pixels: u32) -> Range<u32> {
    let start = (u64::from(index) * u64::from(pixels) / u64::from(cells)) as u32;
    let end = (u64::from(index + 1) * u64::from(pixels) / u64::from(cells)) as u32;
    if end > start {
        start..end
    } else {
        let start = start.min(pixels.saturating_sub(1));
        start..start + 1
    }
}

fn average_rgb(sum: [u64; 3], count: u64) -> Option<[u8; 3]> {
    if count == 0 {
        return None;
    }
    // Round half away from zero
    Some(sum.map(|s| ((s + count / 2) / count).min(255) as u8))
}
