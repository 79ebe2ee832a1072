//! Calibration constants and runtime configuration defaults

use crate::algorithm::shapes::StrategyKind;
use crate::io::error::{MosaicError, Result, invalid_parameter};

// Grid defaults are a caller convention; the engine accepts any positive size
/// Default grid width in tiles
pub const DEFAULT_GRID_WIDTH: u32 = 32;
/// Default grid height in tiles
pub const DEFAULT_GRID_HEIGHT: u32 = 32;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: u32 = 10_000;

// Calibration constants, tuned empirically against Oklab distances
/// Maximum Oklab distance at which two quadrant colors may merge
pub const SIMILARITY_THRESHOLD: f64 = 0.05;
/// Transparent-pixel fraction above which a block becomes an empty tile
pub const TRANSPARENCY_CUTOFF: f64 = 0.95;
/// Pixels with alpha below this value count as transparent
pub const ALPHA_THRESHOLD: u8 = 128;
/// Upper bound on merge rounds in quadrant simplification
pub const MAX_SIMPLIFY_ROUNDS: u8 = 3;
/// Oklab chroma below which a color reads as grayscale
pub const GRAYSCALE_CHROMA: f64 = 0.02;

// Brightness strategy thresholds on normalized brightness
/// Below this every cell becomes a quarter
pub const BRIGHTNESS_QUARTER_MAX: f64 = 0.15;
/// Interior cells below this become circles, above it squares
pub const BRIGHTNESS_INTERIOR_CIRCLE_MAX: f64 = 0.25;
/// Edge cells below this become half circles
pub const BRIGHTNESS_EDGE_HALF_MAX: f64 = 0.5;
/// Edge cells below this become circles, above it squares
pub const BRIGHTNESS_EDGE_CIRCLE_MAX: f64 = 0.8;

/// Hex color emitted for empty tiles
pub const EMPTY_TILE_COLOR: &str = "#FFFFFF";

/// Palette records whose name contains this are dropped by default
pub const DEFAULT_EXCLUDED_NAME: &str = "Trans-Clear";

// Palette display view
/// Hue bucket width in degrees
pub const DISPLAY_HUE_BUCKET_DEGREES: f64 = 15.0;
/// Maximum colors per display row
pub const DISPLAY_MAX_PER_ROW: usize = 5;
/// HSL saturation (percent) below which a color goes to the gray bucket
pub const DISPLAY_GRAY_SATURATION: f64 = 10.0;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Default preview size of one tile in pixels
pub const DEFAULT_PREVIEW_SCALE: u32 = 16;
/// Maximum preview size of one tile in pixels
pub const MAX_PREVIEW_SCALE: u32 = 256;
/// File extensions accepted as input images
pub const INPUT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

/// Empirically tuned thresholds used by sampling and simplification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Maximum Oklab distance for merging two quadrant colors
    pub similarity_threshold: f64,
    /// Transparent fraction above which a block is blank
    pub transparency_cutoff: f64,
    /// Alpha below which a pixel is transparent
    pub alpha_threshold: u8,
    /// Maximum number of merge rounds
    pub max_rounds: u8,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            transparency_cutoff: TRANSPARENCY_CUTOFF,
            alpha_threshold: ALPHA_THRESHOLD,
            max_rounds: MAX_SIMPLIFY_ROUNDS,
        }
    }
}

impl Calibration {
    /// Check that every threshold lies in its meaningful range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the similarity threshold is negative or
    /// not finite, or the transparency cutoff falls outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite() || self.similarity_threshold < 0.0 {
            return Err(invalid_parameter(
                "similarity_threshold",
                &self.similarity_threshold,
                &"must be a finite, non-negative distance",
            ));
        }
        if !(0.0..=1.0).contains(&self.transparency_cutoff) {
            return Err(invalid_parameter(
                "transparency_cutoff",
                &self.transparency_cutoff,
                &"must be a fraction between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Parameters of one image-to-mosaic conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MosaicConfig {
    /// Output grid width in tiles
    pub grid_width: u32,
    /// Output grid height in tiles
    pub grid_height: u32,
    /// Shape selection strategy
    pub strategy: StrategyKind,
    /// Sampling and simplification thresholds
    pub calibration: Calibration,
    /// Process grid rows on the rayon thread pool
    pub parallel: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            strategy: StrategyKind::Quadrant,
            calibration: Calibration::default(),
            parallel: true,
        }
    }
}

impl MosaicConfig {
    /// Configuration for a grid of the given size with default calibration
    pub fn with_size(grid_width: u32, grid_height: u32) -> Self {
        Self {
            grid_width,
            grid_height,
            ..Self::default()
        }
    }

    /// Check grid dimensions and calibration
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` when either dimension is zero,
    /// `InvalidParameter` when a dimension exceeds [`MAX_GRID_DIMENSION`] or
    /// the calibration is out of range
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(MosaicError::InvalidDimensions {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let largest = self.grid_width.max(self.grid_height);
        if largest > MAX_GRID_DIMENSION {
            return Err(invalid_parameter(
                "grid size",
                &largest,
                &format!("must not exceed {MAX_GRID_DIMENSION}"),
            ));
        }
        self.calibration.validate()
    }
}
