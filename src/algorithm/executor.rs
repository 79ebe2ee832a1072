//! Grid synthesis: sample, simplify and describe every block in row-major order

use crate::algorithm::shapes::{CellPosition, ShapeStrategy, build_strategy};
use crate::analysis::matcher::ColorMatcher;
use crate::analysis::palette::Palette;
use crate::io::configuration::MosaicConfig;
use crate::io::error::{MosaicError, Result};
use crate::io::task::CancellationToken;
use crate::spatial::blocks::BlockSampler;
use crate::spatial::grid::{TileDescriptor, TileGrid};
use crate::spatial::source::SourceImage;
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use std::time::Instant;

/// Converts decoded images into tile grids for one palette and configuration
///
/// Blocks are independent, so rows may be processed on the rayon pool; the
/// output is always assembled in row-major order.
pub struct GridSynthesizer {
    config: MosaicConfig,
    strategy: Box<dyn ShapeStrategy>,
}

impl GridSynthesizer {
    /// Create a synthesizer after validating `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` or `InvalidParameter` if the configuration
    /// fails validation
    pub fn new(palette: &Palette, config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        let strategy = build_strategy(config.strategy, ColorMatcher::new(palette), config.calibration);
        Ok(Self { config, strategy })
    }

    /// The configuration in use
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Describe the single block at grid position `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` if `(x, y)` is outside the grid
    pub fn synthesize_cell(&self, image: &SourceImage, x: u32, y: u32) -> Result<TileDescriptor> {
        let sampler = self.sampler(image)?;
        self.describe(&sampler, x, y)
    }

    /// Convert a whole image
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` on an internal sampling fault
    pub fn synthesize(&self, image: &SourceImage) -> Result<TileGrid> {
        self.synthesize_with(image, &CancellationToken::new(), |_| {})
    }

    /// Convert a whole image, checking `cancel` before each row and calling
    /// `on_row` with the row index once it's done
    ///
    /// Rows may complete out of order when running in parallel.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fires before the last row starts;
    /// no partial grid is returned
    pub fn synthesize_with<F>(
        &self,
        image: &SourceImage,
        cancel: &CancellationToken,
        on_row: F,
    ) -> Result<TileGrid>
    where
        F: Fn(u32) + Sync,
    {
        let start = Instant::now();
        let sampler = self.sampler(image)?;
        let (width, height) = (self.config.grid_width, self.config.grid_height);

        let process_row = |y: u32| -> Result<Vec<TileDescriptor>> {
            if cancel.is_cancelled() {
                return Err(MosaicError::Cancelled);
            }
            let row = (0..width)
                .map(|x| self.describe(&sampler, x, y))
                .collect::<Result<Vec<_>>>()?;
            on_row(y);
            Ok(row)
        };

        let rows: Vec<Vec<TileDescriptor>> = if self.config.parallel {
            (0..height).into_par_iter().map(process_row).collect::<Result<_>>()?
        } else {
            (0..height).map(process_row).collect::<Result<_>>()?
        };

        log::debug!(
            "Synthesized {width}x{height} grid from {}x{} image with {} strategy in {:.2?}",
            image.width(),
            image.height(),
            self.config.strategy,
            start.elapsed()
        );

        TileGrid::from_row_major(width, height, rows.into_iter().flatten().collect())
    }

    fn sampler<'a>(&self, image: &'a SourceImage) -> Result<BlockSampler<'a>> {
        BlockSampler::new(
            image,
            self.config.grid_width,
            self.config.grid_height,
            self.config.calibration.alpha_threshold,
        )
    }

    fn describe(&self, sampler: &BlockSampler<'_>, x: u32, y: u32) -> Result<TileDescriptor> {
        let block = sampler.sample(x, y)?;

        // Blank blocks are a fixed outcome for every strategy
        if block.is_blank(self.config.calibration.transparency_cutoff) {
            return Ok(TileDescriptor::empty());
        }

        let cell = CellPosition {
            x,
            y,
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
        };
        Ok(self.strategy.synthesize(&block, cell))
    }
}

/// Convert `image` into a tile grid in one call
///
/// # Errors
///
/// Returns `InvalidDimensions` or `InvalidParameter` for a bad configuration
pub fn image_to_grid(image: &SourceImage, palette: &Palette, config: MosaicConfig) -> Result<TileGrid> {
    GridSynthesizer::new(palette, config)?.synthesize(image)
}
