//! Image-to-mosaic quantization for brick tile art
//!
//! An image is divided into a fixed grid of blocks. Each block is matched
//! against a physical color palette in the Oklab perceptual space and turned
//! into a tile descriptor: a shape (square, circle, quarter, half circle or
//! empty), a palette color and a rotation.

#![forbid(unsafe_code)]

/// Quadrant simplification, shape selection and grid synthesis
pub mod algorithm;
/// Palette construction and perceptual color matching
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Color-space mathematics
pub mod math;
/// Pixel buffers, block sampling and the output grid
pub mod spatial;

pub use algorithm::executor::{GridSynthesizer, image_to_grid};
pub use analysis::palette::{Palette, PaletteBuilder, RawColor};
pub use io::configuration::MosaicConfig;
pub use io::error::{MosaicError, Result};
pub use spatial::grid::{Shape, TileDescriptor, TileGrid};
