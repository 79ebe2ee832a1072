//! Spatial data structures
//!
//! This module contains spatial-related functionality including:
//! - The decoded source pixel buffer
//! - Block and quadrant sampling
//! - The output tile grid

/// Block partitioning and quadrant accumulation
pub mod blocks;
/// Output tile descriptors and grid
pub mod grid;
/// Decoded RGBA source image
pub mod source;

pub use grid::{Shape, TileDescriptor, TileGrid};
pub use source::SourceImage;
