//! Mathematical utilities for color science

/// Oklab perceptual color space conversion and distance
pub mod oklab;

pub use oklab::Oklab;
