//! Palette handling and color matching

/// Hue-grouped display layout of a palette
pub mod display;
/// Nearest-color search and color diagnostics
pub mod matcher;
/// Palette construction from raw color records
pub mod palette;
