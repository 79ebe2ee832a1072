//! Input/output, configuration and error handling

/// Command-line parsing and batch file processing
pub mod cli;
/// Calibration constants and conversion configuration
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Image decoding and preview export
pub mod image;
/// Palette files and the built-in palette
pub mod palette_file;
/// Progress bars for batch runs
pub mod progress;
/// Off-thread conversion requests and cancellation
pub mod task;
