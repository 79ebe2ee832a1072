//! Decoded RGBA pixel buffer consumed by block sampling

use crate::io::error::{MosaicError, Result};
use image::DynamicImage;
use ndarray::Array3;

/// An RGBA8 image held as a `(height, width, 4)` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pixels: Array3<u8>,
}

impl SourceImage {
    /// Wrap raw row-major RGBA bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero and
    /// `InvalidSourceData` if `data` doesn't hold exactly `width * height * 4` bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MosaicError::InvalidSourceData {
                reason: format!(
                    "expected {expected} bytes for a {width}x{height} RGBA image, got {}",
                    data.len()
                ),
            });
        }

        let pixels = Array3::from_shape_vec((height as usize, width as usize, 4), data).map_err(
            |shape_error| MosaicError::InvalidSourceData {
                reason: shape_error.to_string(),
            },
        )?;

        Ok(Self { pixels })
    }

    /// Convert any decoded image to RGBA8
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for an image with zero width or height
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Build an image from a closure producing each pixel
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if either dimension is zero
    pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y));
            }
        }
        Self::from_rgba(width, height, data)
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    /// RGBA value at column `x`, row `y`
    ///
    /// # Errors
    ///
    /// Returns `PixelOutOfBounds` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        let (row, col) = (y as usize, x as usize);
        let channel = |c: usize| self.pixels.get((row, col, c)).copied();

        match (channel(0), channel(1), channel(2), channel(3)) {
            (Some(r), Some(g), Some(b), Some(a)) => Ok([r, g, b, a]),
            _ => Err(MosaicError::PixelOutOfBounds {
                x,
                y,
                dimensions: (self.width(), self.height()),
            }),
        }
    }
}
