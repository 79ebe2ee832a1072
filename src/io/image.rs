//! Image decoding and PNG preview export

use crate::analysis::palette::parse_hex;
use crate::io::configuration::MAX_PREVIEW_SCALE;
use crate::io::error::{MosaicError, Result, decode_error, invalid_parameter};
use crate::spatial::grid::{Shape, TileDescriptor, TileGrid};
use crate::spatial::source::SourceImage;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

/// Decode an image file into an RGBA buffer
///
/// # Errors
///
/// Returns `ImageDecode` carrying the path if the file can't be opened or
/// decoded, and `InvalidDimensions` for an empty image
pub fn decode_path<P: AsRef<Path>>(path: P) -> Result<SourceImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| decode_error(path.display().to_string(), e))?;
    SourceImage::from_dynamic(&img)
}

/// Decode an encoded image held in memory
///
/// `source_id` names the data in error messages.
///
/// # Errors
///
/// Returns `ImageDecode` if the format is unknown or the data is corrupt, and
/// `InvalidDimensions` for an empty image
pub fn decode_bytes(source_id: &str, data: &[u8]) -> Result<SourceImage> {
    let img = image::load_from_memory(data).map_err(|e| decode_error(source_id, e))?;
    SourceImage::from_dynamic(&img)
}

// Whether the sub-pixel centre (px, py) of a `scale`-sized cell is covered
fn covers(tile: &TileDescriptor, px: f64, py: f64, scale: f64) -> bool {
    let half = scale / 2.0;
    match tile.shape {
        Shape::Empty => false,
        Shape::Square => true,
        Shape::Circle => (px - half).hypot(py - half) <= half,
        Shape::Quarter => {
            // Pivot sits opposite the corner the rotation names (BR, BL, TL, TR)
            let (cx, cy) = match tile.rotation {
                0 => (0.0, 0.0),
                1 => (scale, 0.0),
                2 => (scale, scale),
                _ => (0.0, scale),
            };
            (px - cx).hypot(py - cy) <= scale
        }
        Shape::HalfCircle => {
            // Dome grows from the edge opposite the rotation side
            let (cx, cy) = match tile.rotation {
                0 => (half, scale),
                1 => (0.0, half),
                2 => (half, 0.0),
                _ => (scale, half),
            };
            (px - cx).hypot(py - cy) <= half
        }
    }
}

/// Check a preview scale is between one and [`MAX_PREVIEW_SCALE`] pixels
///
/// # Errors
///
/// Returns `InvalidParameter` for a scale outside that range
pub fn validate_scale(scale: u32) -> Result<()> {
    if scale == 0 {
        return Err(invalid_parameter("scale", &scale, &"must be at least one pixel"));
    }
    if scale > MAX_PREVIEW_SCALE {
        return Err(invalid_parameter(
            "scale",
            &scale,
            &format!("must not exceed {MAX_PREVIEW_SCALE}"),
        ));
    }
    Ok(())
}

/// Rasterize a grid, `scale` pixels per tile, on a transparent background
///
/// # Errors
///
/// Returns `InvalidParameter` for a scale rejected by [`validate_scale`] or
/// one that overflows the image size, and `InvalidColor` if a tile carries a
/// malformed color
pub fn render_preview(grid: &TileGrid, scale: u32) -> Result<RgbaImage> {
    validate_scale(scale)?;

    let (Some(width), Some(height)) = (grid.width().checked_mul(scale), grid.height().checked_mul(scale))
    else {
        return Err(invalid_parameter(
            "scale",
            &scale,
            &format!("a {}x{} grid overflows the preview size", grid.width(), grid.height()),
        ));
    };

    let mut img: RgbaImage = ImageBuffer::new(width, height);
    let cell = f64::from(scale);

    for ((x, y), tile) in grid.indexed() {
        if tile.shape == Shape::Empty {
            continue;
        }
        let [r, g, b] = parse_hex(&tile.color)?;
        let color = Rgba([r, g, b, 255]);

        for dy in 0..scale {
            for dx in 0..scale {
                if covers(tile, f64::from(dx) + 0.5, f64::from(dy) + 0.5, cell) {
                    img.put_pixel(x * scale + dx, y * scale + dy, color);
                }
            }
        }
    }

    Ok(img)
}

/// Render a grid preview and save it as PNG
///
/// # Errors
///
/// Returns an error if:
/// - The scale is zero or a tile color is malformed
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_preview_png(grid: &TileGrid, scale: u32, output_path: &Path) -> Result<()> {
    let img = render_preview(grid, scale)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| MosaicError::ImageExport {
            path: output_path.into(),
            source: e,
        })?;

    Ok(())
}

/// Write tile descriptors as CSV with a `x,y,shape,color,rotation` header
///
/// # Errors
///
/// Returns `FileSystem` if the parent directory can't be created or the file
/// can't be written
pub fn export_descriptors_csv(grid: &TileGrid, output_path: &Path) -> Result<()> {
    let mut csv = String::from("x,y,shape,color,rotation\n");
    for ((x, y), tile) in grid.indexed() {
        csv.push_str(&format!("{x},{y},{},{},{}\n", tile.shape, tile.color, tile.rotation));
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    std::fs::write(output_path, csv).map_err(|e| MosaicError::FileSystem {
        path: output_path.to_path_buf(),
        operation: "write descriptors",
        source: e,
    })
}
