//! Output tile descriptors and the row-major mosaic grid

use crate::io::configuration::EMPTY_TILE_COLOR;
use crate::io::error::{MosaicError, Result};
use ndarray::Array2;
use std::fmt;

/// Physical tile shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Full square plate
    Square,
    /// Round plate, also used for high-detail blocks
    Circle,
    /// Quarter-circle plate
    Quarter,
    /// Half-circle plate
    HalfCircle,
    /// No tile
    Empty,
}

impl Shape {
    /// Stable lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Quarter => "quarter",
            Self::HalfCircle => "halfCircle",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape, palette color and rotation chosen for one grid cell
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileDescriptor {
    /// Tile shape
    pub shape: Shape,
    /// Palette color as `#RRGGBB`
    pub color: String,
    /// Quarter turns, always in `0..4`
    pub rotation: u8,
}

impl TileDescriptor {
    /// Create a descriptor, reducing `rotation` modulo 4
    pub fn new(shape: Shape, color: impl Into<String>, rotation: u8) -> Self {
        Self {
            shape,
            color: color.into(),
            rotation: rotation % 4,
        }
    }

    /// The tile emitted for transparent blocks
    pub fn empty() -> Self {
        Self::new(Shape::Empty, EMPTY_TILE_COLOR, 0)
    }
}

/// Completed mosaic, one descriptor per block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Array2<TileDescriptor>,
}

impl TileGrid {
    /// Assemble a grid from row-major descriptors
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if a dimension is zero and
    /// `InvalidSourceData` if the tile count doesn't equal `width * height`
    pub fn from_row_major(width: u32, height: u32, tiles: Vec<TileDescriptor>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::InvalidDimensions { width, height });
        }
        let tiles = Array2::from_shape_vec((height as usize, width as usize), tiles).map_err(
            |shape_error| MosaicError::InvalidSourceData {
                reason: format!("tile count doesn't match {width}x{height} grid: {shape_error}"),
            },
        )?;
        Ok(Self { tiles })
    }

    /// Grid width in tiles
    pub fn width(&self) -> u32 {
        self.tiles.ncols() as u32
    }

    /// Grid height in tiles
    pub fn height(&self) -> u32 {
        self.tiles.nrows() as u32
    }

    /// Number of tiles
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; grids have at least one tile
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> Option<&TileDescriptor> {
        self.tiles.get((y as usize, x as usize))
    }

    /// Tiles in row-major order, index `y * width + x`
    pub fn iter(&self) -> impl Iterator<Item = &TileDescriptor> {
        self.tiles.iter()
    }

    /// Tiles with their `(x, y)` grid position
    pub fn indexed(&self) -> impl Iterator<Item = ((u32, u32), &TileDescriptor)> {
        self.tiles
            .indexed_iter()
            .map(|((row, col), tile)| ((col as u32, row as u32), tile))
    }

    /// Consume the grid into a row-major vector
    pub fn into_vec(self) -> Vec<TileDescriptor> {
        // Built by from_shape_vec, so the storage is already in standard order
        let (tiles, _offset) = self.tiles.into_raw_vec_and_offset();
        tiles
    }
}
