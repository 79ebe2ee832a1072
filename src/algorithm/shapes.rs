//! Shape and rotation selection for a sampled block
//!
//! Two strategies are provided: quadrant analysis, which drives the
//! simplifier, and a brightness-only heuristic for coarse previews. They
//! produce visibly different mosaics.

use crate::algorithm::simplifier::{Arrangement, QuadrantSimplifier, SimplifierState, SplitAxis};
use crate::analysis::matcher::ColorMatcher;
use crate::io::configuration::{
    BRIGHTNESS_EDGE_CIRCLE_MAX, BRIGHTNESS_EDGE_HALF_MAX, BRIGHTNESS_INTERIOR_CIRCLE_MAX,
    BRIGHTNESS_QUARTER_MAX, Calibration,
};
use crate::spatial::blocks::{PixelBlock, QuadrantPosition};
use crate::spatial::grid::{Shape, TileDescriptor};
use std::fmt;

/// Selects which [`ShapeStrategy`] a conversion uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StrategyKind {
    /// Quadrant color analysis with iterative simplification
    #[default]
    Quadrant,
    /// Brightness thresholds only
    Brightness,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quadrant => f.write_str("quadrant"),
            Self::Brightness => f.write_str("brightness"),
        }
    }
}

/// Where a block sits inside the output grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    /// Grid column
    pub x: u32,
    /// Grid row
    pub y: u32,
    /// Grid width in tiles
    pub grid_width: u32,
    /// Grid height in tiles
    pub grid_height: u32,
}

impl CellPosition {
    /// Whether the cell lies in the first or last row or column
    pub const fn is_edge(&self) -> bool {
        self.x == 0
            || self.y == 0
            || self.x + 1 >= self.grid_width
            || self.y + 1 >= self.grid_height
    }
}

/// Turns a non-blank block into a tile descriptor
pub trait ShapeStrategy: Send + Sync {
    /// Choose shape, color and rotation for `block`
    fn synthesize(&self, block: &PixelBlock, cell: CellPosition) -> TileDescriptor;
}

/// Build the strategy selected by `kind`
pub fn build_strategy(
    kind: StrategyKind,
    matcher: ColorMatcher,
    calibration: Calibration,
) -> Box<dyn ShapeStrategy> {
    match kind {
        StrategyKind::Quadrant => Box::new(QuadrantStrategy::new(matcher, calibration)),
        StrategyKind::Brightness => Box::new(BrightnessStrategy::new(matcher)),
    }
}

/// Rotation of a quarter tile whose odd corner is `outlier`
pub const fn quarter_rotation(outlier: QuadrantPosition) -> u8 {
    match outlier {
        QuadrantPosition::TopLeft => 2,
        QuadrantPosition::TopRight => 3,
        QuadrantPosition::BottomLeft => 1,
        QuadrantPosition::BottomRight => 0,
    }
}

// Compass order shared by both strategies: top, right, bottom, left
const TOP: u8 = 0;
const RIGHT: u8 = 1;
const BOTTOM: u8 = 2;
const LEFT: u8 = 3;

/// Quadrant analysis strategy
#[derive(Debug, Clone)]
pub struct QuadrantStrategy {
    matcher: ColorMatcher,
    calibration: Calibration,
}

impl QuadrantStrategy {
    /// Create the strategy
    pub const fn new(matcher: ColorMatcher, calibration: Calibration) -> Self {
        Self {
            matcher,
            calibration,
        }
    }

    /// Map a terminal simplifier state to a descriptor
    pub fn describe(&self, state: SimplifierState, simplifier: &QuadrantSimplifier<'_>, main: usize) -> TileDescriptor {
        let hex = |index: usize| {
            self.matcher
                .palette()
                .get(index)
                .map(|entry| entry.hex.clone())
                .unwrap_or_default()
        };

        match state {
            SimplifierState::Uniform { color } => TileDescriptor::new(Shape::Square, hex(color), 0),
            SimplifierState::TwoColor(Arrangement::Outlier {
                outlier, majority, ..
            }) => TileDescriptor::new(Shape::Quarter, hex(majority), quarter_rotation(outlier)),
            SimplifierState::TwoColor(Arrangement::Split {
                axis,
                first,
                second,
            }) => {
                // The half nearer the main color is the tile; rotation points at the other half
                let first_is_main = simplifier.distance(first, main) <= simplifier.distance(second, main);
                let (color, rotation) = match (axis, first_is_main) {
                    (SplitAxis::Horizontal, true) => (first, BOTTOM),
                    (SplitAxis::Horizontal, false) => (second, TOP),
                    (SplitAxis::Vertical, true) => (first, RIGHT),
                    (SplitAxis::Vertical, false) => (second, LEFT),
                };
                TileDescriptor::new(Shape::HalfCircle, hex(color), rotation)
            }
            SimplifierState::Complex | SimplifierState::Reducing { .. } => {
                TileDescriptor::new(Shape::Circle, hex(main), 0)
            }
        }
    }
}

impl ShapeStrategy for QuadrantStrategy {
    fn synthesize(&self, block: &PixelBlock, _cell: CellPosition) -> TileDescriptor {
        let (Some(main_rgb), Some(quadrant_rgb)) = (block.main_color(), block.quadrant_colors()) else {
            return TileDescriptor::empty();
        };

        let main = self.matcher.nearest_index(main_rgb);
        let colors = quadrant_rgb.map(|rgb| self.matcher.nearest_index(rgb));

        let simplifier = QuadrantSimplifier::new(
            self.matcher.palette(),
            main,
            self.calibration.similarity_threshold,
            self.calibration.max_rounds,
        );
        let state = simplifier.run(colors);
        self.describe(state, &simplifier, main)
    }
}

/// Brightness-threshold strategy for coarse previews
#[derive(Debug, Clone)]
pub struct BrightnessStrategy {
    matcher: ColorMatcher,
}

/// Mean brightness of the four block halves, normalized to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfBrightness {
    /// Top half
    pub top: f64,
    /// Right half
    pub right: f64,
    /// Bottom half
    pub bottom: f64,
    /// Left half
    pub left: f64,
}

impl HalfBrightness {
    /// Measure a block; halves without opaque pixels take `fallback`
    pub fn measure(block: &PixelBlock, fallback: f64) -> Self {
        let half = |a: QuadrantPosition, b: QuadrantPosition| {
            let (qa, qb) = (block.quadrant(a), block.quadrant(b));
            let count = qa.opaque_count + qb.opaque_count;
            if count == 0 {
                fallback
            } else {
                (qa.brightness_sum() + qb.brightness_sum()) / count as f64 / 255.0
            }
        };

        Self {
            top: half(QuadrantPosition::TopLeft, QuadrantPosition::TopRight),
            right: half(QuadrantPosition::TopRight, QuadrantPosition::BottomRight),
            bottom: half(QuadrantPosition::BottomLeft, QuadrantPosition::BottomRight),
            left: half(QuadrantPosition::TopLeft, QuadrantPosition::BottomLeft),
        }
    }

    /// Direction of the darkest half
    pub fn darkest_side(&self) -> u8 {
        first_extreme(&[self.top, self.right, self.bottom, self.left], |a, b| a < b)
    }

    /// Brightest corner in quarter-rotation order: BR, BL, TL, TR
    pub fn brightest_corner(&self) -> u8 {
        let corners = [
            f64::midpoint(self.right, self.bottom),
            f64::midpoint(self.left, self.bottom),
            f64::midpoint(self.left, self.top),
            f64::midpoint(self.right, self.top),
        ];
        first_extreme(&corners, |a, b| a > b)
    }
}

// Index of the first value that beats every earlier one
fn first_extreme(values: &[f64; 4], beats: impl Fn(f64, f64) -> bool) -> u8 {
    let mut best = 0u8;
    let mut best_value = values[0];
    for (index, &value) in values.iter().enumerate().skip(1) {
        if beats(value, best_value) {
            best = index as u8;
            best_value = value;
        }
    }
    best
}

/// Shape for a normalized brightness, with separate thresholds for edge cells
pub fn brightness_shape(brightness: f64, is_edge: bool) -> Shape {
    if brightness < BRIGHTNESS_QUARTER_MAX {
        Shape::Quarter
    } else if is_edge {
        if brightness < BRIGHTNESS_EDGE_HALF_MAX {
            Shape::HalfCircle
        } else if brightness < BRIGHTNESS_EDGE_CIRCLE_MAX {
            Shape::Circle
        } else {
            Shape::Square
        }
    } else if brightness < BRIGHTNESS_INTERIOR_CIRCLE_MAX {
        Shape::Circle
    } else {
        Shape::Square
    }
}

impl BrightnessStrategy {
    /// Create the strategy
    pub const fn new(matcher: ColorMatcher) -> Self {
        Self { matcher }
    }
}

impl ShapeStrategy for BrightnessStrategy {
    fn synthesize(&self, block: &PixelBlock, cell: CellPosition) -> TileDescriptor {
        let Some(main_rgb) = block.main_color() else {
            return TileDescriptor::empty();
        };

        let opaque = block.opaque_count() as f64;
        let brightness = block.quadrants.iter().map(|q| q.brightness_sum()).sum::<f64>() / opaque / 255.0;
        let shape = brightness_shape(brightness, cell.is_edge());

        let rotation = match shape {
            Shape::HalfCircle => HalfBrightness::measure(block, brightness).darkest_side(),
            Shape::Quarter => HalfBrightness::measure(block, brightness).brightest_corner(),
            _ => 0,
        };

        let Some(entry) = self.matcher.nearest(main_rgb) else {
            return TileDescriptor::empty();
        };
        TileDescriptor::new(shape, entry.hex.clone(), rotation)
    }
}
