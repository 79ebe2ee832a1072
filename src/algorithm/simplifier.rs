//! Bounded reduction of four quadrant colors to a renderable pattern
//!
//! Each quadrant of a block is matched to a palette color independently. Only
//! patterns with at most two distinct colors map onto a tile shape, so the
//! simplifier repeatedly merges the most similar pair of colors until the
//! pattern is uniform or a clean two-color arrangement, or gives up and
//! reports the block as complex.
//!
//! The reduction is an explicit state machine. Every `Reducing` transition
//! either ends in a terminal state or strictly lowers the number of distinct
//! colors and bumps the round counter, and the counter is capped, so
//! [`QuadrantSimplifier::run`] always terminates.

use crate::analysis::palette::Palette;
use crate::spatial::blocks::QuadrantPosition;

/// Palette indices of the four quadrants in TL, TR, BL, BR order
pub type QuadrantColorSet = [usize; 4];

/// Orientation of a two-by-two color split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Left column against right column
    Vertical,
    /// Top row against bottom row
    Horizontal,
}

/// Spatial layout of a block with exactly two distinct colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Three quadrants share a color, one differs
    Outlier {
        /// Where the odd quadrant sits
        outlier: QuadrantPosition,
        /// Color of the three matching quadrants
        majority: usize,
        /// Color of the odd quadrant
        minority: usize,
    },
    /// Two halves split along a row or column
    Split {
        /// Direction of the dividing line
        axis: SplitAxis,
        /// Color of the top (horizontal) or left (vertical) half
        first: usize,
        /// Color of the bottom (horizontal) or right (vertical) half
        second: usize,
    },
}

/// States of the quadrant reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplifierState {
    /// Still merging; `round` counts the merges performed so far
    Reducing {
        /// Merges performed so far
        round: u8,
        /// Current quadrant colors
        colors: QuadrantColorSet,
    },
    /// All quadrants share one color
    Uniform {
        /// The shared palette index
        color: usize,
    },
    /// Two colors in a shape-representable layout
    TwoColor(Arrangement),
    /// Irreducible detail
    Complex,
}

impl SimplifierState {
    /// Whether the reduction has finished
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Reducing { .. })
    }
}

/// Merges similar quadrant colors for one block
#[derive(Debug)]
pub struct QuadrantSimplifier<'a> {
    palette: &'a Palette,
    main: usize,
    similarity_threshold: f64,
    max_rounds: u8,
}

impl<'a> QuadrantSimplifier<'a> {
    /// Create a simplifier for one block
    ///
    /// `main` is the palette index matched from the block's overall average
    /// color; merges keep whichever color of a pair lies closer to it.
    pub const fn new(palette: &'a Palette, main: usize, similarity_threshold: f64, max_rounds: u8) -> Self {
        Self {
            palette,
            main,
            similarity_threshold,
            max_rounds,
        }
    }

    /// Drive the state machine from `colors` to a terminal state
    pub fn run(&self, colors: QuadrantColorSet) -> SimplifierState {
        let mut state = SimplifierState::Reducing { round: 0, colors };

        // One evaluation per merge plus the final classification
        for _ in 0..=self.max_rounds {
            state = self.transition(state);
            if state.is_terminal() {
                return state;
            }
        }

        SimplifierState::Complex
    }

    /// Advance the state machine by one step
    pub fn transition(&self, state: SimplifierState) -> SimplifierState {
        let SimplifierState::Reducing { round, colors } = state else {
            return state;
        };

        let distinct = distinct_colors(&colors);
        match distinct.as_slice() {
            [color] => return SimplifierState::Uniform { color: *color },
            [a, b] => {
                if let Some(arrangement) = classify_two(&colors, *a, *b) {
                    return SimplifierState::TwoColor(arrangement);
                }
                // Diagonal splits have no half-circle form, try merging instead
            }
            _ => {}
        }

        if round >= self.max_rounds {
            return SimplifierState::Complex;
        }

        match self.closest_pair(&distinct) {
            Some((a, b, distance)) if distance < self.similarity_threshold => {
                SimplifierState::Reducing {
                    round: round + 1,
                    colors: self.merge(colors, a, b),
                }
            }
            _ => SimplifierState::Complex,
        }
    }

    /// Oklab distance between two palette entries
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        match (self.palette.get(a), self.palette.get(b)) {
            (Some(first), Some(second)) => first.oklab.distance(&second.oklab),
            _ => f64::INFINITY,
        }
    }

    // Earliest pair wins ties, pairs ordered by first appearance
    fn closest_pair(&self, distinct: &[usize]) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;

        for (i, &a) in distinct.iter().enumerate() {
            for &b in distinct.iter().skip(i + 1) {
                let distance = self.distance(a, b);
                if best.is_none_or(|(_, _, current)| distance < current) {
                    best = Some((a, b, distance));
                }
            }
        }

        best
    }

    // Replace the member farther from the main color with the closer one
    fn merge(&self, colors: QuadrantColorSet, a: usize, b: usize) -> QuadrantColorSet {
        let (keep, drop) = if self.distance(b, self.main) < self.distance(a, self.main) {
            (b, a)
        } else {
            (a, b)
        };
        colors.map(|color| if color == drop { keep } else { color })
    }
}

/// Distinct palette indices in order of first appearance
pub fn distinct_colors(colors: &QuadrantColorSet) -> Vec<usize> {
    let mut distinct = Vec::with_capacity(4);
    for &color in colors {
        if !distinct.contains(&color) {
            distinct.push(color);
        }
    }
    distinct
}

// Returns None for diagonal 2/2 splits
fn classify_two(colors: &QuadrantColorSet, a: usize, b: usize) -> Option<Arrangement> {
    let count_a = colors.iter().filter(|&&c| c == a).count();

    match count_a {
        1 | 3 => {
            let (majority, minority) = if count_a == 3 { (a, b) } else { (b, a) };
            let outlier = colors
                .iter()
                .position(|&c| c == minority)
                .and_then(QuadrantPosition::from_index)?;
            Some(Arrangement::Outlier {
                outlier,
                majority,
                minority,
            })
        }
        2 => match *colors {
            [tl, tr, bl, br] if tl == tr && bl == br => Some(Arrangement::Split {
                axis: SplitAxis::Horizontal,
                first: tl,
                second: bl,
            }),
            [tl, tr, bl, br] if tl == bl && tr == br => Some(Arrangement::Split {
                axis: SplitAxis::Vertical,
                first: tl,
                second: tr,
            }),
            _ => None,
        },
        _ => None,
    }
}
