//! Tests for the quadrant color reduction state machine

#[cfg(test)]
mod tests {
    use dotmosaic::analysis::palette::Palette;
    use dotmosaic::algorithm::simplifier::{
        Arrangement, QuadrantSimplifier, SimplifierState, SplitAxis, distinct_colors,
    };
    use dotmosaic::spatial::blocks::QuadrantPosition;

    const RED: usize = 0;
    const NEAR_RED: usize = 1;
    const DARK_RED: usize = 2;
    const BLUE: usize = 3;
    const GREEN: usize = 4;
    const WHITE: usize = 5;
    const NEAREST_RED: usize = 6;

    fn palette() -> Palette {
        let colors = [
            "#FF0000", "#F20000", "#E00000", "#0000FF", "#00FF00", "#FFFFFF", "#FA0000",
        ];
        let Ok(palette) = Palette::from_hex_list(&colors) else {
            unreachable!("test palette is valid");
        };
        palette
    }

    fn run(colors: [usize; 4], main: usize) -> SimplifierState {
        let palette = palette();
        QuadrantSimplifier::new(&palette, main, 0.05, 3).run(colors)
    }

    // Tests four equal quadrants are uniform immediately
    #[test]
    fn test_uniform() {
        assert_eq!(run([BLUE; 4], BLUE), SimplifierState::Uniform { color: BLUE });
    }

    // Tests a single odd quadrant becomes an outlier arrangement
    #[test]
    fn test_outlier() {
        assert_eq!(
            run([BLUE, RED, RED, RED], RED),
            SimplifierState::TwoColor(Arrangement::Outlier {
                outlier: QuadrantPosition::TopLeft,
                majority: RED,
                minority: BLUE,
            })
        );
        assert_eq!(
            run([WHITE, WHITE, WHITE, GREEN], WHITE),
            SimplifierState::TwoColor(Arrangement::Outlier {
                outlier: QuadrantPosition::BottomRight,
                majority: WHITE,
                minority: GREEN,
            })
        );
    }

    // Tests row and column splits
    #[test]
    fn test_splits() {
        assert_eq!(
            run([RED, RED, BLUE, BLUE], BLUE),
            SimplifierState::TwoColor(Arrangement::Split {
                axis: SplitAxis::Horizontal,
                first: RED,
                second: BLUE,
            })
        );
        assert_eq!(
            run([RED, BLUE, RED, BLUE], BLUE),
            SimplifierState::TwoColor(Arrangement::Split {
                axis: SplitAxis::Vertical,
                first: RED,
                second: BLUE,
            })
        );
    }

    // Tests a diagonal of dissimilar colors cannot be simplified
    #[test]
    fn test_diagonal_is_complex() {
        assert_eq!(run([RED, BLUE, BLUE, RED], RED), SimplifierState::Complex);
    }

    // Tests a diagonal of similar colors merges to uniform
    #[test]
    fn test_similar_diagonal_merges() {
        assert_eq!(
            run([RED, NEAR_RED, NEAR_RED, RED], RED),
            SimplifierState::Uniform { color: RED }
        );
    }

    // Tests merges keep the member closer to the main color
    #[test]
    fn test_merge_keeps_color_nearest_main() {
        let split = |top: usize| {
            SimplifierState::TwoColor(Arrangement::Split {
                axis: SplitAxis::Horizontal,
                first: top,
                second: BLUE,
            })
        };

        assert_eq!(run([RED, NEAR_RED, BLUE, BLUE], RED), split(RED));
        assert_eq!(run([RED, NEAR_RED, BLUE, BLUE], NEAR_RED), split(NEAR_RED));
    }

    // Tests colors past the similarity threshold are never merged
    #[test]
    fn test_threshold_blocks_merge() {
        let palette = palette();
        let colors = [RED, DARK_RED, BLUE, BLUE];

        let strict = QuadrantSimplifier::new(&palette, RED, 0.05, 3);
        assert_eq!(strict.run(colors), SimplifierState::Complex);

        let loose = QuadrantSimplifier::new(&palette, RED, 0.1, 3);
        assert!(matches!(loose.run(colors), SimplifierState::TwoColor(_)));
    }

    // Tests multi-round merging and the round cap
    #[test]
    fn test_rounds() {
        let palette = palette();
        let colors = [RED, NEAREST_RED, NEAR_RED, BLUE];

        let capped = QuadrantSimplifier::new(&palette, RED, 0.05, 1);
        assert_eq!(capped.run(colors), SimplifierState::Complex);

        let full = QuadrantSimplifier::new(&palette, RED, 0.05, 3);
        assert_eq!(
            full.run(colors),
            SimplifierState::TwoColor(Arrangement::Outlier {
                outlier: QuadrantPosition::BottomRight,
                majority: RED,
                minority: BLUE,
            })
        );
    }

    // Tests every quadrant combination terminates in at most max_rounds merges
    #[test]
    fn test_always_terminates() {
        let palette = palette();
        let simplifier = QuadrantSimplifier::new(&palette, RED, 0.05, 3);

        for code in 0..7usize.pow(4) {
            let colors = [code % 7, code / 7 % 7, code / 49 % 7, code / 343];
            let mut state = SimplifierState::Reducing { round: 0, colors };
            let mut steps = 0;
            while !state.is_terminal() {
                state = simplifier.transition(state);
                steps += 1;
                assert!(steps <= 4, "{colors:?} did not terminate");
            }
            assert_eq!(simplifier.run(colors), state);
        }
    }

    // Tests terminal states are fixed points
    #[test]
    fn test_transition_keeps_terminal_state() {
        let palette = palette();
        let simplifier = QuadrantSimplifier::new(&palette, RED, 0.05, 3);

        assert_eq!(simplifier.transition(SimplifierState::Complex), SimplifierState::Complex);
        let uniform = SimplifierState::Uniform { color: GREEN };
        assert_eq!(simplifier.transition(uniform), uniform);
    }

    // Tests distinct color order and distance lookups
    #[test]
    fn test_helpers() {
        assert_eq!(distinct_colors(&[BLUE, RED, BLUE, GREEN]), vec![BLUE, RED, GREEN]);

        let palette = palette();
        let simplifier = QuadrantSimplifier::new(&palette, RED, 0.05, 3);
        assert!(simplifier.distance(RED, RED).abs() < f64::EPSILON);
        assert!(simplifier.distance(RED, NEAR_RED) < 0.05);
        assert!(simplifier.distance(RED, 99).is_infinite());
    }
}
