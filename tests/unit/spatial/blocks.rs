//! Tests for block subdivision and quadrant accumulation

#[cfg(test)]
mod tests {
    use dotmosaic::MosaicError;
    use dotmosaic::spatial::SourceImage;
    use dotmosaic::spatial::blocks::{BlockSampler, QuadrantPosition};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn image(width: u32, height: u32, pixel: impl FnMut(u32, u32) -> [u8; 4]) -> SourceImage {
        let Ok(image) = SourceImage::from_fn(width, height, pixel) else {
            unreachable!("test images have non-zero size");
        };
        image
    }

    fn sampler(image: &SourceImage, width: u32, height: u32) -> BlockSampler<'_> {
        let Ok(sampler) = BlockSampler::new(image, width, height, 128) else {
            unreachable!("test grids have non-zero size");
        };
        sampler
    }

    // Tests quadrant index order
    #[test]
    fn test_quadrant_positions() {
        for (index, position) in QuadrantPosition::ALL.iter().enumerate() {
            assert_eq!(position.index(), index);
            assert_eq!(QuadrantPosition::from_index(index), Some(*position));
        }
        assert_eq!(QuadrantPosition::from_index(4), None);
    }

    // Tests spans tile the image without gaps or overlap
    #[test]
    fn test_spans_partition_image() {
        let source = image(10, 7, |_, _| RED);
        let sampler = sampler(&source, 3, 4);

        let mut next = 0;
        for x in 0..3 {
            let span = sampler.column_span(x);
            assert_eq!(span.start, next);
            next = span.end;
        }
        assert_eq!(next, 10);

        assert_eq!(sampler.row_span(0), 0..1);
        assert_eq!(sampler.row_span(3), 5..7);
    }

    // Tests grids finer than the image still cover one pixel per block
    #[test]
    fn test_empty_span_widens() {
        let source = image(2, 2, |_, _| RED);
        let sampler = sampler(&source, 4, 4);

        for x in 0..4 {
            let span = sampler.column_span(x);
            assert_eq!(span.end - span.start, 1);
            assert!(span.end <= 2);
        }
        assert_eq!(sampler.column_span(0), 0..1);
    }

    // Tests quadrant split at the block midlines
    #[test]
    fn test_quadrant_assignment() {
        let source = image(2, 2, |x, y| match (x, y) {
            (0, 0) => [255, 0, 0, 255],
            (1, 0) => [0, 255, 0, 255],
            (0, 1) => [0, 0, 255, 255],
            _ => [255, 255, 255, 255],
        });
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.quadrant_colors(), Some([
            [255, 0, 0],
            [0, 255, 0],
            [0, 0, 255],
            [255, 255, 255],
        ]));
        assert_eq!(block.quadrant(QuadrantPosition::BottomLeft).opaque_count, 1);
        assert_eq!(block.pixel_count(), 4);
    }

    // Tests odd-sized blocks put the middle column on the left
    #[test]
    fn test_odd_block_midline() {
        let source = image(3, 1, |x, _| if x == 0 { RED } else { BLUE });
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.quadrant(QuadrantPosition::TopLeft).opaque_count, 2);
        assert_eq!(block.quadrant(QuadrantPosition::TopRight).opaque_count, 1);
        assert_eq!(block.quadrant(QuadrantPosition::BottomLeft).opaque_count, 0);
    }

    // Tests averages round half up
    #[test]
    fn test_main_color_rounding() {
        let source = image(2, 1, |x, _| if x == 0 { [0, 0, 0, 255] } else { [255, 1, 3, 255] });
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.main_color(), Some([128, 1, 2]));
    }

    // Tests transparent pixels are counted but never averaged
    #[test]
    fn test_transparency_counts() {
        let source = image(2, 2, |x, y| if x == 0 && y == 0 { RED } else { CLEAR });
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.opaque_count(), 1);
        assert_eq!(block.transparent_count(), 3);
        assert!((block.transparent_fraction() - 0.75).abs() < f64::EPSILON);
        assert_eq!(block.main_color(), Some([255, 0, 0]));
        // Empty quadrants fall back to the block average
        assert_eq!(block.quadrant_colors(), Some([[255, 0, 0]; 4]));
        assert!(!block.is_blank(0.95));
        assert!(block.is_blank(0.5));
    }

    // Tests a block sitting exactly on the cutoff is kept, one more clear pixel blanks it
    #[test]
    fn test_transparency_cutoff_is_strict() {
        let corner = |x: u32, y: u32| if x == 0 && y == 0 { RED } else { CLEAR };

        let at_cutoff = image(5, 4, corner);
        let Ok(block) = sampler(&at_cutoff, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };
        assert_eq!(block.transparent_count(), 19);
        assert!((block.transparent_fraction() - 0.95).abs() < f64::EPSILON);
        assert!(!block.is_blank(0.95));

        let past_cutoff = image(7, 3, corner);
        let Ok(block) = sampler(&past_cutoff, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };
        assert_eq!(block.transparent_count(), 20);
        assert!(block.is_blank(0.95));
    }

    // Tests the alpha threshold boundary
    #[test]
    fn test_alpha_threshold() {
        let source = image(2, 1, |x, _| if x == 0 { [1, 1, 1, 127] } else { [1, 1, 1, 128] });
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.transparent_count(), 1);
        assert_eq!(block.opaque_count(), 1);
    }

    // Tests a fully transparent block is blank at any cutoff
    #[test]
    fn test_fully_transparent_block() {
        let source = image(2, 2, |_, _| CLEAR);
        let Ok(block) = sampler(&source, 1, 1).sample(0, 0) else {
            unreachable!("in-range block");
        };

        assert_eq!(block.main_color(), None);
        assert_eq!(block.quadrant_colors(), None);
        assert!(block.is_blank(1.0));
    }

    // Tests sampler argument validation
    #[test]
    fn test_sampler_errors() {
        let source = image(2, 2, |_, _| RED);
        assert!(matches!(
            BlockSampler::new(&source, 0, 1, 128),
            Err(MosaicError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            sampler(&source, 2, 2).sample(2, 0),
            Err(MosaicError::PixelOutOfBounds { .. })
        ));
    }
}
