//! Tests for command-line interface parsing and file processing

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dotmosaic::algorithm::shapes::StrategyKind;
    use dotmosaic::io::cli::{Cli, FileProcessor, descriptors_path, preview_path};
    use dotmosaic::io::configuration::{
        DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_PREVIEW_SCALE, MAX_PREVIEW_SCALE,
    };
    use dotmosaic::{MosaicConfig, MosaicError};
    use image::{Rgba, RgbaImage};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_image(path: &Path, color: [u8; 4]) {
        let img = RgbaImage::from_pixel(8, 8, Rgba(color));
        let Ok(()) = img.save(path) else {
            unreachable!("test image saved");
        };
    }

    fn run(args: &[&str]) -> Result<(), MosaicError> {
        let cli = Cli::parse_from(std::iter::once("program").chain(args.iter().copied()));
        FileProcessor::new(cli).process()
    }

    // Tests CLI parsing with only the required target argument
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "test.png"]);

        assert_eq!(cli.target, PathBuf::from("test.png"));
        assert_eq!(cli.width, DEFAULT_GRID_WIDTH);
        assert_eq!(cli.height, DEFAULT_GRID_HEIGHT);
        assert_eq!(cli.scale, DEFAULT_PREVIEW_SCALE);
        assert_eq!(cli.strategy, StrategyKind::Quadrant);
        assert!(cli.palette.is_none());
        assert_eq!(cli.mosaic_config(), MosaicConfig::default());
    }

    // Tests CLI parsing with all available arguments
    // Verified by swapping fields in mosaic_config
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "input.png",
            "-W",
            "48",
            "-H",
            "24",
            "--strategy",
            "brightness",
            "--palette",
            "colors.txt",
            "--similarity",
            "0.08",
            "--transparency",
            "0.5",
            "--alpha",
            "10",
            "--rounds",
            "5",
            "--scale",
            "4",
            "--sequential",
            "--quiet",
            "--no-skip",
        ]);

        let config = cli.mosaic_config();
        assert_eq!((config.grid_width, config.grid_height), (48, 24));
        assert_eq!(config.strategy, StrategyKind::Brightness);
        assert!((config.calibration.similarity_threshold - 0.08).abs() < f64::EPSILON);
        assert!((config.calibration.transparency_cutoff - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.calibration.alpha_threshold, 10);
        assert_eq!(config.calibration.max_rounds, 5);
        assert!(!config.parallel);
        assert_eq!(cli.palette, Some(PathBuf::from("colors.txt")));
        assert_eq!(cli.scale, 4);
        assert!(!cli.should_show_progress());
        assert!(!cli.skip_existing());
    }

    // Tests file skip and progress flags
    #[test]
    fn test_flag_defaults() {
        let cli = Cli::parse_from(["program", "test.png"]);
        assert!(cli.skip_existing());
        assert!(cli.should_show_progress());
    }

    // Tests output naming next to the input
    #[test]
    fn test_output_paths() {
        let input = Path::new("art/cat.jpeg");
        assert_eq!(preview_path(input), PathBuf::from("art/cat_mosaic.png"));
        assert_eq!(descriptors_path(input), PathBuf::from("art/cat_mosaic.csv"));
        assert_eq!(preview_path(Path::new("dog.png")), PathBuf::from("dog_mosaic.png"));
    }

    // Tests converting a single file writes the preview and descriptors
    #[test]
    fn test_process_single_file() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temp dir");
        };
        let input = dir.path().join("red.png");
        write_image(&input, [255, 0, 0, 255]);
        let palette = dir.path().join("palette.txt");
        let Ok(()) = std::fs::write(&palette, "#FF0000\n#0000FF\n") else {
            unreachable!("palette written");
        };

        let target = input.to_string_lossy().to_string();
        let palette_arg = palette.to_string_lossy().to_string();
        let result = run(&[target.as_str(), "-W", "2", "-H", "2", "--scale", "2", "-p", palette_arg.as_str(), "-q"]);
        assert!(result.is_ok());

        let Ok(csv) = std::fs::read_to_string(descriptors_path(&input)) else {
            unreachable!("descriptors written");
        };
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.lines().skip(1).all(|line| line.ends_with("square,#FF0000,0")));

        let Ok(preview) = image::open(preview_path(&input)) else {
            unreachable!("preview written");
        };
        assert_eq!((preview.width(), preview.height()), (4, 4));
    }

    // Tests directories skip earlier outputs and existing results
    #[test]
    fn test_process_directory() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temp dir");
        };
        write_image(&dir.path().join("a.png"), [0, 0, 255, 255]);
        write_image(&dir.path().join("b.png"), [0, 0, 0, 0]);
        let Ok(()) = std::fs::write(dir.path().join("notes.txt"), "not an image") else {
            unreachable!("file written");
        };

        let target = dir.path().to_string_lossy().to_string();
        assert!(run(&[target.as_str(), "-W", "2", "-H", "2", "-q"]).is_ok());

        assert!(preview_path(&dir.path().join("a.png")).exists());
        assert!(descriptors_path(&dir.path().join("b.png")).exists());
        assert!(!dir.path().join("a_mosaic_mosaic.png").exists());

        // Second run skips files that already have output
        let Ok(()) = std::fs::write(descriptors_path(&dir.path().join("a.png")), "stale") else {
            unreachable!("file written");
        };
        assert!(run(&[target.as_str(), "-W", "2", "-H", "2", "-q"]).is_ok());
        let Ok(stale) = std::fs::read_to_string(descriptors_path(&dir.path().join("a.png"))) else {
            unreachable!("file exists");
        };
        assert_eq!(stale, "stale");

        // Unless asked not to
        assert!(run(&[target.as_str(), "-W", "2", "-H", "2", "-q", "--no-skip"]).is_ok());
        let Ok(fresh) = std::fs::read_to_string(descriptors_path(&dir.path().join("a.png"))) else {
            unreachable!("file exists");
        };
        assert!(fresh.starts_with("x,y,shape,color,rotation"));
    }

    // Tests unusable targets and configurations
    #[test]
    fn test_process_errors() {
        let Ok(dir) = TempDir::new() else {
            unreachable!("temp dir");
        };
        let text = dir.path().join("notes.txt");
        let Ok(()) = std::fs::write(&text, "hello") else {
            unreachable!("file written");
        };

        let text_arg = text.to_string_lossy().to_string();
        assert!(matches!(
            run(&[text_arg.as_str(), "-q"]),
            Err(MosaicError::InvalidParameter { parameter: "target", .. })
        ));

        let missing = dir.path().join("missing.png").to_string_lossy().to_string();
        assert!(matches!(
            run(&[missing.as_str(), "-q"]),
            Err(MosaicError::InvalidParameter { parameter: "target", .. })
        ));

        let dir_arg = dir.path().to_string_lossy().to_string();
        assert!(matches!(
            run(&[dir_arg.as_str(), "-W", "0", "-q"]),
            Err(MosaicError::InvalidDimensions { .. })
        ));

        let huge = (MAX_PREVIEW_SCALE + 1).to_string();
        assert!(matches!(
            run(&[dir_arg.as_str(), "--scale", huge.as_str(), "-q"]),
            Err(MosaicError::InvalidParameter { parameter: "scale", .. })
        ));
    }
}
