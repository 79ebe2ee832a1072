//! Command-line interface for batch image-to-mosaic conversion

use crate::algorithm::executor::GridSynthesizer;
use crate::algorithm::shapes::StrategyKind;
use crate::analysis::palette::Palette;
use crate::io::configuration::{
    ALPHA_THRESHOLD, Calibration, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_PREVIEW_SCALE,
    DISPLAY_HUE_BUCKET_DEGREES, DISPLAY_MAX_PER_ROW, INPUT_EXTENSIONS, MAX_SIMPLIFY_ROUNDS, MosaicConfig, OUTPUT_SUFFIX, SIMILARITY_THRESHOLD,
    TRANSPARENCY_CUTOFF,
};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::{decode_path, export_descriptors_csv, export_preview_png, validate_scale};
use crate::io::palette_file::{builtin_palette, load_palette_file};
use crate::io::progress::ProgressManager;
use crate::io::task::CancellationToken;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "dotmosaic")]
#[command(
    author,
    version,
    about = "Convert images into brick mosaic tile grids"
)]
/// Command-line arguments for the mosaic tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Grid width in tiles
    #[arg(short = 'W', long, default_value_t = DEFAULT_GRID_WIDTH)]
    pub width: u32,

    /// Grid height in tiles
    #[arg(short = 'H', long, default_value_t = DEFAULT_GRID_HEIGHT)]
    pub height: u32,

    /// Shape selection strategy
    #[arg(short, long, value_enum, default_value_t = StrategyKind::Quadrant)]
    pub strategy: StrategyKind,

    /// Palette file with hex colors (newline or comma separated)
    #[arg(short, long)]
    pub palette: Option<PathBuf>,

    /// Maximum Oklab distance for merging quadrant colors
    #[arg(long, default_value_t = SIMILARITY_THRESHOLD)]
    pub similarity: f64,

    /// Transparent fraction above which a block becomes empty
    #[arg(long, default_value_t = TRANSPARENCY_CUTOFF)]
    pub transparency: f64,

    /// Alpha value below which a pixel is transparent
    #[arg(long, default_value_t = ALPHA_THRESHOLD)]
    pub alpha: u8,

    /// Maximum quadrant merge rounds
    #[arg(long, default_value_t = MAX_SIMPLIFY_ROUNDS)]
    pub rounds: u8,

    /// Preview size of one tile in pixels
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SCALE)]
    pub scale: u32,

    /// Process rows on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Conversion configuration assembled from the flags
    pub const fn mosaic_config(&self) -> MosaicConfig {
        MosaicConfig {
            grid_width: self.width,
            grid_height: self.height,
            strategy: self.strategy,
            calibration: Calibration {
                similarity_threshold: self.similarity,
                transparency_cutoff: self.transparency,
                alpha_threshold: self.alpha,
                max_rounds: self.rounds,
            },
            parallel: !self.sequential,
        }
    }
}

/// Orchestrates batch conversion of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the palette or configuration is invalid, the
    /// target is unusable, or any file fails to convert
    pub fn process(&mut self) -> Result<()> {
        let palette = self.load_palette()?;
        let synthesizer = GridSynthesizer::new(&palette, self.cli.mosaic_config())?;
        validate_scale(self.cli.scale)?;
        let files = self.collect_files()?;

        for row in palette.display_rows(DISPLAY_HUE_BUCKET_DEGREES, DISPLAY_MAX_PER_ROW) {
            let hexes: Vec<&str> = row.iter().map(|entry| entry.hex.as_str()).collect();
            log::debug!("Palette: {}", hexes.join(" "));
        }

        if files.is_empty() {
            return Ok(());
        }

        log::info!(
            "Converting {} file(s) to {}x{} mosaics with {} colors",
            files.len(),
            self.cli.width,
            self.cli.height,
            palette.len()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(&synthesizer, file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn load_palette(&self) -> Result<Palette> {
        match &self.cli.palette {
            Some(path) => load_palette_file(path),
            None => builtin_palette(),
        }
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_supported_image(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"file must be a png, jpg or gif image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let read_error = |e| MosaicError::FileSystem {
                path: self.cli.target.clone(),
                operation: "read directory",
                source: e,
            };
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target).map_err(read_error)? {
                let path = entry.map_err(read_error)?.path();
                if is_supported_image(&path)
                    && !is_output_file(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"must be an image file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = preview_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&self, synthesizer: &GridSynthesizer, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();

        let bar = self
            .progress_manager
            .as_ref()
            .and_then(|pm| pm.start_file(index, input_path, self.cli.height));

        let image = decode_path(input_path)?;
        let grid = synthesizer.synthesize_with(&image, &CancellationToken::new(), |_| {
            if let Some(ref bar) = bar {
                bar.inc(1);
            }
        })?;

        export_preview_png(&grid, self.cli.scale, &preview_path(input_path))?;
        export_descriptors_csv(&grid, &descriptors_path(input_path))?;

        if let Some(ref pm) = self.progress_manager {
            pm.complete_file(index);
        }

        log::debug!(
            "Converted {} in {:.2?}",
            input_path.display(),
            start_time.elapsed()
        );

        Ok(())
    }
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

// Previews written by earlier runs must not be converted again
fn is_output_file(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(OUTPUT_SUFFIX))
}

fn output_path(input_path: &Path, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{OUTPUT_SUFFIX}.{extension}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// Path of the PNG preview written for `input_path`
pub fn preview_path(input_path: &Path) -> PathBuf {
    output_path(input_path, "png")
}

/// Path of the CSV descriptor file written for `input_path`
pub fn descriptors_path(input_path: &Path) -> PathBuf {
    output_path(input_path, "csv")
}
