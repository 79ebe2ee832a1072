//! CLI entry point for image-to-mosaic conversion

use clap::Parser;
use dotmosaic::io::cli::{Cli, FileProcessor};

fn main() -> dotmosaic::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
