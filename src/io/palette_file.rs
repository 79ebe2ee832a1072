//! Palette sources for the command-line tool

use crate::analysis::palette::{Palette, PaletteBuilder, RawColor, parse_hex};
use crate::io::error::{MosaicError, Result};
use std::path::Path;

/// Brick colors used when no palette file is given
pub fn builtin_colors() -> Vec<RawColor> {
    [
        (0, "Black", "05131D"),
        (15, "White", "FFFFFF"),
        (71, "Light Bluish Gray", "A0A5A9"),
        (72, "Dark Bluish Gray", "6C6E68"),
        (4, "Red", "C91A09"),
        (1, "Blue", "0055BF"),
        (2, "Green", "237841"),
        (14, "Yellow", "F2CD37"),
        (70, "Reddish Brown", "582A12"),
        (5, "Dark Pink", "C870A0"),
        (29, "Bright Pink", "E4ADC8"),
        (25, "Orange", "FE8A18"),
        (212, "Bright Light Blue", "9FC3E9"),
        (10, "Bright Green", "4B9F4A"),
        (226, "Bright Light Yellow", "FFF03A"),
        (47, "Trans-Clear", "FCFCFC"),
    ]
    .into_iter()
    .map(|(id, name, hex)| RawColor::new(id, name, hex, name.starts_with("Trans")))
    .collect()
}

/// The built-in palette, filtered through [`PaletteBuilder`]
///
/// # Errors
///
/// Returns an error only if the built-in table is malformed
pub fn builtin_palette() -> Result<Palette> {
    PaletteBuilder::new().build(&builtin_colors())
}

/// Parse hex colors separated by newlines or commas
///
/// Text after `#` followed by a space is ignored, as are lines starting with
/// `//` and lines starting with `#` whose first entry isn't a color, so
/// palette files can carry comments.
///
/// # Errors
///
/// Returns `InvalidColor` for a malformed entry and `EmptyPalette` if the
/// text holds no colors
pub fn parse_palette_text(text: &str) -> Result<Palette> {
    let colors: Vec<&str> = text
        .lines()
        .map(|line| line.split("# ").next().unwrap_or_default())
        .filter(|line| !is_comment_line(line))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();

    Palette::from_hex_list(&colors)
}

fn is_comment_line(line: &str) -> bool {
    let line = line.trim_start();
    if line.starts_with("//") {
        return true;
    }
    let first = line.split(',').next().unwrap_or_default().trim();
    line.starts_with('#') && parse_hex(first).is_err()
}

/// Load a palette file
///
/// # Errors
///
/// Returns `FileSystem` if the file can't be read, otherwise as
/// [`parse_palette_text`]
pub fn load_palette_file(path: &Path) -> Result<Palette> {
    let text = std::fs::read_to_string(path).map_err(|e| MosaicError::FileSystem {
        path: path.to_path_buf(),
        operation: "read palette",
        source: e,
    })?;
    parse_palette_text(&text)
}
