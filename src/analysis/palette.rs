//! Palette construction from raw color records
//!
//! A [`Palette`] is built once and then shared read-only by every matching
//! call. Oklab coordinates are computed here and never recomputed downstream.

use crate::io::configuration::DEFAULT_EXCLUDED_NAME;
use crate::io::error::{MosaicError, Result};
use crate::math::Oklab;
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// A color record as supplied by the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColor {
    /// Inventory identifier
    pub id: u32,
    /// Human-readable color name
    pub name: String,
    /// Hex value, with or without a leading `#`
    pub hex: String,
    /// Whether the physical piece is translucent
    pub is_transparent: bool,
}

impl RawColor {
    /// Create a record
    pub fn new(id: u32, name: impl Into<String>, hex: impl Into<String>, is_transparent: bool) -> Self {
        Self {
            id,
            name: name.into(),
            hex: hex.into(),
            is_transparent,
        }
    }
}

/// One matchable palette color with its precomputed perceptual coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    /// Normalized `#RRGGBB` form, uppercase
    pub hex: String,
    /// 8-bit sRGB channels
    pub rgb: [u8; 3],
    /// Oklab coordinates, computed once at construction
    pub oklab: Oklab,
}

impl PaletteEntry {
    /// Parse a hex string and precompute its Oklab coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` if `hex` is not a 3- or 6-digit hex color
    pub fn from_hex(hex: &str) -> Result<Self> {
        let rgb = parse_hex(hex)?;
        Ok(Self::from_rgb(rgb))
    }

    /// Build an entry from sRGB channels
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            hex: format_hex(rgb),
            rgb,
            oklab: Oklab::from_rgb(rgb),
        }
    }
}

/// Ordered, duplicate-free, never-empty set of palette colors
///
/// Cloning is cheap: all clones share the same immutable entries.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Arc<[PaletteEntry]>,
}

impl Palette {
    /// Build a palette directly from hex strings, keeping the first of any duplicates
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` for a malformed hex string and `EmptyPalette`
    /// if the list is empty
    pub fn from_hex_list<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(colors.len());

        for color in colors {
            let entry = PaletteEntry::from_hex(color.as_ref())?;
            if seen.insert(entry.hex.clone()) {
                entries.push(entry);
            }
        }

        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<PaletteEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(MosaicError::EmptyPalette);
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Entry at `index` in palette order
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Position of a hex color in the palette
    pub fn index_of(&self, hex: &str) -> Option<usize> {
        let normalized = parse_hex(hex).ok().map(format_hex)?;
        self.entries.iter().position(|entry| entry.hex == normalized)
    }

    /// Hex strings in palette order
    pub fn hex_values(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.hex.clone()).collect()
    }
}

impl Deref for Palette {
    type Target = [PaletteEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

/// Filters raw inventory records into a [`Palette`]
#[derive(Debug, Clone)]
pub struct PaletteBuilder {
    available: Option<HashSet<u32>>,
    excluded_names: Vec<String>,
}

impl Default for PaletteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteBuilder {
    /// Builder with no availability filter and the default name exclusion
    pub fn new() -> Self {
        Self {
            available: None,
            excluded_names: vec![DEFAULT_EXCLUDED_NAME.to_string()],
        }
    }

    /// Keep only records whose id is in `ids`
    #[must_use]
    pub fn available(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.available = Some(ids.into_iter().collect());
        self
    }

    /// Also drop records whose name contains `pattern`
    #[must_use]
    pub fn exclude_name(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_names.push(pattern.into());
        self
    }

    /// Remove every name exclusion, including the default one
    #[must_use]
    pub fn without_exclusions(mut self) -> Self {
        self.excluded_names.clear();
        self
    }

    fn retains(&self, color: &RawColor) -> bool {
        let available = self
            .available
            .as_ref()
            .is_none_or(|ids| ids.contains(&color.id));
        available
            && !self
                .excluded_names
                .iter()
                .any(|pattern| color.name.contains(pattern.as_str()))
    }

    /// Filter, deduplicate by rendered hex and precompute perceptual coordinates
    ///
    /// Input order is preserved; the first record wins on duplicate hex values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidColor` if a retained record has a malformed hex value and
    /// `EmptyPalette` if nothing survives filtering
    pub fn build(&self, colors: &[RawColor]) -> Result<Palette> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for color in colors.iter().filter(|color| self.retains(color)) {
            let entry = PaletteEntry::from_hex(&color.hex)?;
            if seen.insert(entry.hex.clone()) {
                entries.push(entry);
            }
        }

        log::debug!(
            "Built palette with {} of {} colors",
            entries.len(),
            colors.len()
        );

        Palette::from_entries(entries)
    }
}

/// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`, case-insensitive
///
/// # Errors
///
/// Returns `InvalidColor` if the string has the wrong length or a non-hex digit
pub fn parse_hex(value: &str) -> Result<[u8; 3]> {
    let invalid = || MosaicError::InvalidColor {
        value: value.to_string(),
    };

    let digits = value.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(invalid()),
    };

    let packed = u32::from_str_radix(&expanded, 16).map_err(|_parse_error| invalid())?;
    Ok([(packed >> 16) as u8, (packed >> 8) as u8, packed as u8])
}

/// Render sRGB channels as uppercase `#RRGGBB`
pub fn format_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}
