use crate::{
    foundation::core::Rgb8,
    foundation::error::{InkError, InkResult},
};

/// Pure RGB primaries in panel order.
const STANDARD_7: [Rgb8; 7] = [
    Rgb8::new(0, 0, 0),
    Rgb8::new(255, 255, 255),
    Rgb8::new(0, 0, 255),
    Rgb8::new(0, 255, 0),
    Rgb8::new(255, 0, 0),
    Rgb8::new(255, 255, 0),
    Rgb8::new(255, 165, 0),
];

/// Measured states of the Waveshare 7.3" (F) panel, converted from Lab.
const EINK_7: [Rgb8; 7] = [
    Rgb8::new(49, 40, 56),    // dark
    Rgb8::new(174, 173, 168), // white
    Rgb8::new(57, 63, 104),   // blue
    Rgb8::new(48, 101, 68),   // green
    Rgb8::new(146, 61, 62),   // red
    Rgb8::new(173, 160, 73),  // yellow
    Rgb8::new(160, 83, 65),   // orange
];

const CATALOG: [(&str, &[Rgb8]); 2] = [("7Standard", &STANDARD_7), ("7Eink", &EINK_7)];

/// Named, ordered color list. The index of a color is its bit-plane index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgb8>,
}

impl Palette {
    /// Name of the palette used when a requested name is unknown.
    pub const DEFAULT_NAME: &'static str = "7Standard";

    /// Build a custom palette. An empty color list is a hard configuration error.
    pub fn new(name: impl Into<String>, colors: Vec<Rgb8>) -> InkResult<Self> {
        let name = name.into();
        if colors.is_empty() {
            return Err(InkError::config(format!("palette '{name}' has no colors")));
        }
        if colors.len() > usize::from(u8::MAX) + 1 {
            return Err(InkError::config(format!(
                "palette '{name}' has {} colors, at most 256 are supported",
                colors.len()
            )));
        }
        Ok(Self { name, colors })
    }

    /// Look up a catalog palette by exact name, ignoring ASCII case.
    pub fn named(name: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(n, colors)| Self {
                name: (*n).to_string(),
                colors: colors.to_vec(),
            })
    }

    /// Look up a catalog palette, substituting the default for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::named(name).unwrap_or_else(|| {
            tracing::warn!(
                palette = name,
                fallback = Self::DEFAULT_NAME,
                "unknown palette, using default"
            );
            Self::default_palette()
        })
    }

    /// The `7Standard` catalog palette.
    pub fn default_palette() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            colors: STANDARD_7.to_vec(),
        }
    }

    /// Names of all catalog palettes, in catalog order.
    pub fn catalog_names() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|(n, _)| *n)
    }

    /// Catalog or caller-given name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colors in bit-plane order.
    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// Number of colors, which is also the number of bit planes.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false` for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index of the first entry equal to `c`.
    pub fn index_of(&self, c: Rgb8) -> Option<usize> {
        self.colors.iter().position(|&p| p == c)
    }

    /// Index of the entry with least squared RGB distance to `v`. Ties go to the lower index.
    pub fn nearest(&self, v: [f32; 3]) -> usize {
        let mut best = 0usize;
        let mut best_d = f32::INFINITY;
        for (i, c) in self.colors.iter().enumerate() {
            let p = c.to_f32();
            let dr = v[0] - p[0];
            let dg = v[1] - p[1];
            let db = v[2] - p[2];
            let d = dr * dr + dg * dg + db * db;
            if d < best_d {
                best_d = d;
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/palette.rs"]
mod tests;
