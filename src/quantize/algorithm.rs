//! Fixed catalog of error-diffusion kernels and ordered-dither threshold matrices.
//!
//! Kernels are stored as integer weights over a divisor. Row 0 is the current row; `origin` is
//! the column of the pixel being quantized, so every entry of row 0 at or left of `origin` must
//! be zero (those pixels are already visited).

/// Error-diffusion weight table.
#[derive(Debug, PartialEq)]
pub struct DiffusionKernel {
    /// Catalog name.
    pub name: &'static str,
    /// Column of the current pixel in the first row.
    pub origin: usize,
    /// Value every weight is divided by.
    pub divisor: f32,
    /// Integer weights; row 0 is the current row.
    pub rows: &'static [&'static [u8]],
}

impl DiffusionKernel {
    /// Non-zero taps as `(dx, dy, weight)`, weights already divided.
    pub fn taps(&self) -> Vec<(isize, usize, f32)> {
        let mut out = Vec::new();
        for (dy, row) in self.rows.iter().enumerate() {
            for (col, &w) in row.iter().enumerate() {
                if w == 0 {
                    continue;
                }
                let dx = col as isize - self.origin as isize;
                out.push((dx, dy, f32::from(w) / self.divisor));
            }
        }
        out
    }
}

/// Repeating ordered-dither threshold matrix with cells in `0..max`.
#[derive(Debug, PartialEq)]
pub struct ThresholdMatrix {
    /// Catalog name.
    pub name: &'static str,
    /// Number of threshold levels; cells lie in `0..max`.
    pub max: u32,
    /// Threshold cells, row-major.
    pub rows: &'static [&'static [u8]],
}

impl ThresholdMatrix {
    /// Columns before the matrix repeats.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Rows before the matrix repeats.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Additive channel offset at `(x, y)` for the given strength, centered on zero.
    pub fn offset(&self, x: usize, y: usize, strength: f32) -> f32 {
        let row = self.rows[y % self.height()];
        let cell = f32::from(row[x % row.len()]);
        strength * 255.0 * ((cell + 1.0) / self.max as f32 - 0.5)
    }
}

pub(crate) static SIMPLE_2D: DiffusionKernel = DiffusionKernel {
    name: "Simple2D",
    origin: 0,
    divisor: 2.0,
    rows: &[&[0, 1], &[1, 0]],
};

pub(crate) static FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
    name: "FloydSteinberg",
    origin: 1,
    divisor: 16.0,
    rows: &[&[0, 0, 7], &[3, 5, 1]],
};

pub(crate) static FALSE_FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
    name: "FalseFloydSteinberg",
    origin: 0,
    divisor: 8.0,
    rows: &[&[0, 3], &[3, 2]],
};

pub(crate) static JARVIS_JUDICE_NINKE: DiffusionKernel = DiffusionKernel {
    name: "JarvisJudiceNinke",
    origin: 2,
    divisor: 48.0,
    rows: &[&[0, 0, 0, 7, 5], &[3, 5, 7, 5, 3], &[1, 3, 5, 3, 1]],
};

pub(crate) static ATKINSON: DiffusionKernel = DiffusionKernel {
    name: "Atkinson",
    origin: 1,
    divisor: 8.0,
    rows: &[&[0, 0, 1, 1], &[1, 1, 1, 0], &[0, 1, 0, 0]],
};

pub(crate) static STUCKI: DiffusionKernel = DiffusionKernel {
    name: "Stucki",
    origin: 2,
    divisor: 42.0,
    rows: &[&[0, 0, 0, 8, 4], &[2, 4, 8, 4, 2], &[1, 2, 4, 2, 1]],
};

pub(crate) static BURKES: DiffusionKernel = DiffusionKernel {
    name: "Burkes",
    origin: 2,
    divisor: 32.0,
    rows: &[&[0, 0, 0, 8, 4], &[2, 4, 8, 4, 2]],
};

pub(crate) static SIERRA: DiffusionKernel = DiffusionKernel {
    name: "Sierra",
    origin: 2,
    divisor: 32.0,
    rows: &[&[0, 0, 0, 5, 3], &[2, 4, 5, 4, 2], &[0, 2, 3, 2, 0]],
};

pub(crate) static TWO_ROW_SIERRA: DiffusionKernel = DiffusionKernel {
    name: "TwoRowSierra",
    origin: 2,
    divisor: 16.0,
    rows: &[&[0, 0, 0, 4, 3], &[1, 2, 3, 2, 1]],
};

pub(crate) static SIERRA_LITE: DiffusionKernel = DiffusionKernel {
    name: "SierraLite",
    origin: 1,
    divisor: 4.0,
    rows: &[&[0, 0, 2], &[1, 1, 0]],
};

// Weights sum to 12 of 14, so part of the error is dropped.
pub(crate) static STEVEN_PIGEON: DiffusionKernel = DiffusionKernel {
    name: "StevenPigeon",
    origin: 2,
    divisor: 14.0,
    rows: &[&[0, 0, 0, 2, 1], &[0, 2, 2, 2, 0], &[1, 0, 1, 0, 1]],
};

pub(crate) static CLUSTERED_DOT_4X4: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDot4x4",
    max: 16,
    rows: &[
        &[12, 5, 6, 13],
        &[4, 0, 1, 7],
        &[11, 3, 2, 8],
        &[15, 10, 9, 14],
    ],
};

pub(crate) static CLUSTERED_DOT_6X6: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDot6x6",
    max: 36,
    rows: &[
        &[34, 29, 17, 21, 30, 35],
        &[28, 14, 9, 16, 20, 31],
        &[13, 8, 4, 5, 15, 19],
        &[12, 3, 0, 1, 10, 18],
        &[27, 7, 2, 6, 23, 24],
        &[33, 26, 11, 22, 25, 32],
    ],
};

pub(crate) static CLUSTERED_DOT_8X8: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDot8x8",
    max: 64,
    rows: &[
        &[60, 53, 45, 34, 35, 46, 54, 61],
        &[52, 33, 25, 17, 18, 26, 36, 55],
        &[44, 24, 12, 5, 6, 13, 27, 47],
        &[32, 16, 4, 0, 1, 7, 19, 37],
        &[43, 23, 11, 3, 2, 8, 20, 38],
        &[51, 31, 15, 10, 9, 14, 28, 48],
        &[59, 42, 30, 22, 21, 29, 39, 56],
        &[63, 58, 50, 41, 40, 49, 57, 62],
    ],
};

pub(crate) static CLUSTERED_DOT_DIAGONAL_6X6: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDotDiagonal6x6",
    max: 18,
    rows: &[
        &[8, 6, 7, 9, 11, 10],
        &[5, 0, 1, 12, 17, 16],
        &[4, 3, 2, 13, 14, 15],
        &[9, 11, 10, 8, 6, 7],
        &[12, 17, 16, 5, 0, 1],
        &[13, 14, 15, 4, 3, 2],
    ],
};

pub(crate) static CLUSTERED_DOT_DIAGONAL_8X8: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDotDiagonal8x8",
    max: 64,
    rows: &[
        &[24, 10, 12, 26, 35, 47, 49, 37],
        &[8, 0, 2, 14, 45, 59, 61, 51],
        &[22, 6, 4, 16, 43, 57, 63, 53],
        &[30, 20, 18, 28, 33, 41, 55, 39],
        &[34, 46, 48, 36, 25, 11, 13, 27],
        &[44, 58, 60, 50, 9, 1, 3, 15],
        &[42, 56, 62, 52, 23, 7, 5, 17],
        &[32, 40, 54, 38, 31, 21, 19, 29],
    ],
};

pub(crate) static CLUSTERED_DOT_SPIRAL_5X5: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDotSpiral5x5",
    max: 25,
    rows: &[
        &[20, 21, 22, 23, 24],
        &[19, 6, 7, 8, 9],
        &[18, 5, 0, 1, 10],
        &[17, 4, 3, 2, 11],
        &[16, 15, 14, 13, 12],
    ],
};

pub(crate) static CLUSTERED_DOT_HORIZONTAL_LINE: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDotHorizontalLine",
    max: 36,
    rows: &[
        &[35, 33, 31, 30, 32, 34],
        &[23, 21, 19, 18, 20, 22],
        &[11, 9, 7, 6, 8, 10],
        &[5, 3, 1, 0, 2, 4],
        &[17, 15, 13, 12, 14, 16],
        &[29, 27, 25, 24, 26, 28],
    ],
};

pub(crate) static CLUSTERED_DOT_VERTICAL_LINE: ThresholdMatrix = ThresholdMatrix {
    name: "ClusteredDotVerticalLine",
    max: 36,
    rows: &[
        &[35, 23, 11, 5, 17, 29],
        &[33, 21, 9, 3, 15, 27],
        &[31, 19, 7, 1, 13, 25],
        &[30, 18, 6, 0, 12, 24],
        &[32, 20, 8, 2, 14, 26],
        &[34, 22, 10, 4, 16, 28],
    ],
};

pub(crate) static HORIZONTAL_3X5: ThresholdMatrix = ThresholdMatrix {
    name: "Horizontal3x5",
    max: 15,
    rows: &[
        &[9, 10, 11],
        &[3, 4, 5],
        &[0, 1, 2],
        &[6, 7, 8],
        &[12, 13, 14],
    ],
};

pub(crate) static VERTICAL_5X3: ThresholdMatrix = ThresholdMatrix {
    name: "Vertical5x3",
    max: 15,
    rows: &[&[9, 3, 0, 6, 12], &[10, 4, 1, 7, 13], &[11, 5, 2, 8, 14]],
};

pub(crate) static BAYER_2X2: ThresholdMatrix = ThresholdMatrix {
    name: "Bayer2x2",
    max: 4,
    rows: &[&[0, 2], &[3, 1]],
};

pub(crate) static BAYER_4X4: ThresholdMatrix = ThresholdMatrix {
    name: "Bayer4x4",
    max: 16,
    rows: &[
        &[0, 8, 2, 10],
        &[12, 4, 14, 6],
        &[3, 11, 1, 9],
        &[15, 7, 13, 5],
    ],
};

pub(crate) static BAYER_8X8: ThresholdMatrix = ThresholdMatrix {
    name: "Bayer8x8",
    max: 64,
    rows: &[
        &[0, 32, 8, 40, 2, 34, 10, 42],
        &[48, 16, 56, 24, 50, 18, 58, 26],
        &[12, 44, 4, 36, 14, 46, 6, 38],
        &[60, 28, 52, 20, 62, 30, 54, 22],
        &[3, 35, 11, 43, 1, 33, 9, 41],
        &[51, 19, 59, 27, 49, 17, 57, 25],
        &[15, 47, 7, 39, 13, 45, 5, 37],
        &[63, 31, 55, 23, 61, 29, 53, 21],
    ],
};

static KERNELS: [&DiffusionKernel; 11] = [
    &SIMPLE_2D,
    &FLOYD_STEINBERG,
    &FALSE_FLOYD_STEINBERG,
    &JARVIS_JUDICE_NINKE,
    &ATKINSON,
    &STUCKI,
    &BURKES,
    &SIERRA,
    &TWO_ROW_SIERRA,
    &SIERRA_LITE,
    &STEVEN_PIGEON,
];

static MATRICES: [&ThresholdMatrix; 13] = [
    &CLUSTERED_DOT_4X4,
    &CLUSTERED_DOT_6X6,
    &CLUSTERED_DOT_8X8,
    &CLUSTERED_DOT_DIAGONAL_6X6,
    &CLUSTERED_DOT_DIAGONAL_8X8,
    &CLUSTERED_DOT_SPIRAL_5X5,
    &CLUSTERED_DOT_HORIZONTAL_LINE,
    &CLUSTERED_DOT_VERTICAL_LINE,
    &HORIZONTAL_3X5,
    &VERTICAL_5X3,
    &BAYER_2X2,
    &BAYER_4X4,
    &BAYER_8X8,
];

// Older spellings still found in stored device settings, then clustered-dot variants that
// render with their closest catalog matrix. Keys are normalized names.
static ALIASES: [(&str, &str); 9] = [
    ("sierra3", "Sierra"),
    ("sierra2", "TwoRowSierra"),
    ("sierra24a", "SierraLite"),
    ("jjn", "JarvisJudiceNinke"),
    ("clustereddot6x62", "ClusteredDot6x6"),
    ("clustereddot6x63", "ClusteredDot6x6"),
    ("clustereddotdiagonal8x82", "ClusteredDotDiagonal8x8"),
    ("clustereddotdiagonal8x83", "ClusteredDotDiagonal8x8"),
    ("clustereddotdiagonal16x16", "ClusteredDotDiagonal8x8"),
];

/// A named dithering algorithm from the fixed catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DitherAlgorithm {
    /// Sequential error diffusion with the given kernel.
    ErrorDiffusion(&'static DiffusionKernel),
    /// Ordered dithering with the given threshold matrix.
    Ordered(&'static ThresholdMatrix),
}

impl DitherAlgorithm {
    /// Algorithm used for unknown names (StevenPigeon).
    pub const DEFAULT: Self = Self::ErrorDiffusion(&STEVEN_PIGEON);

    /// Catalog name.
    pub fn name(self) -> &'static str {
        match self {
            Self::ErrorDiffusion(k) => k.name,
            Self::Ordered(m) => m.name,
        }
    }

    /// Look up by name, ignoring case and punctuation (`Two-Row-Sierra` == `TwoRowSierra`).
    pub fn named(name: &str) -> Option<Self> {
        let mut key = normalize_name(name);
        if let Some((_, canonical)) = ALIASES.iter().find(|(a, _)| *a == key) {
            key = normalize_name(canonical);
        }
        if let Some(k) = KERNELS.iter().find(|k| normalize_name(k.name) == key) {
            return Some(Self::ErrorDiffusion(k));
        }
        MATRICES
            .iter()
            .find(|m| normalize_name(m.name) == key)
            .map(|m| Self::Ordered(m))
    }

    /// Look up by name, substituting [`DitherAlgorithm::DEFAULT`] for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::named(name).unwrap_or_else(|| {
            tracing::warn!(
                algorithm = name,
                fallback = Self::DEFAULT.name(),
                "unknown dither algorithm, using default"
            );
            Self::DEFAULT
        })
    }

    /// Every catalog algorithm, error-diffusion kernels first.
    pub fn all() -> impl Iterator<Item = Self> {
        KERNELS
            .iter()
            .map(|k| Self::ErrorDiffusion(k))
            .chain(MATRICES.iter().map(|m| Self::Ordered(m)))
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/algorithm.rs"]
mod tests;
