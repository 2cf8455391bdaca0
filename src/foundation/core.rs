use std::fmt;

use crate::foundation::error::{InkError, InkResult};

/// Stable identifier of a source image, assigned by the directory scanner.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SourceImageId(String);

impl SourceImageId {
    /// Wrap a scanner-provided identifier. Empty identifiers are rejected.
    pub fn new(raw: impl Into<String>) -> InkResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InkError::input("source image id must be non-empty"));
        }
        Ok(Self(raw))
    }

    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a derived artifact. Freshly generated, never derived from the key.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Generate a new random 128-bit identifier rendered as lowercase hex.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub(crate) fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    /// Lowercase hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 8-bit sRGB color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// `(0, 0, 0)`.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// `(255, 255, 255)`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// As an `image` pixel.
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }

    /// From an `image` pixel.
    pub fn from_pixel(px: image::Rgb<u8>) -> Self {
        Self::new(px.0[0], px.0[1], px.0[2])
    }

    pub(crate) fn to_f32(self) -> [f32; 3] {
        [f32::from(self.r), f32::from(self.g), f32::from(self.b)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
