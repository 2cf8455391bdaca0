//! Canonical entity model shared by the pipeline, the artifact cache and the rotation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{
    foundation::core::{ArtifactId, SourceImageId},
    foundation::error::{InkError, InkResult},
    quantize::{algorithm::DitherAlgorithm, palette::Palette},
};

/// A photograph registered by the external directory scanner.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceImage {
    /// Scanner-assigned identity.
    pub id: SourceImageId,
    /// Image file on disk.
    pub path: PathBuf,
}

impl SourceImage {
    /// Source `id` stored at `path`.
    pub fn new(id: SourceImageId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// Geometric fitting policy applied before quantization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMethod {
    /// Preserve aspect ratio, fit inside the target; may be smaller on one axis.
    Fit,
    /// Scale both axes independently to the target.
    Fill,
    /// Preserve aspect ratio, cover the target and center-crop the overflow.
    #[default]
    Cut,
    /// Same as [`ResizeMethod::Fill`].
    Stretch,
    /// Preserve aspect ratio, letterbox with white.
    FillWhite,
    /// Preserve aspect ratio, letterbox with black.
    FillBlack,
}

impl ResizeMethod {
    /// Every method, in catalog order.
    pub const ALL: [ResizeMethod; 6] = [
        Self::Fit,
        Self::Fill,
        Self::Cut,
        Self::Stretch,
        Self::FillWhite,
        Self::FillBlack,
    ];

    /// Stored snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::Cut => "cut",
            Self::Stretch => "stretch",
            Self::FillWhite => "fill_white",
            Self::FillBlack => "fill_black",
        }
    }

    /// Parse a name, ignoring case and treating `-` as `_`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Parse a stored or user-provided name, substituting [`ResizeMethod::Cut`] when unknown.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(method = name, "unknown resize method, using 'cut'");
            Self::Cut
        })
    }
}

/// Rendering parameters; together with a [`SourceImageId`] they form the artifact cache key.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Palette name; unknown names mean `7Standard`.
    pub palette: String,
    /// Dithering algorithm name; unknown names mean `StevenPigeon`.
    pub algorithm: String,
    /// Error or threshold scale, finite and `>= 0`. Zero disables dithering.
    pub strength: f32,
    /// Panel width in pixels.
    pub width: u32,
    /// Panel height in pixels.
    pub height: u32,
    /// Fitting policy.
    pub resize_method: ResizeMethod,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            palette: Palette::DEFAULT_NAME.to_string(),
            algorithm: DitherAlgorithm::DEFAULT.name().to_string(),
            strength: 1.0,
            width: 800,
            height: 480,
            resize_method: ResizeMethod::Cut,
        }
    }
}

impl RenderParams {
    /// Reject parameters no render can satisfy.
    pub fn validate(&self) -> InkResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(InkError::input(format!(
                "target dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.strength.is_finite() || self.strength < 0.0 {
            return Err(InkError::input(format!(
                "dither strength must be finite and >= 0, got {}",
                self.strength
            )));
        }
        Ok(())
    }

    /// Validate, then resolve palette and algorithm names to their catalog spelling.
    ///
    /// Unknown names resolve to the documented defaults, so two requests that render the same
    /// bytes share one cache key. A strength of `-0.0` becomes `0.0`.
    pub fn canonical(&self) -> InkResult<Self> {
        self.validate()?;
        Ok(Self {
            palette: Palette::resolve(&self.palette).name().to_string(),
            algorithm: DitherAlgorithm::resolve(&self.algorithm).name().to_string(),
            strength: if self.strength == 0.0 {
                0.0
            } else {
                self.strength
            },
            ..self.clone()
        })
    }

    pub(crate) fn strength_bits(&self) -> u32 {
        self.strength.to_bits()
    }
}

/// Persisted record of one rendered artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedArtifact {
    /// Opaque id; also names the files.
    pub id: ArtifactId,
    /// Source the artifact was rendered from.
    pub source_image_id: SourceImageId,
    /// Canonical params it was rendered with.
    pub params: RenderParams,
    /// The `dithered_<id>.png` file.
    pub storage_path: PathBuf,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

/// One slot of the randomized rotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationEntry {
    /// Unique sort key; lower shows first.
    pub position: i64,
    /// Source shown at this position.
    pub source_image_id: SourceImageId,
}

/// A device's place in the rotation. Persisted by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceCursor {
    /// Caller-chosen device name.
    pub device_id: String,
    /// Last image shown, `None` before the first advance.
    pub current_source_image_id: Option<SourceImageId>,
}

impl DeviceCursor {
    /// Cursor for a device that has shown nothing yet.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            current_source_image_id: None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
