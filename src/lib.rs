//! inkframe renders photographs for fixed-palette e-ink picture frames.
//!
//! A source image goes through four stages before a panel can show it:
//!
//! 1. **Fit**: decode, then resize to the panel geometry ([`fit_to_target`], [`ResizeMethod`]).
//! 2. **Quantize**: dither onto the panel palette ([`quantize`], [`DitherAlgorithm`]).
//! 3. **Cache**: persist the result once per `(source, params)` ([`ArtifactCache`]).
//! 4. **Export**: split into one packed bit-plane per palette color ([`BitPlanes`]).
//!
//! Devices walk a randomized rotation over all registered sources ([`RotationSequencer`]);
//! [`Gallery`] ties the pieces together for the request path.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic renders**: artifact bytes depend only on the source, the params and the
//!   engine's pipeline options.
//! - **Index is authoritative**: cache files are only reachable through the SQLite catalog.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bitplane;
mod cache;
mod catalog;
mod config;
mod foundation;
mod gallery;
mod geometry;
mod model;
mod pipeline;
mod quantize;
mod rotation;

pub use bitplane::pack::{pack_bits, to_hex_listing, unpack_bits};
pub use bitplane::planes::{BitPlanes, split_planes};
pub use cache::builder::{ArtifactBuilder, PipelineBuilder};
pub use cache::store::{ArtifactCache, VerifyReport};
pub use catalog::store::Catalog;
pub use config::InkConfig;
pub use foundation::core::{ArtifactId, Rgb8, SourceImageId};
pub use foundation::error::{InkError, InkResult};
pub use gallery::{Frame, Gallery, SyncReport};
pub use geometry::resize::{ResampleFilter, fit_to_target};
pub use geometry::source::load_source;
pub use model::{
    DerivedArtifact, DeviceCursor, RenderParams, ResizeMethod, RotationEntry, SourceImage,
};
pub use pipeline::{PipelineOptions, render_file, render_image};
pub use quantize::algorithm::{DiffusionKernel, DitherAlgorithm, ThresholdMatrix};
pub use quantize::dither::{QuantizeOptions, quantize, quantize_indices};
pub use quantize::palette::Palette;
pub use rotation::sequencer::{ReconcileReport, RotationSequencer};
