//! One-bit-per-pixel plane export for multi-color e-ink controllers.

pub(crate) mod pack;
pub(crate) mod planes;
