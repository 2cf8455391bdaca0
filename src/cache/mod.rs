//! Derived-artifact cache: exactly-once builds keyed by source image and render params.

pub(crate) mod builder;
pub(crate) mod files;
pub(crate) mod inflight;
pub(crate) mod store;
