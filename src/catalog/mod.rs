//! SQLite index of source images, derived artifacts and rotation order.

pub(crate) mod artifacts;
pub(crate) mod rotation;
pub(crate) mod sources;
pub(crate) mod store;
