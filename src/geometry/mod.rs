//! Source decoding and geometric fitting to the panel resolution.

pub(crate) mod resize;
pub(crate) mod source;
