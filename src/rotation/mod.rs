//! Randomized, incrementally maintained display order over the registered source images.

pub(crate) mod sequencer;
