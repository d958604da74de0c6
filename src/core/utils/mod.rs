//! Utility helpers shared across the crate.

pub(crate) mod encoding;
pub(crate) mod headers;
