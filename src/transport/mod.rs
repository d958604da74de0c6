//! Transport implementations.
//!
//! Enabled by the `reqwest` feature, which is part of the default feature
//! set.

#[doc(inline)]
pub use self::reqwest::TransportReqwest;
pub mod reqwest;
