//! # Information Model types
//!
//! JSON-LD payload types of the broker REST interface. Every type keeps
//! the `ids:`/`ldp:` prefixes of the wire format in its serde names and
//! skips unset fields during serialization, so round trips stay close to
//! what the broker actually emits.

#[doc(inline)]
pub use catalog::Catalog;
pub mod catalog;

#[doc(inline)]
pub use connector::Connector;
pub mod connector;

#[doc(inline)]
pub use multipart::{IdRef, IdsMessage, MultipartResponse, SecurityToken};
pub mod multipart;

#[doc(inline)]
pub use rejection::RejectionCode;
pub mod rejection;

#[doc(inline)]
pub use resource::{Representation, Resource, TemporalCoverage};
pub mod resource;
