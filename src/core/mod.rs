//! Core module
//!
//! Transport-agnostic building blocks of the client: the cancelable request
//! future, the request pipeline, the [`Transport`] trait with its request and
//! response types, and the error types.

#[doc(inline)]
pub use cancel::{CancelHandle, CancelableRequest, Settlement};
pub mod cancel;

#[doc(inline)]
pub use error::{ApiError, BrokerError};
pub mod error;

#[doc(inline)]
pub use request::{
    perform_request, CallOutcome, CredentialResolver, CredentialSource, EndpointConfig,
    RequestBody, RequestDescriptor, ResponseBody,
};
pub mod request;

#[doc(inline)]
pub use transport::Transport;
pub mod transport;

#[doc(inline)]
pub use transport_request::{FormPart, FormValue, TransportBody, TransportMethod, TransportRequest};
pub mod transport_request;

#[doc(inline)]
pub use transport_response::TransportResponse;
pub mod transport_response;

pub(crate) mod utils;
