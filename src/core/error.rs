//! # Error types
//!
//! This module contains the error types for the [`idsbroker`] crate.
//!
//! [`idsbroker`]: ../index.html

use crate::core::request::ResponseBody;
use crate::core::TransportMethod;

/// Broker error type
///
/// This type is used to represent errors that can occur while talking to an
/// IDS Metadata Broker. It is used as the error type for the [`Result`] type.
///
/// # Examples
/// ```
/// use idsbroker::core::BrokerError;
///
/// fn foo() -> Result<(), BrokerError> {
///   Ok(())
/// }
///
/// foo().map_err(|e| match e {
///   BrokerError::Transport(_) => println!("Transport error"),
///   BrokerError::Api(_) => println!("API error"),
///   _ => println!("Other error"),
/// });
/// ```
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    /// this error is returned when the transport layer fails
    #[error("Transport error: {0}")]
    Transport(String),

    /// this error is returned when the broker answered with a mapped or
    /// generic error status
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// this error is returned when the caller aborted the request before it
    /// settled
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// this error is returned when the serialization of the request fails
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// this error is returned when the deserialization of the response fails
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// this error is returned when the initialization of the client fails
    #[error("Client initialization error: {0}")]
    ClientInitialization(String),
}

impl BrokerError {
    /// `true` for errors raised by [`CancelableRequest::cancel`].
    ///
    /// Cancellation travels through the error channel so that composed
    /// futures only need a single failure path; this marker lets catch logic
    /// tell an aborted call apart from a failed one.
    ///
    /// [`CancelableRequest::cancel`]: crate::core::CancelableRequest::cancel
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

/// A mapped error response from the broker.
///
/// Carries the request coordinates together with the normalized call outcome
/// so callers can inspect what the broker actually answered.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message} ({status} {status_text}, {method} {url})")]
pub struct ApiError {
    /// method of the failed request
    pub method: TransportMethod,

    /// fully composed target URL of the failed request
    pub url: String,

    /// HTTP status code of the response
    pub status: u16,

    /// HTTP status text of the response
    pub status_text: String,

    /// decoded response body, if any
    pub body: ResponseBody,

    /// message from the merged error-code table, or "Generic Error"
    pub message: String,
}
