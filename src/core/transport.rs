//! # Transport module
//!
//! This module contains the [`Transport`] trait and the [`TransportRequest`]
//! and [`TransportResponse`] types.
//!
//! You can implement this trait for your own types, or use one of the
//! provided features to use a transport library.

use super::{transport_response::TransportResponse, BrokerError, TransportRequest};

/// This trait is used to send requests to the broker.
///
/// You can implement this trait for your own types, or use one of the
/// provided features to use a transport library.
///
/// A transport makes exactly one attempt per call; retries and timeouts are
/// not applied anywhere in this crate.
///
/// # Examples
/// ```
/// use idsbroker::core::{Transport, TransportRequest, TransportResponse, BrokerError};
///
/// struct MyTransport;
///
/// #[async_trait::async_trait]
/// impl Transport for MyTransport {
///    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, BrokerError> {
///         // Send your request here
///
///         Ok(TransportResponse::default())
///    }
/// }
/// ```
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to the broker.
    ///
    /// # Errors
    /// Should return a [`BrokerError::Transport`] if the request cannot be
    /// sent.
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, BrokerError>;
}
