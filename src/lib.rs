//! # IDS Metadata Broker client
//!
//! Async client for the REST and Multipart interfaces of an IDS Metadata
//! Broker. Every operation returns a [`CancelableRequest`], a future that
//! can be aborted at any point before it settles.
//!
//! # Features
//!
//! - `reqwest` (default): ships [`TransportReqwest`], a [`Transport`]
//!   implementation backed by the [`reqwest`] crate with rustls. Disable it
//!   to bring your own transport.
//!
//! # Examples
//!
//! ```no_run
//! use idsbroker::{BrokerClient, MessageHeaders};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), idsbroker::BrokerError> {
//!     let client = BrokerClient::new("https://broker.example", "admin", "password");
//!
//!     let catalog = client
//!         .catalog()
//!         .get(&MessageHeaders::with_security_token("<DAT>"))
//!         .await?;
//!
//!     for resource in &catalog.contains {
//!         println!("{:?}", resource.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`TransportReqwest`]: crate::transport::TransportReqwest
//! [`Transport`]: crate::core::Transport
//! [`reqwest`]: https://docs.rs/reqwest

pub mod core;
pub mod dx;
pub mod models;

#[cfg(feature = "reqwest")]
pub mod transport;

#[doc(inline)]
pub use crate::core::{
    BrokerError, CancelHandle, CancelableRequest, CredentialResolver, CredentialSource,
    EndpointConfig, RequestDescriptor, Transport,
};
#[doc(inline)]
pub use crate::dx::{BrokerClient, MessageHeaders};
