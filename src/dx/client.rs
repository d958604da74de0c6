//! # Broker client module
//!
//! This module contains the [`BrokerClient`] struct, the entry point for
//! talking to an IDS Metadata Broker.

use std::sync::Arc;

use crate::core::{EndpointConfig, Transport};
use crate::dx::{BrokerApi, CatalogApi, ContractsApi, MultipartApi};

/// Information Model version this client speaks by default.
pub const INFOMODEL_VERSION: &str = "1.3.0";

/// Client for one IDS Metadata Broker deployment.
///
/// Cheap to clone; the clone shares the transport of the original. The
/// service groups are reached through the [`broker`], [`catalog`],
/// [`contracts`] and [`multipart`] accessors.
///
/// # Examples
/// ```no_run
/// use idsbroker::dx::{BrokerClient, MessageHeaders};
///
/// # async fn example() -> Result<(), idsbroker::core::BrokerError> {
/// let client = BrokerClient::new("https://broker.example", "admin", "password");
/// let description = client
///     .broker()
///     .self_description(&MessageHeaders::with_security_token("<DAT>"))
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// [`broker`]: Self::broker
/// [`catalog`]: Self::catalog
/// [`contracts`]: Self::contracts
/// [`multipart`]: Self::multipart
#[derive(Clone)]
pub struct BrokerClient {
    config: EndpointConfig,
}

impl BrokerClient {
    /// Create a client for the broker at `endpoint_url` with basic-auth
    /// credentials and the default [`reqwest`] transport.
    ///
    /// For a transport that cannot be built infallibly, assemble an
    /// [`EndpointConfig`] and use [`BrokerClient::with_config`] instead.
    ///
    /// [`reqwest`]: https://docs.rs/reqwest
    #[cfg(feature = "reqwest")]
    pub fn new(
        endpoint_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let transport = Arc::new(crate::transport::TransportReqwest::new());
        Self {
            config: EndpointConfig::new(endpoint_url, transport)
                .with_version(INFOMODEL_VERSION)
                .with_basic_auth(username.into(), password.into()),
        }
    }

    /// Create a client over an already assembled [`EndpointConfig`], for
    /// custom transports or credential resolvers.
    pub fn with_config(config: EndpointConfig) -> Self {
        Self { config }
    }

    /// Create a client for `endpoint_url` using `transport`, without
    /// credentials.
    pub fn with_transport(endpoint_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: EndpointConfig::new(endpoint_url, transport).with_version(INFOMODEL_VERSION),
        }
    }

    /// The connection configuration of this client.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Self-description operations on the broker root.
    pub fn broker(&self) -> BrokerApi<'_> {
        BrokerApi { config: &self.config }
    }

    /// Operations on the resource catalog.
    pub fn catalog(&self) -> CatalogApi<'_> {
        CatalogApi { config: &self.config }
    }

    /// Operations on contracts attached to catalog resources.
    pub fn contracts(&self) -> ContractsApi<'_> {
        ContractsApi { config: &self.config }
    }

    /// IDS Multipart Message interactions.
    pub fn multipart(&self) -> MultipartApi<'_> {
        MultipartApi { config: &self.config }
    }
}
