//! # Broker APIs
//!
//! Service groups of the broker REST interface. Each group is reached
//! through an accessor on [`BrokerClient`] and borrows the client's
//! [`EndpointConfig`].

use std::collections::HashMap;

#[doc(inline)]
pub use client::{BrokerClient, INFOMODEL_VERSION};
pub mod client;

#[doc(inline)]
pub use broker::BrokerApi;
pub mod broker;

#[doc(inline)]
pub use catalog::CatalogApi;
pub mod catalog;

#[doc(inline)]
pub use contracts::ContractsApi;
pub mod contracts;

#[doc(inline)]
pub use multipart::MultipartApi;
pub mod multipart;

/// IDS message metadata sent as `ids-*` request headers.
///
/// Every REST operation takes one of these. Only the Dynamic Attribute
/// Token is mandatory; unset fields are not sent at all.
///
/// # Examples
/// ```
/// use idsbroker::dx::MessageHeaders;
///
/// let headers = MessageHeaders {
///     issuer_connector: Some("https://connector.example".into()),
///     ..MessageHeaders::with_security_token("<DAT>")
/// };
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MessageHeaders {
    /// the IDS DAT, a token representing ids security claims
    pub security_token: String,

    /// Information Model version against which the message should be
    /// interpreted
    pub model_version: Option<String>,

    /// date of issuing the request
    pub issued: Option<String>,

    /// correlated message this request responds to
    pub correlation_message: Option<String>,

    /// origin connector of the message
    pub issuer_connector: Option<String>,

    /// target connector, mainly used in broadcasting scenarios
    pub recipient_connector: Option<String>,

    /// agent which initiated the message
    pub sender_agent: Option<String>,

    /// agent for which the message is intended
    pub recipient_agent: Option<String>,

    /// authorization token as required by the target connector
    pub authorization_token: Option<String>,

    /// contract which is (or will be) the legal basis of the data transfer
    pub transfer_contract: Option<String>,

    /// version of the content in the payload
    pub content_version: Option<String>,
}

impl MessageHeaders {
    /// Headers carrying only the Dynamic Attribute Token.
    pub fn with_security_token(token: impl Into<String>) -> Self {
        Self {
            security_token: token.into(),
            ..Default::default()
        }
    }

    pub(crate) fn to_header_map(&self) -> HashMap<String, Option<String>> {
        HashMap::from([
            (
                "ids-securityToken".into(),
                Some(self.security_token.clone()),
            ),
            ("ids-modelVersion".into(), self.model_version.clone()),
            ("ids-issued".into(), self.issued.clone()),
            (
                "ids-correlationMessage".into(),
                self.correlation_message.clone(),
            ),
            ("ids-issuerConnector".into(), self.issuer_connector.clone()),
            (
                "ids-recipientConnector".into(),
                self.recipient_connector.clone(),
            ),
            ("ids-senderAgent".into(), self.sender_agent.clone()),
            ("ids-recipientAgent".into(), self.recipient_agent.clone()),
            (
                "ids-authorizationToken".into(),
                self.authorization_token.clone(),
            ),
            (
                "ids-transferContract".into(),
                self.transfer_contract.clone(),
            ),
            ("ids-contentVersion".into(), self.content_version.clone()),
        ])
    }
}
