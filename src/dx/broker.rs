//! # Broker self-description API
//!
//! Operations on the broker root resource.

use std::collections::HashMap;

use crate::core::{
    perform_request, CancelableRequest, EndpointConfig, RequestDescriptor, TransportMethod,
};
use crate::dx::MessageHeaders;
use crate::models::Connector;

/// Operations on the broker root, reached through
/// [`BrokerClient::broker`].
///
/// [`BrokerClient::broker`]: crate::dx::BrokerClient::broker
pub struct BrokerApi<'a> {
    pub(crate) config: &'a EndpointConfig,
}

impl BrokerApi<'_> {
    /// Request the broker's self-description in JSON-LD.
    pub fn self_description(&self, headers: &MessageHeaders) -> CancelableRequest<Connector> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Get,
                url: "/".into(),
                headers: headers.to_header_map(),
                errors: HashMap::from([(
                    403,
                    "Forbidden. Check your DAT in the 'ids-securityToken' Header.".into(),
                )]),
                ..Default::default()
            },
        )
    }

    /// Request the broker's header information. Resolves with the
    /// `ids-modelVersion` response header.
    pub fn head(&self, headers: &MessageHeaders) -> CancelableRequest<Option<String>> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Head,
                url: "/".into(),
                headers: headers.to_header_map(),
                response_header: Some("ids-modelVersion".into()),
                errors: HashMap::from([(
                    401,
                    "Unauthorized. Check your DAT in the 'ids-securityToken' Header.".into(),
                )]),
                ..Default::default()
            },
        )
    }

    /// Request the HTTP operations allowed on this broker. Resolves with
    /// the `ids-modelVersion` response header.
    pub fn options(&self, headers: &MessageHeaders) -> CancelableRequest<Option<String>> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Options,
                url: "/".into(),
                headers: headers.to_header_map(),
                response_header: Some("ids-modelVersion".into()),
                errors: HashMap::from([(
                    403,
                    "Forbidden. Check your DAT in the 'ids-securityToken' Header.".into(),
                )]),
                ..Default::default()
            },
        )
    }
}
