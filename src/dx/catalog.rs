//! # Catalog API
//!
//! Operations on the broker's catalog of registered IDS Resources.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::{
    perform_request, BrokerError, CancelableRequest, EndpointConfig, RequestBody,
    RequestDescriptor, TransportMethod,
};
use crate::dx::MessageHeaders;
use crate::models::{Catalog, Resource};

const FORBIDDEN_FOR_USER: &str = "Forbidden. Access is not allowed for this user. Recheck your Dynamic Attribute Token (DAT) and all other required authentication patterns used.";

/// Operations on the resource catalog, reached through
/// [`BrokerClient::catalog`].
///
/// [`BrokerClient::catalog`]: crate::dx::BrokerClient::catalog
pub struct CatalogApi<'a> {
    pub(crate) config: &'a EndpointConfig,
}

impl CatalogApi<'_> {
    /// Read the catalog of all registered IDS Resources.
    pub fn get(&self, headers: &MessageHeaders) -> CancelableRequest<Catalog> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Get,
                url: "/Catalog".into(),
                headers: headers.to_header_map(),
                errors: HashMap::from([(403, FORBIDDEN_FOR_USER.into())]),
                ..Default::default()
            },
        )
    }

    /// Request the catalog headers. Resolves with the `ids-modelVersion`
    /// response header.
    pub fn head(&self, headers: &MessageHeaders) -> CancelableRequest<Option<String>> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Head,
                url: "/Catalog".into(),
                headers: headers.to_header_map(),
                response_header: Some("ids-modelVersion".into()),
                errors: HashMap::from([(403, FORBIDDEN_FOR_USER.into())]),
                ..Default::default()
            },
        )
    }

    /// Request the operations allowed on the catalog. Resolves with the
    /// `ids-modelVersion` response header.
    pub fn options(&self, headers: &MessageHeaders) -> CancelableRequest<Option<String>> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Options,
                url: "/Catalog".into(),
                headers: headers.to_header_map(),
                response_header: Some("ids-modelVersion".into()),
                errors: HashMap::from([(403, FORBIDDEN_FOR_USER.into())]),
                ..Default::default()
            },
        )
    }

    /// Overwrite the current catalog with a complete new one.
    ///
    /// `if_match` carries the entity tag the server-side catalog must still
    /// match for the replacement to happen.
    pub fn put(
        &self,
        headers: &MessageHeaders,
        if_match: impl Into<String>,
        catalog: &Catalog,
    ) -> CancelableRequest<Catalog> {
        let mut request_headers = headers.to_header_map();
        request_headers.insert("If-Match".into(), Some(if_match.into()));
        self.write_catalog(TransportMethod::Put, request_headers, catalog)
    }

    /// Update a single IDS Resource in the catalog, adding it when the
    /// catalog does not know it yet.
    ///
    /// `slug` is the intended path name of the resource.
    pub fn patch(
        &self,
        headers: &MessageHeaders,
        slug: impl Into<String>,
        resource: &Resource,
    ) -> CancelableRequest<Catalog> {
        let mut request_headers = headers.to_header_map();
        request_headers.insert("Slug".into(), Some(slug.into()));
        self.write_catalog(TransportMethod::Patch, request_headers, resource)
    }

    /// Add a single IDS Resource to the catalog.
    ///
    /// `slug` is the intended path name of the new resource.
    pub fn post(
        &self,
        headers: &MessageHeaders,
        slug: impl Into<String>,
        resource: &Resource,
    ) -> CancelableRequest<Catalog> {
        let mut request_headers = headers.to_header_map();
        request_headers.insert("Slug".into(), Some(slug.into()));
        self.write_catalog(TransportMethod::Post, request_headers, resource)
    }

    fn write_catalog<T: Serialize>(
        &self,
        method: TransportMethod,
        request_headers: HashMap<String, Option<String>>,
        body: &T,
    ) -> CancelableRequest<Catalog> {
        let body = match serde_json::to_value(body) {
            Ok(value) => value,
            Err(err) => {
                return CancelableRequest::rejected(BrokerError::Serialization(err.to_string()))
            }
        };
        perform_request(
            self.config,
            RequestDescriptor {
                method,
                url: "/Catalog".into(),
                headers: request_headers,
                body: Some(RequestBody::Json(body)),
                media_type: Some("application/json".into()),
                errors: HashMap::from([
                    (403, "Forbidden".into()),
                    (409, "Conflict".into()),
                ]),
                ..Default::default()
            },
        )
    }
}
