//! # Reqwest Transport Implementation
//!
//! This module contains the [`TransportReqwest`] struct.
//! It is used to send requests to an IDS Metadata Broker using the
//! [`reqwest`] crate.
//!
//! It requires the [`reqwest` feature] to be enabled.
//!
//! [`TransportReqwest`]: ./struct.TransportReqwest.html
//! [`reqwest`]: https://docs.rs/reqwest
//! [`reqwest` feature]: ../index.html#features

use std::collections::HashMap;

use bytes::Bytes;
use log::info;
use reqwest::{
    header::HeaderMap,
    multipart::{Form, Part},
    StatusCode,
};

use crate::core::{
    error::{BrokerError, BrokerError::Transport as TransportError},
    FormPart, FormValue, Transport, TransportBody, TransportMethod, TransportRequest,
    TransportResponse,
};

/// This struct is used to send requests to the broker using the [`reqwest`]
/// crate. It is used as the transport type for the [`BrokerClient`].
///
/// TLS certificate validation is on. Brokers deployed with self-signed
/// certificates need an explicit opt-out via
/// [`with_danger_accept_invalid_certs`].
///
/// [`reqwest`]: https://docs.rs/reqwest
/// [`BrokerClient`]: crate::dx::BrokerClient
/// [`with_danger_accept_invalid_certs`]: Self::with_danger_accept_invalid_certs
#[derive(Clone, Debug, Default)]
pub struct TransportReqwest {
    reqwest_client: reqwest::Client,
}

#[async_trait::async_trait]
impl Transport for TransportReqwest {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, BrokerError> {
        info!("{} {}", request.method, request.url);
        let headers = prepare_headers(&request.headers)?;

        let mut builder = self
            .reqwest_client
            .request(prepare_method(&request.method), &request.url)
            .headers(headers);
        builder = match request.body {
            Some(TransportBody::Bytes(bytes)) => builder.body(bytes),
            Some(TransportBody::Multipart(parts)) => builder.multipart(prepare_form(parts)?),
            None => builder,
        };

        let result = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = result.status();
        let response_headers = prepare_response_headers(result.headers());
        result
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))
            .map(|bytes| create_result(status, response_headers, bytes))
    }
}

impl TransportReqwest {
    /// Create a new [`TransportReqwest`] instance with a default
    /// [`reqwest::Client`].
    ///
    /// # Example
    /// ```
    /// use idsbroker::transport::TransportReqwest;
    ///
    /// let transport = TransportReqwest::new();
    /// ```
    ///
    /// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that skips TLS certificate validation when `accept`
    /// is `true`.
    ///
    /// Only meant for talking to brokers behind self-signed certificates in
    /// closed test environments.
    ///
    /// # Errors
    /// Returns a [`BrokerError::ClientInitialization`] if the underlying
    /// client cannot be built.
    pub fn with_danger_accept_invalid_certs(accept: bool) -> Result<Self, BrokerError> {
        let reqwest_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept)
            .build()
            .map_err(|e| BrokerError::ClientInitialization(e.to_string()))?;
        Ok(Self { reqwest_client })
    }
}

fn prepare_method(method: &TransportMethod) -> reqwest::Method {
    match method {
        TransportMethod::Get => reqwest::Method::GET,
        TransportMethod::Post => reqwest::Method::POST,
        TransportMethod::Put => reqwest::Method::PUT,
        TransportMethod::Patch => reqwest::Method::PATCH,
        TransportMethod::Delete => reqwest::Method::DELETE,
        TransportMethod::Head => reqwest::Method::HEAD,
        TransportMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn prepare_headers(request_headers: &HashMap<String, String>) -> Result<HeaderMap, BrokerError> {
    HeaderMap::try_from(request_headers).map_err(|err| TransportError(err.to_string()))
}

fn prepare_form(parts: Vec<FormPart>) -> Result<Form, BrokerError> {
    let mut form = Form::new();
    for FormPart { name, value } in parts {
        let part = match value {
            FormValue::Text(text) => Part::text(text),
            FormValue::Json(value) => Part::text(
                serde_json::to_string(&value)
                    .map_err(|err| BrokerError::Serialization(err.to_string()))?,
            )
            .mime_str("application/json")
            .map_err(|err| TransportError(err.to_string()))?,
            FormValue::File {
                filename,
                content_type,
                data,
            } => {
                let part = Part::bytes(data).file_name(filename);
                match content_type {
                    Some(mime) => part
                        .mime_str(&mime)
                        .map_err(|err| TransportError(err.to_string()))?,
                    None => part,
                }
            }
        };
        form = form.part(name, part);
    }
    Ok(form)
}

fn prepare_response_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect()
}

fn create_result(
    status: StatusCode,
    headers: HashMap<String, String>,
    body: Bytes,
) -> TransportResponse {
    TransportResponse {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
        headers,
        body: (!body.is_empty()).then(|| body.to_vec()),
    }
}
