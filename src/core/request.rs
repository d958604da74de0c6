//! # Request pipeline
//!
//! This module turns a declarative [`RequestDescriptor`] into an HTTP call:
//! URL construction with path and query templating, header assembly with
//! deferred credential resolution, body encoding, the transport round trip,
//! response decoding and status-to-error mapping. The whole pipeline runs
//! inside a [`CancelableRequest`], so an in-flight call can be aborted
//! before or during transport.

use std::{collections::HashMap, sync::Arc};

use base64::{engine::general_purpose, Engine as _};
use log::error;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::{
    cancel::Settlement,
    utils::{
        encoding::url_encode,
        headers::{
            ACCEPT, APPLICATION_JSON, APPLICATION_OCTET_STREAM, AUTHORIZATION, CONTENT_TYPE,
            TEXT_PLAIN,
        },
    },
    ApiError, BrokerError, CancelableRequest, Transport, TransportBody, TransportMethod,
    TransportRequest, TransportResponse,
};
use crate::core::transport_request::FormPart;

/// Statuses mapped to an [`ApiError`] unless the descriptor overrides them.
const DEFAULT_ERROR_TABLE: [(u16, &str); 7] = [
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
];

/// An immutable description of one broker call.
///
/// Created by a service method at call time and consumed by
/// [`perform_request`]. The `url` field is a template: `{api-version}` is
/// replaced with the configured protocol version and every other `{name}`
/// placeholder with the matching `path` entry; placeholders without a match
/// are kept verbatim.
///
/// # Examples
/// ```
/// use idsbroker::core::{RequestDescriptor, TransportMethod};
///
/// let descriptor = RequestDescriptor {
///     method: TransportMethod::Get,
///     url: "/Catalog/{resource-id}".into(),
///     path: [("resource-id".into(), "42".into())].into(),
///     query: vec![("sort".into(), "asc".into())],
///     ..Default::default()
/// };
/// ```
#[derive(Clone, PartialEq, Debug, Default)]
pub struct RequestDescriptor {
    /// method to use for the request
    pub method: TransportMethod,

    /// URL template, relative to the configured base URL
    pub url: String,

    /// values for the `{name}` placeholders of the template
    pub path: HashMap<String, String>,

    /// query parameters, serialized in the given order; array values repeat
    /// the key per element, nested objects use `key[sub]` bracket notation,
    /// nulls are omitted at any depth
    pub query: Vec<(String, Value)>,

    /// per-call headers; entries with a `None` value are dropped
    pub headers: HashMap<String, Option<String>>,

    /// body of the request, if any
    pub body: Option<RequestBody>,

    /// declared media type of the body
    pub media_type: Option<String>,

    /// per-call overrides of the status-to-message error table
    pub errors: HashMap<u16, String>,

    /// name of a response header to surface as the result instead of the
    /// decoded body
    pub response_header: Option<String>,
}

/// Body of a [`RequestDescriptor`].
#[derive(Clone, PartialEq, Debug)]
pub enum RequestBody {
    /// JSON payload, serialized before transport
    Json(Value),

    /// plain text, passed through unchanged
    Text(String),

    /// raw bytes, passed through unchanged
    Binary {
        /// media type declared by the payload itself
        content_type: Option<String>,
        /// payload bytes
        data: Vec<u8>,
    },

    /// multipart parts, encoded by the transport itself
    Multipart(Vec<FormPart>),
}

/// A resolver producing a credential value for an in-flight request.
///
/// Resolvers are invoked with the request descriptor and awaited, so a token
/// can be looked up, refreshed or derived per call.
#[async_trait::async_trait]
pub trait CredentialResolver<T>: Send + Sync {
    /// Produce the credential value for `descriptor`.
    async fn resolve(&self, descriptor: &RequestDescriptor) -> Result<T, BrokerError>;
}

/// A credential field of the [`EndpointConfig`]: absent, a literal value, or
/// a deferred [`CredentialResolver`].
#[derive(Default)]
pub enum CredentialSource<T> {
    /// no value configured
    #[default]
    None,

    /// a fixed value
    Literal(T),

    /// a deferred resolver invoked per request
    Resolver(Arc<dyn CredentialResolver<T>>),
}

impl<T> Clone for CredentialSource<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Resolver(resolver) => Self::Resolver(resolver.clone()),
        }
    }
}

impl<T> CredentialSource<T>
where
    T: Clone,
{
    pub(crate) async fn resolve(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<T>, BrokerError> {
        match self {
            Self::None => Ok(None),
            Self::Literal(value) => Ok(Some(value.clone())),
            Self::Resolver(resolver) => resolver.resolve(descriptor).await.map(Some),
        }
    }
}

impl From<&str> for CredentialSource<String> {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

impl From<String> for CredentialSource<String> {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

/// Connection configuration shared by every call of a client instance.
///
/// The four credential fields may each hold a literal value or a deferred
/// resolver; they are resolved per request. At most one of token or
/// username+password should be configured. If both resolve to non-empty
/// values, the basic-auth pair ends up winning because its check runs after
/// the bearer check.
#[derive(Clone)]
pub struct EndpointConfig {
    /// base URL the relative URL templates are appended to
    pub base: String,

    /// protocol version substituted for `{api-version}` placeholders
    pub version: String,

    /// bearer token for the `Authorization` header
    pub token: CredentialSource<String>,

    /// basic-auth username
    pub username: CredentialSource<String>,

    /// basic-auth password
    pub password: CredentialSource<String>,

    /// extra headers merged into every request
    pub headers: CredentialSource<HashMap<String, String>>,

    /// encoder for path parameter values; percent-encoding when unset
    pub path_encoder: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,

    /// transport that performs the HTTP round trips
    pub transport: Arc<dyn Transport>,
}

impl EndpointConfig {
    /// Create a configuration for `base` using `transport`, with protocol
    /// version `1.3.0` and no credentials.
    pub fn new(base: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: base.into(),
            version: "1.3.0".into(),
            token: CredentialSource::None,
            username: CredentialSource::None,
            password: CredentialSource::None,
            headers: CredentialSource::None,
            path_encoder: None,
            transport,
        }
    }

    /// Set the protocol version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the bearer token source.
    pub fn with_token(mut self, token: impl Into<CredentialSource<String>>) -> Self {
        self.token = token.into();
        self
    }

    /// Set literal basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<CredentialSource<String>>,
        password: impl Into<CredentialSource<String>>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the extra-headers source.
    pub fn with_headers(mut self, headers: CredentialSource<HashMap<String, String>>) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the default percent-encoding of path parameter values.
    pub fn with_path_encoder(
        mut self,
        encoder: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.path_encoder = Some(Arc::new(encoder));
        self
    }
}

/// Decoded body of a transport response.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum ResponseBody {
    /// no decodable payload (status 204, missing `Content-Type`, or a
    /// tolerated decode failure)
    #[default]
    Empty,

    /// decoded JSON payload
    Json(Value),

    /// decoded text payload, or a surfaced response-header value
    Text(String),
}

impl ResponseBody {
    fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// The normalized result of one transport round trip, consumed by the
/// error-mapping step.
#[derive(Clone, PartialEq, Debug)]
pub struct CallOutcome {
    /// fully composed target URL
    pub url: String,

    /// `true` for a 2xx status
    pub ok: bool,

    /// HTTP status code
    pub status: u16,

    /// HTTP status text
    pub status_text: String,

    /// decoded payload, or the surfaced response-header value
    pub body: ResponseBody,
}

/// Perform one broker call described by `descriptor`.
///
/// Returns immediately with a [`CancelableRequest`]; URL and header
/// resolution, the transport round trip and response decoding run while the
/// request is polled. Cancelling the request before the transport call
/// commits skips it entirely; cancelling later rejects the caller right away
/// while the already-initiated round trip finishes in vain.
///
/// The decoded result is converted to `T` through serde; a header surfaced
/// via [`RequestDescriptor::response_header`] arrives as a JSON string, an
/// empty body as JSON null.
pub fn perform_request<T>(
    config: &EndpointConfig,
    descriptor: RequestDescriptor,
) -> CancelableRequest<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let config = config.clone();
    CancelableRequest::new(move |settlement| async move {
        match run_call(&config, &descriptor, &settlement).await {
            Ok(Some(body)) => match serde_json::from_value(body.into_value()) {
                Ok(value) => settlement.resolve(value),
                Err(err) => settlement.reject(BrokerError::Deserialization(err.to_string())),
            },
            // cancelled before the transport call committed; the
            // cancellation itself rejected the request
            Ok(None) => {}
            Err(err) => settlement.reject(err),
        }
    })
}

async fn run_call<T>(
    config: &EndpointConfig,
    descriptor: &RequestDescriptor,
    settlement: &Settlement<T>,
) -> Result<Option<ResponseBody>, BrokerError> {
    let url = build_url(config, descriptor);
    let body = build_body(descriptor)?;
    let headers = build_headers(config, descriptor).await?;

    if settlement.is_cancelled() {
        return Ok(None);
    }

    let response = config
        .transport
        .send(TransportRequest {
            url: url.clone(),
            method: descriptor.method.clone(),
            headers,
            body,
        })
        .await?;

    let body = match descriptor
        .response_header
        .as_deref()
        .and_then(|name| header_value(&response.headers, name))
    {
        Some(value) => ResponseBody::Text(value),
        None => decode_body(&response),
    };

    let outcome = CallOutcome {
        url,
        ok: (200..300).contains(&response.status),
        status: response.status,
        status_text: response.status_text,
        body,
    };

    check_error_codes(descriptor, outcome).map(Some)
}

fn build_url(config: &EndpointConfig, descriptor: &RequestDescriptor) -> String {
    let path = expand_template(config, descriptor);
    let query = build_query_string(&descriptor.query);

    let mut url = format!("{}{}", config.base, path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

fn expand_template(config: &EndpointConfig, descriptor: &RequestDescriptor) -> String {
    let template = descriptor.url.replace("{api-version}", &config.version);

    let mut expanded = String::with_capacity(template.len());
    let mut rest = template.as_str();
    while let Some(start) = rest.find('{') {
        expanded.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let Some(end) = candidate.find('}') else {
            rest = candidate;
            break;
        };
        match descriptor.path.get(&candidate[1..end]) {
            Some(value) => expanded.push_str(&encode_path_value(config, value)),
            // tolerant matching: placeholders without a path entry stay verbatim
            None => expanded.push_str(&candidate[..=end]),
        }
        rest = &candidate[end + 1..];
    }
    expanded.push_str(rest);
    expanded
}

fn encode_path_value(config: &EndpointConfig, value: &str) -> String {
    match &config.path_encoder {
        Some(encoder) => encoder(value),
        None => url_encode(value.as_bytes()),
    }
}

fn build_query_string(query: &[(String, Value)]) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        append_query_value(&mut pairs, key, value);
    }
    pairs.join("&")
}

fn append_query_value(pairs: &mut Vec<String>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                append_query_value(pairs, key, item);
            }
        }
        Value::Object(fields) => {
            for (name, item) in fields {
                append_query_value(pairs, &format!("{key}[{name}]"), item);
            }
        }
        Value::String(text) => push_query_pair(pairs, key, text),
        scalar => push_query_pair(pairs, key, &scalar.to_string()),
    }
}

fn push_query_pair(pairs: &mut Vec<String>, key: &str, value: &str) {
    pairs.push(format!(
        "{}={}",
        url_encode(key.as_bytes()),
        url_encode(value.as_bytes())
    ));
}

async fn build_headers(
    config: &EndpointConfig,
    descriptor: &RequestDescriptor,
) -> Result<HashMap<String, String>, BrokerError> {
    let token = config.token.resolve(descriptor).await?;
    let username = config.username.resolve(descriptor).await?;
    let password = config.password.resolve(descriptor).await?;
    let extra_headers = config.headers.resolve(descriptor).await?;

    let mut headers =
        HashMap::from([(ACCEPT.to_string(), APPLICATION_JSON.to_string())]);
    if let Some(extra_headers) = extra_headers {
        headers.extend(extra_headers);
    }
    for (name, value) in &descriptor.headers {
        if let Some(value) = value {
            headers.insert(name.clone(), value.clone());
        }
    }

    if let Some(token) = token.filter(|token| !token.is_empty()) {
        headers.insert(AUTHORIZATION.into(), format!("Bearer {token}"));
    }

    // Runs after the bearer check, so a usable username/password pair
    // overwrites an already-set bearer header.
    if let (Some(username), Some(password)) = (
        username.filter(|name| !name.is_empty()),
        password.filter(|word| !word.is_empty()),
    ) {
        let credentials = general_purpose::STANDARD.encode(format!("{username}:{password}"));
        headers.insert(AUTHORIZATION.into(), format!("Basic {credentials}"));
    }

    if let Some(body) = &descriptor.body {
        if let Some(content_type) = content_type_for(descriptor, body) {
            headers.insert(CONTENT_TYPE.into(), content_type);
        }
    }

    Ok(headers)
}

fn content_type_for(descriptor: &RequestDescriptor, body: &RequestBody) -> Option<String> {
    // multipart boundaries are the transport's business
    if matches!(body, RequestBody::Multipart(_)) {
        return None;
    }
    if let Some(media_type) = &descriptor.media_type {
        return Some(media_type.clone());
    }
    match body {
        RequestBody::Binary { content_type, .. } => Some(
            content_type
                .clone()
                .unwrap_or_else(|| APPLICATION_OCTET_STREAM.into()),
        ),
        RequestBody::Text(_) => Some(TEXT_PLAIN.into()),
        RequestBody::Json(_) => Some(APPLICATION_JSON.into()),
        RequestBody::Multipart(_) => None,
    }
}

fn build_body(descriptor: &RequestDescriptor) -> Result<Option<TransportBody>, BrokerError> {
    let Some(body) = &descriptor.body else {
        return Ok(None);
    };
    let encoded = match body {
        RequestBody::Json(value) => TransportBody::Bytes(
            serde_json::to_vec(value).map_err(|err| BrokerError::Serialization(err.to_string()))?,
        ),
        RequestBody::Text(text) => TransportBody::Bytes(text.clone().into_bytes()),
        RequestBody::Binary { data, .. } => TransportBody::Bytes(data.clone()),
        RequestBody::Multipart(parts) => TransportBody::Multipart(parts.clone()),
    };
    Ok(Some(encoded))
}

fn header_value(headers: &HashMap<String, String>, name: &str) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
}

fn decode_body(response: &TransportResponse) -> ResponseBody {
    if response.status == 204 {
        return ResponseBody::Empty;
    }
    let Some(content_type) = header_value(&response.headers, CONTENT_TYPE) else {
        return ResponseBody::Empty;
    };
    let Some(bytes) = response.body.as_deref() else {
        return ResponseBody::Empty;
    };

    if content_type.to_lowercase().starts_with(APPLICATION_JSON) {
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(err) => {
                error!("Failed to decode response body: {err}");
                ResponseBody::Empty
            }
        }
    } else {
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => ResponseBody::Text(text),
            Err(err) => {
                error!("Failed to decode response body: {err}");
                ResponseBody::Empty
            }
        }
    }
}

fn check_error_codes(
    descriptor: &RequestDescriptor,
    outcome: CallOutcome,
) -> Result<ResponseBody, BrokerError> {
    let message = descriptor.errors.get(&outcome.status).cloned().or_else(|| {
        DEFAULT_ERROR_TABLE
            .iter()
            .find(|(status, _)| *status == outcome.status)
            .map(|(_, message)| (*message).to_string())
    });

    let message = match message {
        Some(message) => message,
        None if !outcome.ok => "Generic Error".to_string(),
        None => return Ok(outcome.body),
    };

    let api_error = ApiError {
        method: descriptor.method.clone(),
        url: outcome.url,
        status: outcome.status,
        status_text: outcome.status_text,
        body: outcome.body,
        message,
    };
    error!("{}", api_error.status_text);
    Err(api_error.into())
}

#[cfg(test)]
mod should {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;
    use test_case::test_case;

    #[derive(Default)]
    struct MockTransport {
        response: TransportResponse,
        seen: Arc<Mutex<Option<TransportRequest>>>,
    }

    impl MockTransport {
        fn with_response(response: TransportResponse) -> Self {
            Self {
                response,
                seen: Arc::default(),
            }
        }

        fn ok_json(body: &str) -> Self {
            Self::with_response(TransportResponse {
                status: 200,
                status_text: "OK".into(),
                headers: HashMap::from([(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]),
                body: Some(body.as_bytes().to_vec()),
            })
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(&self, req: TransportRequest) -> Result<TransportResponse, BrokerError> {
            *self.seen.lock().unwrap() = Some(req);
            Ok(self.response.clone())
        }
    }

    fn config_with(transport: MockTransport) -> (EndpointConfig, Arc<Mutex<Option<TransportRequest>>>) {
        let seen = transport.seen.clone();
        (EndpointConfig::new("https://x", Arc::new(transport)), seen)
    }

    fn sent(seen: &Arc<Mutex<Option<TransportRequest>>>) -> TransportRequest {
        seen.lock().unwrap().clone().expect("transport not called")
    }

    struct FixedToken(&'static str);

    #[async_trait::async_trait]
    impl CredentialResolver<String> for FixedToken {
        async fn resolve(&self, _: &RequestDescriptor) -> Result<String, BrokerError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingResolver;

    #[async_trait::async_trait]
    impl CredentialResolver<String> for FailingResolver {
        async fn resolve(&self, _: &RequestDescriptor) -> Result<String, BrokerError> {
            Err(BrokerError::Transport("token endpoint unreachable".into()))
        }
    }

    #[test]
    fn keep_unmatched_placeholders_verbatim() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()));
        let descriptor = RequestDescriptor {
            url: "/Catalog/{resource-id}/{unknown}".into(),
            path: HashMap::from([("resource-id".into(), "res 1".into())]),
            ..Default::default()
        };

        assert_eq!(
            build_url(&config, &descriptor),
            "https://x/Catalog/res%201/{unknown}"
        );
    }

    #[test]
    fn substitute_api_version() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_version("2.0.0");
        let descriptor = RequestDescriptor {
            url: "/{api-version}/Catalog".into(),
            ..Default::default()
        };

        assert_eq!(build_url(&config, &descriptor), "https://x/2.0.0/Catalog");
    }

    #[test]
    fn apply_custom_path_encoder() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_path_encoder(|value| value.to_uppercase());
        let descriptor = RequestDescriptor {
            url: "/Catalog/{id}".into(),
            path: HashMap::from([("id".into(), "abc".into())]),
            ..Default::default()
        };

        assert_eq!(build_url(&config, &descriptor), "https://x/Catalog/ABC");
    }

    #[test_case(vec![("a".into(), json!(null))], "" ; "top level null")]
    #[test_case(vec![("a".into(), json!({"b": null, "c": 1}))], "a[c]=1" ; "nested null")]
    #[test_case(vec![("k".into(), json!(["a", "b"]))], "k=a&k=b" ; "array order")]
    #[test_case(vec![("f".into(), json!({"x": {"y": "z"}}))], "f[x][y]=z" ; "nested objects")]
    #[test_case(vec![("b".into(), json!(true)), ("n".into(), json!(2))], "b=true&n=2" ; "scalars")]
    #[test_case(vec![("q".into(), json!("a b"))], "q=a%20b" ; "percent encoding")]
    fn flatten_query_parameters(query: Vec<(String, Value)>, expected: &str) {
        assert_eq!(build_query_string(&query), expected);
    }

    #[tokio::test]
    async fn set_bearer_header_from_token() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_token("secret");

        let headers = build_headers(&config, &RequestDescriptor::default())
            .await
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
        assert_eq!(headers.get(ACCEPT).unwrap(), APPLICATION_JSON);
    }

    #[tokio::test]
    async fn let_basic_auth_overwrite_bearer_when_both_resolve() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_token("secret")
            .with_basic_auth("user", "pass");

        let headers = build_headers(&config, &RequestDescriptor::default())
            .await
            .unwrap();
        // base64("user:pass")
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[tokio::test]
    async fn keep_bearer_when_basic_auth_is_incomplete() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_token("secret")
            .with_basic_auth("user", "");

        let headers = build_headers(&config, &RequestDescriptor::default())
            .await
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[tokio::test]
    async fn resolve_deferred_token() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_token(CredentialSource::Resolver(Arc::new(FixedToken("deferred"))));

        let headers = build_headers(&config, &RequestDescriptor::default())
            .await
            .unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer deferred");
    }

    #[tokio::test]
    async fn reject_when_resolver_fails() {
        let (config, seen) = config_with(MockTransport::ok_json("{}"));
        let config = config.with_token(CredentialSource::Resolver(Arc::new(FailingResolver)));

        let result = perform_request::<Value>(&config, RequestDescriptor::default()).await;
        assert_eq!(
            result,
            Err(BrokerError::Transport("token endpoint unreachable".into()))
        );
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn drop_headers_without_value() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()));
        let descriptor = RequestDescriptor {
            headers: HashMap::from([
                ("ids-securityToken".to_string(), Some("dat".to_string())),
                ("ids-issued".to_string(), None),
            ]),
            ..Default::default()
        };

        let headers = build_headers(&config, &descriptor).await.unwrap();
        assert_eq!(headers.get("ids-securityToken").unwrap(), "dat");
        assert!(!headers.contains_key("ids-issued"));
    }

    #[tokio::test]
    async fn let_descriptor_headers_override_config_headers() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()))
            .with_headers(CredentialSource::Literal(HashMap::from([
                ("Accept".to_string(), "text/turtle".to_string()),
                ("X-Extra".to_string(), "config".to_string()),
            ])));
        let descriptor = RequestDescriptor {
            headers: HashMap::from([("X-Extra".to_string(), Some("call".to_string()))]),
            ..Default::default()
        };

        let headers = build_headers(&config, &descriptor).await.unwrap();
        assert_eq!(headers.get("Accept").unwrap(), "text/turtle");
        assert_eq!(headers.get("X-Extra").unwrap(), "call");
    }

    #[test_case(Some("application/ld+json".into()), None, "application/ld+json" ; "declared media type wins")]
    #[test_case(None, Some("image/png".into()), "image/png" ; "binary type")]
    #[test_case(None, None, APPLICATION_OCTET_STREAM ; "binary fallback")]
    #[tokio::test]
    async fn infer_content_type_for_binary_bodies(
        media_type: Option<String>,
        content_type: Option<String>,
        expected: &str,
    ) {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()));
        let descriptor = RequestDescriptor {
            body: Some(RequestBody::Binary {
                content_type,
                data: vec![1, 2, 3],
            }),
            media_type,
            ..Default::default()
        };

        let headers = build_headers(&config, &descriptor).await.unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), expected);
    }

    #[tokio::test]
    async fn infer_text_plain_for_string_bodies() {
        let config = EndpointConfig::new("https://x", Arc::new(MockTransport::default()));
        let descriptor = RequestDescriptor {
            body: Some(RequestBody::Text("hello".into())),
            ..Default::default()
        };

        let headers = build_headers(&config, &descriptor).await.unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), TEXT_PLAIN);
    }

    #[test]
    fn serialize_json_bodies() {
        let descriptor = RequestDescriptor {
            body: Some(RequestBody::Json(json!({"ids:title": "t"}))),
            media_type: Some(APPLICATION_JSON.into()),
            ..Default::default()
        };

        let body = build_body(&descriptor).unwrap().unwrap();
        assert_eq!(
            body,
            TransportBody::Bytes(br#"{"ids:title":"t"}"#.to_vec())
        );
    }

    #[test]
    fn pass_text_and_binary_bodies_through() {
        let text = RequestDescriptor {
            body: Some(RequestBody::Text("as is".into())),
            ..Default::default()
        };
        assert_eq!(
            build_body(&text).unwrap().unwrap(),
            TransportBody::Bytes(b"as is".to_vec())
        );

        let binary = RequestDescriptor {
            body: Some(RequestBody::Binary {
                content_type: None,
                data: vec![0, 159, 146, 150],
            }),
            ..Default::default()
        };
        assert_eq!(
            build_body(&binary).unwrap().unwrap(),
            TransportBody::Bytes(vec![0, 159, 146, 150])
        );
    }

    #[test]
    fn decode_204_as_empty_despite_content_type() {
        let response = TransportResponse {
            status: 204,
            status_text: "No Content".into(),
            headers: HashMap::from([(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]),
            body: Some(b"{}".to_vec()),
        };

        assert_eq!(decode_body(&response), ResponseBody::Empty);
    }

    #[test]
    fn decode_missing_content_type_as_empty() {
        let response = TransportResponse {
            status: 200,
            body: Some(b"ignored".to_vec()),
            ..Default::default()
        };

        assert_eq!(decode_body(&response), ResponseBody::Empty);
    }

    #[test]
    fn tolerate_broken_json_bodies() {
        let response = TransportResponse {
            status: 200,
            headers: HashMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: Some(b"{not json".to_vec()),
            ..Default::default()
        };

        assert_eq!(decode_body(&response), ResponseBody::Empty);
    }

    #[test]
    fn decode_text_bodies() {
        let response = TransportResponse {
            status: 200,
            headers: HashMap::from([(CONTENT_TYPE.to_string(), "text/turtle".to_string())]),
            body: Some(b"@prefix ids: <x>.".to_vec()),
            ..Default::default()
        };

        assert_eq!(
            decode_body(&response),
            ResponseBody::Text("@prefix ids: <x>.".into())
        );
    }

    #[tokio::test]
    async fn map_404_to_not_found_without_overrides() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 404,
            status_text: "Not Found".into(),
            ..Default::default()
        }));

        let error = perform_request::<Value>(&config, RequestDescriptor::default())
            .await
            .unwrap_err();
        match error {
            BrokerError::Api(api_error) => {
                assert_eq!(api_error.message, "Not Found");
                assert_eq!(api_error.status, 404);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn prefer_descriptor_error_overrides() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 403,
            status_text: "Forbidden".into(),
            ..Default::default()
        }));
        let descriptor = RequestDescriptor {
            errors: HashMap::from([(403, "Check your DAT".to_string())]),
            ..Default::default()
        };

        let error = perform_request::<Value>(&config, descriptor).await.unwrap_err();
        match error {
            BrokerError::Api(api_error) => assert_eq!(api_error.message, "Check your DAT"),
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn map_mapped_statuses_even_when_ok() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 200,
            status_text: "OK".into(),
            ..Default::default()
        }));
        let descriptor = RequestDescriptor {
            errors: HashMap::from([(200, "Unexpected success".to_string())]),
            ..Default::default()
        };

        let error = perform_request::<Value>(&config, descriptor).await.unwrap_err();
        match error {
            BrokerError::Api(api_error) => assert_eq!(api_error.message, "Unexpected success"),
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn map_unlisted_failure_statuses_to_generic_error() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 418,
            status_text: "I'm a teapot".into(),
            ..Default::default()
        }));

        let error = perform_request::<Value>(&config, RequestDescriptor::default())
            .await
            .unwrap_err();
        match error {
            BrokerError::Api(api_error) => {
                assert_eq!(api_error.message, "Generic Error");
                assert_eq!(api_error.status_text, "I'm a teapot");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_204_as_null_body() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 204,
            status_text: "No Content".into(),
            headers: HashMap::from([(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())]),
            ..Default::default()
        }));

        let result = perform_request::<Option<String>>(&config, RequestDescriptor::default())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn surface_response_header_instead_of_body() {
        let (config, _) = config_with(MockTransport::with_response(TransportResponse {
            status: 200,
            status_text: "OK".into(),
            headers: HashMap::from([
                (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
                ("ids-modelVersion".to_string(), "4.2.7".to_string()),
            ]),
            body: Some(b"{\"discarded\": true}".to_vec()),
        }));
        let descriptor = RequestDescriptor {
            response_header: Some("ids-modelVersion".into()),
            ..Default::default()
        };

        let version = perform_request::<String>(&config, descriptor).await.unwrap();
        assert_eq!(version, "4.2.7");
    }

    #[tokio::test]
    async fn skip_transport_when_cancelled_before_commit() {
        let (config, seen) = config_with(MockTransport::ok_json("{}"));

        let request = perform_request::<Value>(&config, RequestDescriptor::default());
        request.cancel();

        assert!(request.await.unwrap_err().is_cancelled());
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn reject_immediately_when_cancelled_mid_flight() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct BlockingTransport {
            release: Mutex<Option<futures::channel::oneshot::Receiver<()>>>,
            started: Arc<AtomicBool>,
            completed: Arc<AtomicBool>,
        }

        #[async_trait::async_trait]
        impl Transport for BlockingTransport {
            async fn send(&self, _: TransportRequest) -> Result<TransportResponse, BrokerError> {
                let release = self.release.lock().unwrap().take().unwrap();
                self.started.store(true, Ordering::SeqCst);
                let _ = release.await;
                self.completed.store(true, Ordering::SeqCst);
                Ok(TransportResponse::default())
            }
        }

        let (_release, receiver) = futures::channel::oneshot::channel();
        let started = Arc::new(AtomicBool::new(false));
        let completed = Arc::new(AtomicBool::new(false));
        let config = EndpointConfig::new(
            "https://x",
            Arc::new(BlockingTransport {
                release: Mutex::new(Some(receiver)),
                started: started.clone(),
                completed: completed.clone(),
            }),
        );

        let mut request = perform_request::<Value>(&config, RequestDescriptor::default());
        let handle = request.handle();

        // first poll commits the transport call, which then blocks
        assert!(futures::poll!(&mut request).is_pending());
        assert!(started.load(Ordering::SeqCst));

        handle.cancel();

        // the caller is rejected right away; the round trip never finishes
        let error = request.await.unwrap_err();
        assert!(error.is_cancelled());
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn compose_url_end_to_end() {
        let (config, seen) = config_with(MockTransport::ok_json("{}"));
        let descriptor = RequestDescriptor {
            method: TransportMethod::Get,
            url: "/Catalog".into(),
            query: vec![
                ("sort".into(), json!("asc")),
                ("ids".into(), json!([1, 2])),
            ],
            ..Default::default()
        };

        perform_request::<Value>(&config, descriptor).await.unwrap();
        assert_eq!(sent(&seen).url, "https://x/Catalog?sort=asc&ids=1&ids=2");
    }

    #[tokio::test]
    async fn resolve_typed_payloads() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Payload {
            #[serde(rename = "ids:title")]
            title: String,
        }

        let (config, _) = config_with(MockTransport::ok_json(r#"{"ids:title": "Broker"}"#));

        let payload = perform_request::<Payload>(&config, RequestDescriptor::default())
            .await
            .unwrap();
        assert_eq!(
            payload,
            Payload {
                title: "Broker".into()
            }
        );
    }

    #[tokio::test]
    async fn reject_with_deserialization_error_on_mismatched_payload() {
        #[derive(serde::Deserialize, Debug)]
        struct Payload {
            #[serde(rename = "ids:title")]
            #[allow(dead_code)]
            title: String,
        }

        let (config, _) = config_with(MockTransport::ok_json(r#"{"other": 1}"#));

        let error = perform_request::<Payload>(&config, RequestDescriptor::default())
            .await
            .unwrap_err();
        assert!(matches!(error, BrokerError::Deserialization(_)));
    }
}
