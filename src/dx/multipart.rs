//! # Multipart interactions API
//!
//! IDS Multipart Message endpoints. Each interaction carries an IDS
//! Message instance in the `header` form part and an optional `payload`
//! part; higher-level errors arrive as a `rejectionReason` inside the
//! response header part, not as HTTP error statuses.

use crate::core::{
    perform_request, CancelableRequest, EndpointConfig, FormPart, RequestBody, RequestDescriptor,
    TransportMethod,
};
use crate::models::{IdsMessage, MultipartResponse};

/// IDS Multipart Message interactions, reached through
/// [`BrokerClient::multipart`].
///
/// [`BrokerClient::multipart`]: crate::dx::BrokerClient::multipart
pub struct MultipartApi<'a> {
    pub(crate) config: &'a EndpointConfig,
}

impl MultipartApi<'_> {
    /// Infrastructure related IDS Multipart Message endpoint.
    ///
    /// The main interaction point for onboarding and updating of metadata
    /// at the broker, e.g. ConnectorAvailableMessage or
    /// ResourceUpdateMessage.
    pub fn post_infrastructure(
        &self,
        header: &IdsMessage,
        payload: Option<&serde_json::Value>,
    ) -> CancelableRequest<MultipartResponse> {
        self.post_message("/infrastructure", header, payload)
    }

    /// Content related interactions with the indexed data, mainly
    /// QueryMessage and DescriptionRequestMessage.
    pub fn post_data(
        &self,
        header: &IdsMessage,
        payload: Option<&serde_json::Value>,
    ) -> CancelableRequest<MultipartResponse> {
        self.post_message("/data", header, payload)
    }

    fn post_message(
        &self,
        url: &str,
        header: &IdsMessage,
        payload: Option<&serde_json::Value>,
    ) -> CancelableRequest<MultipartResponse> {
        let mut parts = match FormPart::json("header", header) {
            Ok(part) => vec![part],
            Err(err) => return CancelableRequest::rejected(err),
        };
        if let Some(payload) = payload {
            match FormPart::json("payload", payload) {
                Ok(part) => parts.push(part),
                Err(err) => return CancelableRequest::rejected(err),
            }
        }
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Post,
                url: url.into(),
                body: Some(RequestBody::Multipart(parts)),
                media_type: Some("multipart/form-data".into()),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod should {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use crate::core::{
        BrokerError, FormValue, Transport, TransportBody, TransportRequest, TransportResponse,
    };
    use crate::dx::BrokerClient;
    use crate::models::IdsMessage;

    struct RecordingTransport {
        seen: Arc<Mutex<Option<TransportRequest>>>,
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, req: TransportRequest) -> Result<TransportResponse, BrokerError> {
            *self.seen.lock().unwrap() = Some(req);
            Ok(TransportResponse {
                status: 200,
                status_text: "OK".into(),
                headers: HashMap::from([(
                    "Content-Type".to_string(),
                    "application/json".to_string(),
                )]),
                body: Some(
                    br#"{"header": {"@type": "ids:RejectionMessage", "rejectionReason": "idsc:NOT_AUTHORIZED"}}"#
                        .to_vec(),
                ),
            })
        }
    }

    #[tokio::test]
    async fn post_header_and_payload_parts() {
        let seen = Arc::new(Mutex::new(None));
        let client = BrokerClient::with_transport(
            "https://broker.example",
            Arc::new(RecordingTransport { seen: seen.clone() }),
        );

        let header = IdsMessage {
            type_field: Some("ids:ConnectorAvailableMessage".into()),
            model_version: Some("4.2.7".into()),
            ..Default::default()
        };
        let response = client
            .multipart()
            .post_infrastructure(&header, Some(&json!({"@type": "ids:BaseConnector"})))
            .await
            .unwrap();

        assert_eq!(
            response
                .header
                .and_then(|header| header.rejection_reason)
                .map(|reason| format!("{reason:?}")),
            Some("NotAuthorized".to_string())
        );

        let sent = seen.lock().unwrap().clone().unwrap();
        assert_eq!(sent.url, "https://broker.example/infrastructure");
        // multipart boundaries belong to the transport
        assert!(!sent.headers.contains_key("Content-Type"));
        match sent.body.unwrap() {
            TransportBody::Multipart(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].name, "header");
                assert!(matches!(parts[0].value, FormValue::Json(_)));
                assert_eq!(parts[1].name, "payload");
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn omit_the_payload_part_when_absent() {
        let seen = Arc::new(Mutex::new(None));
        let client = BrokerClient::with_transport(
            "https://broker.example",
            Arc::new(RecordingTransport { seen: seen.clone() }),
        );

        client
            .multipart()
            .post_data(&IdsMessage::default(), None)
            .await
            .unwrap();

        let sent = seen.lock().unwrap().clone().unwrap();
        assert_eq!(sent.url, "https://broker.example/data");
        match sent.body.unwrap() {
            TransportBody::Multipart(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].name, "header");
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }
}
