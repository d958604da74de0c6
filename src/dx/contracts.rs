//! # Contracts API

use std::collections::HashMap;

use serde_json::Value;

use crate::core::{
    perform_request, CancelableRequest, EndpointConfig, RequestDescriptor, TransportMethod,
};

/// Operations on contracts attached to catalog resources, reached through
/// [`BrokerClient::contracts`].
///
/// [`BrokerClient::contracts`]: crate::dx::BrokerClient::contracts
pub struct ContractsApi<'a> {
    pub(crate) config: &'a EndpointConfig,
}

impl ContractsApi<'_> {
    /// Read one contract of a catalog resource.
    pub fn get(
        &self,
        resource_id: impl Into<String>,
        contract_id: impl Into<String>,
    ) -> CancelableRequest<Value> {
        perform_request(
            self.config,
            RequestDescriptor {
                method: TransportMethod::Get,
                url: "/Catalog/{resource-id}/{contract-id}".into(),
                path: HashMap::from([
                    ("resource-id".into(), resource_id.into()),
                    ("contract-id".into(), contract_id.into()),
                ]),
                ..Default::default()
            },
        )
    }
}

#[cfg(test)]
mod should {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::core::{BrokerError, Transport, TransportRequest, TransportResponse};
    use crate::dx::BrokerClient;

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
                body: Some(b"{}".to_vec()),
            })
        }
    }

    #[tokio::test]
    async fn expand_both_path_parameters() {
        let seen = Arc::new(Mutex::new(None));
        let client = BrokerClient::with_transport(
            "https://broker.example",
            Arc::new(RecordingTransport { seen: seen.clone() }),
        );

        client
            .contracts()
            .get("res 1", "contract-1")
            .await
            .unwrap();

        let sent = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            sent.url,
            "https://broker.example/Catalog/res%201/contract-1"
        );
    }
}
