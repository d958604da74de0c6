use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::RejectionCode;

/// A bare JSON-LD reference, `{"@id": "..."}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct IdRef {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl IdRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

/// The Dynamic Attribute Token inside an IDS Message.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecurityToken {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_format: Option<IdRef>,
}

/// The IDS Message instance of the `header` part of a Multipart
/// interaction.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdsMessage {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_connector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_token: Option<SecurityToken>,

    /// artifact a DescriptionRequestMessage asks for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_artifact: Option<String>,

    /// set on RejectionMessage responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionCode>,
}

/// The decoded response of a Multipart interaction.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct MultipartResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<IdsMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}
