use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Catalog, IdRef};

/// Self-description of a connector or broker, as answered by the broker
/// root resource.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Connector {
    /// JSON-LD context of the document
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    #[serde(rename = "ids:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        rename = "ids:description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// participant curating the metadata offered by this connector
    #[serde(rename = "ids:curator", default, skip_serializing_if = "Option::is_none")]
    pub curator: Option<String>,

    /// participant operating this connector
    #[serde(
        rename = "ids:maintainer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub maintainer: Option<String>,

    /// Information Model versions this connector accepts
    #[serde(
        rename = "ids:inboundModelVersion",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub inbound_model_version: Vec<String>,

    /// Information Model version this connector emits
    #[serde(
        rename = "ids:outboundModelVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub outbound_model_version: Option<String>,

    #[serde(rename = "ids:catalog", default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,

    #[serde(
        rename = "ldp:contains",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contains: Option<IdRef>,
}
