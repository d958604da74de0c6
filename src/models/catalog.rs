use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Resource;

/// The catalog of IDS Resources registered at the broker, an LDP
/// container.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Catalog {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    /// resources offered through this catalog
    #[serde(rename = "ids:offer", default, skip_serializing_if = "Vec::is_empty")]
    pub offer: Vec<Resource>,

    /// member resources of the container
    #[serde(rename = "ldp:contains", default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<Resource>,
}
