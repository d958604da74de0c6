use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::IdRef;

/// A single IDS Resource of the catalog.
///
/// Coverage and refinement fields nest further resources, so those are
/// boxed.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Resource {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@type", default, skip_serializing_if = "Vec::is_empty")]
    pub type_field: Vec<String>,

    #[serde(rename = "ids:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(
        rename = "ids:description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(rename = "ids:comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(rename = "ids:sample", default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,

    #[serde(rename = "ids:keyword", default, skip_serializing_if = "Vec::is_empty")]
    pub keyword: Vec<String>,

    #[serde(
        rename = "ids:resourcePart",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resource_part: Vec<Resource>,

    #[serde(
        rename = "ids:contentRefinement",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_refinement: Option<String>,

    #[serde(
        rename = "ids:temporalCoverage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub temporal_coverage: Option<TemporalCoverage>,

    #[serde(
        rename = "ids:spatialCoverage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spatial_coverage: Option<Box<Resource>>,

    #[serde(rename = "ids:theme", default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Box<Resource>>,

    #[serde(rename = "ids:language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<IdRef>,

    #[serde(
        rename = "ids:contractOffer",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub contract_offer: Vec<Resource>,

    #[serde(rename = "ldp:contains", default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<Resource>,

    #[serde(
        rename = "ids:defaultRepresentation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub default_representation: Vec<Representation>,

    #[serde(
        rename = "ids:representation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub representation: Vec<Representation>,
}

/// Time span covered by the content of a resource.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct TemporalCoverage {
    #[serde(rename = "ids:beginning", default, skip_serializing_if = "Option::is_none")]
    pub beginning: Option<String>,

    #[serde(rename = "ids:end", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A concrete materialization of a resource.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct Representation {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub type_field: Option<String>,

    #[serde(rename = "ids:mediaType", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<IdRef>,

    #[serde(
        rename = "ids:instance",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub instance: Vec<IdRef>,
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn decode_a_nested_resource() {
        let document = r#"{
            "@id": "https://broker.example/Catalog/weather-data",
            "@type": ["ids:Resource", "ldp:Container"],
            "ids:title": "weather data",
            "ids:keyword": ["weather", "sensor"],
            "ids:temporalCoverage": {
                "ids:beginning": "2023-01-01T00:00:00Z",
                "ids:end": "2023-12-31T23:59:59Z"
            },
            "ids:representation": [{"ids:mediaType": {"@id": "idsc:JSON"}}]
        }"#;

        let resource: Resource = serde_json::from_str(document).unwrap();

        assert_eq!(resource.type_field, vec!["ids:Resource", "ldp:Container"]);
        assert_eq!(resource.keyword, vec!["weather", "sensor"]);
        assert_eq!(
            resource
                .temporal_coverage
                .unwrap()
                .beginning
                .as_deref(),
            Some("2023-01-01T00:00:00Z")
        );
        assert_eq!(
            resource.representation[0]
                .media_type
                .as_ref()
                .and_then(|media_type| media_type.id.as_deref()),
            Some("idsc:JSON")
        );
    }
}
