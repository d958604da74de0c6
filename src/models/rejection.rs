use serde::{Deserialize, Serialize};

/// Rejection reason of an IDS response message.
///
/// Arrives in the `rejectionReason` field of the response header part of
/// a Multipart interaction; the HTTP status of such a response is still
/// 200.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum RejectionCode {
    #[serde(rename = "idsc:NOT_FOUND")]
    NotFound,

    #[serde(rename = "idsc:NOT_AUTHENTICATED")]
    NotAuthenticated,

    #[serde(rename = "idsc:NOT_AUTHORIZED")]
    NotAuthorized,

    #[serde(rename = "idsc:TOO_MANY_RESULTS")]
    TooManyResults,

    #[serde(rename = "idsc:MALFORMED_MESSAGE")]
    MalformedMessage,

    #[serde(rename = "idsc:INTERNAL_RECIPIENT_ERROR")]
    InternalRecipientError,

    #[serde(rename = "idsc:METHOD_NOT_SUPPORTED")]
    MethodNotSupported,

    #[serde(rename = "idsc:MESSAGE_TYPE_NOT_SUPPORTED")]
    MessageTypeNotSupported,

    #[serde(rename = "idsc:VERSION_NOT_SUPPORTED")]
    VersionNotSupported,

    #[serde(rename = "idsc:BAD_PARAMETERS")]
    BadParameters,

    #[serde(rename = "idsc:TEMPORARILY_NOT_AVAILABLE")]
    TemporarilyNotAvailable,
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn use_the_idsc_prefixed_wire_names() {
        assert_eq!(
            serde_json::to_string(&RejectionCode::NotAuthorized).unwrap(),
            "\"idsc:NOT_AUTHORIZED\""
        );
        assert_eq!(
            serde_json::from_str::<RejectionCode>("\"idsc:TEMPORARILY_NOT_AVAILABLE\"").unwrap(),
            RejectionCode::TemporarilyNotAvailable
        );
    }
}
