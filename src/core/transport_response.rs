//! # Transport Response
//!
//! This module contains the `TransportResponse` struct, the normalized
//! result of one transport round trip before decoding and error mapping.

use std::collections::HashMap;

/// This struct represents the response from the broker.
///
/// Transport implementations fill it from the raw HTTP response; the request
/// pipeline decodes the body and maps error statuses afterwards.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TransportResponse {
    /// HTTP status code of the response
    pub status: u16,

    /// HTTP status text of the response
    pub status_text: String,

    /// headers of the response
    pub headers: HashMap<String, String>,

    /// body of the response
    pub body: Option<Vec<u8>>,
}
