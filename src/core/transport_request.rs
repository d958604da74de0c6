//! # Transport Request
//!
//! This module contains the `TransportRequest` struct and related types.
//!
//! The request pipeline composes one `TransportRequest` per call and hands
//! it to the [`Transport`] implementation.
//!
//! [`Transport`]: ../transport/trait.Transport.html

use std::{collections::HashMap, fmt::Display};

use serde_json::Value;

use crate::core::BrokerError;

/// The method to use for a request.
///
/// This enum represents the method to use for a request. It is used by the
/// [`TransportRequest`] struct.
///
/// [`TransportRequest`]: struct.TransportRequest.html
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub enum TransportMethod {
    /// `GET` request
    #[default]
    Get,

    /// `POST` request
    Post,

    /// `PUT` request
    Put,

    /// `PATCH` request
    Patch,

    /// `DELETE` request
    Delete,

    /// `HEAD` request
    Head,

    /// `OPTIONS` request
    Options,
}

impl Display for TransportMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransportMethod::Get => "GET",
                TransportMethod::Post => "POST",
                TransportMethod::Put => "PUT",
                TransportMethod::Patch => "PATCH",
                TransportMethod::Delete => "DELETE",
                TransportMethod::Head => "HEAD",
                TransportMethod::Options => "OPTIONS",
            }
        )
    }
}

/// One part of a `multipart/form-data` body.
///
/// Parts are passed through to the transport's own multipart encoding
/// untouched by the request pipeline.
#[derive(Clone, PartialEq, Debug)]
pub struct FormPart {
    /// form field name of the part
    pub name: String,

    /// payload of the part
    pub value: FormValue,
}

impl FormPart {
    /// A plain-text part.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    /// A JSON part serialized from `value`.
    pub fn json<T: serde::Serialize>(name: impl Into<String>, value: &T) -> Result<Self, BrokerError> {
        Ok(Self {
            name: name.into(),
            value: FormValue::Json(
                serde_json::to_value(value)
                    .map_err(|err| BrokerError::Serialization(err.to_string()))?,
            ),
        })
    }

    /// A file part with raw content.
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                filename: filename.into(),
                content_type,
                data,
            },
        }
    }
}

/// Payload of a [`FormPart`].
#[derive(Clone, PartialEq, Debug)]
pub enum FormValue {
    /// plain text content
    Text(String),

    /// JSON content, sent as `application/json`
    Json(Value),

    /// raw file content
    File {
        /// file name announced in the part headers
        filename: String,
        /// media type of the content, if known
        content_type: Option<String>,
        /// raw content bytes
        data: Vec<u8>,
    },
}

/// Wire-level body of a [`TransportRequest`].
#[derive(Clone, PartialEq, Debug)]
pub enum TransportBody {
    /// already-encoded bytes, sent as-is
    Bytes(Vec<u8>),

    /// multipart parts, encoded by the transport itself
    Multipart(Vec<FormPart>),
}

/// This struct represents a request to be sent to the broker.
///
/// This struct represents a request to be sent to the broker. It is used by
/// the [`Transport`] trait.
///
/// All fields are representing certain parts of the request that can be used
/// to prepare one.
///
/// [`Transport`]: ../transport/trait.Transport.html
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TransportRequest {
    /// fully composed target URL, including the query string
    pub url: String,

    /// method to use for the request
    pub method: TransportMethod,

    /// headers to be sent with the request
    pub headers: HashMap<String, String>,

    /// body to be sent with the request
    pub body: Option<TransportBody>,
}
