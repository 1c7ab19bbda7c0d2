//! Request and response bodies of the config endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /configs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCreate {
    /// Config name.
    pub name: String,
    /// Config type id.
    pub config_type_id: String,
    /// Type-specific payload.
    pub data: Map<String, Value>,
}

/// Body of `PUT /configs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Config name.
    pub name: String,
    /// Type-specific payload.
    pub data: Map<String, Value>,
}

/// A config as returned by detail and list calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDetail {
    /// Controller id.
    pub id: String,
    /// Config name.
    pub name: String,
    /// Config type id.
    pub config_type_id: String,
    /// Type-specific payload. Usually an object.
    #[serde(default)]
    pub data: Value,
}

/// The `{"data": ...}` wrapper around every controller response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Wrapped value.
    pub data: T,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    /// Error details.
    #[serde(default)]
    pub error: ApiError,
}

/// Controller error details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    /// Machine-readable code such as `NOT_FOUND`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorEnvelope {
    /// Best description of a failed call: `CODE: message` when the body is a
    /// controller error, otherwise the raw body.
    #[must_use]
    pub fn describe(body: &str) -> String {
        let Ok(envelope) = serde_json::from_str::<Self>(body) else {
            return body.to_owned();
        };
        match (envelope.error.code, envelope.error.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (None, Some(message)) => message,
            (Some(code), None) => code,
            (None, None) => body.to_owned(),
        }
    }
}

/// Query of `GET /configs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Filter expression.
    pub filter: String,
    /// Page size.
    pub limit: u32,
    /// Page offset.
    pub offset: u32,
}

impl ListQuery {
    /// Largest page the controller hands out.
    pub const MAX_LIMIT: u32 = 1000;

    /// First page of results for `filter`.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            limit: Self::MAX_LIMIT,
            offset: 0,
        }
    }
}
