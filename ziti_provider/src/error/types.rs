//! Primary error enum for the connector.

use thiserror::Error;

/// Errors raised while converting values or talking to the controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZitiError {
    /// A value did not have the kind the operation requires.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the operation accepts.
        expected: &'static str,
        /// Kind that was supplied.
        found: String,
    },

    /// Encoding a value to its JSON wire form failed.
    #[error("failed to encode wire payload: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Decoding a JSON wire form into a typed payload failed.
    #[error("failed to decode wire payload: {0}")]
    Unmarshal(#[source] serde_json::Error),

    /// A declarative value kind has no native counterpart in this context.
    #[error("attribute '{key}' holds a {kind} value, which has no native form")]
    UnsupportedKind {
        /// Attribute holding the value.
        key: String,
        /// Declarative kind that was rejected.
        kind: &'static str,
    },

    /// A declarative value does not match its declared shape.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Attribute or element path that failed.
        key: String,
        /// Human-readable explanation.
        message: String,
    },

    /// The controller has no entity with the requested id.
    #[error("{entity} '{id}' was not found")]
    NotFound {
        /// Kind of controller entity.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The controller answered with a non-success status.
    #[error("management API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Controller error message, or the raw body when unstructured.
        message: String,
    },

    /// The HTTP request could not be completed.
    #[error("management API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider settings could not be gathered.
    #[error("invalid provider configuration: {0}")]
    Configuration(#[source] Box<figment::Error>),

    /// The management endpoint is not a valid URL.
    #[error("invalid management endpoint '{endpoint}': {source}")]
    Endpoint {
        /// Endpoint as supplied.
        endpoint: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// The CA pool could not be decoded into trust roots.
    #[error("invalid CA pool: {0}")]
    CaPool(String),
}
