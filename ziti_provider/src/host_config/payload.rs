//! Wire payload of a `host.v1` config.
//!
//! Every field is optional so an absent wire field stays distinguishable
//! from a zero one. Serialization keeps absent fields as `null`; request
//! bodies drop them through [`crate::reflect::ReflectPolicy::WRITE`].

use serde::{Deserialize, Serialize};

/// `host.v1` config data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfigPayload {
    /// Fixed target address.
    pub address: Option<String>,
    /// Fixed target port.
    pub port: Option<i32>,
    /// Fixed target protocol.
    pub protocol: Option<String>,
    /// Forward the dialed protocol.
    pub forward_protocol: Option<bool>,
    /// Forward the dialed port.
    pub forward_port: Option<bool>,
    /// Forward the dialed address.
    pub forward_address: Option<bool>,
    /// Protocols allowed when forwarding the protocol.
    pub allowed_protocols: Option<Vec<String>>,
    /// Addresses allowed when forwarding the address.
    pub allowed_addresses: Option<Vec<String>>,
    /// Source addresses allowed to bind.
    pub allowed_source_addresses: Option<Vec<String>>,
    /// Port ranges allowed when forwarding the port.
    pub allowed_port_ranges: Option<Vec<PortRange>>,
    /// Terminator listen options.
    pub listen_options: Option<ListenOptions>,
    /// HTTP health checks.
    pub http_checks: Option<Vec<HttpCheck>>,
    /// Port health checks.
    pub port_checks: Option<Vec<PortCheck>>,
}

/// Inclusive port range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortRange {
    /// Lowest port.
    pub low: i32,
    /// Highest port.
    pub high: i32,
}

/// Terminator listen options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenOptions {
    /// Bind using the hosting identity's name.
    pub bind_using_edge_identity: Option<bool>,
    /// Dial timeout, as a duration string.
    pub connect_timeout: Option<String>,
    /// Terminator cost.
    pub cost: Option<i32>,
    /// Maximum concurrent connections.
    pub max_connections: Option<i32>,
    /// Terminator precedence.
    pub precedence: Option<String>,
}

/// Action taken on a health-check result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAction {
    /// `pass`, `fail`, or `change`.
    pub trigger: Option<String>,
    /// Minimum time the trigger must hold.
    pub duration: Option<String>,
    /// Events required before acting.
    pub consecutive_events: Option<i32>,
    /// What to do.
    pub action: Option<String>,
}

/// HTTP health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCheck {
    /// URL to poll.
    pub url: Option<String>,
    /// HTTP method.
    pub method: Option<String>,
    /// Request body.
    pub body: Option<String>,
    /// Expected status code.
    pub expect_status: Option<i32>,
    /// Text expected in the response body.
    pub expect_in_body: Option<String>,
    /// Poll interval.
    pub interval: Option<String>,
    /// Request timeout.
    pub timeout: Option<String>,
    /// Actions on result.
    pub actions: Option<Vec<CheckAction>>,
}

/// TCP port health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortCheck {
    /// Address to dial.
    pub address: Option<String>,
    /// Poll interval.
    pub interval: Option<String>,
    /// Dial timeout.
    pub timeout: Option<String>,
    /// Actions on result.
    pub actions: Option<Vec<CheckAction>>,
}
