//! Declarative models of the host config resource and data sources.

use crate::value::{Attr, ListValue, ObjectValue};
use crate::DeclarativeModel;

/// Attributes shared by the resource and the data source.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct HostConfigFields {
    /// Fixed target address.
    pub address: Attr<String>,
    /// Fixed target port.
    pub port: Attr<i32>,
    /// Fixed target protocol.
    pub protocol: Attr<String>,
    /// Forward the dialed protocol.
    pub forward_protocol: Attr<bool>,
    /// Forward the dialed port.
    pub forward_port: Attr<bool>,
    /// Forward the dialed address.
    pub forward_address: Attr<bool>,
    /// List of strings.
    pub allowed_protocols: ListValue,
    /// List of strings.
    pub allowed_addresses: ListValue,
    /// List of strings.
    pub allowed_source_addresses: ListValue,
    /// List of port range objects.
    pub allowed_port_ranges: ListValue,
    /// Listen options object.
    pub listen_options: ObjectValue,
    /// List of HTTP check objects.
    pub http_checks: ListValue,
    /// List of port check objects.
    pub port_checks: ListValue,
}

/// State of the `host_config_v1` resource.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct HostConfigModel {
    /// Controller id.
    pub id: Attr<String>,
    /// Config name.
    pub name: Attr<String>,
    /// Config type id; always `host.v1`.
    pub config_type_id: Attr<String>,
    /// Payload attributes.
    #[model(flatten)]
    pub fields: HostConfigFields,
}

/// State of the `host_config_v1` data source.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct HostConfigDataSourceModel {
    /// Raw filter expression.
    pub filter: Attr<String>,
    /// Look up by id.
    pub id: Attr<String>,
    /// Look up by name.
    pub name: Attr<String>,
    /// Accept the first of several matches.
    pub most_recent: Attr<bool>,
    /// Config type id of the match.
    pub config_type_id: Attr<String>,
    /// Payload attributes of the match.
    #[model(flatten)]
    pub fields: HostConfigFields,
}

/// State of the `host_config_v1_ids` data source.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct HostConfigIdsModel {
    /// Filter expression.
    pub filter: Attr<String>,
    /// Ids of every match.
    pub ids: ListValue,
}

/// Listen options object.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct ListenOptionsModel {
    /// Bind using the hosting identity's name.
    pub bind_using_edge_identity: Attr<bool>,
    /// Dial timeout.
    pub connect_timeout: Attr<String>,
    /// Terminator cost.
    pub cost: Attr<i32>,
    /// Maximum concurrent connections.
    pub max_connections: Attr<i32>,
    /// Terminator precedence.
    pub precedence: Attr<String>,
}

/// Port range object.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct PortRangeModel {
    /// Lowest port.
    pub low: Attr<i32>,
    /// Highest port.
    pub high: Attr<i32>,
}

/// Health-check action object.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct CheckActionModel {
    /// Trigger.
    pub trigger: Attr<String>,
    /// Duration.
    pub duration: Attr<String>,
    /// Action.
    pub action: Attr<String>,
    /// Consecutive events.
    pub consecutive_events: Attr<i32>,
}

/// HTTP check object.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct HttpCheckModel {
    /// URL.
    pub url: Attr<String>,
    /// Method.
    pub method: Attr<String>,
    /// Body.
    pub body: Attr<String>,
    /// Expected status.
    pub expect_status: Attr<i32>,
    /// Expected body text.
    pub expect_in_body: Attr<String>,
    /// Interval.
    pub interval: Attr<String>,
    /// Timeout.
    pub timeout: Attr<String>,
    /// List of action objects.
    pub actions: ListValue,
}

/// Port check object.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct PortCheckModel {
    /// Address.
    pub address: Attr<String>,
    /// Interval.
    pub interval: Attr<String>,
    /// Timeout.
    pub timeout: Attr<String>,
    /// List of action objects.
    pub actions: ListValue,
}
