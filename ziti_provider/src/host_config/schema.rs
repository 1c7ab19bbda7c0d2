//! Schemas of the host config resource and data sources.

use crate::schema::{Attribute, Schema};
use crate::value::{Attr, AttrType};

use super::CONFIG_TYPE_ID;

/// Attributes of one allowed port range.
#[must_use]
pub fn port_range_attributes() -> Vec<Attribute> {
    vec![
        Attribute::int32("low").required(),
        Attribute::int32("high").required(),
    ]
}

/// Attributes of the listen options object.
#[must_use]
pub fn listen_options_attributes() -> Vec<Attribute> {
    vec![
        Attribute::bool("bind_using_edge_identity"),
        Attribute::string("connect_timeout").with_default(Attr::known("5s".to_owned())),
        Attribute::int32("cost").with_default(Attr::known(0)),
        Attribute::int32("max_connections").with_default(Attr::known(65535)),
        Attribute::string("precedence").with_default(Attr::known("default".to_owned())),
    ]
}

/// Attributes of a health-check action.
#[must_use]
pub fn check_action_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("trigger").required(),
        Attribute::string("duration").required(),
        Attribute::string("action").required(),
        Attribute::int32("consecutive_events").with_default(Attr::known(1)),
    ]
}

/// Attributes of an HTTP health check.
#[must_use]
pub fn http_check_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("url").required(),
        Attribute::string("method").required(),
        Attribute::string("body"),
        Attribute::int32("expect_status").with_default(Attr::known(200)),
        Attribute::string("expect_in_body"),
        Attribute::string("interval").required(),
        Attribute::string("timeout").required(),
        Attribute::list_nested("actions", check_action_attributes())
            .required()
            .describe("An array of actions to take upon health check result."),
    ]
}

/// Attributes of a port health check.
#[must_use]
pub fn port_check_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("address").required(),
        Attribute::string("interval").required(),
        Attribute::string("timeout").required(),
        Attribute::list_nested("actions", check_action_attributes())
            .required()
            .describe("An array of actions to take upon health check result."),
    ]
}

fn payload_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("address")
            .describe("A target host config address towards which traffic would be relayed."),
        Attribute::int32("port")
            .describe("A port of a target address towards which traffic would be relayed"),
        Attribute::string("protocol").describe("A protocol which config would be allowed to receive"),
        Attribute::bool("forward_protocol")
            .describe("A flag which controls whether to forward allowedProtocols"),
        Attribute::bool("forward_port")
            .describe("A flag which controls whether to forward allowedPortRanges"),
        Attribute::bool("forward_address")
            .describe("A flag which controls whether to forward allowedAddresses"),
        Attribute::list("allowed_protocols", AttrType::String)
            .default_null()
            .describe("An array of allowed protocols that could be forwarded."),
        Attribute::list("allowed_addresses", AttrType::String)
            .default_null()
            .describe("An array of allowed addresses that could be forwarded."),
        Attribute::list("allowed_source_addresses", AttrType::String)
            .default_null()
            .describe("An array of allowed source addresses that could be forwarded."),
        Attribute::list_nested("allowed_port_ranges", port_range_attributes())
            .default_null()
            .describe("An array of allowed ports that could be forwarded."),
        Attribute::single_nested("listen_options", listen_options_attributes()),
        Attribute::list_nested("http_checks", http_check_attributes()),
        Attribute::list_nested("port_checks", port_check_attributes()),
    ]
}

/// Schema of the `host_config_v1` resource.
#[must_use]
pub fn resource_schema() -> Schema {
    let mut attributes = vec![
        Attribute::string("id").computed().describe("Id of a config"),
        Attribute::string("name").required().describe("Name of a config"),
        Attribute::string("config_type_id")
            .with_default(Attr::known(CONFIG_TYPE_ID.to_owned()))
            .describe("configTypeId"),
    ];
    attributes.extend(payload_attributes());
    Schema::new("A resource to define a host.v1 config of Ziti", attributes)
}

/// Schema of the `host_config_v1` data source.
#[must_use]
pub fn data_source_schema() -> Schema {
    let mut attributes = vec![
        Attribute::string("filter").describe("ZitiQl filter query"),
        Attribute::string("id").optional_computed().describe("Id of a config"),
        Attribute::string("name").optional_computed().describe("Name of a config"),
        Attribute::bool("most_recent")
            .describe("A flag which controls whether to get the first result from the filter query"),
        Attribute::string("config_type_id").computed().describe("configTypeId"),
    ];
    attributes.extend(payload_attributes().into_iter().map(Attribute::into_computed));
    Schema::new("Ziti Host Config Data Source", attributes)
}

/// Schema of the `host_config_v1_ids` data source.
#[must_use]
pub fn ids_schema() -> Schema {
    Schema::new(
        "Ziti Host Config Ids Data Source",
        vec![
            Attribute::string("filter").required().describe("ZitiQl filter query"),
            Attribute::list("ids", AttrType::String)
                .computed()
                .describe("Ids of the configs matching the filter."),
        ],
    )
}
