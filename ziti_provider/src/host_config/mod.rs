//! The `host.v1` config entity: wire payload, declarative models, schemas,
//! conversions, and validators.

mod convert;
mod model;
mod payload;
mod schema;
mod shapes;
mod validate;


pub use convert::restore_omitted_zeros;
pub use model::{
    CheckActionModel, HostConfigDataSourceModel, HostConfigFields, HostConfigIdsModel,
    HostConfigModel, HttpCheckModel, ListenOptionsModel, PortCheckModel, PortRangeModel,
};
pub use payload::{CheckAction, HostConfigPayload, HttpCheck, ListenOptions, PortCheck, PortRange};
pub use schema::{
    check_action_attributes, data_source_schema, http_check_attributes, ids_schema,
    listen_options_attributes, port_check_attributes, port_range_attributes, resource_schema,
};
pub use shapes::HostConfigShapes;
pub use validate::{FORWARDING_PAIRS, REQUIRED_TOGETHER, is_valid_action, validate_config};

/// Controller id of the `host.v1` config type.
pub const CONFIG_TYPE_ID: &str = "NH5p4FpGR";
