//! Object shapes of the host config, built once from its schemas.

use std::sync::Arc;

use crate::schema::NestedShape;
use crate::value::ObjectType;

use super::schema::{
    check_action_attributes, data_source_schema, http_check_attributes, ids_schema,
    listen_options_attributes, port_check_attributes, port_range_attributes, resource_schema,
};

/// Shared shape descriptors for host config conversions.
///
/// Construct once and hand out behind an `Arc`; every field is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfigShapes {
    /// Resource state object.
    pub resource: Arc<ObjectType>,
    /// Data source state object.
    pub data_source: Arc<ObjectType>,
    /// Ids data source state object.
    pub ids: Arc<ObjectType>,
    /// Allowed port range element.
    pub port_range: NestedShape,
    /// Listen options object.
    pub listen_options: NestedShape,
    /// Health-check action element.
    pub check_action: NestedShape,
    /// HTTP check element.
    pub http_check: NestedShape,
    /// Port check element.
    pub port_check: NestedShape,
}

impl HostConfigShapes {
    /// Derive every shape from the host config schemas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resource: resource_schema().object_type(),
            data_source: data_source_schema().object_type(),
            ids: ids_schema().object_type(),
            port_range: NestedShape::from_attributes(&port_range_attributes()),
            listen_options: NestedShape::from_attributes(&listen_options_attributes()),
            check_action: NestedShape::from_attributes(&check_action_attributes()),
            http_check: NestedShape::from_attributes(&http_check_attributes()),
            port_check: NestedShape::from_attributes(&port_check_attributes()),
        }
    }
}

impl Default for HostConfigShapes {
    fn default() -> Self {
        Self::new()
    }
}
