//! Data sources over `host.v1` configs.

use std::sync::Arc;

use tracing::{debug, info};

use super::DataSource;
use crate::api::{ConfigDetail, ListQuery, ManagementApi};
use crate::diag::{Diagnostic, Diagnostics};
use crate::host_config::{
    CONFIG_TYPE_ID, HostConfigDataSourceModel, HostConfigIdsModel, HostConfigShapes,
    data_source_schema, ids_schema,
};
use crate::resource::{StateResponse, failure, fields_from_detail};
use crate::schema::Schema;
use crate::value::{Attr, ListValue, ObjectValue};
use crate::DeclarativeModel;

const LOOKUP_KEYS: [&str; 3] = ["id", "filter", "name"];
const INVALID_COMBINATION: &str = "Invalid Attribute Combination";
const READ_FAILED: &str = "Error Reading Ziti Config from API";

/// Filter selecting `host.v1` configs by id, else name, else a raw
/// expression.
///
/// ```
/// use ziti_provider::datasource::lookup_filter;
///
/// assert_eq!(
///     lookup_filter(None, Some("web"), None),
///     r#"name = "web" and type = "NH5p4FpGR""#,
/// );
/// ```
#[must_use]
pub fn lookup_filter(id: Option<&str>, name: Option<&str>, filter: Option<&str>) -> String {
    let selector = match (id, name) {
        (Some(id), _) if !id.is_empty() => format!("id = \"{id}\""),
        (_, Some(name)) if !name.is_empty() => format!("name = \"{name}\""),
        _ => filter.unwrap_or_default().to_owned(),
    };
    type_filter(&selector)
}

fn type_filter(selector: &str) -> String {
    format!("{selector} and type = \"{CONFIG_TYPE_ID}\"")
}

fn list(api: &dyn ManagementApi, filter: &str, context: String) -> Result<Vec<ConfigDetail>, Diagnostic> {
    debug!(%filter, "listing host configs");
    let found = api
        .list_configs(&ListQuery::new(filter))
        .map_err(failure(READ_FAILED, context))?;
    if found.is_empty() {
        return Err(Diagnostic::error(
            "No items returned from API upon filter execution!",
            format!("Try to relax the filter expression: {filter}"),
        ));
    }
    Ok(found)
}

fn config_error(summary: &str) -> impl FnOnce(crate::ZitiError) -> Diagnostic + '_ {
    move |err| Diagnostic::error(summary, err.to_string())
}

/// The `ziti_host_config_v1` data source.
pub struct HostConfigDataSource {
    api: Arc<dyn ManagementApi>,
    shapes: Arc<HostConfigShapes>,
    schema: Schema,
}

impl HostConfigDataSource {
    /// Bind the data source to a configured API client.
    #[must_use]
    pub fn new(api: Arc<dyn ManagementApi>, shapes: Arc<HostConfigShapes>) -> Self {
        Self {
            api,
            shapes,
            schema: data_source_schema(),
        }
    }

    fn try_read(&self, config: &ObjectValue) -> Result<(ObjectValue, Diagnostics), Diagnostic> {
        let requested = HostConfigDataSourceModel::from_object(config)
            .map_err(config_error("Error reading Terraform data"))?;
        let filter = lookup_filter(
            requested.id.as_known().map(String::as_str),
            requested.name.as_known().map(String::as_str),
            requested.filter.as_known().map(String::as_str),
        );
        let context = format!(
            "Could not read Ziti Config ID {}",
            requested.id.as_known().map_or("", String::as_str)
        );
        let found = list(self.api.as_ref(), &filter, context)?;
        if found.len() > 1 && requested.most_recent.as_known() != Some(&true) {
            return Err(Diagnostic::error(
                "Multiple items returned from API upon filter execution!",
                format!(
                    "Try to narrow down the filter expression, or set most_recent to true to get the first result: {filter}"
                ),
            ));
        }
        let Some(first) = found.into_iter().next() else {
            return Err(Diagnostic::error("No items returned from API upon filter execution!", filter));
        };
        let mut diagnostics = Diagnostics::new();
        let fields = fields_from_detail(&first, &self.shapes, &mut diagnostics)?;
        info!(id = %first.id, "resolved host config data source");
        let state = HostConfigDataSourceModel {
            filter: requested.filter,
            id: Attr::known(first.id),
            name: Attr::known(first.name),
            most_recent: requested.most_recent,
            config_type_id: Attr::known(first.config_type_id),
            fields,
        }
        .into_object(&self.shapes.data_source)
        .map_err(config_error("Error building Ziti config state"))?;
        Ok((state, diagnostics))
    }
}

impl DataSource for HostConfigDataSource {
    fn type_name(&self) -> &'static str {
        "ziti_host_config_v1"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate_config(&self, config: &ObjectValue) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.schema.validate_required(config, &mut diagnostics);
        let set: Vec<&str> = LOOKUP_KEYS
            .into_iter()
            .filter(|key| config.get(key).is_some_and(|value| !value.is_null()))
            .collect();
        let unknown = LOOKUP_KEYS
            .into_iter()
            .any(|key| config.get(key).is_some_and(crate::value::ModelValue::is_unknown));
        if set.is_empty() && !unknown {
            diagnostics.add_error(
                INVALID_COMBINATION,
                format!("At least one attribute out of [{}] must be specified", LOOKUP_KEYS.join(",")),
            );
        }
        if let [first, second, ..] = set.as_slice() {
            diagnostics.add_attribute_error(
                *second,
                INVALID_COMBINATION,
                format!("Attribute \"{second}\" cannot be specified when \"{first}\" is specified"),
            );
        }
        diagnostics
    }

    fn read(&self, config: &ObjectValue) -> StateResponse {
        StateResponse::from_result(self.try_read(config))
    }
}

/// The `ziti_host_config_v1_ids` data source.
pub struct HostConfigIdsDataSource {
    api: Arc<dyn ManagementApi>,
    shapes: Arc<HostConfigShapes>,
    schema: Schema,
}

impl HostConfigIdsDataSource {
    /// Bind the data source to a configured API client.
    #[must_use]
    pub fn new(api: Arc<dyn ManagementApi>, shapes: Arc<HostConfigShapes>) -> Self {
        Self {
            api,
            shapes,
            schema: ids_schema(),
        }
    }

    fn try_read(&self, config: &ObjectValue) -> Result<(ObjectValue, Diagnostics), Diagnostic> {
        let requested = HostConfigIdsModel::from_object(config)
            .map_err(config_error("Error reading Terraform data"))?;
        let raw = requested.filter.to_option().unwrap_or_default();
        let filter = type_filter(&raw);
        let found = list(self.api.as_ref(), &filter, format!("Could not read Ziti Config ID {raw}"))?;
        info!(count = found.len(), "resolved host config ids");
        let state = HostConfigIdsModel {
            filter: requested.filter,
            ids: ListValue::strings(found.into_iter().map(|config| config.id)),
        }
        .into_object(&self.shapes.ids)
        .map_err(config_error("Error building Ziti config state"))?;
        Ok((state, Diagnostics::new()))
    }
}

impl DataSource for HostConfigIdsDataSource {
    fn type_name(&self) -> &'static str {
        "ziti_host_config_v1_ids"
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read(&self, config: &ObjectValue) -> StateResponse {
        StateResponse::from_result(self.try_read(config))
    }
}
