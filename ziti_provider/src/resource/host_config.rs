//! The `ziti_host_config_v1` resource.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{ReadOutcome, Resource, StateResponse};
use crate::api::{ConfigCreate, ConfigDetail, ConfigUpdate, ManagementApi};
use crate::bridge::json_kind;
use crate::diag::{Diagnostic, Diagnostics};
use crate::host_config::{
    HostConfigFields, HostConfigModel, HostConfigPayload, HostConfigShapes, resource_schema,
    restore_omitted_zeros, validate_config,
};
use crate::materialize::map_to_struct;
use crate::reflect::{ReflectPolicy, struct_to_map};
use crate::schema::Schema;
use crate::value::{Attr, ModelValue, ObjectValue};
use crate::{DeclarativeModel, ZitiError, ZitiResult};

const TYPE_NAME: &str = "ziti_host_config_v1";

/// Lifecycle binding of `host.v1` configs.
pub struct HostConfigResource {
    api: Arc<dyn ManagementApi>,
    shapes: Arc<HostConfigShapes>,
    schema: Schema,
}

impl HostConfigResource {
    /// Bind the resource to a configured API client.
    #[must_use]
    pub fn new(api: Arc<dyn ManagementApi>, shapes: Arc<HostConfigShapes>) -> Self {
        Self {
            api,
            shapes,
            schema: resource_schema(),
        }
    }

    fn model(object: &ObjectValue, what: &str) -> Result<HostConfigModel, Diagnostic> {
        HostConfigModel::from_object(object)
            .map_err(failure("Error reading Terraform data", format!("Invalid {what}")))
    }

    fn state(&self, model: HostConfigModel) -> Result<ObjectValue, Diagnostic> {
        model
            .into_object(&self.shapes.resource)
            .map_err(failure("Error building Ziti config state", String::from("Invalid state")))
    }

    fn try_create(&self, plan: &ObjectValue) -> Result<(ObjectValue, Diagnostics), Diagnostic> {
        let mut model = Self::model(plan, "plan")?;
        let name = model.name.to_option().unwrap_or_default();
        let data = request_body(&model.fields).map_err(failure(
            "Error marshalling Ziti Config from API",
            format!("Could not create Ziti Config {name}"),
        ))?;
        let request = ConfigCreate {
            name: name.clone(),
            config_type_id: model.config_type_id.to_option().unwrap_or_default(),
            data,
        };
        let id = self.api.create_config(&request).map_err(failure(
            "Error Creating Ziti Config from API",
            format!("Could not create Ziti Config {name}"),
        ))?;
        info!(%id, %name, "created Ziti config");
        model.id = Attr::known(id);
        Ok((self.state(model)?, Diagnostics::new()))
    }

    fn try_read(&self, state: &ObjectValue) -> Result<Option<(ObjectValue, Diagnostics)>, Diagnostic> {
        let prior = Self::model(state, "state")?;
        let id = prior.id.to_option().unwrap_or_default();
        let detail = match self.api.detail_config(&id) {
            Ok(detail) => detail,
            Err(err) if err.is_not_found() => {
                info!(%id, "Ziti config is gone; removing from state");
                return Ok(None);
            }
            Err(err) => {
                return Err(failure(
                    "Error Reading Ziti Config from API",
                    format!("Could not read Ziti Config ID {id}"),
                )(err));
            }
        };
        let mut diagnostics = Diagnostics::new();
        let fields = fields_from_detail(&detail, &self.shapes, &mut diagnostics)?;
        let model = HostConfigModel {
            id: prior.id,
            name: Attr::known(detail.name),
            config_type_id: Attr::known(detail.config_type_id),
            fields,
        };
        let refreshed = restore_omitted_zeros(state, self.state(model)?).map_err(failure(
            "Error building Ziti config state",
            String::from("Invalid state"),
        ))?;
        Ok(Some((refreshed, diagnostics)))
    }

    fn try_update(
        &self,
        plan: &ObjectValue,
        prior: &ObjectValue,
    ) -> Result<(ObjectValue, Diagnostics), Diagnostic> {
        let mut model = Self::model(plan, "plan")?;
        model.id = Self::model(prior, "state")?.id;
        let id = model.id.to_option().unwrap_or_default();
        let name = model.name.to_option().unwrap_or_default();
        let data = request_body(&model.fields).map_err(failure(
            "Error marshalling Ziti Config from API",
            format!("Could not update Ziti Config {id}"),
        ))?;
        self.api
            .update_config(&id, &ConfigUpdate { name, data })
            .map_err(failure(
                "Error Updating Ziti Config from API",
                format!("Could not update Ziti Config {id}"),
            ))?;
        info!(%id, "updated Ziti config");
        Ok((self.state(model)?, Diagnostics::new()))
    }
}

impl Resource for HostConfigResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate_config(&self, config: &ObjectValue) -> Diagnostics {
        validate_config(config)
    }

    fn create(&self, plan: &ObjectValue) -> StateResponse {
        StateResponse::from_result(self.try_create(plan))
    }

    fn read(&self, state: &ObjectValue) -> ReadOutcome {
        match self.try_read(state) {
            Ok(Some((refreshed, diagnostics))) => ReadOutcome::Refreshed {
                state: refreshed,
                diagnostics,
            },
            Ok(None) => ReadOutcome::Removed,
            Err(diagnostic) => ReadOutcome::Failed(diagnostic.into()),
        }
    }

    fn update(&self, plan: &ObjectValue, prior: &ObjectValue) -> StateResponse {
        StateResponse::from_result(self.try_update(plan, prior))
    }

    fn delete(&self, state: &ObjectValue) -> Diagnostics {
        let id = match Self::model(state, "state") {
            Ok(model) => model.id.to_option().unwrap_or_default(),
            Err(diagnostic) => return diagnostic.into(),
        };
        match self.api.delete_config(&id) {
            Ok(()) => {
                info!(%id, "deleted Ziti config");
                Diagnostics::new()
            }
            Err(err) if err.is_not_found() => {
                info!(%id, "Ziti config was already deleted");
                Diagnostics::new()
            }
            Err(err) => failure(
                "Error Deleting Ziti Config from API",
                format!("Could not delete Ziti Config {id}"),
            )(err)
            .into(),
        }
    }

    fn import_state(&self, id: &str) -> StateResponse {
        let imported = ObjectValue::with_nulls(
            Arc::clone(&self.shapes.resource),
            [("id", ModelValue::String(Attr::known(id.to_owned())))],
        );
        match imported {
            Ok(state) => StateResponse::ok(state, Diagnostics::new()),
            Err(err) => StateResponse::failed(
                Diagnostic::error("Error importing Ziti config", err.to_string()).into(),
            ),
        }
    }
}

/// Map a conversion or API error to an error diagnostic prefixed with
/// `context`.
pub(crate) fn failure(summary: &str, context: String) -> impl FnOnce(ZitiError) -> Diagnostic + '_ {
    move |err| Diagnostic::error(summary, format!("{context}: {err}"))
}

/// Request body of a create or update call.
fn request_body(fields: &HostConfigFields) -> ZitiResult<Map<String, Value>> {
    let body = struct_to_map(&fields.to_payload()?, ReflectPolicy::WRITE)?;
    let rendered = Value::Object(body.clone());
    debug!(body = %rendered, "host config request body");
    Ok(body)
}

/// Declarative fields of a config returned by the controller.
///
/// Fixed/forward pairs that are both set are kept and reported as warnings.
pub(crate) fn fields_from_detail(
    detail: &ConfigDetail,
    shapes: &HostConfigShapes,
    diagnostics: &mut Diagnostics,
) -> Result<HostConfigFields, Diagnostic> {
    let context = format!("Could not read Ziti Config ID {}", detail.id);
    let Value::Object(data) = &detail.data else {
        return Err(failure(
            "Error casting a response from a ziti controller to a dictionary",
            context,
        )(ZitiError::type_mismatch("object", json_kind(&detail.data))));
    };
    let payload: HostConfigPayload = map_to_struct(data)
        .map_err(failure("Error decoding Ziti Config from API", context.clone()))?;
    debug!(payload = ?payload, "host config response payload");
    for (fixed, forward) in payload.forwarding_conflicts() {
        warn!(id = %detail.id, fixed, forward, "config sets both a fixed value and its forward flag");
        diagnostics.add_attribute_warning(
            forward,
            "Conflicting host config attributes",
            format!(
                "Config {} sets both \"{fixed}\" and \"{forward}\"; the controller will forward the dialed value.",
                detail.id
            ),
        );
    }
    payload
        .to_model(shapes)
        .map_err(failure("Error converting Ziti Config from API", context))
}
