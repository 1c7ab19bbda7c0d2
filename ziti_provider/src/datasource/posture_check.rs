//! The `ziti_posture_check` data source.
//!
//! Posture checks come back from the controller as one of several bodies
//! keyed by `typeId`. The state keeps the attributes every variant shares
//! and flattens the variant-specific part into `criteria`.

use std::sync::Arc;

use tracing::info;

use super::DataSource;
use crate::api::{ManagementApi, PostureCheckDetail};
use crate::diag::{Diagnostic, Diagnostics};
use crate::resource::{StateResponse, failure};
use crate::schema::{Attribute, Schema};
use crate::value::{Attr, AttrType, ListValue, ObjectType, ObjectValue};
use crate::DeclarativeModel;

const TYPE_NAME: &str = "ziti_posture_check";

/// State of the `ziti_posture_check` data source.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct PostureCheckModel {
    /// Controller id.
    pub id: Attr<String>,
    /// Check name.
    pub name: Attr<String>,
    /// `typeId` of the check.
    pub type_id: Attr<String>,
    /// Role attributes used by service policies.
    pub role_attributes: ListValue,
    /// Values the check accepts.
    pub criteria: ListValue,
}

impl PostureCheckModel {
    /// State of a posture check fetched from the controller.
    #[must_use]
    pub fn from_detail(detail: &PostureCheckDetail) -> Self {
        let base = detail.base();
        Self {
            id: Attr::known(base.id.clone()),
            name: Attr::known(base.name.clone()),
            type_id: Attr::known(detail.type_id().to_owned()),
            role_attributes: ListValue::strings(base.role_attributes.iter().cloned()),
            criteria: ListValue::strings(detail.criteria()),
        }
    }
}

/// Schema of the `ziti_posture_check` data source.
#[must_use]
pub fn posture_check_schema() -> Schema {
    Schema::new(
        "Ziti Posture Check Data Source",
        vec![
            Attribute::string("id").required().describe("Id of a posture check"),
            Attribute::string("name").computed().describe("Name of a posture check"),
            Attribute::string("type_id")
                .computed()
                .describe("One of DOMAIN, MAC, MFA, OS, PROCESS or PROCESS_MULTI"),
            Attribute::list("role_attributes", AttrType::String)
                .computed()
                .describe("Role attributes of the posture check"),
            Attribute::list("criteria", AttrType::String)
                .computed()
                .describe("Domains, MAC addresses, operating systems or process paths the check accepts"),
        ],
    )
}

/// Lookup of one posture check by id.
pub struct PostureCheckDataSource {
    api: Arc<dyn ManagementApi>,
    shape: Arc<ObjectType>,
    schema: Schema,
}

impl PostureCheckDataSource {
    /// Bind the data source to a configured API client.
    #[must_use]
    pub fn new(api: Arc<dyn ManagementApi>) -> Self {
        let schema = posture_check_schema();
        Self {
            api,
            shape: schema.object_type(),
            schema,
        }
    }

    fn try_read(&self, config: &ObjectValue) -> Result<(ObjectValue, Diagnostics), Diagnostic> {
        let requested = PostureCheckModel::from_object(config)
            .map_err(|err| Diagnostic::error("Error reading Terraform data", err.to_string()))?;
        let id = requested.id.to_option().unwrap_or_default();
        let detail = self.api.detail_posture_check(&id).map_err(failure(
            "Error Reading Ziti Posture Check from API",
            format!("Could not read Ziti Posture Check ID {id}"),
        ))?;
        info!(%id, type_id = detail.type_id(), "resolved posture check data source");
        let state = PostureCheckModel::from_detail(&detail)
            .into_object(&self.shape)
            .map_err(|err| Diagnostic::error("Error building Ziti posture check state", err.to_string()))?;
        Ok((state, Diagnostics::new()))
    }
}

impl DataSource for PostureCheckDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read(&self, config: &ObjectValue) -> StateResponse {
        StateResponse::from_result(self.try_read(config))
    }
}
