//! The `ziti` provider: settings, client construction, and factories.

use std::sync::Arc;

use tracing::info;

use crate::api::{HttpManagementClient, ManagementApi};
use crate::config::{ProviderSettings, ResolvedSettings};
use crate::datasource::{
    DataSource, HostConfigDataSource, HostConfigIdsDataSource, PostureCheckDataSource,
};
use crate::diag::{Diagnostic, Diagnostics};
use crate::host_config::HostConfigShapes;
use crate::resource::{HostConfigResource, Resource};
use crate::schema::{Attribute, Schema};
use crate::value::{Attr, ObjectValue};
use crate::{DeclarativeModel, ZitiError};

/// The provider block as configured.
#[derive(Debug, Clone, PartialEq, Eq, DeclarativeModel)]
#[model(crate = "crate")]
pub struct ProviderBlockModel {
    /// Management API URL.
    pub mgmt_endpoint: Attr<String>,
    /// Admin username.
    pub username: Attr<String>,
    /// Admin password.
    pub password: Attr<String>,
    /// Base64 CA pool.
    pub capool: Attr<String>,
}

/// Provider-level state shared by every resource and data source.
pub struct ZitiProvider {
    version: String,
    schema: Schema,
    shapes: Arc<HostConfigShapes>,
    api: Option<Arc<dyn ManagementApi>>,
}

impl ZitiProvider {
    /// Provider type name; resource names start with it.
    pub const TYPE_NAME: &'static str = "ziti";

    /// Unconfigured provider reporting `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            schema: provider_schema(),
            shapes: Arc::new(HostConfigShapes::new()),
            api: None,
        }
    }

    /// Provider version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Schema of the provider block.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Gather settings from `block` and the environment.
    ///
    /// Returns `None` when any required setting is unknown or missing; the
    /// reasons are in the diagnostics.
    #[must_use]
    pub fn resolve_settings(&self, block: &ObjectValue) -> (Option<ResolvedSettings>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let model = match ProviderBlockModel::from_object(block) {
            Ok(model) => model,
            Err(err) => {
                diagnostics.add_error("Invalid provider configuration", err.to_string());
                return (None, diagnostics);
            }
        };
        for (value, attribute, label, env) in [
            (&model.mgmt_endpoint, "mgmt_endpoint", "URL", "URL"),
            (&model.username, "username", "Username", "USERNAME"),
            (&model.password, "password", "Password", "PASSWORD"),
        ] {
            if value.is_unknown() {
                diagnostics.add_attribute_error(
                    attribute,
                    format!("Unknown Ziti Edge Management API {label}"),
                    format!(
                        "The provider cannot create the Ziti Edge API client as there is an unknown \
                         configuration value for the Ziti Edge Management API {label}. Either target \
                         apply the source of the value first, set the value statically in the \
                         configuration, or use the ZITI_EDGE_MGMT_{env} environment variable."
                    ),
                );
            }
        }
        if diagnostics.has_error() {
            return (None, diagnostics);
        }
        let block_settings = ProviderSettings {
            mgmt_endpoint: model.mgmt_endpoint.into_option(),
            username: model.username.into_option(),
            password: model.password.into_option(),
            capool: model.capool.into_option(),
        };
        let resolved = match ProviderSettings::load(&block_settings) {
            Ok(merged) => merged.resolve(&mut diagnostics),
            Err(err) => {
                diagnostics.add_error("Invalid provider configuration", err.to_string());
                None
            }
        };
        (resolved, diagnostics)
    }

    /// Resolve settings, authenticate, and keep the client for factories.
    pub fn configure(&mut self, block: &ObjectValue) -> Diagnostics {
        let (settings, mut diagnostics) = self.resolve_settings(block);
        let Some(settings) = settings else {
            return diagnostics;
        };
        match HttpManagementClient::connect(
            &settings.endpoint,
            settings.ca_pool.as_deref(),
            &settings.username,
            &settings.password,
        ) {
            Ok(client) => {
                info!(endpoint = %settings.endpoint, "configured Ziti Edge Management client");
                self.api = Some(Arc::new(client));
            }
            Err(err) => diagnostics.push(connect_failure(err)),
        }
        diagnostics
    }

    /// Use an already configured client.
    pub fn configure_with(&mut self, api: Arc<dyn ManagementApi>) {
        self.api = Some(api);
    }

    /// Returns `true` once a client is available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api.is_some()
    }

    fn api(&self) -> Result<Arc<dyn ManagementApi>, Diagnostic> {
        self.api.clone().ok_or_else(|| {
            Diagnostic::error(
                "Provider not configured",
                "The provider must be configured before resources or data sources are used.",
            )
        })
    }

    /// Resources served by this provider.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when the provider is not configured yet.
    pub fn resources(&self) -> Result<Vec<Box<dyn Resource>>, Diagnostic> {
        let api = self.api()?;
        Ok(vec![Box::new(HostConfigResource::new(api, Arc::clone(&self.shapes)))])
    }

    /// Data sources served by this provider.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when the provider is not configured yet.
    pub fn data_sources(&self) -> Result<Vec<Box<dyn DataSource>>, Diagnostic> {
        let api = self.api()?;
        Ok(vec![
            Box::new(HostConfigDataSource::new(Arc::clone(&api), Arc::clone(&self.shapes))),
            Box::new(HostConfigIdsDataSource::new(Arc::clone(&api), Arc::clone(&self.shapes))),
            Box::new(PostureCheckDataSource::new(api)),
        ])
    }
}

fn connect_failure(err: ZitiError) -> Diagnostic {
    match err {
        ZitiError::Endpoint { .. } => Diagnostic::error(
            "Unable to parse an endpoint url, make sure its a valid url!",
            err.to_string(),
        ),
        ZitiError::CaPool(_) => Diagnostic::error("Unable to decode the capool value", err.to_string())
            .with_attribute("capool"),
        other => Diagnostic::error(
            "Unable to create client for Ziti Edge Management API",
            other.to_string(),
        ),
    }
}

fn provider_schema() -> Schema {
    Schema::new(
        "OpenZiti Edge Management API provider",
        vec![
            Attribute::string("mgmt_endpoint")
                .describe("An endpoint pointing to Ziti Edge Management API URL"),
            Attribute::string("username")
                .describe("A username of an identity that is able to perform admin actions"),
            Attribute::string("password")
                .sensitive()
                .describe("A password of an identity that is able to perform admin actions"),
            Attribute::string("capool")
                .describe("A base64 encoded CA Pool of the Edge Management API."),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ModelValue;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use test_helpers::figment::with_jail;

    fn block(attrs: Vec<(&str, Attr<String>)>) -> Result<ObjectValue> {
        let provider = ZitiProvider::new("test");
        Ok(ObjectValue::with_nulls(
            provider.schema().object_type(),
            attrs.into_iter().map(|(name, value)| (name, ModelValue::String(value))),
        )?)
    }

    #[rstest]
    fn unknown_block_values_stop_configuration() -> Result<()> {
        let provider = ZitiProvider::new("test");
        let (settings, diags) =
            provider.resolve_settings(&block(vec![("password", Attr::Unknown)])?);
        ensure!(settings.is_none(), "settings should not resolve");
        let paths: Vec<_> = diags.errors().filter_map(|d| d.attribute.as_deref()).collect();
        ensure!(paths == ["password"], "got {paths:?}");
        Ok(())
    }

    #[rstest]
    fn block_and_environment_combine() -> Result<()> {
        let config = block(vec![("username", Attr::known("admin".to_owned()))])?;
        let (settings, diags) = with_jail(|jail| {
            jail.set_env("ZITI_EDGE_MGMT_URL", "https://ctrl/edge/management/v1");
            jail.set_env("ZITI_EDGE_MGMT_PASSWORD", "pw");
            jail.set_env("ZITI_EDGE_MGMT_USERNAME", "ignored");
            Ok(ZitiProvider::new("test").resolve_settings(&config))
        })?;
        ensure!(!diags.has_error(), "unexpected errors: {diags:?}");
        let settings = settings.ok_or_else(|| anyhow::anyhow!("settings missing"))?;
        ensure!(settings.username == "admin", "block wins for username");
        ensure!(settings.password == "pw", "password from environment");
        ensure!(diags.warnings().count() == 1, "missing CA pool warns");
        Ok(())
    }

    #[rstest]
    fn factories_require_configuration() {
        let provider = ZitiProvider::new("test");
        assert!(!provider.is_configured());
        assert!(provider.resources().is_err());
        assert!(provider.data_sources().is_err());
    }

    #[rstest]
    fn bad_endpoint_is_reported() -> Result<()> {
        let mut provider = ZitiProvider::new("test");
        let config = block(vec![
            ("mgmt_endpoint", Attr::known("not a url".to_owned())),
            ("username", Attr::known("admin".to_owned())),
            ("password", Attr::known("pw".to_owned())),
            ("capool", Attr::known("%%%".to_owned())),
        ])?;
        let diags = provider.configure(&config);
        ensure!(
            diags
                .errors()
                .any(|d| d.summary == "Unable to parse an endpoint url, make sure its a valid url!"),
            "got {diags:?}"
        );
        ensure!(!provider.is_configured(), "provider must stay unconfigured");
        Ok(())
    }
}
