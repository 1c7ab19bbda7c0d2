//! Provider settings layered from the environment and the provider block.
//!
//! Values set in the provider block win over `ZITI_EDGE_MGMT_*` variables.
//! Empty strings count as unset in both layers.

use std::fmt;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uncased::Uncased;

use crate::diag::Diagnostics;
use crate::ZitiResult;

/// Prefix of the environment variables read by [`ProviderSettings::load`].
pub const ENV_PREFIX: &str = "ZITI_EDGE_MGMT_";

const ENDPOINT: &str = "mgmt_endpoint";
const USERNAME: &str = "username";
const PASSWORD: &str = "password";
const CAPOOL: &str = "capool";

/// Provider settings, each possibly unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Management API URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_endpoint: Option<String>,
    /// Admin username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Admin password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Base64 CA pool of the management API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capool: Option<String>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("mgmt_endpoint", &self.mgmt_endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("capool", &self.capool.as_ref().map(|_| "<set>"))
            .finish()
    }
}

/// Settings with every required value present.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Management API URL.
    pub endpoint: String,
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
    /// Base64 CA pool, when supplied.
    pub ca_pool: Option<String>,
}

impl fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ca_pool", &self.ca_pool.is_some())
            .finish()
    }
}

impl ProviderSettings {
    /// Copy with empty strings turned into `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let keep = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            mgmt_endpoint: keep(&self.mgmt_endpoint),
            username: keep(&self.username),
            password: keep(&self.password),
            capool: keep(&self.capool),
        }
    }

    /// Figment with the environment below `block`.
    ///
    /// `ZITI_EDGE_MGMT_URL` feeds `mgmt_endpoint`; the other variables map
    /// to the field of the same name.
    #[must_use]
    pub fn figment(block: &Self) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::from_env()))
            .merge(Serialized::defaults(block.normalized()))
    }

    /// Settings read verbatim from `ZITI_EDGE_MGMT_*` variables.
    ///
    /// Values are taken as raw strings: `Env` would otherwise parse a
    /// password such as `123456` into an integer.
    #[must_use]
    pub fn from_env() -> Self {
        let env = Env::prefixed(ENV_PREFIX).map(|key| {
            if key.as_str().eq_ignore_ascii_case("url") {
                Uncased::from_borrowed(ENDPOINT)
            } else {
                Uncased::from_borrowed(key.as_str())
            }
        });
        let mut settings = Self::default();
        for (key, value) in env.iter() {
            let slot = match key.as_str().to_ascii_lowercase().as_str() {
                ENDPOINT => &mut settings.mgmt_endpoint,
                USERNAME => &mut settings.username,
                PASSWORD => &mut settings.password,
                CAPOOL => &mut settings.capool,
                _ => continue,
            };
            *slot = Some(value);
        }
        settings.normalized()
    }

    /// Merge the environment under `block`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZitiError::Configuration`] when a layer cannot be
    /// extracted.
    pub fn load(block: &Self) -> ZitiResult<Self> {
        let merged: Self = Self::figment(block).extract()?;
        debug!(settings = ?merged, "resolved provider settings");
        Ok(merged.normalized())
    }

    /// Check that every required value is present.
    ///
    /// Missing values become attribute errors; a missing CA pool is only a
    /// warning.
    #[must_use]
    pub fn resolve(self, diagnostics: &mut Diagnostics) -> Option<ResolvedSettings> {
        let endpoint = require(self.mgmt_endpoint, ENDPOINT, "URL", "URL", diagnostics);
        let username = require(self.username, USERNAME, "Username", "USERNAME", diagnostics);
        let password = require(self.password, PASSWORD, "Password", "PASSWORD", diagnostics);
        if self.capool.is_none() {
            warn!("no CA pool configured; relying on built-in trust roots");
            diagnostics.add_attribute_warning(
                CAPOOL,
                "Missing CA Pool value, built-in trust roots will be used",
                format!(
                    "Provide the CA pool in the configuration or use the {ENV_PREFIX}CAPOOL \
                     environment variable. If either is already set, ensure the value is not empty."
                ),
            );
        }
        Some(ResolvedSettings {
            endpoint: endpoint?,
            username: username?,
            password: password?,
            ca_pool: self.capool,
        })
    }
}

fn require(
    value: Option<String>,
    attribute: &str,
    label: &str,
    env: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    if value.is_none() {
        diagnostics.add_attribute_error(
            attribute,
            format!("Missing Ziti Edge Management API {label}"),
            format!(
                "The provider cannot create the Ziti Edge Management API client as there is a \
                 missing or empty value for the {label}. Set the {attribute} value in the \
                 configuration or use the {ENV_PREFIX}{env} environment variable."
            ),
        );
    }
    value
}
