//! Posture-check detail bodies, discriminated by `typeId`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes every posture check carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureCheckBase {
    /// Controller id.
    pub id: String,
    /// Check name.
    pub name: String,
    /// Role attributes used by service policies.
    #[serde(default)]
    pub role_attributes: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Map<String, Value>,
}

/// A posture check of any type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "typeId")]
pub enum PostureCheckDetail {
    /// Windows domain membership.
    #[serde(rename = "DOMAIN")]
    Domain(DomainCheck),
    /// Network interface MAC address.
    #[serde(rename = "MAC")]
    Mac(MacCheck),
    /// Multi-factor authentication.
    #[serde(rename = "MFA")]
    Mfa(MfaCheck),
    /// Operating system and version.
    #[serde(rename = "OS")]
    Os(OsCheck),
    /// A single running process.
    #[serde(rename = "PROCESS")]
    Process(ProcessCheck),
    /// A set of running processes.
    #[serde(rename = "PROCESS_MULTI")]
    ProcessMulti(ProcessMultiCheck),
}

impl PostureCheckDetail {
    /// Attributes shared by every variant.
    #[must_use]
    pub const fn base(&self) -> &PostureCheckBase {
        match self {
            Self::Domain(check) => &check.base,
            Self::Mac(check) => &check.base,
            Self::Mfa(check) => &check.base,
            Self::Os(check) => &check.base,
            Self::Process(check) => &check.base,
            Self::ProcessMulti(check) => &check.base,
        }
    }

    /// What the check accepts: domains, MAC addresses, operating system
    /// types, or process paths. MFA checks accept nothing listable.
    #[must_use]
    pub fn criteria(&self) -> Vec<String> {
        match self {
            Self::Domain(check) => check.domains.clone(),
            Self::Mac(check) => check.mac_addresses.clone(),
            Self::Mfa(_) => Vec::new(),
            Self::Os(check) => check
                .operating_systems
                .iter()
                .map(|os| os.os_type.clone())
                .collect(),
            Self::Process(check) => vec![check.process.path.clone()],
            Self::ProcessMulti(check) => check
                .processes
                .iter()
                .map(|process| process.path.clone())
                .collect(),
        }
    }

    /// The `typeId` discriminator.
    #[must_use]
    pub const fn type_id(&self) -> &'static str {
        match self {
            Self::Domain(_) => "DOMAIN",
            Self::Mac(_) => "MAC",
            Self::Mfa(_) => "MFA",
            Self::Os(_) => "OS",
            Self::Process(_) => "PROCESS",
            Self::ProcessMulti(_) => "PROCESS_MULTI",
        }
    }
}

/// `DOMAIN` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// Accepted domains.
    #[serde(default)]
    pub domains: Vec<String>,
}

/// `MAC` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// Accepted MAC addresses.
    #[serde(default)]
    pub mac_addresses: Vec<String>,
}

/// `MFA` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// Seconds before a new code is required; negative means never.
    #[serde(default)]
    pub timeout_seconds: i64,
    /// Prompt when the device wakes.
    #[serde(default)]
    pub prompt_on_wake: bool,
    /// Prompt when the device unlocks.
    #[serde(default)]
    pub prompt_on_unlock: bool,
    /// Skip endpoints that predate MFA support.
    #[serde(default)]
    pub ignore_legacy_endpoints: bool,
}

/// `OS` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// Accepted operating systems.
    #[serde(default)]
    pub operating_systems: Vec<OperatingSystem>,
}

/// Operating system with accepted versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingSystem {
    /// `Windows`, `Linux`, `macOS`, and so on.
    #[serde(rename = "type")]
    pub os_type: String,
    /// Accepted version expressions.
    #[serde(default)]
    pub versions: Vec<String>,
}

/// `PROCESS` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// Process to look for.
    pub process: Process,
}

/// Process matched by a `PROCESS` check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Operating system the path applies to.
    pub os_type: String,
    /// Executable path.
    pub path: String,
    /// Accepted binary hashes.
    #[serde(default)]
    pub hashes: Vec<String>,
    /// Accepted signer fingerprint.
    #[serde(default)]
    pub signer_fingerprint: Option<String>,
}

/// `PROCESS_MULTI` check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMultiCheck {
    /// Shared attributes.
    #[serde(flatten)]
    pub base: PostureCheckBase,
    /// `AllOf` or `AnyOf`.
    pub semantic: String,
    /// Processes to look for.
    #[serde(default)]
    pub processes: Vec<ProcessSpec>,
}

/// Process matched by a `PROCESS_MULTI` check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpec {
    /// Operating system the path applies to.
    pub os_type: String,
    /// Executable path.
    pub path: String,
    /// Accepted binary hashes.
    #[serde(default)]
    pub hashes: Vec<String>,
    /// Accepted signer fingerprints.
    #[serde(default)]
    pub signer_fingerprints: Vec<String>,
}
