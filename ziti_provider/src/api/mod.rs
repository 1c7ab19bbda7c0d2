//! Management API seam.
//!
//! Lifecycle bindings talk to the controller through [`ManagementApi`] so
//! tests can substitute an in-memory double. [`HttpManagementClient`] is the
//! production implementation.

mod http;
mod posture;
mod wire;


pub use http::HttpManagementClient;
pub use posture::{
    DomainCheck, MacCheck, MfaCheck, OperatingSystem, OsCheck, PostureCheckBase,
    PostureCheckDetail, Process, ProcessCheck, ProcessMultiCheck, ProcessSpec,
};
pub use wire::{ApiError, ApiErrorEnvelope, ConfigCreate, ConfigDetail, ConfigUpdate, Envelope, ListQuery};

use crate::ZitiResult;

/// Operations on config and posture-check entities.
///
/// Every call blocks until the controller answers. A missing entity is
/// reported as [`crate::ZitiError::NotFound`].
pub trait ManagementApi: Send + Sync {
    /// Create a config and return its id.
    ///
    /// # Errors
    ///
    /// Returns a transport or API error when the controller rejects the call.
    fn create_config(&self, config: &ConfigCreate) -> ZitiResult<String>;

    /// Fetch one config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZitiError::NotFound`] for an unknown id.
    fn detail_config(&self, id: &str) -> ZitiResult<ConfigDetail>;

    /// Replace the name and data of a config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZitiError::NotFound`] for an unknown id.
    fn update_config(&self, id: &str, config: &ConfigUpdate) -> ZitiResult<()>;

    /// Delete a config.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZitiError::NotFound`] for an unknown id.
    fn delete_config(&self, id: &str) -> ZitiResult<()>;

    /// List configs matching a filter expression.
    ///
    /// # Errors
    ///
    /// Returns a transport or API error, for example on a malformed filter.
    fn list_configs(&self, query: &ListQuery) -> ZitiResult<Vec<ConfigDetail>>;

    /// Fetch one posture check.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ZitiError::NotFound`] for an unknown id.
    fn detail_posture_check(&self, id: &str) -> ZitiResult<PostureCheckDetail>;
}
