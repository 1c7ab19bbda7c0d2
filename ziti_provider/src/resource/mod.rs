//! Lifecycle bindings between declarative state and the controller.
//!
//! The runtime drives a [`Resource`] through validate, plan, and the CRUD
//! calls. Every call reports failures as diagnostics; a call that fails
//! returns no state.

mod host_config;

pub use host_config::HostConfigResource;
pub(crate) use host_config::{failure, fields_from_detail};

use crate::diag::{Diagnostic, Diagnostics};
use crate::schema::Schema;
use crate::value::ObjectValue;

/// Outcome of a lifecycle call that produces state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateResponse {
    /// New state; `None` when the call failed.
    pub state: Option<ObjectValue>,
    /// Errors and warnings raised along the way.
    pub diagnostics: Diagnostics,
}

impl StateResponse {
    /// Successful call.
    #[must_use]
    pub const fn ok(state: ObjectValue, diagnostics: Diagnostics) -> Self {
        Self {
            state: Some(state),
            diagnostics,
        }
    }

    /// Failed call.
    #[must_use]
    pub const fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    /// Fold the result of a fallible lifecycle step.
    #[must_use]
    pub fn from_result(result: Result<(ObjectValue, Diagnostics), Diagnostic>) -> Self {
        match result {
            Ok((state, diagnostics)) => Self::ok(state, diagnostics),
            Err(diagnostic) => Self::failed(diagnostic.into()),
        }
    }
}

/// Outcome of refreshing state from the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The entity exists; here is its current state.
    Refreshed {
        /// Refreshed state.
        state: ObjectValue,
        /// Warnings raised while converting.
        diagnostics: Diagnostics,
    },
    /// The entity is gone and must be dropped from state.
    Removed,
    /// The refresh failed.
    Failed(Diagnostics),
}

/// A managed controller entity.
pub trait Resource: Send + Sync {
    /// Type name, such as `ziti_host_config_v1`.
    fn type_name(&self) -> &'static str;

    /// Schema of the resource state.
    fn schema(&self) -> &Schema;

    /// Cross-attribute validation of a configuration.
    fn validate_config(&self, config: &ObjectValue) -> Diagnostics;

    /// Planned state for `config`: required attributes checked, defaults
    /// applied, computed attributes unknown.
    fn plan(&self, config: &ObjectValue) -> StateResponse {
        let mut diagnostics = Diagnostics::new();
        self.schema().validate_required(config, &mut diagnostics);
        diagnostics.extend(self.validate_config(config));
        if diagnostics.has_error() {
            return StateResponse::failed(diagnostics);
        }
        match self.schema().plan(config) {
            Ok(planned) => StateResponse::ok(planned, diagnostics),
            Err(err) => {
                diagnostics.add_error("Invalid configuration", err.to_string());
                StateResponse::failed(diagnostics)
            }
        }
    }

    /// Create the entity described by `plan`.
    fn create(&self, plan: &ObjectValue) -> StateResponse;

    /// Refresh `state` from the controller.
    fn read(&self, state: &ObjectValue) -> ReadOutcome;

    /// Apply `plan` to the entity recorded in `prior`.
    fn update(&self, plan: &ObjectValue, prior: &ObjectValue) -> StateResponse;

    /// Delete the entity recorded in `state`.
    fn delete(&self, state: &ObjectValue) -> Diagnostics;

    /// State holding only `id`, to be completed by [`Resource::read`].
    fn import_state(&self, id: &str) -> StateResponse;
}
