//! Read-only lookups of controller entities.

mod host_config;
mod posture_check;

pub use host_config::{HostConfigDataSource, HostConfigIdsDataSource, lookup_filter};
pub use posture_check::{PostureCheckDataSource, PostureCheckModel, posture_check_schema};

use crate::diag::Diagnostics;
use crate::resource::StateResponse;
use crate::schema::Schema;
use crate::value::ObjectValue;

/// A data source the runtime reads once per plan.
pub trait DataSource: Send + Sync {
    /// Type name, such as `ziti_host_config_v1`.
    fn type_name(&self) -> &'static str;

    /// Schema of the data source state.
    fn schema(&self) -> &Schema;

    /// Cross-attribute validation of a configuration.
    fn validate_config(&self, config: &ObjectValue) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        self.schema().validate_required(config, &mut diagnostics);
        diagnostics
    }

    /// Look the entity up and return its state.
    fn read(&self, config: &ObjectValue) -> StateResponse;
}
