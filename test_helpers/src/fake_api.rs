//! In-memory management API for lifecycle tests.
//!
//! Configs and posture checks live in maps guarded by a `parking_lot` mutex. Every call is
//! recorded so tests can assert on the exact requests a binding issued.
//! Filters understand the shapes the bindings produce: `id = "…"` or
//! `name = "…"`, optionally followed by `and type = "…"`. Any other
//! selector matches every config of the requested type.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde_json::Value;
use ziti_provider::api::{
    ConfigCreate, ConfigDetail, ConfigUpdate, ListQuery, ManagementApi, PostureCheckDetail,
};
use ziti_provider::{ZitiError, ZitiResult};

/// A request received by [`FakeManagementApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `create_config`.
    Create(ConfigCreate),
    /// `detail_config`.
    Detail(String),
    /// `update_config`.
    Update(String, ConfigUpdate),
    /// `delete_config`.
    Delete(String),
    /// `list_configs`.
    List(ListQuery),
    /// `detail_posture_check`.
    DetailPostureCheck(String),
}

#[derive(Default)]
struct State {
    configs: BTreeMap<String, ConfigDetail>,
    posture_checks: BTreeMap<String, PostureCheckDetail>,
    calls: Vec<Call>,
    next_id: u64,
    failure: Option<(u16, String)>,
}

/// In-memory [`ManagementApi`].
#[derive(Default)]
pub struct FakeManagementApi {
    state: Mutex<State>,
}

impl FakeManagementApi {
    /// Empty controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `detail` as if it had been created earlier.
    pub fn insert_config(&self, detail: ConfigDetail) {
        self.state.lock().configs.insert(detail.id.clone(), detail);
    }

    /// Store a config built from its parts.
    pub fn insert(&self, id: &str, name: &str, config_type_id: &str, data: Value) {
        self.insert_config(ConfigDetail {
            id: id.to_owned(),
            name: name.to_owned(),
            config_type_id: config_type_id.to_owned(),
            data,
        });
    }

    /// Store a posture check for `detail_posture_check` lookups.
    pub fn insert_posture_check(&self, detail: PostureCheckDetail) {
        let id = detail.base().id.clone();
        self.state.lock().posture_checks.insert(id, detail);
    }

    /// Current copy of config `id`.
    #[must_use]
    pub fn config(&self, id: &str) -> Option<ConfigDetail> {
        self.state.lock().configs.get(id).cloned()
    }

    /// Remove config `id` behind the bindings' back.
    pub fn remove(&self, id: &str) -> Option<ConfigDetail> {
        self.state.lock().configs.remove(id)
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Answer the next call with an API error.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.state.lock().failure = Some((status, message.to_owned()));
    }

    fn begin(&self, call: Call) -> ZitiResult<parking_lot::MutexGuard<'_, State>> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failure.take() {
            Some((status, message)) => Err(ZitiError::Api { status, message }),
            None => Ok(state),
        }
    }
}

impl ManagementApi for FakeManagementApi {
    fn create_config(&self, config: &ConfigCreate) -> ZitiResult<String> {
        let mut state = self.begin(Call::Create(config.clone()))?;
        state.next_id += 1;
        let id = format!("cfg-{}", state.next_id);
        let detail = ConfigDetail {
            id: id.clone(),
            name: config.name.clone(),
            config_type_id: config.config_type_id.clone(),
            data: Value::Object(config.data.clone()),
        };
        state.configs.insert(id.clone(), detail);
        Ok(id)
    }

    fn detail_config(&self, id: &str) -> ZitiResult<ConfigDetail> {
        let state = self.begin(Call::Detail(id.to_owned()))?;
        state
            .configs
            .get(id)
            .cloned()
            .ok_or_else(|| ZitiError::not_found("config", id))
    }

    fn update_config(&self, id: &str, config: &ConfigUpdate) -> ZitiResult<()> {
        let mut state = self.begin(Call::Update(id.to_owned(), config.clone()))?;
        let existing = state
            .configs
            .get_mut(id)
            .ok_or_else(|| ZitiError::not_found("config", id))?;
        existing.name.clone_from(&config.name);
        existing.data = Value::Object(config.data.clone());
        Ok(())
    }

    fn delete_config(&self, id: &str) -> ZitiResult<()> {
        let mut state = self.begin(Call::Delete(id.to_owned()))?;
        state
            .configs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ZitiError::not_found("config", id))
    }

    fn list_configs(&self, query: &ListQuery) -> ZitiResult<Vec<ConfigDetail>> {
        let state = self.begin(Call::List(query.clone()))?;
        let selector = Selector::parse(&query.filter);
        Ok(state
            .configs
            .values()
            .filter(|config| selector.matches(config))
            .cloned()
            .collect())
    }

    fn detail_posture_check(&self, id: &str) -> ZitiResult<PostureCheckDetail> {
        let state = self.begin(Call::DetailPostureCheck(id.to_owned()))?;
        state
            .posture_checks
            .get(id)
            .cloned()
            .ok_or_else(|| ZitiError::not_found("posture check", id))
    }
}

struct Selector {
    id: Option<String>,
    name: Option<String>,
    config_type: Option<String>,
}

impl Selector {
    fn parse(filter: &str) -> Self {
        let (head, config_type) = match filter.split_once(" and type = ") {
            Some((head, ty)) => (head, Some(ty.trim_matches('"').to_owned())),
            None => (filter, None),
        };
        let quoted = |prefix: &str| {
            head.trim()
                .strip_prefix(prefix)
                .map(|rest| rest.trim_matches('"').to_owned())
        };
        Self {
            id: quoted("id = "),
            name: quoted("name = "),
            config_type,
        }
    }

    fn matches(&self, config: &ConfigDetail) -> bool {
        self.id.as_ref().is_none_or(|id| *id == config.id)
            && self.name.as_ref().is_none_or(|name| *name == config.name)
            && self
                .config_type
                .as_ref()
                .is_none_or(|ty| *ty == config.config_type_id)
    }
}
