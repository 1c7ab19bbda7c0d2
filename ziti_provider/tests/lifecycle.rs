//! Host config resource lifecycle against an in-memory controller.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::{Call, FakeManagementApi};
use ziti_provider::api::ConfigDetail;
use ziti_provider::host_config::{CONFIG_TYPE_ID, HostConfigModel, HostConfigShapes};
use ziti_provider::resource::{HostConfigResource, ReadOutcome, Resource, StateResponse};
use ziti_provider::{Attr, DeclarativeModel, ListValue, ModelValue, ObjectValue};

struct Harness {
    api: Arc<FakeManagementApi>,
    shapes: Arc<HostConfigShapes>,
    resource: HostConfigResource,
}

#[fixture]
fn harness() -> Harness {
    let api = Arc::new(FakeManagementApi::new());
    let shapes = Arc::new(HostConfigShapes::new());
    let resource = HostConfigResource::new(api.clone(), Arc::clone(&shapes));
    Harness {
        api,
        shapes,
        resource,
    }
}

fn string(value: &str) -> ModelValue {
    ModelValue::String(Attr::known(value.to_owned()))
}

impl Harness {
    fn config(&self, attrs: Vec<(&str, ModelValue)>) -> Result<ObjectValue> {
        Ok(ObjectValue::with_nulls(Arc::clone(&self.shapes.resource), attrs)?)
    }

    fn fixed_config(&self) -> Result<ObjectValue> {
        self.config(vec![
            ("name", string("postgres")),
            ("address", string("localhost")),
            ("port", ModelValue::Int32(Attr::known(5432))),
            ("protocol", string("tcp")),
        ])
    }

    fn plan(&self, config: &ObjectValue) -> Result<ObjectValue> {
        let planned = self.resource.plan(config);
        ensure!(!planned.diagnostics.has_error(), "plan failed: {:?}", planned.diagnostics);
        planned.state.ok_or_else(|| anyhow!("plan returned no state"))
    }

    fn create(&self, config: &ObjectValue) -> Result<ObjectValue> {
        let planned = self.plan(config)?;
        state_of(self.resource.create(&planned))
    }
}

fn state_of(response: StateResponse) -> Result<ObjectValue> {
    ensure!(
        !response.diagnostics.has_error(),
        "call failed: {:?}",
        response.diagnostics
    );
    response.state.ok_or_else(|| anyhow!("call returned no state"))
}

#[rstest]
fn plan_applies_defaults_and_leaves_id_unknown(harness: Harness) -> Result<()> {
    let planned = harness.plan(&harness.fixed_config()?)?;
    let model = HostConfigModel::from_object(&planned)?;
    ensure!(model.id.is_unknown(), "id should be unknown until created");
    ensure!(
        model.config_type_id == Attr::known(CONFIG_TYPE_ID.to_owned()),
        "config type id default"
    );
    Ok(())
}

#[rstest]
fn create_sends_compact_body_and_records_id(harness: Harness) -> Result<()> {
    let state = harness.create(&harness.fixed_config()?)?;
    let model = HostConfigModel::from_object(&state)?;
    ensure!(model.id == Attr::known("cfg-1".to_owned()), "id: {:?}", model.id);

    let stored = harness
        .api
        .config("cfg-1")
        .ok_or_else(|| anyhow!("config not stored"))?;
    ensure!(stored.config_type_id == CONFIG_TYPE_ID, "type id");
    ensure!(
        stored.data == json!({"address": "localhost", "port": 5432, "protocol": "tcp"}),
        "request body: {}",
        stored.data
    );
    Ok(())
}

#[rstest]
fn read_after_create_reproduces_state(harness: Harness) -> Result<()> {
    let created = harness.create(&harness.fixed_config()?)?;
    match harness.resource.read(&created) {
        ReadOutcome::Refreshed { state, diagnostics } => {
            ensure!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
            ensure!(state == created, "state drifted:\n{state:?}\n!=\n{created:?}");
            Ok(())
        }
        other => Err(anyhow!("expected refreshed state, got {other:?}")),
    }
}

#[rstest]
fn explicit_false_option_does_not_drift(harness: Harness) -> Result<()> {
    let options = ObjectValue::with_nulls(
        Arc::clone(&harness.shapes.listen_options.ty),
        [
            ("bind_using_edge_identity", ModelValue::Bool(Attr::known(false))),
            ("connect_timeout", string("5s")),
            ("cost", ModelValue::Int32(Attr::known(0))),
            ("max_connections", ModelValue::Int32(Attr::known(100))),
            ("precedence", string("default")),
        ],
    )?;
    let config = harness.config(vec![
        ("name", string("postgres")),
        ("address", string("localhost")),
        ("port", ModelValue::Int32(Attr::known(5432))),
        ("protocol", string("tcp")),
        ("listen_options", ModelValue::Object(options)),
    ])?;
    let created = harness.create(&config)?;

    let stored = harness
        .api
        .config("cfg-1")
        .ok_or_else(|| anyhow!("config not stored"))?;
    ensure!(
        stored.data.get("listenOptions")
            == Some(&json!({
                "connectTimeout": "5s", "cost": 0, "maxConnections": 100, "precedence": "default"
            })),
        "false flag is not sent: {}",
        stored.data
    );
    match harness.resource.read(&created) {
        ReadOutcome::Refreshed { state, .. } => {
            ensure!(state == created, "state drifted:\n{state:?}\n!=\n{created:?}");
            let model = HostConfigModel::from_object(&state)?;
            let bind = model.fields.listen_options.get("bind_using_edge_identity");
            ensure!(
                bind == Some(&ModelValue::Bool(Attr::known(false))),
                "bind flag: {bind:?}"
            );
            Ok(())
        }
        other => Err(anyhow!("expected refreshed state, got {other:?}")),
    }
}

#[rstest]
fn forwarded_port_is_not_sent(harness: Harness) -> Result<()> {
    let range = ObjectValue::with_nulls(
        Arc::clone(&harness.shapes.port_range.ty),
        [
            ("low", ModelValue::Int32(Attr::known(80))),
            ("high", ModelValue::Int32(Attr::known(443))),
        ],
    )?;
    let config = harness.config(vec![
        ("name", string("web")),
        ("address", string("localhost")),
        ("protocol", string("tcp")),
        ("forward_port", ModelValue::Bool(Attr::known(true))),
        (
            "allowed_port_ranges",
            ModelValue::List(ListValue::known(
                harness.shapes.port_range.attr_type(),
                vec![ModelValue::Object(range)],
            )?),
        ),
    ])?;
    harness.create(&config)?;
    let Some(Call::Create(request)) = harness.api.calls().into_iter().next() else {
        return Err(anyhow!("expected a create call"));
    };
    ensure!(!request.data.contains_key("port"), "port sent: {:?}", request.data);
    ensure!(
        request.data.get("allowedPortRanges") == Some(&json!([{"low": 80, "high": 443}])),
        "ranges: {:?}",
        request.data
    );
    Ok(())
}

#[rstest]
fn plan_rejects_conflicting_attributes(harness: Harness) -> Result<()> {
    let config = harness.config(vec![
        ("name", string("web")),
        ("address", string("localhost")),
        ("forward_address", ModelValue::Bool(Attr::known(true))),
        ("allowed_addresses", ModelValue::List(ListValue::strings(["*.internal"]))),
        ("port", ModelValue::Int32(Attr::known(80))),
        ("protocol", string("tcp")),
    ])?;
    let planned = harness.resource.plan(&config);
    ensure!(planned.state.is_none(), "plan should fail");
    ensure!(planned.diagnostics.has_error(), "errors expected");
    Ok(())
}

#[rstest]
fn plan_reports_missing_name(harness: Harness) -> Result<()> {
    let config = harness.config(vec![
        ("address", string("localhost")),
        ("port", ModelValue::Int32(Attr::known(80))),
        ("protocol", string("tcp")),
    ])?;
    let planned = harness.resource.plan(&config);
    let paths: Vec<_> = planned
        .diagnostics
        .errors()
        .filter_map(|d| d.attribute.as_deref())
        .collect();
    ensure!(paths == ["name"], "got {paths:?}");
    Ok(())
}

#[rstest]
fn read_of_deleted_config_removes_it(harness: Harness) -> Result<()> {
    let created = harness.create(&harness.fixed_config()?)?;
    harness.api.remove("cfg-1");
    ensure!(
        matches!(harness.resource.read(&created), ReadOutcome::Removed),
        "resource should be dropped"
    );
    Ok(())
}

#[rstest]
fn read_refreshes_name_and_warns_on_conflicts(harness: Harness) -> Result<()> {
    harness.api.insert_config(ConfigDetail {
        id: "c9".to_owned(),
        name: "renamed".to_owned(),
        config_type_id: CONFIG_TYPE_ID.to_owned(),
        data: json!({
            "address": "db", "forwardAddress": true,
            "allowedAddresses": ["db", "db2"],
            "port": 5432, "protocol": "tcp",
            "listenOptions": {"cost": 0, "precedence": "required"}
        }),
    });
    let imported = state_of(harness.resource.import_state("c9"))?;
    let ReadOutcome::Refreshed { state, diagnostics } = harness.resource.read(&imported) else {
        return Err(anyhow!("expected refreshed state"));
    };
    let model = HostConfigModel::from_object(&state)?;
    ensure!(model.id == Attr::known("c9".to_owned()), "id kept");
    ensure!(model.name == Attr::known("renamed".to_owned()), "name refreshed");
    ensure!(model.fields.address == Attr::known("db".to_owned()), "fixed address kept");
    ensure!(model.fields.forward_address == Attr::known(true), "forward flag kept");
    ensure!(model.fields.allowed_addresses.len() == 2, "allowed addresses");
    let warnings: Vec<_> = diagnostics.warnings().collect();
    ensure!(warnings.len() == 1, "one conflict warning expected: {warnings:?}");
    Ok(())
}

#[rstest]
fn read_rejects_non_object_data(harness: Harness) -> Result<()> {
    harness.api.insert("c1", "odd", CONFIG_TYPE_ID, json!(["not", "an", "object"]));
    let imported = state_of(harness.resource.import_state("c1"))?;
    let ReadOutcome::Failed(diagnostics) = harness.resource.read(&imported) else {
        return Err(anyhow!("read should fail"));
    };
    ensure!(diagnostics.has_error(), "error expected");
    Ok(())
}

#[rstest]
fn update_puts_name_and_body_and_keeps_id(harness: Harness) -> Result<()> {
    let created = harness.create(&harness.fixed_config()?)?;
    let changed = harness.config(vec![
        ("name", string("postgres-replica")),
        ("address", string("replica")),
        ("port", ModelValue::Int32(Attr::known(5433))),
        ("protocol", string("tcp")),
    ])?;
    let planned = harness.plan(&changed)?;
    let updated = state_of(harness.resource.update(&planned, &created))?;
    ensure!(
        HostConfigModel::from_object(&updated)?.id == Attr::known("cfg-1".to_owned()),
        "id kept from prior state"
    );
    let stored = harness.api.config("cfg-1").ok_or_else(|| anyhow!("config gone"))?;
    ensure!(stored.name == "postgres-replica", "name updated");
    ensure!(
        stored.data == json!({"address": "replica", "port": 5433, "protocol": "tcp"}),
        "data: {}",
        stored.data
    );
    Ok(())
}

#[rstest]
fn delete_tolerates_missing_configs(harness: Harness) -> Result<()> {
    let created = harness.create(&harness.fixed_config()?)?;
    ensure!(harness.resource.delete(&created).is_empty(), "first delete");
    ensure!(harness.api.config("cfg-1").is_none(), "config removed");
    ensure!(harness.resource.delete(&created).is_empty(), "second delete");
    Ok(())
}

#[rstest]
fn api_failures_become_diagnostics(harness: Harness) -> Result<()> {
    let planned = harness.plan(&harness.fixed_config()?)?;
    harness.api.fail_next(400, "COULD_NOT_VALIDATE: bad port");
    let response = harness.resource.create(&planned);
    ensure!(response.state.is_none(), "no state on failure");
    let error = response
        .diagnostics
        .errors()
        .next()
        .ok_or_else(|| anyhow!("error expected"))?;
    ensure!(error.summary == "Error Creating Ziti Config from API", "summary {}", error.summary);
    ensure!(error.detail.contains("bad port"), "detail {}", error.detail);
    Ok(())
}
