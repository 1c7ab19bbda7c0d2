//! Posture check data source against an in-memory controller.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use test_helpers::{Call, FakeManagementApi};
use ziti_provider::api::PostureCheckDetail;
use ziti_provider::datasource::{DataSource, PostureCheckDataSource, PostureCheckModel};
use ziti_provider::{Attr, DeclarativeModel, ListValue, ModelValue, ObjectValue};

struct Harness {
    api: Arc<FakeManagementApi>,
    source: PostureCheckDataSource,
}

fn detail(body: Value) -> Result<PostureCheckDetail> {
    Ok(serde_json::from_value(body)?)
}

#[fixture]
fn harness() -> Harness {
    let api = Arc::new(FakeManagementApi::new());
    Harness {
        source: PostureCheckDataSource::new(api.clone()),
        api,
    }
}

impl Harness {
    fn lookup(&self, id: &str) -> Result<ObjectValue> {
        Ok(ObjectValue::with_nulls(
            self.source.schema().object_type(),
            [("id", ModelValue::String(Attr::known(id.to_owned())))],
        )?)
    }
}

#[rstest]
#[case::os(
    json!({
        "typeId": "OS", "id": "p1", "name": "desktops", "roleAttributes": ["staff"],
        "operatingSystems": [{"type": "Linux", "versions": []}, {"type": "macOS", "versions": [">=14"]}]
    }),
    "OS",
    &["Linux", "macOS"],
)]
#[case::process(
    json!({
        "typeId": "PROCESS", "id": "p1", "name": "agent", "roleAttributes": [],
        "process": {"osType": "Windows", "path": "C:\\agent.exe"}
    }),
    "PROCESS",
    &["C:\\agent.exe"],
)]
#[case::mfa(
    json!({"typeId": "MFA", "id": "p1", "name": "otp", "timeoutSeconds": -1}),
    "MFA",
    &[],
)]
fn lookup_flattens_each_variant(
    harness: Harness,
    #[case] body: Value,
    #[case] type_id: &str,
    #[case] criteria: &[&str],
) -> Result<()> {
    harness.api.insert_posture_check(detail(body)?);
    let response = harness.source.read(&harness.lookup("p1")?);
    ensure!(!response.diagnostics.has_error(), "{:?}", response.diagnostics);
    let state = response.state.ok_or_else(|| anyhow!("no state"))?;
    let model = PostureCheckModel::from_object(&state)?;
    ensure!(model.type_id == Attr::known(type_id.to_owned()), "type id: {:?}", model.type_id);
    ensure!(
        model.criteria == ListValue::strings(criteria.iter().copied()),
        "criteria: {:?}",
        model.criteria
    );
    ensure!(
        harness.api.calls() == [Call::DetailPostureCheck("p1".to_owned())],
        "calls: {:?}",
        harness.api.calls()
    );
    Ok(())
}

#[rstest]
fn role_attributes_are_kept(harness: Harness) -> Result<()> {
    harness.api.insert_posture_check(detail(json!({
        "typeId": "DOMAIN", "id": "d1", "name": "corp",
        "roleAttributes": ["laptops", "servers"], "domains": ["corp.example"]
    }))?);
    let state = harness
        .source
        .read(&harness.lookup("d1")?)
        .state
        .ok_or_else(|| anyhow!("no state"))?;
    let model = PostureCheckModel::from_object(&state)?;
    ensure!(model.name == Attr::known("corp".to_owned()), "name");
    ensure!(
        model.role_attributes.known_strings() == ["laptops", "servers"],
        "roles: {:?}",
        model.role_attributes
    );
    Ok(())
}

#[rstest]
fn unknown_id_is_an_error(harness: Harness) -> Result<()> {
    let response = harness.source.read(&harness.lookup("missing")?);
    ensure!(response.state.is_none(), "no state expected");
    let error = response
        .diagnostics
        .errors()
        .next()
        .ok_or_else(|| anyhow!("error expected"))?;
    ensure!(
        error.summary == "Error Reading Ziti Posture Check from API",
        "summary: {}",
        error.summary
    );
    ensure!(error.detail.contains("missing"), "detail: {}", error.detail);
    Ok(())
}

#[rstest]
fn id_is_required(harness: Harness) -> Result<()> {
    let config = ObjectValue::with_nulls(
        harness.source.schema().object_type(),
        Vec::<(&str, ModelValue)>::new(),
    )?;
    let diagnostics = harness.source.validate_config(&config);
    ensure!(diagnostics.has_error(), "missing id must be reported");
    Ok(())
}
