//! Tests for schema shapes, planning, and required-attribute checks.

use super::*;
use crate::value::{Attr, AttrType, ListValue};
use anyhow::{Context, Result, ensure};
use rstest::{fixture, rstest};

fn action_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("trigger").required(),
        Attribute::int32("consecutive_events").with_default(Attr::known(1)),
    ]
}

#[fixture]
fn schema() -> Schema {
    Schema::new(
        "test",
        vec![
            Attribute::string("id").computed(),
            Attribute::string("name").required(),
            Attribute::string("kind").with_default(Attr::known("host".to_owned())),
            Attribute::list("tags", AttrType::String).default_null(),
            Attribute::list_nested("actions", action_attributes()),
        ],
    )
}

fn action(shape: &NestedShape, trigger: Option<&str>) -> Result<ModelValue> {
    Ok(ModelValue::Object(ObjectValue::with_nulls(
        Arc::clone(&shape.ty),
        [(
            "trigger",
            ModelValue::String(Attr::from_option(trigger.map(str::to_owned))),
        )],
    )?))
}

#[rstest]
fn object_type_lists_every_attribute(schema: Schema) {
    let shape = schema.object_type();
    let names: Vec<_> = shape.attributes().map(|(name, _)| name).collect();
    assert_eq!(names, ["actions", "id", "kind", "name", "tags"]);
}

#[rstest]
fn plan_applies_defaults_and_marks_computed_unknown(schema: Schema) -> Result<()> {
    let nested = NestedShape::from_attributes(&action_attributes());
    let actions = ListValue::known(nested.attr_type(), vec![action(&nested, Some("fail"))?])?;
    let config = ObjectValue::with_nulls(
        schema.object_type(),
        [
            ("name", ModelValue::String(Attr::known("web".to_owned()))),
            ("actions", ModelValue::List(actions)),
        ],
    )?;
    let planned = schema.plan(&config)?;

    ensure!(planned.require("id")?.is_unknown(), "id should be unknown");
    ensure!(
        planned.require("kind")? == &ModelValue::String(Attr::known("host".to_owned())),
        "kind should default"
    );
    ensure!(planned.require("tags")?.is_null(), "tags default to null");
    let ModelValue::List(list) = planned.require("actions")? else {
        anyhow::bail!("actions should stay a list");
    };
    let Some(ModelValue::Object(first)) = list.elements().and_then(<[_]>::first) else {
        anyhow::bail!("missing first action");
    };
    ensure!(
        first.require("consecutive_events")? == &ModelValue::Int32(Attr::known(1)),
        "nested default should apply"
    );
    Ok(())
}

#[rstest]
fn validate_required_reports_nested_paths(schema: Schema) -> Result<()> {
    let nested = NestedShape::from_attributes(&action_attributes());
    let actions = ListValue::known(nested.attr_type(), vec![action(&nested, None)?])?;
    let config = ObjectValue::with_nulls(schema.object_type(), [("actions", ModelValue::List(actions))])?;
    let mut diags = Diagnostics::new();
    schema.validate_required(&config, &mut diags);
    let paths: Vec<_> = diags.iter().filter_map(|d| d.attribute.as_deref()).collect();
    ensure!(paths == ["name", "actions[0].trigger"], "got {paths:?}");
    Ok(())
}

#[rstest]
fn into_computed_strips_defaults(schema: Schema) -> Result<()> {
    let attribute = schema
        .attribute("actions")
        .context("actions attribute")?
        .clone()
        .into_computed();
    ensure!(attribute.presence() == Presence::Computed, "should be computed");
    let children = attribute.nested_attributes().context("nested")?;
    ensure!(
        children
            .iter()
            .all(|c| c.default_value().is_none() && c.presence() == Presence::Computed),
        "children should be computed without defaults"
    );
    Ok(())
}

#[rstest]
fn fill_defaults_only_replaces_nulls() {
    let nested = NestedShape::from_attributes(&action_attributes());
    let mut attrs = std::collections::BTreeMap::from([
        ("trigger".to_owned(), ModelValue::String(Attr::Null)),
        ("consecutive_events".to_owned(), ModelValue::Int32(Attr::Null)),
    ]);
    nested.fill_defaults(&mut attrs);
    assert_eq!(
        attrs.get("consecutive_events"),
        Some(&ModelValue::Int32(Attr::known(1)))
    );
    attrs.insert("consecutive_events".to_owned(), ModelValue::Int32(Attr::known(3)));
    nested.fill_defaults(&mut attrs);
    assert_eq!(
        attrs.get("consecutive_events"),
        Some(&ModelValue::Int32(Attr::known(3)))
    );
}
