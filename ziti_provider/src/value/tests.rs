//! Tests for declarative value construction and shape checking.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::*;
use crate::ZitiError;
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

#[fixture]
fn range_shape() -> Arc<ObjectType> {
    Arc::new(ObjectType::new([
        ("low", AttrType::Int32),
        ("high", AttrType::Int32),
    ]))
}

#[rstest]
fn attr_defaults_to_null() {
    let attr: Attr<String> = Attr::default();
    assert!(attr.is_null());
    assert_eq!(Attr::from_option(Some(3)).into_option(), Some(3));
    assert!(Attr::<i32>::Unknown.map(|v| v + 1).is_unknown());
}

#[rstest]
fn list_rejects_mismatched_elements() -> Result<()> {
    let err = ListValue::known(
        AttrType::String,
        vec![
            ModelValue::String(Attr::known("tcp".to_owned())),
            ModelValue::Int32(Attr::known(1)),
        ],
    )
    .err()
    .ok_or_else(|| anyhow!("expected mismatch"))?;
    ensure!(
        matches!(&err, ZitiError::InvalidValue { key, .. } if key == "[1]"),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn null_and_empty_lists_differ() {
    let null = ListValue::null(AttrType::String);
    let empty = ListValue::strings(Vec::<String>::new());
    assert!(null.is_null());
    assert!(!empty.is_null());
    assert!(empty.is_empty());
    assert_ne!(null, empty);
}

#[rstest]
fn known_strings_skip_null_elements() -> Result<()> {
    let list = ListValue::known(
        AttrType::String,
        vec![
            ModelValue::String(Attr::known("a".to_owned())),
            ModelValue::String(Attr::Null),
        ],
    )?;
    ensure!(list.known_strings() == ["a"], "got {:?}", list.known_strings());
    Ok(())
}

#[rstest]
fn object_requires_every_attribute(range_shape: Arc<ObjectType>) -> Result<()> {
    let mut attrs = BTreeMap::new();
    attrs.insert("low".to_owned(), ModelValue::Int32(Attr::known(80)));
    let err = ObjectValue::known(range_shape, attrs)
        .err()
        .ok_or_else(|| anyhow!("expected missing attribute"))?;
    ensure!(err.to_string().contains("'high'"), "got {err}");
    Ok(())
}

#[rstest]
fn with_nulls_fills_absent_attributes(range_shape: Arc<ObjectType>) -> Result<()> {
    let object = ObjectValue::with_nulls(
        range_shape,
        [("low", ModelValue::Int32(Attr::known(80)))],
    )?;
    ensure!(
        object.get("high") == Some(&ModelValue::Int32(Attr::Null)),
        "high should be null"
    );
    ensure!(
        object.require("low")? == &ModelValue::Int32(Attr::known(80)),
        "low should be known"
    );
    Ok(())
}

#[rstest]
fn with_nulls_rejects_foreign_attributes(range_shape: Arc<ObjectType>) {
    let result = ObjectValue::with_nulls(range_shape, [("mid", ModelValue::Int32(Attr::Null))]);
    assert!(matches!(result, Err(ZitiError::InvalidValue { .. })));
}

#[rstest]
fn require_fails_on_null_object(range_shape: Arc<ObjectType>) {
    let object = ObjectValue::null(range_shape);
    assert!(object.require("low").is_err());
    assert!(object.get("low").is_none());
}

#[rstest]
fn nested_objects_conform_by_shape(range_shape: Arc<ObjectType>) {
    let copy = Arc::new((*range_shape).clone());
    let value = AttrType::Object(Arc::clone(&range_shape)).null();
    assert!(value.conforms_to(&AttrType::Object(copy)));
    assert!(!value.conforms_to(&AttrType::list_of(AttrType::Object(range_shape))));
}

#[rstest]
fn model_field_reports_kind_mismatch() {
    let err = <Attr<i32> as ModelField>::from_model(
        "port",
        &ModelValue::String(Attr::known("x".to_owned())),
    );
    assert!(
        matches!(err, Err(ZitiError::InvalidValue { ref message, .. }) if message == "expected int32, found string")
    );
}

#[rstest]
fn model_value_field_passes_any_kind_through() {
    let value = ModelValue::Int64(Attr::Unknown);
    let field = <ModelValue as ModelField>::from_model("anything", &value);
    assert!(matches!(&field, Ok(read) if *read == value));
    assert_eq!(ModelField::into_model(value.clone()), value);
}
