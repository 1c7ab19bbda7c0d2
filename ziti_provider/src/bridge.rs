//! Conversion between declarative primitives and untyped JSON values.
//!
//! Only primitive attributes cross the bridge one-to-one. Composite
//! attributes are shaped by the payload conversions in
//! [`crate::host_config`], so [`model_to_native`] refuses them instead of
//! guessing a representation.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::value::{Attr, AttrType, ListValue, MapValue, ModelValue, ObjectType};
use crate::{ZitiError, ZitiResult};

/// Unwrap known primitive attributes into JSON values.
///
/// Null and unknown primitives are left out: an absent key means "not set",
/// never a zero value.
///
/// # Errors
///
/// Returns [`ZitiError::UnsupportedKind`] for list, map, and object values.
pub fn model_to_native<'a, I>(attributes: I) -> ZitiResult<Map<String, Value>>
where
    I: IntoIterator<Item = (&'a String, &'a ModelValue)>,
{
    let mut out = Map::new();
    for (key, value) in attributes {
        let native = match value {
            ModelValue::String(attr) => attr.as_known().map(|s| Value::String(s.clone())),
            ModelValue::Int32(attr) => attr.as_known().map(|n| Value::from(*n)),
            ModelValue::Int64(attr) => attr.as_known().map(|n| Value::from(*n)),
            ModelValue::Bool(attr) => attr.as_known().map(|b| Value::Bool(*b)),
            ModelValue::List(_) | ModelValue::Map(_) | ModelValue::Object(_) => {
                return Err(ZitiError::UnsupportedKind {
                    key: key.clone(),
                    kind: value.kind(),
                });
            }
        };
        if let Some(native) = native {
            out.insert(key.clone(), native);
        }
    }
    Ok(out)
}

/// Build a declarative value for every attribute of `shape` from `native`.
///
/// Absent and `null` entries become typed nulls. Entries whose JSON kind
/// does not match the attribute type are logged and degraded to typed nulls.
/// Object-typed attributes are always returned as nulls for the caller to
/// fill from its own payload conversion.
pub fn native_to_model(native: &Map<String, Value>, shape: &ObjectType) -> BTreeMap<String, ModelValue> {
    shape
        .attributes()
        .map(|(name, ty)| {
            let value = native
                .get(name)
                .map_or_else(|| ty.null(), |raw| convert(name, raw, ty));
            (name.to_owned(), value)
        })
        .collect()
}

fn convert(name: &str, raw: &Value, ty: &AttrType) -> ModelValue {
    if raw.is_null() {
        return ty.null();
    }
    convert_known(name, raw, ty).unwrap_or_else(|| {
        debug!(
            attribute = name,
            expected = ty.kind(),
            found = json_kind(raw),
            "degrading mismatched value to null"
        );
        ty.null()
    })
}

fn convert_known(name: &str, raw: &Value, ty: &AttrType) -> Option<ModelValue> {
    match (ty, raw) {
        (AttrType::String, Value::String(s)) => Some(ModelValue::String(Attr::known(s.clone()))),
        (AttrType::Int32, Value::Number(n)) => int32(n).map(|v| ModelValue::Int32(Attr::known(v))),
        (AttrType::Int64, Value::Number(n)) => n.as_i64().map(|v| ModelValue::Int64(Attr::known(v))),
        (AttrType::Bool, Value::Bool(b)) => Some(ModelValue::Bool(Attr::known(*b))),
        (AttrType::List(element), Value::Array(items)) if !element.is_composite() => {
            let elements = items
                .iter()
                .map(|item| convert(name, item, element))
                .collect();
            ListValue::known((**element).clone(), elements).ok().map(ModelValue::List)
        }
        (AttrType::Map(element), Value::Object(entries)) if !element.is_composite() => {
            let converted = entries
                .iter()
                .map(|(key, item)| (key.clone(), convert(name, item, element)))
                .collect();
            MapValue::known((**element).clone(), converted).ok().map(ModelValue::Map)
        }
        _ => None,
    }
}

fn int32(n: &Number) -> Option<i32> {
    n.as_i64().and_then(|v| i32::try_from(v).ok())
}

/// Short name of a JSON value's kind.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn shape() -> ObjectType {
        ObjectType::new([
            ("address", AttrType::String),
            ("port", AttrType::Int32),
            ("cost", AttrType::Int64),
            ("forward_port", AttrType::Bool),
            ("allowed_protocols", AttrType::list_of(AttrType::String)),
            (
                "listen_options",
                AttrType::Object(Arc::new(ObjectType::new([("cost", AttrType::Int32)]))),
            ),
        ])
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[rstest]
    fn model_to_native_skips_null_and_unknown() -> Result<()> {
        let attrs = BTreeMap::from([
            ("address".to_owned(), ModelValue::String(Attr::known("db".to_owned()))),
            ("port".to_owned(), ModelValue::Int32(Attr::Null)),
            ("cost".to_owned(), ModelValue::Int64(Attr::Unknown)),
            ("forward_port".to_owned(), ModelValue::Bool(Attr::known(false))),
        ]);
        let native = model_to_native(&attrs)?;
        ensure!(
            Value::Object(native.clone()) == json!({"address": "db", "forward_port": false}),
            "got {native:?}"
        );
        Ok(())
    }

    #[rstest]
    fn model_to_native_rejects_composites() {
        let attrs = BTreeMap::from([(
            "allowed_protocols".to_owned(),
            ModelValue::List(ListValue::strings(["tcp"])),
        )]);
        let result = model_to_native(&attrs);
        assert!(matches!(
            result,
            Err(ZitiError::UnsupportedKind { ref key, kind: "list" }) if key == "allowed_protocols"
        ));
    }

    #[rstest]
    fn native_to_model_covers_every_attribute(shape: ObjectType) {
        let model = native_to_model(&as_map(json!({"address": "db", "port": 5432})), &shape);
        assert_eq!(model.len(), shape.len());
        assert_eq!(
            model.get("port"),
            Some(&ModelValue::Int32(Attr::known(5432)))
        );
        assert_eq!(model.get("cost"), Some(&ModelValue::Int64(Attr::Null)));
        assert!(model.get("listen_options").is_some_and(ModelValue::is_null));
    }

    #[rstest]
    #[case::string_for_int(json!({"port": "80"}))]
    #[case::out_of_range(json!({"port": 4_294_967_296_i64}))]
    #[case::explicit_null(json!({"port": null}))]
    #[case::float(json!({"port": 1.5}))]
    fn native_to_model_degrades_to_null(shape: ObjectType, #[case] native: Value) {
        let model = native_to_model(&as_map(native), &shape);
        assert_eq!(model.get("port"), Some(&ModelValue::Int32(Attr::Null)));
    }

    #[rstest]
    fn native_to_model_reads_primitive_lists(shape: ObjectType) {
        let model = native_to_model(&as_map(json!({"allowed_protocols": ["tcp", "udp"]})), &shape);
        assert_eq!(
            model.get("allowed_protocols"),
            Some(&ModelValue::List(ListValue::strings(["tcp", "udp"])))
        );
    }
}
