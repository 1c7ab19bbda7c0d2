//! Struct-to-map reflection with zero-value policies.
//!
//! A payload is first rendered through its `Serialize` implementation, so
//! serde field names act as wire names. The resulting object is then walked
//! field by field and zero values are kept, collapsed to `null`, or dropped
//! according to a [`ReflectPolicy`].
//!
//! Zero values are `null`, the empty string, `false`, floating-point zero,
//! empty arrays, and objects whose every field is zero. A zero object is
//! only dropped when omitting; otherwise its fields are walked one by one.
//! Integers are never treated as zero: a port or cost of `0` is meaningful
//! on the wire.

use std::num::FpCategory;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::bridge::json_kind;
use crate::{ZitiError, ZitiResult, ZitiResultExt};

/// How zero values are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflectPolicy {
    /// Emit zero values as `null`.
    pub collapse_zero_to_nil: bool,
    /// Drop zero values and absent fields entirely.
    pub omit_zero: bool,
}

impl ReflectPolicy {
    /// Keep every field as serialized.
    pub const FAITHFUL: Self = Self {
        collapse_zero_to_nil: false,
        omit_zero: false,
    };

    /// Used when reading controller payloads back into state: zeros become
    /// `null` but every field stays present.
    pub const READ: Self = Self {
        collapse_zero_to_nil: true,
        omit_zero: false,
    };

    /// Used when building request bodies: zeros and absent fields are left
    /// out.
    pub const WRITE: Self = Self {
        collapse_zero_to_nil: true,
        omit_zero: true,
    };
}

/// Render `value` as a JSON object under `policy`.
///
/// ```
/// use serde::Serialize;
/// use serde_json::json;
/// use ziti_provider::reflect::{ReflectPolicy, struct_to_map};
///
/// #[derive(Serialize)]
/// struct Options {
///     cost: Option<i32>,
///     precedence: Option<String>,
/// }
///
/// let options = Options { cost: Some(0), precedence: None };
/// let map = struct_to_map(&options, ReflectPolicy::WRITE)?;
/// assert_eq!(serde_json::Value::Object(map), json!({"cost": 0}));
/// # Ok::<(), ziti_provider::ZitiError>(())
/// ```
///
/// # Errors
///
/// Returns [`ZitiError::TypeMismatch`] when `value` does not serialize to an
/// object, and [`ZitiError::Marshal`] when serialization fails.
pub fn struct_to_map<T>(value: &T, policy: ReflectPolicy) -> ZitiResult<Map<String, Value>>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value).into_marshal()? {
        Value::Object(fields) => Ok(reflect_object(fields, policy)),
        other => Err(ZitiError::type_mismatch("object", json_kind(&other))),
    }
}

fn reflect_object(fields: Map<String, Value>, policy: ReflectPolicy) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in fields {
        trace!(field = %key, kind = json_kind(&value), "reflecting field");
        if let Some(reflected) = reflect_field(value, policy) {
            out.insert(key, reflected);
        }
    }
    out
}

fn reflect_field(value: Value, policy: ReflectPolicy) -> Option<Value> {
    match value {
        Value::Null => (!policy.omit_zero).then_some(Value::Null),
        Value::Object(nested) if policy.omit_zero && is_zero_object(&nested) => None,
        Value::Object(nested) => Some(Value::Object(reflect_object(nested, policy))),
        Value::Array(items) if items.is_empty() => zero(Value::Array(items), policy),
        Value::Array(items) => Some(Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(element) => Value::Object(reflect_object(element, policy)),
                    other => other,
                })
                .collect(),
        )),
        scalar if is_zero_scalar(&scalar) => zero(scalar, policy),
        scalar => Some(scalar),
    }
}

fn zero(value: Value, policy: ReflectPolicy) -> Option<Value> {
    if policy.omit_zero {
        None
    } else if policy.collapse_zero_to_nil {
        Some(Value::Null)
    } else {
        Some(value)
    }
}

fn is_zero_scalar(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => {
            n.is_f64() && n.as_f64().is_some_and(|f| f.classify() == FpCategory::Zero)
        }
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => is_zero_object(fields),
    }
}

fn is_zero_object(fields: &Map<String, Value>) -> bool {
    fields.values().all(is_zero_scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Inner {
        label: Option<String>,
        weight: Option<f64>,
    }

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Outer {
        name: Option<String>,
        enabled: Option<bool>,
        cost: Option<i32>,
        tags: Option<Vec<String>>,
        inner: Option<Inner>,
        items: Option<Vec<Inner>>,
    }

    fn sample() -> Outer {
        Outer {
            name: Some(String::new()),
            enabled: Some(false),
            cost: Some(0),
            tags: Some(Vec::new()),
            inner: Some(Inner::default()),
            items: Some(vec![Inner {
                label: Some("a".to_owned()),
                weight: Some(0.0),
            }]),
        }
    }

    #[rstest]
    #[case::faithful(
        ReflectPolicy::FAITHFUL,
        json!({
            "name": "", "enabled": false, "cost": 0, "tags": [],
            "inner": {"label": null, "weight": null},
            "items": [{"label": "a", "weight": 0.0}]
        })
    )]
    #[case::read(
        ReflectPolicy::READ,
        json!({
            "name": null, "enabled": null, "cost": 0, "tags": null,
            "inner": {"label": null, "weight": null},
            "items": [{"label": "a", "weight": null}]
        })
    )]
    #[case::write(
        ReflectPolicy::WRITE,
        json!({"cost": 0, "items": [{"label": "a"}]})
    )]
    fn policies_render_zero_values(
        #[case] policy: ReflectPolicy,
        #[case] expected: Value,
    ) -> Result<()> {
        let map = struct_to_map(&sample(), policy)?;
        let actual = Value::Object(map);
        ensure!(actual == expected, "got {actual}, expected {expected}");
        Ok(())
    }

    #[rstest]
    fn zero_nested_struct_keeps_its_fields_when_read() -> Result<()> {
        let outer = Outer {
            inner: Some(Inner {
                label: Some(String::new()),
                weight: Some(0.0),
            }),
            ..Outer::default()
        };
        let read = struct_to_map(&outer, ReflectPolicy::READ)?;
        let inner = read.get("inner").cloned().unwrap_or_default();
        ensure!(
            inner == json!({"label": null, "weight": null}),
            "nested zero struct should become a map of nulls, got {inner}"
        );
        let written = struct_to_map(&outer, ReflectPolicy::WRITE)?;
        ensure!(!written.contains_key("inner"), "write drops it: {written:?}");
        Ok(())
    }

    #[rstest]
    fn absent_fields_are_null_unless_omitted() -> Result<()> {
        let map = struct_to_map(&Outer::default(), ReflectPolicy::READ)?;
        ensure!(map.len() == 6, "every field should be present: {map:?}");
        ensure!(map.values().all(Value::is_null), "all absent: {map:?}");
        ensure!(
            struct_to_map(&Outer::default(), ReflectPolicy::WRITE)?.is_empty(),
            "write policy drops absent fields"
        );
        Ok(())
    }

    #[rstest]
    fn references_and_boxes_are_followed() -> Result<()> {
        let boxed = Box::new(Inner {
            label: Some("x".to_owned()),
            weight: None,
        });
        let map = struct_to_map(&boxed, ReflectPolicy::WRITE)?;
        ensure!(Value::Object(map) == json!({"label": "x"}), "box should be transparent");
        Ok(())
    }

    #[rstest]
    #[case::string(json!("text"), "string")]
    #[case::null(Value::Null, "null")]
    #[case::array(json!([1, 2]), "array")]
    fn non_objects_are_rejected(#[case] input: Value, #[case] found: &str) {
        let result = struct_to_map(&input, ReflectPolicy::FAITHFUL);
        assert!(matches!(
            result,
            Err(ZitiError::TypeMismatch { expected: "object", found: ref f }) if f == found
        ));
    }
}
