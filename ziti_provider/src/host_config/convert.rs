//! Conversions between the declarative host config and its wire payload.
//!
//! Writing walks the declarative value and builds nested payload parts only
//! when they are known and non-empty. Reading reflects each nested payload
//! part faithfully, recases its keys, and bridges the primitives back, so an
//! explicit `false` or `""` stays known while absent and empty wire
//! collections come back as null lists.
//!
//! Request bodies drop zero values, so the controller never echoes them.
//! [`restore_omitted_zeros`] carries such values over from prior state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::bridge::{model_to_native, native_to_model};
use crate::casing::{to_model_case, to_wire_case};
use crate::materialize::map_to_struct;
use crate::reflect::{ReflectPolicy, struct_to_map};
use crate::schema::NestedShape;
use crate::value::{Attr, AttrType, ListValue, ModelValue, ObjectValue};
use crate::ZitiResult;

use super::model::{HostConfigFields, HostConfigModel};
use super::payload::{CheckAction, HostConfigPayload, HttpCheck, ListenOptions, PortCheck, PortRange};
use super::shapes::HostConfigShapes;

const ACTIONS: &str = "actions";

impl HostConfigFields {
    /// Build the wire payload from declarative attributes.
    ///
    /// # Errors
    ///
    /// Fails when a nested object cannot be materialized into its payload
    /// type.
    pub fn to_payload(&self) -> ZitiResult<HostConfigPayload> {
        Ok(HostConfigPayload {
            address: self.address.to_option(),
            port: self.port.to_option(),
            protocol: self.protocol.to_option(),
            forward_protocol: only_true(&self.forward_protocol),
            forward_port: only_true(&self.forward_port),
            forward_address: only_true(&self.forward_address),
            allowed_protocols: non_empty(self.allowed_protocols.known_strings()),
            allowed_addresses: non_empty(self.allowed_addresses.known_strings()),
            allowed_source_addresses: non_empty(self.allowed_source_addresses.known_strings()),
            allowed_port_ranges: objects(&self.allowed_port_ranges, native_object::<PortRange>)?,
            listen_options: native_object::<ListenOptions>(&self.listen_options)?,
            http_checks: objects(&self.http_checks, |object| {
                with_actions(object, native_object::<HttpCheck>(object)?, |check, actions| {
                    check.actions = actions;
                })
            })?,
            port_checks: objects(&self.port_checks, |object| {
                with_actions(object, native_object::<PortCheck>(object)?, |check, actions| {
                    check.actions = actions;
                })
            })?,
        })
    }
}

impl HostConfigModel {
    /// Build the wire payload of the resource's config data.
    ///
    /// # Errors
    ///
    /// Same as [`HostConfigFields::to_payload`].
    pub fn to_payload(&self) -> ZitiResult<HostConfigPayload> {
        self.fields.to_payload()
    }
}

impl HostConfigPayload {
    /// Build declarative attributes from the wire payload.
    ///
    /// # Errors
    ///
    /// Fails when a nested payload part cannot be reflected or does not fit
    /// its declared shape.
    pub fn to_model(&self, shapes: &HostConfigShapes) -> ZitiResult<HostConfigFields> {
        let listen_options = match &self.listen_options {
            Some(options) => nested_object(options, &shapes.listen_options, [])?,
            None => ObjectValue::null(Arc::clone(&shapes.listen_options.ty)),
        };
        Ok(HostConfigFields {
            address: Attr::from_option(self.address.clone()),
            port: Attr::from_option(self.port),
            protocol: Attr::from_option(self.protocol.clone()),
            forward_protocol: Attr::from_option(self.forward_protocol),
            forward_port: Attr::from_option(self.forward_port),
            forward_address: Attr::from_option(self.forward_address),
            allowed_protocols: string_list(self.allowed_protocols.as_deref()),
            allowed_addresses: string_list(self.allowed_addresses.as_deref()),
            allowed_source_addresses: string_list(self.allowed_source_addresses.as_deref()),
            allowed_port_ranges: object_list(
                self.allowed_port_ranges.as_deref(),
                &shapes.port_range,
                |range| nested_object(range, &shapes.port_range, []),
            )?,
            listen_options,
            http_checks: object_list(self.http_checks.as_deref(), &shapes.http_check, |check| {
                let actions = action_list(check.actions.as_deref(), shapes)?;
                nested_object(check, &shapes.http_check, [(ACTIONS, actions)])
            })?,
            port_checks: object_list(self.port_checks.as_deref(), &shapes.port_check, |check| {
                let actions = action_list(check.actions.as_deref(), shapes)?;
                nested_object(check, &shapes.port_check, [(ACTIONS, actions)])
            })?,
        })
    }

    /// Fixed/forward attribute pairs that are both set.
    ///
    /// The controller accepts such payloads; the caller decides how loudly
    /// to report them.
    #[must_use]
    pub fn forwarding_conflicts(&self) -> Vec<(&'static str, &'static str)> {
        [
            (self.address.is_some(), self.forward_address, "address", "forward_address"),
            (self.port.is_some(), self.forward_port, "port", "forward_port"),
            (self.protocol.is_some(), self.forward_protocol, "protocol", "forward_protocol"),
        ]
        .into_iter()
        .filter(|(fixed, forward, _, _)| *fixed && *forward == Some(true))
        .map(|(_, _, fixed, forward)| (fixed, forward))
        .collect()
    }
}

fn only_true(flag: &Attr<bool>) -> Option<bool> {
    flag.to_option().filter(|f| *f)
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Materialize the primitive attributes of a known object into `T`.
fn native_object<T: DeserializeOwned>(object: &ObjectValue) -> ZitiResult<Option<T>> {
    let Some(attributes) = object.attributes() else {
        return Ok(None);
    };
    let primitives = attributes.iter().filter(|(_, value)| {
        !matches!(
            value,
            ModelValue::List(_) | ModelValue::Map(_) | ModelValue::Object(_)
        )
    });
    let native = to_wire_case(model_to_native(primitives)?);
    map_to_struct(&native).map(Some)
}

/// Attach the `actions` list of `object` to an already materialized check.
fn with_actions<T, F>(object: &ObjectValue, check: Option<T>, set: F) -> ZitiResult<Option<T>>
where
    F: FnOnce(&mut T, Option<Vec<CheckAction>>),
{
    let Some(mut check) = check else {
        return Ok(None);
    };
    let actions = match object.get(ACTIONS) {
        Some(ModelValue::List(list)) => objects(list, native_object::<CheckAction>)?,
        _ => None,
    };
    set(&mut check, actions);
    Ok(Some(check))
}

/// Convert every known object element; `None` when the list has none.
fn objects<T, F>(list: &ListValue, convert: F) -> ZitiResult<Option<Vec<T>>>
where
    F: Fn(&ObjectValue) -> ZitiResult<Option<T>>,
{
    let mut out = Vec::new();
    for element in list.elements().unwrap_or_default() {
        if let ModelValue::Object(object) = element {
            if let Some(converted) = convert(object)? {
                out.push(converted);
            }
        }
    }
    Ok(non_empty(out))
}

fn string_list(items: Option<&[String]>) -> ListValue {
    match items {
        Some(items) if !items.is_empty() => ListValue::strings(items.iter().cloned()),
        _ => ListValue::null(AttrType::String),
    }
}

fn object_list<T, F>(items: Option<&[T]>, shape: &NestedShape, convert: F) -> ZitiResult<ListValue>
where
    F: Fn(&T) -> ZitiResult<ObjectValue>,
{
    match items {
        Some(items) if !items.is_empty() => {
            let elements = items
                .iter()
                .map(|item| convert(item).map(ModelValue::Object))
                .collect::<ZitiResult<Vec<_>>>()?;
            ListValue::known(shape.attr_type(), elements)
        }
        _ => Ok(ListValue::null(shape.attr_type())),
    }
}

fn action_list(actions: Option<&[CheckAction]>, shapes: &HostConfigShapes) -> ZitiResult<ModelValue> {
    object_list(actions, &shapes.check_action, |action| {
        nested_object(action, &shapes.check_action, [])
    })
    .map(ModelValue::List)
}

/// Reflect a nested payload part into an object of `shape`.
///
/// Keys named in `composites` are stripped before bridging and replaced by
/// the supplied values; attributes the wire left out take their defaults.
fn nested_object<T, const N: usize>(
    part: &T,
    shape: &NestedShape,
    composites: [(&str, ModelValue); N],
) -> ZitiResult<ObjectValue>
where
    T: Serialize,
{
    let mut native = to_model_case(struct_to_map(part, ReflectPolicy::FAITHFUL)?);
    for (name, _) in &composites {
        native.remove(*name);
    }
    let mut attributes: BTreeMap<String, ModelValue> = native_to_model(&native, &shape.ty);
    for (name, value) in composites {
        attributes.insert(name.to_owned(), value);
    }
    shape.fill_defaults(&mut attributes);
    debug!(attributes = attributes.len(), "reconstructed nested object");
    ObjectValue::known(Arc::clone(&shape.ty), attributes)
}

/// Keep zero values of `prior` that the controller did not echo back.
///
/// A prior known `false`, empty string, empty list, or object holding
/// nothing else replaces a null in `fresh` at the same path. Objects are
/// walked attribute by attribute and lists element by element when both
/// sides have the same length. Anything the controller did report wins.
///
/// # Errors
///
/// Fails when a merged object or list no longer fits its declared type.
pub fn restore_omitted_zeros(prior: &ObjectValue, fresh: ObjectValue) -> ZitiResult<ObjectValue> {
    let (Some(before), Some(after)) = (prior.attributes(), fresh.attributes()) else {
        return Ok(fresh);
    };
    let mut merged = after.clone();
    for (name, value) in &mut merged {
        if let Some(old) = before.get(name) {
            restore_value(name, old, value)?;
        }
    }
    ObjectValue::known(Arc::clone(fresh.shape()), merged)
}

fn restore_value(path: &str, prior: &ModelValue, fresh: &mut ModelValue) -> ZitiResult<()> {
    if fresh.is_null() && is_omitted_zero(prior) {
        debug!(attribute = path, "keeping zero value omitted from the request");
        *fresh = prior.clone();
        return Ok(());
    }
    match (prior, fresh) {
        (ModelValue::Object(old), ModelValue::Object(new)) => {
            *new = restore_omitted_zeros(old, new.clone())?;
        }
        (ModelValue::List(old), ModelValue::List(new)) => {
            let (Some(before), Some(after)) = (old.elements(), new.elements()) else {
                return Ok(());
            };
            if before.len() != after.len() {
                return Ok(());
            }
            let mut elements = after.to_vec();
            for (index, (earlier, value)) in before.iter().zip(&mut elements).enumerate() {
                restore_value(&format!("{path}[{index}]"), earlier, value)?;
            }
            *new = ListValue::known(new.element_type().clone(), elements)?;
        }
        _ => {}
    }
    Ok(())
}

fn is_omitted_zero(value: &ModelValue) -> bool {
    match value {
        ModelValue::Bool(Attr::Known(flag)) => !flag,
        ModelValue::String(Attr::Known(text)) => text.is_empty(),
        ModelValue::List(list) => list.elements().is_some_and(<[ModelValue]>::is_empty),
        ModelValue::Object(object) => object.attributes().is_some_and(|attributes| {
            attributes
                .values()
                .all(|attribute| attribute.is_null() || is_omitted_zero(attribute))
        }),
        _ => false,
    }
}
