//! Attribute definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::value::{AttrType, ListValue, ModelValue, ObjectType, ObjectValue};
use crate::ZitiResult;

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The user must set it.
    Required,
    /// The user may set it.
    Optional,
    /// Only the connector sets it.
    Computed,
    /// The user may set it; otherwise the connector does.
    OptionalComputed,
}

impl Presence {
    /// Returns `true` when the connector may fill the value.
    #[must_use]
    pub const fn is_computed(self) -> bool {
        matches!(self, Self::Computed | Self::OptionalComputed)
    }
}

/// Value structure of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    /// Primitive or list/map of primitives.
    Scalar(AttrType),
    /// One nested object.
    SingleNested(Vec<Attribute>),
    /// List of nested objects.
    ListNested(Vec<Attribute>),
}

/// One schema attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    presence: Presence,
    default: Option<ModelValue>,
    sensitive: bool,
    description: String,
}

impl Attribute {
    fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Optional,
            default: None,
            sensitive: false,
            description: String::new(),
        }
    }

    /// Optional string attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Scalar(AttrType::String))
    }

    /// Optional 32-bit integer attribute.
    pub fn int32(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Scalar(AttrType::Int32))
    }

    /// Optional 64-bit integer attribute.
    pub fn int64(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Scalar(AttrType::Int64))
    }

    /// Optional boolean attribute.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Scalar(AttrType::Bool))
    }

    /// Optional list of primitives.
    pub fn list(name: impl Into<String>, element: AttrType) -> Self {
        Self::new(name, AttributeKind::Scalar(AttrType::list_of(element)))
    }

    /// Optional nested object.
    pub fn single_nested(name: impl Into<String>, attributes: Vec<Self>) -> Self {
        Self::new(name, AttributeKind::SingleNested(attributes))
    }

    /// Optional list of nested objects.
    pub fn list_nested(name: impl Into<String>, attributes: Vec<Self>) -> Self {
        Self::new(name, AttributeKind::ListNested(attributes))
    }

    /// Mark as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Mark as computed only.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }

    /// Mark as optional and computed.
    #[must_use]
    pub fn optional_computed(mut self) -> Self {
        self.presence = Presence::OptionalComputed;
        self
    }

    /// Set a default; the attribute becomes optional and computed.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<ModelValue>) -> Self {
        self.default = Some(value.into());
        self.presence = Presence::OptionalComputed;
        self
    }

    /// Default to the typed null of the attribute.
    #[must_use]
    pub fn default_null(self) -> Self {
        let null = self.attr_type().null();
        self.with_default(null)
    }

    /// Hide the value from logs and plan output.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Set the user-facing description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Computed copy without defaults, applied recursively. Used for data
    /// sources that echo a resource's payload attributes.
    #[must_use]
    pub fn into_computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self.default = None;
        self.kind = match self.kind {
            AttributeKind::Scalar(ty) => AttributeKind::Scalar(ty),
            AttributeKind::SingleNested(children) => {
                AttributeKind::SingleNested(children.into_iter().map(Self::into_computed).collect())
            }
            AttributeKind::ListNested(children) => {
                AttributeKind::ListNested(children.into_iter().map(Self::into_computed).collect())
            }
        };
        self
    }

    /// Attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value structure.
    #[must_use]
    pub const fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Presence.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    /// Default value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&ModelValue> {
        self.default.as_ref()
    }

    /// Returns `true` for sensitive attributes.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// User-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attributes of a nested object, if this is a nested attribute.
    #[must_use]
    pub fn nested_attributes(&self) -> Option<&[Self]> {
        match &self.kind {
            AttributeKind::Scalar(_) => None,
            AttributeKind::SingleNested(children) | AttributeKind::ListNested(children) => {
                Some(children)
            }
        }
    }

    /// Declarative type of the attribute.
    #[must_use]
    pub fn attr_type(&self) -> AttrType {
        match &self.kind {
            AttributeKind::Scalar(ty) => ty.clone(),
            AttributeKind::SingleNested(children) => AttrType::Object(object_type_of(children)),
            AttributeKind::ListNested(children) => {
                AttrType::list_of(AttrType::Object(object_type_of(children)))
            }
        }
    }

    /// Value the attribute takes in a plan given its configured `value`.
    ///
    /// Null values pick up the default, or become unknown when computed.
    /// Nested objects are planned recursively.
    pub(crate) fn plan_value(&self, value: ModelValue) -> ZitiResult<ModelValue> {
        if value.is_null() {
            if let Some(default) = &self.default {
                return Ok(default.clone());
            }
            if self.presence.is_computed() {
                return Ok(self.attr_type().unknown());
            }
            return Ok(value);
        }
        match (&self.kind, value) {
            (AttributeKind::SingleNested(children), ModelValue::Object(object)) => {
                plan_object(children, &object).map(ModelValue::Object)
            }
            (AttributeKind::ListNested(children), ModelValue::List(list)) => {
                let Some(items) = list.elements() else {
                    return Ok(ModelValue::List(list));
                };
                let planned = items
                    .iter()
                    .map(|item| match item {
                        ModelValue::Object(object) => {
                            plan_object(children, object).map(ModelValue::Object)
                        }
                        other => Ok(other.clone()),
                    })
                    .collect::<ZitiResult<Vec<_>>>()?;
                ListValue::known(list.element_type().clone(), planned).map(ModelValue::List)
            }
            (_, other) => Ok(other),
        }
    }
}

/// Shape and defaults of a nested object attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedShape {
    /// Object shape.
    pub ty: Arc<ObjectType>,
    /// Default values of attributes that declare one.
    pub defaults: BTreeMap<String, ModelValue>,
}

impl NestedShape {
    /// Build from nested attribute definitions.
    #[must_use]
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        Self {
            ty: object_type_of(attributes),
            defaults: attributes
                .iter()
                .filter_map(|a| a.default_value().map(|d| (a.name().to_owned(), d.clone())))
                .collect(),
        }
    }

    /// Replace null attributes that declare a default with that default.
    pub fn fill_defaults(&self, attributes: &mut BTreeMap<String, ModelValue>) {
        for (name, default) in &self.defaults {
            if attributes.get(name).is_none_or(ModelValue::is_null) {
                attributes.insert(name.clone(), default.clone());
            }
        }
    }

    /// The shape as an attribute type.
    #[must_use]
    pub fn attr_type(&self) -> AttrType {
        AttrType::Object(Arc::clone(&self.ty))
    }
}

pub(crate) fn object_type_of(attributes: &[Attribute]) -> Arc<ObjectType> {
    Arc::new(ObjectType::new(
        attributes.iter().map(|a| (a.name().to_owned(), a.attr_type())),
    ))
}

pub(crate) fn plan_object(attributes: &[Attribute], object: &ObjectValue) -> ZitiResult<ObjectValue> {
    let Some(current) = object.attributes() else {
        return Ok(object.clone());
    };
    let mut planned = BTreeMap::new();
    for attribute in attributes {
        let value = current
            .get(attribute.name())
            .cloned()
            .unwrap_or_else(|| attribute.attr_type().null());
        planned.insert(attribute.name().to_owned(), attribute.plan_value(value)?);
    }
    ObjectValue::known(Arc::clone(object.shape()), planned)
}
