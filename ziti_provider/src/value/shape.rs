//! Shape descriptors for declarative values.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::composite::{ListValue, MapValue, ModelValue, ObjectValue};
use super::Attr;

/// Type of a declarative attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    /// UTF-8 string.
    String,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Boolean.
    Bool,
    /// Homogeneous list.
    List(Box<AttrType>),
    /// String-keyed homogeneous map.
    Map(Box<AttrType>),
    /// Object with a fixed attribute set.
    Object(Arc<ObjectType>),
}

impl AttrType {
    /// List of `element`.
    #[must_use]
    pub fn list_of(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Map of `element`.
    #[must_use]
    pub fn map_of(element: Self) -> Self {
        Self::Map(Box::new(element))
    }

    /// Short name of the kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Returns `true` for list, map and object types.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_) | Self::Object(_))
    }

    /// Typed null of this type.
    #[must_use]
    pub fn null(&self) -> ModelValue {
        match self {
            Self::String => ModelValue::String(Attr::Null),
            Self::Int32 => ModelValue::Int32(Attr::Null),
            Self::Int64 => ModelValue::Int64(Attr::Null),
            Self::Bool => ModelValue::Bool(Attr::Null),
            Self::List(element) => ModelValue::List(ListValue::null((**element).clone())),
            Self::Map(element) => ModelValue::Map(MapValue::null((**element).clone())),
            Self::Object(shape) => ModelValue::Object(ObjectValue::null(Arc::clone(shape))),
        }
    }

    /// Typed unknown of this type.
    #[must_use]
    pub fn unknown(&self) -> ModelValue {
        match self {
            Self::String => ModelValue::String(Attr::Unknown),
            Self::Int32 => ModelValue::Int32(Attr::Unknown),
            Self::Int64 => ModelValue::Int64(Attr::Unknown),
            Self::Bool => ModelValue::Bool(Attr::Unknown),
            Self::List(element) => ModelValue::List(ListValue::unknown((**element).clone())),
            Self::Map(element) => ModelValue::Map(MapValue::unknown((**element).clone())),
            Self::Object(shape) => ModelValue::Object(ObjectValue::unknown(Arc::clone(shape))),
        }
    }
}

/// Attribute names and types of an object value.
///
/// Built once per schema and shared through `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectType {
    attributes: BTreeMap<String, AttrType>,
}

impl ObjectType {
    /// Build a shape from `(name, type)` pairs.
    pub fn new<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrType)>,
        K: Into<String>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        }
    }

    /// Type of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrType> {
        self.attributes.get(name)
    }

    /// Iterate over attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrType)> {
        self.attributes.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` when the shape has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
