//! Declarative values and their composite containers.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Attr, AttrType, ObjectType};
use crate::{ZitiError, ZitiResult};

/// Any declarative value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValue {
    /// String attribute.
    String(Attr<String>),
    /// 32-bit integer attribute.
    Int32(Attr<i32>),
    /// 64-bit integer attribute.
    Int64(Attr<i64>),
    /// Boolean attribute.
    Bool(Attr<bool>),
    /// List attribute.
    List(ListValue),
    /// Map attribute.
    Map(MapValue),
    /// Nested object attribute.
    Object(ObjectValue),
}

impl ModelValue {
    /// Short name of the kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Returns `true` when the value is a typed null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        match self {
            Self::String(a) => a.is_null(),
            Self::Int32(a) => a.is_null(),
            Self::Int64(a) => a.is_null(),
            Self::Bool(a) => a.is_null(),
            Self::List(l) => l.is_null(),
            Self::Map(m) => m.is_null(),
            Self::Object(o) => o.is_null(),
        }
    }

    /// Returns `true` when the value is not yet known.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        match self {
            Self::String(a) => a.is_unknown(),
            Self::Int32(a) => a.is_unknown(),
            Self::Int64(a) => a.is_unknown(),
            Self::Bool(a) => a.is_unknown(),
            Self::List(l) => l.is_unknown(),
            Self::Map(m) => m.is_unknown(),
            Self::Object(o) => o.is_unknown(),
        }
    }

    /// Returns `true` when the value may be stored in an attribute of `ty`.
    #[must_use]
    pub fn conforms_to(&self, ty: &AttrType) -> bool {
        match (self, ty) {
            (Self::String(_), AttrType::String)
            | (Self::Int32(_), AttrType::Int32)
            | (Self::Int64(_), AttrType::Int64)
            | (Self::Bool(_), AttrType::Bool) => true,
            (Self::List(list), AttrType::List(element)) => list.element_type() == &**element,
            (Self::Map(map), AttrType::Map(element)) => map.element_type() == &**element,
            (Self::Object(object), AttrType::Object(shape)) => {
                Arc::ptr_eq(object.shape(), shape) || object.shape() == shape
            }
            _ => false,
        }
    }
}

impl From<Attr<String>> for ModelValue {
    fn from(value: Attr<String>) -> Self {
        Self::String(value)
    }
}

impl From<Attr<i32>> for ModelValue {
    fn from(value: Attr<i32>) -> Self {
        Self::Int32(value)
    }
}

impl From<Attr<i64>> for ModelValue {
    fn from(value: Attr<i64>) -> Self {
        Self::Int64(value)
    }
}

impl From<Attr<bool>> for ModelValue {
    fn from(value: Attr<bool>) -> Self {
        Self::Bool(value)
    }
}

impl From<ListValue> for ModelValue {
    fn from(value: ListValue) -> Self {
        Self::List(value)
    }
}

impl From<MapValue> for ModelValue {
    fn from(value: MapValue) -> Self {
        Self::Map(value)
    }
}

impl From<ObjectValue> for ModelValue {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

fn mismatch(key: impl Into<String>, expected: &AttrType, found: &ModelValue) -> ZitiError {
    ZitiError::invalid_value(
        key,
        format!("expected {}, found {}", expected.kind(), found.kind()),
    )
}

/// Homogeneous list value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValue {
    element: AttrType,
    elements: Attr<Vec<ModelValue>>,
}

impl ListValue {
    /// Null list of `element`.
    #[must_use]
    pub const fn null(element: AttrType) -> Self {
        Self {
            element,
            elements: Attr::Null,
        }
    }

    /// Unknown list of `element`.
    #[must_use]
    pub const fn unknown(element: AttrType) -> Self {
        Self {
            element,
            elements: Attr::Unknown,
        }
    }

    /// Known list; every element must conform to `element`.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::InvalidValue`] naming the first offending index.
    pub fn known(element: AttrType, elements: Vec<ModelValue>) -> ZitiResult<Self> {
        if let Some((index, bad)) = elements
            .iter()
            .enumerate()
            .find(|(_, value)| !value.conforms_to(&element))
        {
            return Err(mismatch(format!("[{index}]"), &element, bad));
        }
        Ok(Self {
            element,
            elements: Attr::Known(elements),
        })
    }

    /// Known list of strings.
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            element: AttrType::String,
            elements: Attr::Known(
                values
                    .into_iter()
                    .map(|s| ModelValue::String(Attr::Known(s.into())))
                    .collect(),
            ),
        }
    }

    /// Element type.
    #[must_use]
    pub const fn element_type(&self) -> &AttrType {
        &self.element
    }

    /// Elements of a known list.
    #[must_use]
    pub fn elements(&self) -> Option<&[ModelValue]> {
        self.elements.as_known().map(Vec::as_slice)
    }

    /// Returns `true` for a null list.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.elements.is_null()
    }

    /// Returns `true` for an unknown list.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.elements.is_unknown()
    }

    /// Number of known elements; zero for null and unknown lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements().map_or(0, <[ModelValue]>::len)
    }

    /// Returns `true` when there are no known elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known string elements, skipping null ones.
    #[must_use]
    pub fn known_strings(&self) -> Vec<String> {
        self.elements()
            .unwrap_or_default()
            .iter()
            .filter_map(|value| match value {
                ModelValue::String(Attr::Known(s)) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

/// String-keyed homogeneous map value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapValue {
    element: AttrType,
    entries: Attr<BTreeMap<String, ModelValue>>,
}

impl MapValue {
    /// Null map of `element`.
    #[must_use]
    pub const fn null(element: AttrType) -> Self {
        Self {
            element,
            entries: Attr::Null,
        }
    }

    /// Unknown map of `element`.
    #[must_use]
    pub const fn unknown(element: AttrType) -> Self {
        Self {
            element,
            entries: Attr::Unknown,
        }
    }

    /// Known map; every entry must conform to `element`.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::InvalidValue`] naming the first offending key.
    pub fn known(element: AttrType, entries: BTreeMap<String, ModelValue>) -> ZitiResult<Self> {
        if let Some((key, bad)) = entries.iter().find(|(_, value)| !value.conforms_to(&element)) {
            return Err(mismatch(key.as_str(), &element, bad));
        }
        Ok(Self {
            element,
            entries: Attr::Known(entries),
        })
    }

    /// Element type.
    #[must_use]
    pub const fn element_type(&self) -> &AttrType {
        &self.element
    }

    /// Entries of a known map.
    #[must_use]
    pub const fn entries(&self) -> Option<&BTreeMap<String, ModelValue>> {
        self.entries.as_known()
    }

    /// Returns `true` for a null map.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.entries.is_null()
    }

    /// Returns `true` for an unknown map.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.entries.is_unknown()
    }
}

/// Object value with a fixed attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectValue {
    shape: Arc<ObjectType>,
    attributes: Attr<BTreeMap<String, ModelValue>>,
}

impl ObjectValue {
    /// Null object of `shape`.
    #[must_use]
    pub const fn null(shape: Arc<ObjectType>) -> Self {
        Self {
            shape,
            attributes: Attr::Null,
        }
    }

    /// Unknown object of `shape`.
    #[must_use]
    pub const fn unknown(shape: Arc<ObjectType>) -> Self {
        Self {
            shape,
            attributes: Attr::Unknown,
        }
    }

    /// Known object. `attributes` must name exactly the attributes of `shape`
    /// and each value must conform to its declared type.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::InvalidValue`] for a missing, extra, or
    /// mistyped attribute.
    pub fn known(
        shape: Arc<ObjectType>,
        attributes: BTreeMap<String, ModelValue>,
    ) -> ZitiResult<Self> {
        if let Some(extra) = attributes.keys().find(|k| shape.attribute(k).is_none()) {
            return Err(ZitiError::invalid_value(
                extra.as_str(),
                "attribute is not part of the object shape",
            ));
        }
        for (name, ty) in shape.attributes() {
            let value = attributes
                .get(name)
                .ok_or_else(|| ZitiError::invalid_value(name, "missing attribute"))?;
            if !value.conforms_to(ty) {
                return Err(mismatch(name, ty, value));
            }
        }
        Ok(Self {
            shape,
            attributes: Attr::Known(attributes),
        })
    }

    /// Known object built from a subset of attributes; the rest are typed
    /// nulls.
    ///
    /// # Errors
    ///
    /// Same as [`ObjectValue::known`].
    pub fn with_nulls<I, K>(shape: Arc<ObjectType>, attributes: I) -> ZitiResult<Self>
    where
        I: IntoIterator<Item = (K, ModelValue)>,
        K: Into<String>,
    {
        let mut all: BTreeMap<String, ModelValue> = shape
            .attributes()
            .map(|(name, ty)| (name.to_owned(), ty.null()))
            .collect();
        for (name, value) in attributes {
            let key: String = name.into();
            if !all.contains_key(&key) {
                return Err(ZitiError::invalid_value(
                    key,
                    "attribute is not part of the object shape",
                ));
            }
            all.insert(key, value);
        }
        Self::known(shape, all)
    }

    /// Shape of the object.
    #[must_use]
    pub const fn shape(&self) -> &Arc<ObjectType> {
        &self.shape
    }

    /// Attributes of a known object.
    #[must_use]
    pub const fn attributes(&self) -> Option<&BTreeMap<String, ModelValue>> {
        self.attributes.as_known()
    }

    /// Attribute `name` of a known object.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelValue> {
        self.attributes().and_then(|attrs| attrs.get(name))
    }

    /// Attribute `name`, failing when the object is not known.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::InvalidValue`] when the object is null or
    /// unknown, or lacks the attribute.
    pub fn require(&self, name: &str) -> ZitiResult<&ModelValue> {
        match &self.attributes {
            Attr::Known(attrs) => attrs
                .get(name)
                .ok_or_else(|| ZitiError::invalid_value(name, "missing attribute")),
            Attr::Null => Err(ZitiError::invalid_value(name, "object is null")),
            Attr::Unknown => Err(ZitiError::invalid_value(name, "object is unknown")),
        }
    }

    /// Returns `true` for a null object.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.attributes.is_null()
    }

    /// Returns `true` for an unknown object.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.attributes.is_unknown()
    }
}
