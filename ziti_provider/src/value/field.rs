//! Traits binding typed model structs to declarative object values.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Attr, ListValue, MapValue, ModelValue, ObjectType, ObjectValue};
use crate::{ZitiError, ZitiResult};

/// A struct field that can be read from and written to a [`ModelValue`].
pub trait ModelField: Sized {
    /// Extract the field from the attribute `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ZitiError::InvalidValue`] when the value has another kind.
    fn from_model(name: &str, value: &ModelValue) -> ZitiResult<Self>;

    /// Wrap the field as a declarative value.
    fn into_model(self) -> ModelValue;
}

macro_rules! model_field {
    ($ty:ty, $variant:ident) => {
        impl ModelField for $ty {
            fn from_model(name: &str, value: &ModelValue) -> ZitiResult<Self> {
                match value {
                    ModelValue::$variant(inner) => Ok(inner.clone()),
                    other => Err(ZitiError::invalid_value(
                        name,
                        format!(
                            "expected {}, found {}",
                            stringify!($variant).to_ascii_lowercase(),
                            other.kind()
                        ),
                    )),
                }
            }

            fn into_model(self) -> ModelValue {
                ModelValue::$variant(self)
            }
        }
    };
}

model_field!(Attr<String>, String);
model_field!(Attr<i32>, Int32);
model_field!(Attr<i64>, Int64);
model_field!(Attr<bool>, Bool);
model_field!(ListValue, List);
model_field!(MapValue, Map);
model_field!(ObjectValue, Object);

impl ModelField for ModelValue {
    fn from_model(_name: &str, value: &Self) -> ZitiResult<Self> {
        Ok(value.clone())
    }

    fn into_model(self) -> Self {
        self
    }
}

/// A struct whose fields map one-to-one onto the attributes of an object.
///
/// Implemented with `#[derive(DeclarativeModel)]`. Fields marked
/// `#[model(flatten)]` contribute the attributes of a nested model.
///
/// ```
/// use std::sync::Arc;
/// use ziti_provider::{Attr, AttrType, DeclarativeModel, ObjectType};
///
/// #[derive(DeclarativeModel)]
/// struct Endpoint {
///     address: Attr<String>,
///     port: Attr<i32>,
/// }
///
/// let shape = Arc::new(ObjectType::new([
///     ("address", AttrType::String),
///     ("port", AttrType::Int32),
/// ]));
/// let endpoint = Endpoint { address: Attr::known("db".to_owned()), port: Attr::Null };
/// let object = endpoint.into_object(&shape)?;
/// let back = Endpoint::from_object(&object)?;
/// assert_eq!(back.address, Attr::known("db".to_owned()));
/// assert!(back.port.is_null());
/// # Ok::<(), ziti_provider::ZitiError>(())
/// ```
pub trait DeclarativeModel: Sized {
    /// Read the model from a known object.
    ///
    /// # Errors
    ///
    /// Fails when the object is null or unknown, or an attribute has the
    /// wrong kind.
    fn from_object(object: &ObjectValue) -> ZitiResult<Self>;

    /// Attributes of the model keyed by name.
    fn into_attributes(self) -> BTreeMap<String, ModelValue>;

    /// Write the model as an object of `shape`.
    ///
    /// # Errors
    ///
    /// Fails when the fields do not match `shape`.
    fn into_object(self, shape: &Arc<ObjectType>) -> ZitiResult<ObjectValue> {
        ObjectValue::known(Arc::clone(shape), self.into_attributes())
    }
}
