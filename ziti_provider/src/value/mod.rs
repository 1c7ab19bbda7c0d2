//! Declarative values exchanged with the infrastructure-as-code runtime.
//!
//! Every attribute is three-state: unknown until apply, explicitly null, or
//! known. Composite values carry their element or attribute shape so typed
//! nulls can be produced without consulting the schema again.

mod attr;
mod composite;
mod field;
mod shape;

#[cfg(test)]
mod tests;

pub use attr::Attr;
pub use composite::{ListValue, MapValue, ModelValue, ObjectValue};
pub use field::{DeclarativeModel, ModelField};
pub use shape::{AttrType, ObjectType};
