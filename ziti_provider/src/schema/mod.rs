//! Declarative schemas for resources, data sources, and the provider block.
//!
//! A [`Schema`] is the single source of truth for attribute names, types,
//! presence, and defaults. Object shapes used by conversions are derived
//! from it.

mod attribute;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use attribute::{Attribute, AttributeKind, NestedShape, Presence};

use crate::diag::Diagnostics;
use crate::value::{ModelValue, ObjectType, ObjectValue};
use crate::ZitiResult;

/// Top-level schema of a resource, data source, or provider block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    description: String,
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Build a schema.
    pub fn new(description: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            description: description.into(),
            attributes,
        }
    }

    /// User-facing description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Top-level attributes.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Top-level attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Object shape of a value conforming to this schema.
    #[must_use]
    pub fn object_type(&self) -> Arc<ObjectType> {
        attribute::object_type_of(&self.attributes)
    }

    /// Report required attributes that are null, descending into nested
    /// objects that are set.
    pub fn validate_required(&self, config: &ObjectValue, diagnostics: &mut Diagnostics) {
        check_required(&self.attributes, config, "", diagnostics);
    }

    /// Plan `config`: null attributes take their defaults, computed ones
    /// without a default become unknown.
    ///
    /// # Errors
    ///
    /// Fails when `config` does not conform to this schema.
    pub fn plan(&self, config: &ObjectValue) -> ZitiResult<ObjectValue> {
        attribute::plan_object(&self.attributes, config)
    }
}

fn check_required(
    attributes: &[Attribute],
    object: &ObjectValue,
    prefix: &str,
    diagnostics: &mut Diagnostics,
) {
    if object.attributes().is_none() {
        return;
    }
    for attribute in attributes {
        let path = if prefix.is_empty() {
            attribute.name().to_owned()
        } else {
            format!("{prefix}.{}", attribute.name())
        };
        let value = object.get(attribute.name());
        if attribute.presence() == Presence::Required && value.is_none_or(ModelValue::is_null) {
            diagnostics.add_attribute_error(
                path.as_str(),
                "Missing required argument",
                format!(
                    "The argument \"{}\" is required, but no definition was found.",
                    attribute.name()
                ),
            );
            continue;
        }
        match (attribute.kind(), value) {
            (AttributeKind::SingleNested(children), Some(ModelValue::Object(nested))) => {
                check_required(children, nested, &path, diagnostics);
            }
            (AttributeKind::ListNested(children), Some(ModelValue::List(list))) => {
                for (index, item) in list.elements().unwrap_or_default().iter().enumerate() {
                    if let ModelValue::Object(nested) = item {
                        check_required(children, nested, &format!("{path}[{index}]"), diagnostics);
                    }
                }
            }
            _ => {}
        }
    }
}
