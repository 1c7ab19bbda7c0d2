//! Error taxonomy for mapping, configuration, and management API failures.

mod types;

#[cfg(test)]
mod tests;

pub use types::ZitiError;

/// Result alias used throughout the crate.
pub type ZitiResult<T> = Result<T, ZitiError>;

impl ZitiError {
    /// Construct a [`ZitiError::TypeMismatch`].
    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.into(),
        }
    }

    /// Construct a [`ZitiError::InvalidValue`].
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a [`ZitiError::NotFound`] for a controller entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns `true` when the controller reported the entity as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<figment::Error> for ZitiError {
    fn from(e: figment::Error) -> Self {
        Self::Configuration(Box::new(e))
    }
}
