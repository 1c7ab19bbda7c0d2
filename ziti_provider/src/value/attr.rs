//! Three-state primitive attribute.

/// Value of a declarative attribute.
///
/// `Null` is the default: an attribute the user did not set. `Unknown`
/// appears during planning for values computed at apply time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Attr<T> {
    /// Not known until apply.
    Unknown,
    /// Explicitly absent.
    #[default]
    Null,
    /// Concrete value.
    Known(T),
}

impl<T> Attr<T> {
    /// Wrap a concrete value.
    pub const fn known(value: T) -> Self {
        Self::Known(value)
    }

    /// `Some` becomes `Known`, `None` becomes `Null`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Unknown`.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the concrete value, if any.
    #[must_use]
    pub const fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown | Self::Null => None,
        }
    }

    /// Consume into an `Option`, dropping the null/unknown distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown | Self::Null => None,
        }
    }

    /// Map the concrete value, preserving null and unknown.
    pub fn map<U, F>(self, f: F) -> Attr<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Known(value) => Attr::Known(f(value)),
            Self::Null => Attr::Null,
            Self::Unknown => Attr::Unknown,
        }
    }
}

impl<T: Clone> Attr<T> {
    /// Clone the concrete value into an `Option`.
    #[must_use]
    pub fn to_option(&self) -> Option<T> {
        self.as_known().cloned()
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}
