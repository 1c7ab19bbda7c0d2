//! Extensions for mapping serde failures to `ZitiResult` concisely.
//!
//! Encoding and decoding failures look alike once they reach a caller, so the
//! direction is recorded explicitly:
//!
//! - [`ZitiResultExt::into_marshal`] for errors raised while producing JSON.
//! - [`ZitiResultExt::into_unmarshal`] for errors raised while consuming it.
//!
//! # Examples
//!
//! ```
//! use ziti_provider::{ZitiResult, ZitiResultExt};
//!
//! fn encode() -> ZitiResult<serde_json::Value> {
//!     serde_json::to_value(42).into_marshal()
//! }
//! # assert!(encode().is_ok());
//! ```

use crate::{ZitiError, ZitiResult};

/// Extension for `Result<T, serde_json::Error>`.
pub trait ZitiResultExt<T> {
    /// Convert the failure into [`ZitiError::Marshal`].
    ///
    /// # Errors
    ///
    /// Returns `ZitiError::Marshal` when the input is `Err`.
    fn into_marshal(self) -> ZitiResult<T>;

    /// Convert the failure into [`ZitiError::Unmarshal`].
    ///
    /// # Errors
    ///
    /// Returns `ZitiError::Unmarshal` when the input is `Err`.
    fn into_unmarshal(self) -> ZitiResult<T>;
}

impl<T> ZitiResultExt<T> for Result<T, serde_json::Error> {
    fn into_marshal(self) -> ZitiResult<T> {
        self.map_err(ZitiError::Marshal)
    }

    fn into_unmarshal(self) -> ZitiResult<T> {
        self.map_err(ZitiError::Unmarshal)
    }
}
