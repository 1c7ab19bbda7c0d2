//! Map-to-struct materialization through a JSON round trip.
//!
//! Decoding goes through serialized bytes rather than `serde_json::from_value`
//! so that any serializable map-like input, including typed maps and
//! borrowed views, is accepted and the decoder sees exactly what the
//! controller would have sent.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ZitiResult, ZitiResultExt};

/// Decode `map` into `T`.
///
/// ```
/// use serde::Deserialize;
/// use serde_json::json;
/// use ziti_provider::materialize::map_to_struct;
///
/// #[derive(Deserialize)]
/// struct Endpoint {
///     address: String,
///     port: i32,
/// }
///
/// let endpoint: Endpoint = map_to_struct(&json!({"address": "db", "port": 5432}))?;
/// assert_eq!(endpoint.port, 5432);
/// # Ok::<(), ziti_provider::ZitiError>(())
/// ```
///
/// # Errors
///
/// Returns [`crate::ZitiError::Marshal`] when `map` cannot be encoded and
/// [`crate::ZitiError::Unmarshal`] when the JSON does not fit `T`.
pub fn map_to_struct<T, M>(map: &M) -> ZitiResult<T>
where
    T: DeserializeOwned,
    M: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(map).into_marshal()?;
    serde_json::from_slice(&bytes).into_unmarshal()
}
