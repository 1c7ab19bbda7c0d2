//! Declarative bindings for `host.v1` configs of the OpenZiti management API.
//!
//! The crate maps between three representations of a host config: the
//! declarative model held by an infrastructure-as-code runtime, the untyped
//! JSON map exchanged with the controller, and the typed wire payload in
//! between. The [`resource`] and [`datasource`] modules drive those
//! conversions through a [`api::ManagementApi`] client; [`provider`] wires
//! settings, client, and factories together.
//!
//! The derive macro for [`DeclarativeModel`] lives in the companion
//! `ziti_provider_macros` crate.

pub use ziti_provider_macros::DeclarativeModel;

pub mod api;
pub mod bridge;
pub mod casing;
pub mod config;
pub mod datasource;
pub mod diag;
mod error;
pub mod host_config;
pub mod materialize;
pub mod provider;
pub mod reflect;
pub mod resource;
mod result_ext;
pub mod schema;
pub mod value;

pub use error::{ZitiError, ZitiResult};
pub use result_ext::ZitiResultExt;
pub use value::{
    Attr, AttrType, DeclarativeModel, ListValue, MapValue, ModelField, ModelValue, ObjectType,
    ObjectValue,
};
