//! Test helpers shared across crates in the workspace.
//!
//! - [`figment`] wraps `figment::Jail` for environment-driven tests.
//! - [`fake_api`] is an in-memory [`ziti_provider::api::ManagementApi`].

pub mod fake_api;
pub mod figment;

pub use fake_api::{Call, FakeManagementApi};
