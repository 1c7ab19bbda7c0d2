//! Procedural macros for `ziti_provider`.
//!
//! The [`DeclarativeModel`] derive generates the field table that maps a
//! typed model struct onto the runtime's declarative object values. Each named
//! field becomes one attribute whose name is the field identifier in
//! `snake_case`, unless overridden with `#[model(rename = "...")]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `ziti_provider::DeclarativeModel`.
///
/// Supported attributes:
///
/// - `#[model(crate = "path")]` on the struct replaces the `ziti_provider`
///   path used by generated code.
/// - `#[model(rename = "name")]` on a field sets the declarative attribute
///   name.
#[proc_macro_derive(DeclarativeModel, attributes(model))]
pub fn derive_declarative_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[cfg(test)]
mod tests;
