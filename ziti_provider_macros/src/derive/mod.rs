//! Expansion entry point for the `DeclarativeModel` derive.

use proc_macro2::TokenStream;

pub(crate) mod generate;
pub(crate) mod parse;

/// Parses `input` and renders the trait implementation.
pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let model = parse::parse_input(input)?;
    Ok(generate::generate_impl(&model))
}
