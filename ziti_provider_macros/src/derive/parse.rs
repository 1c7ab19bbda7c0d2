//! Parsing utilities for the `DeclarativeModel` derive macro.

use heck::ToSnakeCase;
use syn::ext::IdentExt;
use syn::parenthesized;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, Ident, Lit, LitStr, Path, Token};

#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    pub crate_path: Option<Path>,
}

#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub flatten: bool,
}

/// How a struct field maps onto the object.
#[derive(Clone)]
pub(crate) enum FieldBinding {
    /// The field holds one attribute.
    Attribute(String),
    /// The field is itself a model whose attributes are inlined.
    Flatten,
}

/// One struct field and its binding.
#[derive(Clone)]
pub(crate) struct ModelFieldSpec {
    pub ident: Ident,
    pub binding: FieldBinding,
}

impl ModelFieldSpec {
    /// Attribute name for non-flattened fields.
    pub(crate) fn attribute(&self) -> Option<&str> {
        match &self.binding {
            FieldBinding::Attribute(name) => Some(name.as_str()),
            FieldBinding::Flatten => None,
        }
    }
}

/// Everything the generator needs to render the trait implementation.
pub(crate) struct ModelInput {
    pub ident: Ident,
    pub generics: Generics,
    pub crate_path: Option<Path>,
    pub fields: Vec<ModelFieldSpec>,
}

/// Iterate all `#[model(...)]` attributes once and apply a callback.
fn parse_model_attrs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn lit_str(meta: &syn::meta::ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let lit = meta.value()?.parse::<Lit>()?;
    match lit {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

/// Extracts struct-level `#[model(...)]` metadata.
///
/// Only `crate` is recognised; other keys are ignored.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_model_attrs(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            out.crate_path = Some(s.parse::<Path>()?);
            Ok(())
        } else {
            discard_unknown(meta)
        }
    })?;
    Ok(out)
}

/// Extracts field-level `#[model(...)]` metadata.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_model_attrs(attrs, |meta| {
        if meta.path.is_ident("rename") {
            let s = lit_str(meta, "rename")?;
            if s.value().is_empty() {
                return Err(syn::Error::new(s.span(), "rename must not be empty"));
            }
            out.rename = Some(s.value());
            Ok(())
        } else if meta.path.is_ident("flatten") {
            out.flatten = true;
            Ok(())
        } else {
            discard_unknown(meta)
        }
    })?;
    Ok(out)
}

/// Attribute name for a field: the explicit rename, else the identifier in
/// `snake_case` with any raw-identifier prefix removed.
pub(crate) fn attribute_name(ident: &Ident, attrs: &FieldAttrs) -> String {
    attrs
        .rename
        .clone()
        .unwrap_or_else(|| ident.unraw().to_string().to_snake_case())
}

/// Parses the derive input into a [`ModelInput`].
///
/// # Errors
///
/// Rejects enums, unions, tuple and unit structs, duplicate attribute
/// names, and `flatten` combined with `rename`.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ModelInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "DeclarativeModel can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            data.struct_token,
            "DeclarativeModel requires named fields",
        ));
    };

    let mut fields: Vec<ModelFieldSpec> = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "field must be named"));
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.flatten {
            if attrs.rename.is_some() {
                return Err(syn::Error::new_spanned(
                    &ident,
                    "flatten cannot be combined with rename",
                ));
            }
            fields.push(ModelFieldSpec {
                ident,
                binding: FieldBinding::Flatten,
            });
            continue;
        }
        let attribute = attribute_name(&ident, &attrs);
        if fields.iter().any(|seen| seen.attribute() == Some(attribute.as_str())) {
            return Err(syn::Error::new_spanned(
                &ident,
                format!("duplicate declarative attribute '{attribute}'"),
            ));
        }
        fields.push(ModelFieldSpec {
            ident,
            binding: FieldBinding::Attribute(attribute),
        });
    }

    Ok(ModelInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        crate_path: struct_attrs.crate_path,
        fields,
    })
}
