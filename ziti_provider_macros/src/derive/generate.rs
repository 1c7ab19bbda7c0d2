//! Token generation for the `DeclarativeModel` derive.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{FieldBinding, ModelFieldSpec, ModelInput};

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `ziti_provider` when no override is present.
pub(crate) fn resolve_crate(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ziti_provider }, |path| quote! { #path })
}

/// Initialiser for one field inside `from_object`.
fn read_field(krate: &TokenStream, field: &ModelFieldSpec) -> TokenStream {
    let ident = &field.ident;
    match &field.binding {
        FieldBinding::Attribute(name) => quote! {
            #ident: #krate::ModelField::from_model(#name, object.require(#name)?)?
        },
        FieldBinding::Flatten => quote! {
            #ident: #krate::DeclarativeModel::from_object(object)?
        },
    }
}

/// Statement recording one field inside `into_attributes`.
fn write_field(krate: &TokenStream, field: &ModelFieldSpec) -> TokenStream {
    let ident = &field.ident;
    match &field.binding {
        FieldBinding::Attribute(name) => quote! {
            attributes.insert(
                ::std::string::String::from(#name),
                #krate::ModelField::into_model(self.#ident),
            );
        },
        FieldBinding::Flatten => quote! {
            attributes.extend(#krate::DeclarativeModel::into_attributes(self.#ident));
        },
    }
}

/// Renders `impl DeclarativeModel for ...` for `model`.
pub(crate) fn generate_impl(model: &ModelInput) -> TokenStream {
    let krate = resolve_crate(model.crate_path.as_ref());
    let ident = &model.ident;
    let (impl_generics, ty_generics, where_clause) = model.generics.split_for_impl();
    let reads = model.fields.iter().map(|f| read_field(&krate, f));
    let writes = model.fields.iter().map(|f| write_field(&krate, f));

    quote! {
        impl #impl_generics #krate::DeclarativeModel for #ident #ty_generics #where_clause {
            fn from_object(object: &#krate::ObjectValue) -> #krate::ZitiResult<Self> {
                ::core::result::Result::Ok(Self {
                    #( #reads, )*
                })
            }

            fn into_attributes(
                self,
            ) -> ::std::collections::BTreeMap<::std::string::String, #krate::ModelValue> {
                let mut attributes = ::std::collections::BTreeMap::new();
                #( #writes )*
                attributes
            }
        }
    }
}
