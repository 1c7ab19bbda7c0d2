//! Unit tests for attribute parsing and token generation.

use crate::derive::generate::{generate_impl, resolve_crate};
use crate::derive::parse::parse_input;
use anyhow::{Context, Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

#[rstest]
fn parse_input_names_fields_in_snake_case() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Model {
            address: Attr<String>,
            r#type: Attr<String>,
            #[model(rename = "config_type_id")]
            type_id: Attr<String>,
        }
    };
    let model = parse_input(&input).map_err(|e| anyhow!(e.to_string()))?;
    let names: Vec<_> = model.fields.iter().filter_map(|f| f.attribute()).collect();
    ensure!(
        names == ["address", "type", "config_type_id"],
        "unexpected attribute names: {names:?}"
    );
    Ok(())
}

#[rstest]
#[case::enumeration(parse_quote! { enum Model { A } }, "can only be derived for structs")]
#[case::tuple(parse_quote! { struct Model(u32); }, "requires named fields")]
#[case::duplicate(
    parse_quote! {
        struct Model {
            name: Attr<String>,
            #[model(rename = "name")]
            other: Attr<String>,
        }
    },
    "duplicate declarative attribute 'name'"
)]
#[case::flatten_rename(
    parse_quote! {
        struct Model {
            #[model(flatten, rename = "fields")]
            fields: Fields,
        }
    },
    "flatten cannot be combined with rename"
)]
#[case::empty_rename(
    parse_quote! {
        struct Model {
            #[model(rename = "")]
            name: Attr<String>,
        }
    },
    "rename must not be empty"
)]
fn parse_input_rejects_invalid_shapes(
    #[case] input: DeriveInput,
    #[case] expected: &str,
) -> Result<()> {
    let Err(err) = parse_input(&input) else {
        return Err(anyhow!("expected parse failure"));
    };
    ensure!(
        err.to_string().contains(expected),
        "error '{err}' should mention '{expected}'"
    );
    Ok(())
}

#[rstest]
fn unknown_model_keys_are_ignored() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[model(flavour = "vanilla")]
        struct Model {
            #[model(sensitive, rename = "secret")]
            password: Attr<String>,
        }
    };
    let model = parse_input(&input).map_err(|e| anyhow!(e.to_string()))?;
    let field = model.fields.first().context("missing field")?;
    ensure!(field.attribute() == Some("secret"), "rename should still apply");
    Ok(())
}

#[rstest]
#[case::default(None, "ziti_provider")]
#[case::custom(Some("my_alias"), "my_alias")]
#[case::nested(Some("deps::ziti_provider"), "deps :: ziti_provider")]
fn resolve_crate_produces_expected_tokens(
    #[case] input: Option<&str>,
    #[case] expected: &str,
) -> Result<()> {
    let parsed = input
        .map(syn::parse_str::<syn::Path>)
        .transpose()
        .context("valid path")?;
    let tokens = resolve_crate(parsed.as_ref());
    ensure!(tokens.to_string() == expected, "got {tokens}");
    Ok(())
}

#[rstest]
fn generate_impl_reads_and_writes_attributes() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[model(crate = "crate")]
        struct Model {
            address: Attr<String>,
            #[model(flatten)]
            shared: Shared,
        }
    };
    let model = parse_input(&input).map_err(|e| anyhow!(e.to_string()))?;
    let rendered = generate_impl(&model).to_string();
    ensure!(
        rendered.contains("impl crate :: DeclarativeModel for Model"),
        "missing impl header: {rendered}"
    );
    ensure!(
        rendered.contains("object . require (\"address\")"),
        "missing field lookup: {rendered}"
    );
    ensure!(
        rendered.contains("shared : crate :: DeclarativeModel :: from_object (object) ?"),
        "missing flattened read: {rendered}"
    );
    ensure!(
        rendered.contains("attributes . extend (crate :: DeclarativeModel :: into_attributes (self . shared))"),
        "missing flattened write: {rendered}"
    );
    Ok(())
}
