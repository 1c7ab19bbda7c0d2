//! Tests for error construction and display.

use super::*;
use anyhow::{Result, ensure};
use rstest::rstest;

#[rstest]
fn not_found_is_detected() -> Result<()> {
    let err = ZitiError::not_found("config", "abc");
    ensure!(err.is_not_found(), "expected NotFound");
    ensure!(err.to_string() == "config 'abc' was not found", "got {err}");
    Ok(())
}

#[rstest]
#[case::mismatch(ZitiError::type_mismatch("object", "string"), "expected object, found string")]
#[case::invalid(
    ZitiError::invalid_value("port", "expected int32"),
    "invalid value for 'port': expected int32"
)]
#[case::api(
    ZitiError::Api { status: 400, message: "bad filter".to_owned() },
    "management API returned 400: bad filter"
)]
fn error_messages_name_the_failure(#[case] err: ZitiError, #[case] expected: &str) -> Result<()> {
    ensure!(err.to_string() == expected, "got {err}");
    ensure!(!err.is_not_found(), "only NotFound should match");
    Ok(())
}

#[rstest]
fn figment_errors_become_configuration_errors() -> Result<()> {
    let err = ZitiError::from(figment::Error::from("missing field".to_owned()));
    ensure!(
        matches!(err, ZitiError::Configuration(_)),
        "expected Configuration, got {err:?}"
    );
    Ok(())
}
