//! `figment::Jail` helpers for provider settings tests.
//!
//! A jail isolates environment variables for the duration of a closure, so
//! tests can set `ZITI_EDGE_MGMT_*` variables without leaking them into
//! other tests.

use anyhow::{Result, anyhow};

/// Runs `f` inside a [`figment::Jail`] and returns its output.
///
/// # Errors
///
/// Returns an error when the jail cannot be set up or the closure fails.
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Set the management API variables read by the provider.
///
/// `None` leaves a variable unset.
pub fn set_management_env(
    jail: &mut figment::Jail,
    endpoint: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
) {
    for (name, value) in [
        ("ZITI_EDGE_MGMT_URL", endpoint),
        ("ZITI_EDGE_MGMT_USERNAME", username),
        ("ZITI_EDGE_MGMT_PASSWORD", password),
    ] {
        if let Some(value) = value {
            jail.set_env(name, value);
        }
    }
}

/// Converts any displayable error into a [`figment::Error`] so it can be
/// returned from a jail closure.
#[expect(
    clippy::needless_pass_by_value,
    reason = "callers hand over owned errors from map_err"
)]
pub fn figment_error<E: ToString>(err: E) -> figment::Error {
    figment::Error::from(err.to_string())
}
