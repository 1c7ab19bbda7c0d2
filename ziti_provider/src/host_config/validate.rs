//! Configuration validators for the host config resource.
//!
//! Unknown values are skipped; they are checked again once known.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

use crate::diag::Diagnostics;
use crate::value::{Attr, ListValue, ModelValue, ObjectValue};
use crate::DeclarativeModel;

use super::model::{
    CheckActionModel, HostConfigFields, HttpCheckModel, ListenOptionsModel, PortCheckModel,
    PortRangeModel,
};

/// Fixed attributes and the flag that forwards the dialed value instead.
pub const FORWARDING_PAIRS: [(&str, &str); 3] = [
    ("address", "forward_address"),
    ("protocol", "forward_protocol"),
    ("port", "forward_port"),
];

/// Forward flags and the allow-list they require.
pub const REQUIRED_TOGETHER: [(&str, &str); 2] = [
    ("forward_protocol", "allowed_protocols"),
    ("forward_port", "allowed_port_ranges"),
];

const PROTOCOLS: &[&str] = &["tcp", "udp"];
const PRECEDENCES: &[&str] = &["default", "required", "failed"];
const METHODS: &[&str] = &["GET", "PUT", "POST", "PATCH"];
const TRIGGERS: &[&str] = &["pass", "fail", "change"];
const FIXED_ACTIONS: &[&str] = &["mark unhealthy", "mark healthy", "send event"];

const INVALID_COMBINATION: &str = "Invalid Attribute Combination";
const INVALID_VALUE: &str = "Invalid Attribute Value";

/// Validate a host config resource configuration.
#[must_use]
pub fn validate_config(config: &ObjectValue) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for (fixed, forward) in FORWARDING_PAIRS {
        at_least_one_of(config, fixed, forward, &mut diags);
        conflicting(config, fixed, forward, &mut diags);
    }
    for (flag, list) in REQUIRED_TOGETHER {
        required_together(config, flag, list, &mut diags);
    }
    match HostConfigFields::from_object(config) {
        Ok(fields) => validate_values(&fields, &mut diags),
        Err(err) => diags.add_error("Invalid configuration", err.to_string()),
    }
    diags
}

/// `increase cost N` / `decrease cost N`, with an optionally negative `N`.
#[expect(clippy::expect_used, reason = "the pattern is a compile-time constant")]
static COST_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(increase|decrease) cost -?[0-9]+$").expect("COST_ACTION is a valid regex pattern")
});

/// Returns `true` for a health-check action the controller understands:
/// a fixed action or `increase cost N` / `decrease cost N`.
#[must_use]
pub fn is_valid_action(text: &str) -> bool {
    FIXED_ACTIONS.contains(&text) || COST_ACTION.is_match(text)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Unknown,
    Null,
    Set,
}

fn state(config: &ObjectValue, name: &str) -> State {
    match config.get(name) {
        Some(value) if value.is_unknown() => State::Unknown,
        Some(value) if !value.is_null() => State::Set,
        _ => State::Null,
    }
}

fn at_least_one_of(config: &ObjectValue, a: &str, b: &str, diags: &mut Diagnostics) {
    if state(config, a) == State::Null && state(config, b) == State::Null {
        diags.add_error(
            INVALID_COMBINATION,
            format!("At least one attribute out of [{a},{b}] must be specified"),
        );
    }
}

fn conflicting(config: &ObjectValue, a: &str, b: &str, diags: &mut Diagnostics) {
    if state(config, a) == State::Set && state(config, b) == State::Set {
        diags.add_attribute_error(
            a,
            INVALID_COMBINATION,
            format!("Attribute \"{b}\" cannot be specified when \"{a}\" is specified"),
        );
    }
}

fn required_together(config: &ObjectValue, a: &str, b: &str, diags: &mut Diagnostics) {
    let (first, second) = (state(config, a), state(config, b));
    if first == State::Unknown || second == State::Unknown || first == second {
        return;
    }
    diags.add_error(
        INVALID_COMBINATION,
        format!("These attributes must be configured together: [{a},{b}]"),
    );
}

fn validate_values(fields: &HostConfigFields, diags: &mut Diagnostics) {
    between(&fields.port, 1, 65535, "port", diags);
    one_of(&fields.protocol, PROTOCOLS, "protocol", diags);
    for (index, protocol) in fields.allowed_protocols.known_strings().iter().enumerate() {
        one_of(
            &Attr::known(protocol.clone()),
            PROTOCOLS,
            &format!("allowed_protocols[{index}]"),
            diags,
        );
    }
    for (path, range) in elements::<PortRangeModel>(&fields.allowed_port_ranges, "allowed_port_ranges") {
        between(&range.low, 1, 65535, &format!("{path}.low"), diags);
        between(&range.high, 1, 65535, &format!("{path}.high"), diags);
    }
    if let Ok(options) = ListenOptionsModel::from_object(&fields.listen_options) {
        between(&options.cost, 0, 65535, "listen_options.cost", diags);
        between(&options.max_connections, 1, 65535, "listen_options.max_connections", diags);
        one_of(&options.precedence, PRECEDENCES, "listen_options.precedence", diags);
    }
    for (path, check) in elements::<HttpCheckModel>(&fields.http_checks, "http_checks") {
        one_of(&check.method, METHODS, &format!("{path}.method"), diags);
        between(&check.expect_status, 1, 1000, &format!("{path}.expect_status"), diags);
        validate_actions(&check.actions, &path, diags);
    }
    for (path, check) in elements::<PortCheckModel>(&fields.port_checks, "port_checks") {
        validate_actions(&check.actions, &path, diags);
    }
}

fn validate_actions(actions: &ListValue, parent: &str, diags: &mut Diagnostics) {
    for (path, action) in elements::<CheckActionModel>(actions, &format!("{parent}.actions")) {
        one_of(&action.trigger, TRIGGERS, &format!("{path}.trigger"), diags);
        if let Some(text) = action.action.as_known() {
            if !is_valid_action(text) {
                diags.add_attribute_error(
                    format!("{path}.action"),
                    INVALID_VALUE,
                    format!(
                        "Attribute {path}.action must have a valid syntax(eg 'increase cost 100'), got: {text:?}"
                    ),
                );
            }
        }
    }
}

/// Known object elements of `list` decoded as `M`, with their paths.
fn elements<M: DeclarativeModel>(list: &ListValue, path: &str) -> Vec<(String, M)> {
    list.elements()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match element {
            ModelValue::Object(object) => M::from_object(object)
                .ok()
                .map(|model| (format!("{path}[{index}]"), model)),
            _ => None,
        })
        .collect()
}

fn between(value: &Attr<i32>, low: i32, high: i32, path: &str, diags: &mut Diagnostics) {
    if let Some(n) = value.as_known() {
        if !(low..=high).contains(n) {
            diags.add_attribute_error(
                path,
                INVALID_VALUE,
                format!("Attribute {path} value must be between {low} and {high}, got: {n}"),
            );
        }
    }
}

fn one_of(value: &Attr<String>, allowed: &[&str], path: &str, diags: &mut Diagnostics) {
    if let Some(text) = value.as_known() {
        if !allowed.contains(&text.as_str()) {
            diags.add_attribute_error(
                path,
                INVALID_VALUE,
                format!(
                    "Attribute {path} value must be one of: {}, got: {text:?}",
                    quoted(allowed)
                ),
            );
        }
    }
}

fn quoted<T: Display>(items: &[T]) -> String {
    let inner: Vec<String> = items.iter().map(|item| format!("\"{item}\"")).collect();
    format!("[{}]", inner.join(" "))
}
