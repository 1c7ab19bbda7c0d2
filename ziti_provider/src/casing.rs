//! Key casing between declarative attributes and wire fields.
//!
//! Declarative attributes are `snake_case`; the management API uses
//! `lowerCamelCase`. Both directions rewrite top-level keys only, leaving
//! values untouched, so callers recurse into nested maps themselves.
//!
//! ```
//! use serde_json::{Map, Value, json};
//! use ziti_provider::casing::{to_model_case, to_wire_case};
//!
//! let Value::Object(model) = json!({"forward_port": true, "port": 80}) else {
//!     unreachable!()
//! };
//! let wire: Map<String, Value> = to_wire_case(model.clone());
//! assert!(wire.contains_key("forwardPort"));
//! assert_eq!(to_model_case(wire), model);
//! ```

use heck::{ToLowerCamelCase, ToSnakeCase};

/// Rewrite every key from `snake_case` to `lowerCamelCase`.
///
/// Keys already in `lowerCamelCase` are returned unchanged. When two keys
/// collapse onto the same wire name the later one wins.
pub fn to_wire_case<M, V>(map: M) -> M
where
    M: IntoIterator<Item = (String, V)> + FromIterator<(String, V)>,
{
    map.into_iter()
        .map(|(key, value)| (key.to_lower_camel_case(), value))
        .collect()
}

/// Rewrite every key from `lowerCamelCase` to `snake_case`.
///
/// Keys already in `snake_case` are returned unchanged.
pub fn to_model_case<M, V>(map: M) -> M
where
    M: IntoIterator<Item = (String, V)> + FromIterator<(String, V)>,
{
    map.into_iter()
        .map(|(key, value)| (key.to_snake_case(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use rstest::rstest;
    use serde_json::{Map, Value, json};

    fn keys(map: &BTreeMap<String, u8>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    #[rstest]
    #[case("allowed_port_ranges", "allowedPortRanges")]
    #[case("forward_address", "forwardAddress")]
    #[case("bind_using_edge_identity", "bindUsingEdgeIdentity")]
    #[case("port", "port")]
    fn keys_convert_both_ways(#[case] snake: &str, #[case] camel: &str) {
        let model = BTreeMap::from([(snake.to_owned(), 1_u8)]);
        let wire = to_wire_case(model.clone());
        assert_eq!(keys(&wire), [camel]);
        assert_eq!(to_model_case(wire), model);
    }

    #[rstest]
    fn conversions_are_idempotent() {
        let wire = BTreeMap::from([("expectInBody".to_owned(), 1_u8)]);
        assert_eq!(to_wire_case(wire.clone()), wire);
        let model = BTreeMap::from([("expect_in_body".to_owned(), 1_u8)]);
        assert_eq!(to_model_case(model.clone()), model);
    }

    #[rstest]
    fn nested_values_are_untouched() {
        let Value::Object(map) = json!({"listen_options": {"max_connections": 3}}) else {
            panic!("fixture must be an object");
        };
        let wire: Map<String, Value> = to_wire_case(map);
        assert_eq!(wire.get("listenOptions"), Some(&json!({"max_connections": 3})));
    }

    #[rstest]
    fn empty_maps_stay_empty() {
        assert!(to_wire_case(BTreeMap::<String, u8>::new()).is_empty());
    }
}
