//! Tests for per-key decoding.

use serde_json::{Value, json};

use super::ConfigError;
use super::RawConfig;
use super::decode::{boolean, integer, kind, string, unknown_keys};

fn raw(key: &str, value: Value) -> RawConfig {
    let mut map = RawConfig::new();
    map.insert(key.to_string(), value);
    map
}

mod strings {
    use super::*;

    #[test]
    fn absent_is_none() {
        assert_eq!(string(&RawConfig::new(), "k").unwrap(), None);
    }

    #[test]
    fn null_is_none() {
        assert_eq!(string(&raw("k", Value::Null), "k").unwrap(), None);
    }

    #[test]
    fn string_is_kept() {
        assert_eq!(
            string(&raw("k", json!("ewr")), "k").unwrap().as_deref(),
            Some("ewr")
        );
    }

    #[test]
    fn number_is_stringified() {
        assert_eq!(
            string(&raw("k", json!(352)), "k").unwrap().as_deref(),
            Some("352")
        );
    }

    #[test]
    fn bool_is_stringified_as_digit() {
        assert_eq!(
            string(&raw("k", json!(true)), "k").unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn list_is_rejected() {
        let err = string(&raw("api_key", json!([])), "api_key").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Decode {
                expected: "string",
                found: "list",
                ..
            }
        ));
    }

    #[test]
    fn map_is_rejected() {
        assert!(string(&raw("k", json!({ "a": 1 })), "k").is_err());
    }
}

mod integers {
    use super::*;

    #[test]
    fn number_is_kept() {
        assert_eq!(integer(&raw("k", json!(352)), "k").unwrap(), Some(352));
    }

    #[test]
    fn numeric_string_is_parsed() {
        assert_eq!(integer(&raw("k", json!(" 352 ")), "k").unwrap(), Some(352));
    }

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(integer(&raw("k", json!("")), "k").unwrap(), Some(0));
    }

    #[test]
    fn whole_float_is_accepted() {
        assert_eq!(integer(&raw("k", json!(387.0)), "k").unwrap(), Some(387));
    }

    #[test]
    fn fractional_float_is_rejected() {
        assert!(integer(&raw("k", json!(1.5)), "k").is_err());
    }

    #[test]
    fn word_is_rejected() {
        let err = integer(&raw("os_id", json!("ubuntu")), "os_id").unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Decode {
                expected: "int",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn list_is_rejected() {
        assert!(integer(&raw("k", json!([1])), "k").is_err());
    }
}

mod booleans {
    use super::*;

    #[test]
    fn bool_is_kept() {
        assert_eq!(boolean(&raw("k", json!(true)), "k").unwrap(), Some(true));
        assert_eq!(boolean(&raw("k", json!(false)), "k").unwrap(), Some(false));
    }

    #[test]
    fn common_strings_are_parsed() {
        for (input, expected) in [("true", true), ("T", true), ("1", true), ("false", false), ("0", false)] {
            assert_eq!(
                boolean(&raw("k", json!(input)), "k").unwrap(),
                Some(expected),
                "input: {input}"
            );
        }
    }

    #[test]
    fn numbers_are_truthy_when_non_zero() {
        assert_eq!(boolean(&raw("k", json!(2)), "k").unwrap(), Some(true));
        assert_eq!(boolean(&raw("k", json!(0)), "k").unwrap(), Some(false));
    }

    #[test]
    fn other_strings_are_rejected() {
        assert!(boolean(&raw("k", json!("yes please")), "k").is_err());
    }
}

mod schema {
    use super::*;

    #[test]
    fn known_keys_pass() {
        let mut map = raw("api_key", json!("k"));
        map.insert("enable_ipv6".to_string(), json!(true));

        assert_eq!(unknown_keys(&map).count(), 0);
    }

    #[test]
    fn every_unknown_key_is_reported() {
        let mut map = raw("api_key", json!("k"));
        map.insert("regionid".to_string(), json!("ewr"));
        map.insert("i_should_not_be_valid".to_string(), json!(true));

        let keys: Vec<String> = unknown_keys(&map)
            .map(|e| match e {
                ConfigError::UnknownKey { key } => key,
                other => panic!("unexpected error: {other}"),
            })
            .collect();

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"regionid".to_string()));
        assert!(keys.contains(&"i_should_not_be_valid".to_string()));
    }
}

#[test]
fn kind_names_every_value() {
    assert_eq!(kind(&Value::Null), "null");
    assert_eq!(kind(&json!(1)), "number");
    assert_eq!(kind(&json!("s")), "string");
    assert_eq!(kind(&json!(true)), "bool");
    assert_eq!(kind(&json!([])), "list");
    assert_eq!(kind(&json!({})), "map");
}
