// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    integer        = { "3",      Value::Int(3) },
    negative       = { " -12 ",  Value::Int(-12) },
    float          = { "2.5",    Value::Float(2.5) },
    exponent       = { "1e3",    Value::Float(1000.0) },
    boolean        = { "true",   Value::Bool(true) },
    text           = { "done",   Value::Str("done".to_string()) },
    trimmed_text   = { "  ok\n", Value::Str("ok".to_string()) },
)]
fn parse_scalar_cases(token: &str, expected: Value) {
    assert_eq!(Value::parse_scalar(token), expected);
}

#[yare::parameterized(
    null    = { Value::Null,                                "NaN" },
    int     = { Value::Int(7),                              "7" },
    float   = { Value::Float(0.5),                          "0.5" },
    text    = { Value::from("abc"),                         "abc" },
    list    = { Value::from(vec![3, 3]),                    "[3, 3]" },
    nested  = { Value::from(vec![Value::Null, 1.into()]),   "[NaN, 1]" },
)]
fn display_cases(value: Value, expected: &str) {
    assert_eq!(value.to_string(), expected);
}

#[test]
fn json_decodes_into_narrowest_variant() {
    let text = r#"{"a": 1, "b": 1.5, "c": "x", "d": [1, 2], "e": null, "f": {"g": true}}"#;
    let map: ParamMap = serde_json::from_str(text).unwrap();

    assert_eq!(map["a"], Value::Int(1));
    assert_eq!(map["b"], Value::Float(1.5));
    assert_eq!(map["c"], Value::from("x"));
    assert_eq!(map["d"], Value::from(vec![1, 2]));
    assert!(map["e"].is_null());
    assert_eq!(map["f"], Value::Map(crate::params! { "g" => true }));
}

#[test]
fn json_encodes_untagged() {
    let map = crate::params! { "result" => vec![3, 3], "name" => "run" };
    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(json, r#"{"name":"run","result":[3,3]}"#);
}

#[test]
fn numeric_accessors() {
    assert_eq!(Value::Int(4).as_i64(), Some(4));
    assert_eq!(Value::Int(4).as_f64(), Some(4.0));
    assert_eq!(Value::Float(1.25).as_f64(), Some(1.25));
    assert_eq!(Value::Float(1.25).as_i64(), None);
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::from(vec![1]).as_list().map(<[Value]>::len), Some(1));
}

#[test]
fn params_macro_builds_sorted_map() {
    let map = crate::params! { "value_2" => 2, "value_1" => 1 };
    let keys: Vec<_> = map.keys().cloned().collect();
    assert_eq!(keys, vec!["value_1", "value_2"]);
}
