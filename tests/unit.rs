//! Unit tests for values, flatten/merge and error rendering.
mod common;
use common::ctx;
use keiro::prelude::*;
use serde_json::json;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Number(42.0)), "42");
    assert_eq!(format!("{}", Value::Number(2.5)), "2.5");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Str("hi".to_string())), "hi");
    assert_eq!(format!("{}", Value::Null), "null");
}

#[test]
fn test_value_json_conversion() {
    assert_eq!(Value::from_json(&json!(5)), Value::Number(5.0));
    assert_eq!(Value::from_json(&json!("a")), Value::Str("a".to_string()));
    assert_eq!(Value::from_json(&json!(true)), Value::Bool(true));
    assert_eq!(Value::from_json(&json!(null)), Value::Null);

    // Whole numbers normalize to JSON integers.
    assert_eq!(Value::Number(2.0).to_json(), json!(2));
    assert_eq!(Value::Number(2.5).to_json(), json!(2.5));
    assert_eq!(Value::Bool(false).to_json(), json!(false));
}

#[test]
fn test_flatten_nested_object() {
    let flat = flatten(&ctx(json!({ "a": { "b": 1 } })));
    assert_eq!(flat, ctx(json!({ "a.b": 1 })));
}

#[test]
fn test_flatten_sequence() {
    let flat = flatten(&ctx(json!({ "a": [10, 20] })));
    assert_eq!(flat, ctx(json!({ "a.0": 10, "a.1": 20 })));
}

#[test]
fn test_flatten_deep_mixture() {
    let flat = flatten(&ctx(json!({
        "a": { "b": [{ "c": 1 }, 2] },
        "d": "plain"
    })));
    assert_eq!(flat, ctx(json!({ "a.b.0.c": 1, "a.b.1": 2, "d": "plain" })));
}

#[test]
fn test_flatten_is_idempotent() {
    let nested = ctx(json!({
        "a": { "b": 1 },
        "list": [{ "x": true }, [7, 8]],
        "scalar": 3
    }));
    let once = flatten(&nested);
    let twice = flatten(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_flatten_leaves_flat_mapping_unchanged() {
    let flat = ctx(json!({ "a.b": 1, "x": "y" }));
    assert_eq!(flatten(&flat), flat);
}

#[test]
fn test_merge_last_write_wins() {
    let first = ctx(json!({ "x": 1 }));
    let second = ctx(json!({ "x": 2 }));
    let merged = merge_and_flatten([&first, &second]);
    assert_eq!(merged, ctx(json!({ "x": 2 })));
}

#[test]
fn test_merge_keeps_disjoint_keys() {
    let first = ctx(json!({ "a": 1, "shared": "first" }));
    let second = ctx(json!({ "b": { "c": 2 }, "shared": "second" }));
    let merged = merge_and_flatten([&first, &second]);
    assert_eq!(
        merged,
        ctx(json!({ "a": 1, "b.c": 2, "shared": "second" }))
    );
}

#[test]
fn test_error_display() {
    let build_err = GraphBuildError::CycleDetected {
        source_id: "n2".to_string(),
        target_id: "n1".to_string(),
    };
    assert!(build_err.to_string().contains("n2"));
    assert!(build_err.to_string().contains("cycle"));

    let expr_err = ExprError::TypeMismatch {
        operation: "+".to_string(),
        expected: "Number".to_string(),
        found: Value::Bool(false),
    };
    assert!(expr_err.to_string().contains('+'));
    assert!(expr_err.to_string().contains("Number"));
    assert!(expr_err.to_string().contains("false"));

    let halted = EvalError::DidNotHalt {
        reason: HaltReason::SwitchHalted,
    };
    assert!(halted.to_string().contains("switch"));
    let exhausted = EvalError::DidNotHalt {
        reason: HaltReason::NoOutputReached,
    };
    assert!(exhausted.to_string().contains("output"));
}
