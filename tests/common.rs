//! Common test utilities for building graph definitions and contexts.
use keiro::prelude::*;
use serde_json::json;

#[allow(dead_code)]
pub fn node(id: &str, name: &str, kind: NodeKind, content: serde_json::Value) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        content,
    }
}

#[allow(dead_code)]
pub fn edge(id: &str, source: &str, target: &str, handle: Option<&str>) -> EdgeDefinition {
    EdgeDefinition {
        id: id.to_string(),
        source_id: source.to_string(),
        target_id: target.to_string(),
        source_handle: handle.map(str::to_string),
    }
}

/// Converts a JSON object literal into a `Context`.
#[allow(dead_code)]
pub fn ctx(value: serde_json::Value) -> Context {
    serde_json::from_value(value).expect("context literal must be a JSON object")
}

#[allow(dead_code)]
pub fn request(content: GraphDefinition, context: serde_json::Value) -> EvaluationRequest {
    EvaluationRequest {
        content,
        context: ctx(context),
    }
}

/// A single path expression → output.
///
/// Logic: `y := 1 + 1`, no external context involved.
#[allow(dead_code)]
pub fn expression_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node(
                "expr",
                "Compute",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "y", "value": "1 + 1" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![edge("edge1", "expr", "out", None)],
    }
}

/// A switch routing between two branches via `sourceHandle`s `"A"` and `"B"`.
///
/// Only statement `"A"` (`x > 0`) is declared, so the `"B"` edge can never
/// survive pruning.
#[allow(dead_code)]
pub fn switch_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("in", "Request", NodeKind::Input, json!(null)),
            node(
                "sw",
                "Route",
                NodeKind::Switch,
                json!({ "statements": [{ "id": "A", "condition": "x > 0" }] }),
            ),
            node(
                "a",
                "Branch A",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "branch", "value": "'A'" }] }),
            ),
            node(
                "b",
                "Branch B",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "branch", "value": "'B'" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("edge1", "in", "sw", None),
            edge("edge2", "sw", "a", Some("A")),
            edge("edge3", "sw", "b", Some("B")),
            edge("edge4", "a", "out", None),
            edge("edge5", "b", "out", None),
        ],
    }
}

/// A decision table with one input column and two rule rows.
///
/// Row `r1` hits (`true`), row `r2` does not (`false`); both rows carry a cell
/// at the output column.
#[allow(dead_code)]
pub fn decision_table_graph() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("in", "Request", NodeKind::Input, json!(null)),
            node(
                "table",
                "Categorize",
                NodeKind::DecisionTable,
                json!({
                    "inputs": [{ "id": "i1", "name": "Condition", "field": "x" }],
                    "outputs": [{ "id": "o1", "name": "Category", "field": "category" }],
                    "rules": [
                        { "_id": "r1", "i1": "true", "o1": "low" },
                        { "_id": "r2", "i1": "false", "o1": "high" }
                    ]
                }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("edge1", "in", "table", None),
            edge("edge2", "table", "out", None),
        ],
    }
}

/// Asserts the `"<N>.NNms"` timing format.
#[allow(dead_code)]
pub fn assert_ms_format(rendered: &str) {
    let millis = rendered
        .strip_suffix("ms")
        .unwrap_or_else(|| panic!("'{rendered}' does not end in 'ms'"));
    let decimals = millis
        .split('.')
        .nth(1)
        .unwrap_or_else(|| panic!("'{rendered}' has no decimal part"));
    assert_eq!(decimals.len(), 2, "expected two decimals in '{rendered}'");
    millis
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("'{rendered}' is not numeric"));
}
