//! Tests for the evaluation engine: walking, routing, handlers and policies.
mod common;
use common::{
    assert_ms_format, decision_table_graph, edge, expression_graph, node, request, switch_graph,
};
use keiro::prelude::*;
use serde_json::json;

#[test]
fn test_single_path_reaches_output() {
    let response = Engine::new()
        .evaluate(&request(expression_graph(), json!({})))
        .unwrap();

    assert_eq!(response.result.get("y"), Some(&json!(2)));
    assert_eq!(response.trace.len(), 2);
    assert!(response.trace.contains_key("expr"));
    assert!(response.trace.contains_key("out"));
    assert_ms_format(&response.performance);

    let expr_trace = &response.trace["expr"];
    assert_eq!(expr_trace.output.as_ref().unwrap().get("y"), Some(&json!(2)));
    assert_ms_format(&expr_trace.performance);
}

#[test]
fn test_switch_routes_matching_branch() {
    let response = Engine::new()
        .evaluate(&request(switch_graph(), json!({ "x": 5 })))
        .unwrap();

    // Only the "A" branch survived pruning.
    assert_eq!(response.result.get("branch"), Some(&json!("A")));
    assert!(response.trace.contains_key("a"));
    assert!(!response.trace.contains_key("b"));

    let routing = response.trace["sw"].trace_data.as_ref().unwrap();
    assert!(routing["statements"]["A"]["condition"].is_string());
}

#[test]
fn test_switch_with_no_match_halts_run() {
    let error = Engine::new()
        .evaluate(&request(switch_graph(), json!({ "x": -5 })))
        .unwrap_err();
    assert!(matches!(
        error,
        EvalError::DidNotHalt {
            reason: HaltReason::SwitchHalted
        }
    ));
}

#[test]
fn test_graph_without_output_never_halts() {
    let definition = GraphDefinition {
        nodes: vec![
            node("in", "Request", NodeKind::Input, json!(null)),
            node(
                "expr",
                "Compute",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "y", "value": "1" }] }),
            ),
        ],
        edges: vec![edge("e1", "in", "expr", None)],
    };
    let error = Engine::new()
        .evaluate(&request(definition, json!({})))
        .unwrap_err();
    assert!(matches!(
        error,
        EvalError::DidNotHalt {
            reason: HaltReason::NoOutputReached
        }
    ));
}

#[test]
fn test_input_node_injects_external_context() {
    let definition = GraphDefinition {
        nodes: vec![
            node("in", "Request", NodeKind::Input, json!(null)),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![edge("e1", "in", "out", None)],
    };
    let response = Engine::new()
        .evaluate(&request(definition, json!({ "user": { "age": 30 } })))
        .unwrap();

    // Nested context data arrives flattened at the output.
    assert_eq!(response.result.get("user.age"), Some(&json!(30)));
    // The input node's trace carries no payload, only identity and timing.
    let input_trace = &response.trace["in"];
    assert!(input_trace.input.is_none());
    assert!(input_trace.output.is_none());
}

#[test]
fn test_decision_table_or_row_hit_and_last_row_output() {
    let response = Engine::new()
        .evaluate(&request(decision_table_graph(), json!({})))
        .unwrap();

    // Only row r1 hits, but output assignment scans every row, so the last
    // row's cell wins.
    let table_trace = response.trace["table"].trace_data.as_ref().unwrap();
    assert_eq!(table_trace["hit"], json!(["r1"]));
    assert_eq!(table_trace["cells"]["r1"]["i1"], json!(true));
    assert_eq!(table_trace["cells"]["r2"]["i1"], json!(false));
    assert_eq!(response.result.get("category"), Some(&json!("high")));
}

#[test]
fn test_decision_table_without_hits_yields_nothing() {
    let mut definition = decision_table_graph();
    definition.nodes[1] = node(
        "table",
        "Categorize",
        NodeKind::DecisionTable,
        json!({
            "inputs": [{ "id": "i1", "name": "Condition", "field": "x" }],
            "outputs": [{ "id": "o1", "name": "Category", "field": "category" }],
            "rules": [
                { "_id": "r1", "i1": "false", "o1": "low" },
                { "_id": "r2", "i1": "false", "o1": "high" }
            ]
        }),
    );
    let response = Engine::new()
        .evaluate(&request(definition, json!({})))
        .unwrap();
    assert!(response.result.is_empty());
    let table_trace = response.trace["table"].trace_data.as_ref().unwrap();
    assert_eq!(table_trace["hit"], json!([]));
}

#[test]
fn test_expression_error_is_recovered_locally() {
    let definition = GraphDefinition {
        nodes: vec![
            node(
                "bad",
                "Broken",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "y", "value": "1 +" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![edge("e1", "bad", "out", None)],
    };
    let response = Engine::new()
        .evaluate(&request(definition, json!({})))
        .unwrap();

    // The run still reaches the output; the bad node contributed nothing and
    // its trace carries the error text.
    assert!(response.result.is_empty());
    let bad_trace = &response.trace["bad"];
    assert!(bad_trace.output.is_none());
    assert!(
        bad_trace.trace_data.as_ref().unwrap()["err"]
            .as_str()
            .unwrap()
            .contains("unexpectedly")
    );
}

#[test]
fn test_function_node_passes_through_silently() {
    let definition = GraphDefinition {
        nodes: vec![
            node("in", "Request", NodeKind::Input, json!(null)),
            node(
                "fun",
                "Placeholder",
                NodeKind::Function,
                json!({ "funcName": "noop", "args": [] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("e1", "in", "fun", None),
            edge("e2", "fun", "out", None),
        ],
    };
    let response = Engine::new()
        .evaluate(&request(definition, json!({ "a": 1 })))
        .unwrap();

    assert_eq!(response.result.get("a"), Some(&json!(1)));
    // Pass-through placeholder leaves no trace entry.
    assert!(!response.trace.contains_key("fun"));
}

#[test]
fn test_multi_parent_merge_order() {
    let definition = GraphDefinition {
        nodes: vec![
            node(
                "p1",
                "First",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "p", "value": "1" }] }),
            ),
            node(
                "p2",
                "Second",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "p", "value": "2" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("e1", "p1", "out", None),
            edge("e2", "p2", "out", None),
        ],
    };
    let response = Engine::new()
        .evaluate(&request(definition, json!({})))
        .unwrap();
    // Parents merge in edge-insertion order; the later one wins.
    assert_eq!(response.result.get("p"), Some(&json!(2)));
}

/// An asymmetric diamond: `r1 → join` and `r2 → mid → join`, with the join
/// computing `a + b` from both sides.
fn asymmetric_diamond() -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node(
                "r1",
                "Left",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "a", "value": "1" }] }),
            ),
            node(
                "r2",
                "Right",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "b0", "value": "2" }] }),
            ),
            node(
                "mid",
                "Relay",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "b", "value": "b0 + 0" }] }),
            ),
            node(
                "join",
                "Join",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "y", "value": "a + b" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("e1", "r1", "join", None),
            edge("e2", "r2", "mid", None),
            edge("e3", "mid", "join", None),
            edge("e4", "join", "out", None),
        ],
    }
}

#[test]
fn test_eager_scheduling_can_visit_join_early() {
    // Eager: the join is visited as soon as the left parent discovers it, so
    // the first visit is missing `b` and the output terminates the run before
    // the complete second visit lands.
    let response = Engine::new()
        .evaluate(&request(asymmetric_diamond(), json!({})))
        .unwrap();
    assert!(response.result.get("y").is_none());
}

#[test]
fn test_wait_for_parents_scheduling_merges_all_parents() {
    let response = Engine::new()
        .scheduling(SchedulingPolicy::WaitForParents)
        .evaluate(&request(asymmetric_diamond(), json!({})))
        .unwrap();
    assert_eq!(response.result.get("y"), Some(&json!(3)));
    // Every node was visited exactly once.
    assert_eq!(response.trace.len(), 5);
}

#[test]
fn test_wait_for_parents_reschedules_target_of_pruned_edge() {
    // `join` has two parents: a plain expression and a switch edge whose
    // handle names no statement. Once the switch prunes that edge, the
    // remaining parent is already visited, so `join` must still be queued.
    let definition = GraphDefinition {
        nodes: vec![
            node(
                "p1",
                "Left",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "p", "value": "1" }] }),
            ),
            node("in", "Request", NodeKind::Input, json!(null)),
            node(
                "sw",
                "Route",
                NodeKind::Switch,
                json!({ "statements": [{ "id": "A", "condition": "x > 0" }] }),
            ),
            node(
                "join",
                "Join",
                NodeKind::Expression,
                json!({ "expressions": [{ "id": "e1", "key": "y", "value": "p + 1" }] }),
            ),
            node("out", "Result", NodeKind::Output, json!(null)),
        ],
        edges: vec![
            edge("e1", "p1", "join", None),
            edge("e2", "in", "sw", None),
            edge("e3", "sw", "join", Some("B")),
            edge("e4", "join", "out", None),
        ],
    };

    let response = Engine::new()
        .scheduling(SchedulingPolicy::WaitForParents)
        .evaluate(&request(definition.clone(), json!({ "x": 5 })))
        .unwrap();
    assert_eq!(response.result.get("y"), Some(&json!(2)));

    // Eager reaches the output on the same graph; both policies must.
    let response = Engine::new()
        .evaluate(&request(definition, json!({ "x": 5 })))
        .unwrap();
    assert_eq!(response.result.get("y"), Some(&json!(2)));
}

#[test]
fn test_determinism_across_runs() {
    let engine = Engine::new();
    let req = request(switch_graph(), json!({ "x": 5 }));
    let first = engine.evaluate(&req).unwrap();
    let second = engine.evaluate(&req).unwrap();

    assert_eq!(first.result, second.result);
    let mut first_ids: Vec<_> = first.trace.keys().collect();
    let mut second_ids: Vec<_> = second.trace.keys().collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);
    for (id, entry) in &first.trace {
        assert_eq!(entry.output, second.trace[id].output);
        assert_eq!(entry.trace_data, second.trace[id].trace_data);
    }
}
