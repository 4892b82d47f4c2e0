//! Per-kind node handlers: pure functions from raw node content plus merged
//! inputs to a result payload and a trace payload.
//!
//! Content-level failures are recovered locally: the node proceeds with an
//! omitted result and the error text lands in its own trace entry, so later
//! nodes observe missing keys instead of a propagated failure.

use crate::expr::{ExpressionEngine, Value};
use crate::model::{Context, DecisionTableContent, ExpressionContent, SwitchContent, SwitchStatement};
use ahash::AHashMap;
use serde_json::json;

/// What one node handler produced: its output mapping (absent on content
/// errors) and its diagnostic trace payload.
pub(crate) struct NodeOutcome {
    pub result: Option<Context>,
    pub trace: Option<serde_json::Value>,
}

impl NodeOutcome {
    fn error(message: String) -> Self {
        Self {
            result: None,
            trace: Some(json!({ "err": message })),
        }
    }
}

/// Evaluates a switch node's statements and returns those whose condition
/// held, keyed by statement id.
///
/// A statement counts only when its condition evaluates to boolean `true`;
/// parse and evaluation failures leave the branch inactive, as does a
/// malformed content payload.
pub(crate) fn valid_statements(
    content: &serde_json::Value,
    inputs: &Context,
    expression: &dyn ExpressionEngine,
) -> AHashMap<String, SwitchStatement> {
    let Ok(content) = serde_json::from_value::<SwitchContent>(content.clone()) else {
        return AHashMap::new();
    };
    let mut valid = AHashMap::new();
    for statement in content.statements {
        if let Ok(Value::Bool(true)) = expression.evaluate(&statement.condition, inputs) {
            valid.insert(statement.id.clone(), statement);
        }
    }
    valid
}

/// Handles an expression node: every declared `{key, value}` pair is evaluated
/// against the merged inputs. The first parse or evaluation error aborts this
/// node's output; the run itself continues.
pub(crate) fn expression_node(
    content: &serde_json::Value,
    inputs: &Context,
    expression: &dyn ExpressionEngine,
) -> NodeOutcome {
    let content = match serde_json::from_value::<ExpressionContent>(content.clone()) {
        Ok(content) => content,
        Err(error) => return NodeOutcome::error(error.to_string()),
    };

    let mut results = Context::default();
    let mut trace = serde_json::Map::new();
    for entry in &content.expressions {
        match expression.evaluate(&entry.value, inputs) {
            Ok(value) => {
                let rendered = value.to_json();
                trace.insert(
                    entry.key.clone(),
                    json!({ "expression": entry.value, "result": rendered }),
                );
                results.insert(entry.key.clone(), rendered);
            }
            Err(error) => return NodeOutcome::error(error.to_string()),
        }
    }

    NodeOutcome {
        result: Some(results),
        trace: Some(serde_json::Value::Object(trace)),
    }
}

/// Handles a decision table node.
///
/// A rule row is hit when any one of its input-column cells evaluates true
/// (OR semantics across a row's input cells). Output assignment scans every
/// row in declaration order once at least one row hit, so the last row with a
/// cell at an output column wins; cell values are carried as their raw
/// strings.
pub(crate) fn decision_table(
    content: &serde_json::Value,
    inputs: &Context,
    expression: &dyn ExpressionEngine,
) -> NodeOutcome {
    let content = match serde_json::from_value::<DecisionTableContent>(content.clone()) {
        Ok(content) => content,
        Err(error) => return NodeOutcome::error(error.to_string()),
    };

    let mut hit: Vec<String> = Vec::new();
    let mut cells = serde_json::Map::new();
    for input in &content.inputs {
        for rule in &content.rules {
            let Some(cell) = rule.get(&input.id) else {
                continue;
            };
            // Cells that fail to parse or evaluate are skipped, not fatal.
            let Ok(value) = expression.evaluate(cell, inputs) else {
                continue;
            };
            let rule_id = rule.get("_id").cloned().unwrap_or_default();
            let row = cells
                .entry(rule_id.clone())
                .or_insert_with(|| json!({}));
            if let Some(row) = row.as_object_mut() {
                row.insert(input.id.clone(), value.to_json());
            }
            if value == Value::Bool(true) && !hit.contains(&rule_id) {
                hit.push(rule_id);
            }
        }
    }

    let mut results = Context::default();
    if !hit.is_empty() {
        for rule in &content.rules {
            for output in &content.outputs {
                if let Some(cell) = rule.get(&output.id) {
                    results.insert(output.field.clone(), serde_json::Value::String(cell.clone()));
                }
            }
        }
    }

    NodeOutcome {
        result: Some(results),
        trace: Some(json!({ "hit": hit, "cells": cells })),
    }
}
