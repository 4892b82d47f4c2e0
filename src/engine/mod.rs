//! The evaluation engine: orchestrates graph model, walker and node handlers
//! into one request-scoped run producing a final response with full trace.

mod flatten;
mod handlers;
mod walker;

pub use flatten::{flatten, merge_and_flatten};
pub use walker::{GraphWalker, RoutingTrace, Step};

use crate::error::{EvalError, HaltReason};
use crate::expr::{ExpressionEngine, FunctionRegistry, RegistryEngine};
use crate::graph::DecisionGraph;
use crate::model::{EvaluationRequest, GraphResponse, NodeKind, NodeTrace};
use ahash::AHashMap;
use std::time::Instant;

/// When a node with several parents becomes ready for visitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulingPolicy {
    /// Push a node as soon as any visited parent discovers it. A multi-parent
    /// node may be visited more than once; earlier visits merge only the
    /// parent data available at that point.
    #[default]
    Eager,
    /// Push a node only once all of its current parents have been visited;
    /// every node is visited at most once.
    WaitForParents,
}

/// The graph evaluation engine.
///
/// One engine can serve many runs, sequentially or in parallel: each run
/// builds its own graph and context, and the expression engine is only read.
pub struct Engine {
    expression: Box<dyn ExpressionEngine>,
    policy: SchedulingPolicy,
}

impl Engine {
    /// An engine with the default expression evaluator and built-in functions.
    pub fn new() -> Self {
        Self {
            expression: Box::new(RegistryEngine::with_builtins()),
            policy: SchedulingPolicy::default(),
        }
    }

    /// An engine with the default evaluator bound to a custom function registry.
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self {
            expression: Box::new(RegistryEngine::new(functions)),
            policy: SchedulingPolicy::default(),
        }
    }

    /// An engine with a custom expression capability.
    pub fn with_expression_engine(expression: Box<dyn ExpressionEngine>) -> Self {
        Self {
            expression,
            policy: SchedulingPolicy::default(),
        }
    }

    /// Selects the scheduling policy for multi-parent nodes.
    pub fn scheduling(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decodes a `{"content": ..., "context": ...}` request body and evaluates it.
    pub fn evaluate_json(&self, body: &str) -> Result<GraphResponse, EvalError> {
        let request: EvaluationRequest =
            serde_json::from_str(body).map_err(|error| EvalError::BadRequest(error.to_string()))?;
        self.evaluate(&request)
    }

    /// Evaluates a decision graph against its external input context.
    ///
    /// Returns as soon as an output node is reached; a run that never reaches
    /// one fails with [`EvalError::DidNotHalt`], carrying the reason (frontier
    /// exhausted vs. a switch matching no statements). No partial trace is
    /// returned on failure.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<GraphResponse, EvalError> {
        let graph = DecisionGraph::build(&request.content)?;
        let start = Instant::now();
        let mut walker = GraphWalker::new(graph, self.policy);
        let mut trace: AHashMap<String, NodeTrace> = AHashMap::new();

        loop {
            let (ix, routing) = match walker.next(self.expression.as_ref()) {
                Step::Visit { ix, routing } => (ix, routing),
                Step::Halted => {
                    return Err(EvalError::DidNotHalt {
                        reason: HaltReason::SwitchHalted,
                    });
                }
                Step::Exhausted => {
                    return Err(EvalError::DidNotHalt {
                        reason: HaltReason::NoOutputReached,
                    });
                }
            };

            let node = walker.node(ix).clone();
            let merged = walker.merged_inputs(ix);

            match node.kind {
                NodeKind::Input => {
                    // Injects the external context, not parent data.
                    walker.record_output(ix, request.context.clone());
                    trace.insert(
                        node.id.clone(),
                        NodeTrace {
                            id: node.id.clone(),
                            name: node.name.clone(),
                            input: None,
                            output: None,
                            trace_data: None,
                            performance: format_elapsed(start),
                        },
                    );
                }
                NodeKind::Output => {
                    walker.record_output(ix, merged.clone());
                    trace.insert(
                        node.id.clone(),
                        NodeTrace {
                            id: node.id.clone(),
                            name: node.name.clone(),
                            input: Some(merged.clone()),
                            output: Some(merged.clone()),
                            trace_data: None,
                            performance: format_elapsed(start),
                        },
                    );
                    return Ok(GraphResponse {
                        performance: format_elapsed(start),
                        result: merged,
                        trace,
                    });
                }
                NodeKind::Switch => {
                    walker.record_output(ix, merged.clone());
                    trace.insert(
                        node.id.clone(),
                        NodeTrace {
                            id: node.id.clone(),
                            name: node.name.clone(),
                            input: Some(merged.clone()),
                            output: Some(merged),
                            trace_data: routing
                                .and_then(|routing| serde_json::to_value(routing).ok()),
                            performance: format_elapsed(start),
                        },
                    );
                }
                NodeKind::DecisionTable => {
                    let outcome =
                        handlers::decision_table(&node.content, &merged, self.expression.as_ref());
                    walker.record_output(ix, outcome.result.clone().unwrap_or_default());
                    trace.insert(
                        node.id.clone(),
                        NodeTrace {
                            id: node.id.clone(),
                            name: node.name.clone(),
                            input: Some(merged),
                            output: outcome.result,
                            trace_data: outcome.trace,
                            performance: format_elapsed(start),
                        },
                    );
                }
                NodeKind::Expression => {
                    let outcome =
                        handlers::expression_node(&node.content, &merged, self.expression.as_ref());
                    walker.record_output(ix, outcome.result.clone().unwrap_or_default());
                    trace.insert(
                        node.id.clone(),
                        NodeTrace {
                            id: node.id.clone(),
                            name: node.name.clone(),
                            input: Some(merged),
                            output: outcome.result,
                            trace_data: outcome.trace,
                            performance: format_elapsed(start),
                        },
                    );
                }
                NodeKind::Function => {
                    // Pass-through placeholder: merged inputs forwarded, no trace entry.
                    walker.record_output(ix, merged);
                }
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Elapsed wall-clock time since `start`, rendered as `"<N>.NNms"` from
/// microsecond resolution.
fn format_elapsed(start: Instant) -> String {
    format!("{:.2}ms", start.elapsed().as_micros() as f64 / 1000.0)
}
