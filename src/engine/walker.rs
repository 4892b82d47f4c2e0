use super::SchedulingPolicy;
use super::flatten::merge_and_flatten;
use super::handlers;
use crate::expr::ExpressionEngine;
use crate::graph::{DecisionGraph, NodeIx};
use crate::model::{Context, NodeDefinition, NodeKind, SwitchStatement};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::VecDeque;

/// Statement evaluation results collected while routing a switch node.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingTrace {
    pub statements: AHashMap<String, SwitchStatement>,
}

/// One step of the traversal.
#[derive(Debug)]
pub enum Step {
    /// A node is ready to be handled.
    Visit {
        ix: NodeIx,
        routing: Option<RoutingTrace>,
    },
    /// A switch node matched no statements; the whole run stops here, even if
    /// independent branches remain unvisited.
    Halted,
    /// The frontier ran dry without reaching an output node.
    Exhausted,
}

/// The traversal state of one evaluation run: a FIFO frontier over the graph
/// plus the per-node output store.
///
/// The walker owns its [`DecisionGraph`] because switch routing prunes edges
/// mid-walk; neither is ever shared across runs.
pub struct GraphWalker {
    graph: DecisionGraph,
    frontier: VecDeque<NodeIx>,
    outputs: AHashMap<NodeIx, Context>,
    visited: Vec<bool>,
    queued: Vec<bool>,
    policy: SchedulingPolicy,
}

impl GraphWalker {
    /// Creates a walker seeded with the graph's root nodes.
    pub fn new(graph: DecisionGraph, policy: SchedulingPolicy) -> Self {
        let mut frontier = VecDeque::new();
        let mut queued = vec![false; graph.len()];
        for root in graph.roots() {
            frontier.push_back(root);
            queued[root] = true;
        }
        Self {
            visited: vec![false; graph.len()],
            outputs: AHashMap::new(),
            graph,
            frontier,
            queued,
            policy,
        }
    }

    pub fn graph(&self) -> &DecisionGraph {
        &self.graph
    }

    pub fn node(&self, ix: NodeIx) -> &NodeDefinition {
        self.graph.node(ix)
    }

    /// Merged, flattened outputs of every parent that has produced data so
    /// far. Parents not yet visited contribute nothing.
    pub fn merged_inputs(&self, ix: NodeIx) -> Context {
        let parents = self.graph.parents(ix);
        merge_and_flatten(parents.iter().filter_map(|parent| self.outputs.get(parent)))
    }

    /// Stores a node's output for its children to merge.
    pub fn record_output(&mut self, ix: NodeIx, output: Context) {
        self.outputs.insert(ix, output);
    }

    /// Advances the traversal by one node.
    ///
    /// Switch routing happens here: statements are evaluated against the
    /// node's merged inputs, dead outgoing edges are pruned before children
    /// are discovered, and zero matching statements halts the entire run.
    pub fn next(&mut self, expression: &dyn ExpressionEngine) -> Step {
        let Some(ix) = self.frontier.pop_front() else {
            return Step::Exhausted;
        };
        self.visited[ix] = true;

        let mut routing = None;
        if self.node(ix).kind == NodeKind::Switch {
            let content = self.node(ix).content.clone();
            let inputs = self.merged_inputs(ix);
            let statements = handlers::valid_statements(&content, &inputs, expression);
            if statements.is_empty() {
                return Step::Halted;
            }
            // Routing decisions are fixed now and only affect children
            // discovered afterwards.
            let dead: Vec<(NodeIx, String)> = self
                .graph
                .out_edges(ix)
                .iter()
                .filter_map(|edge| match &edge.handle {
                    Some(handle) if !handle.is_empty() && !statements.contains_key(handle) => {
                        Some((edge.target, handle.clone()))
                    }
                    _ => None,
                })
                .collect();
            for (target, handle) in &dead {
                self.graph.remove_edge_by_handle(ix, *target, handle);
            }
            // Pruning an edge can leave its target with every remaining
            // parent already visited; no later visit will discover such a
            // target, so it must be re-checked here.
            if self.policy == SchedulingPolicy::WaitForParents {
                for (target, _) in dead {
                    if !self.graph.parents(target).is_empty() {
                        self.enqueue_if_ready(target);
                    }
                }
            }
            routing = Some(RoutingTrace { statements });
        }

        for child in self.graph.children(ix) {
            match self.policy {
                // A child is pushed as soon as any visited parent discovers
                // it; a multi-parent node may be visited more than once, each
                // visit merging whatever parent data exists at that point.
                SchedulingPolicy::Eager => self.frontier.push_back(child),
                SchedulingPolicy::WaitForParents => self.enqueue_if_ready(child),
            }
        }

        Step::Visit { ix, routing }
    }

    /// Queues a node at most once, and only after every one of its current
    /// parents has been visited.
    fn enqueue_if_ready(&mut self, ix: NodeIx) {
        if !self.queued[ix]
            && !self.visited[ix]
            && self
                .graph
                .parents(ix)
                .iter()
                .all(|&parent| self.visited[parent])
        {
            self.frontier.push_back(ix);
            self.queued[ix] = true;
        }
    }
}
