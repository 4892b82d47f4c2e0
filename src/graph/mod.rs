//! Arena-based DAG model for one evaluation run.
//!
//! Nodes live in a flat table and are addressed by [`NodeIx`]; adjacency is
//! kept as per-node edge lists so that switch pruning is a cheap structural
//! update with no dangling references. The cycle check runs incrementally on
//! every edge insertion, so a built graph is acyclic before traversal starts.

use crate::error::GraphBuildError;
use crate::model::{GraphDefinition, NodeDefinition};
use ahash::AHashMap;
use itertools::Itertools;

/// Stable index of a node inside a [`DecisionGraph`] arena.
pub type NodeIx = usize;

/// An outgoing edge: target node plus the optional branch selector.
#[derive(Debug, Clone)]
pub struct OutEdge {
    pub target: NodeIx,
    pub handle: Option<String>,
}

/// A validated decision graph, owned by a single evaluation run.
///
/// Immutable after construction except for [`DecisionGraph::remove_edge`],
/// which switch routing uses to prune dead branches mid-walk.
#[derive(Debug, Clone)]
pub struct DecisionGraph {
    nodes: Vec<NodeDefinition>,
    index: AHashMap<String, NodeIx>,
    outgoing: Vec<Vec<OutEdge>>,
    incoming: Vec<Vec<NodeIx>>,
}

impl DecisionGraph {
    /// Builds and validates a graph from its definition.
    ///
    /// Rejects duplicate node ids, edges referencing unknown nodes, and any
    /// edge whose insertion would create a cycle. A rejected edge leaves the
    /// graph unmutated, so the error reports the first offending entry.
    pub fn build(definition: &GraphDefinition) -> Result<Self, GraphBuildError> {
        let mut graph = Self {
            nodes: Vec::with_capacity(definition.nodes.len()),
            index: AHashMap::with_capacity(definition.nodes.len()),
            outgoing: Vec::with_capacity(definition.nodes.len()),
            incoming: Vec::with_capacity(definition.nodes.len()),
        };

        for node in &definition.nodes {
            graph.insert_node(node.clone())?;
        }

        for edge in &definition.edges {
            let source = graph.index_of(&edge.source_id).ok_or_else(|| {
                GraphBuildError::UnknownEdgeEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: edge.source_id.clone(),
                }
            })?;
            let target = graph.index_of(&edge.target_id).ok_or_else(|| {
                GraphBuildError::UnknownEdgeEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: edge.target_id.clone(),
                }
            })?;
            graph.insert_edge(source, target, edge.source_handle.clone())?;
        }

        Ok(graph)
    }

    fn insert_node(&mut self, node: NodeDefinition) -> Result<NodeIx, GraphBuildError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphBuildError::DuplicateNodeId(node.id));
        }
        let ix = self.nodes.len();
        self.index.insert(node.id.clone(), ix);
        self.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        Ok(ix)
    }

    /// Adds an edge between two existing nodes, rejecting cycles.
    pub fn add_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        handle: Option<String>,
    ) -> Result<(), GraphBuildError> {
        let source = self
            .index_of(source_id)
            .ok_or_else(|| GraphBuildError::NodeNotFound(source_id.to_string()))?;
        let target = self
            .index_of(target_id)
            .ok_or_else(|| GraphBuildError::NodeNotFound(target_id.to_string()))?;
        self.insert_edge(source, target, handle)
    }

    fn insert_edge(
        &mut self,
        source: NodeIx,
        target: NodeIx,
        handle: Option<String>,
    ) -> Result<(), GraphBuildError> {
        if source == target || self.is_reachable(target, source) {
            return Err(GraphBuildError::CycleDetected {
                source_id: self.nodes[source].id.clone(),
                target_id: self.nodes[target].id.clone(),
            });
        }
        self.outgoing[source].push(OutEdge { target, handle });
        if !self.incoming[target].contains(&source) {
            self.incoming[target].push(source);
        }
        Ok(())
    }

    /// Iterative DFS over outgoing edges: is `to` reachable from `from`?
    fn is_reachable(&self, from: NodeIx, to: NodeIx) -> bool {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        visited[from] = true;
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            for edge in &self.outgoing[current] {
                if !visited[edge.target] {
                    visited[edge.target] = true;
                    stack.push(edge.target);
                }
            }
        }
        false
    }

    /// Nodes with no incoming edges, in declaration order.
    pub fn roots(&self) -> Vec<NodeIx> {
        (0..self.nodes.len())
            .filter(|&ix| self.incoming[ix].is_empty())
            .collect()
    }

    pub fn node(&self, ix: NodeIx) -> &NodeDefinition {
        &self.nodes[ix]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    /// Parents of a node, in edge-insertion order.
    pub fn parents(&self, ix: NodeIx) -> &[NodeIx] {
        &self.incoming[ix]
    }

    /// Distinct children of a node, in edge-insertion order.
    pub fn children(&self, ix: NodeIx) -> Vec<NodeIx> {
        self.outgoing[ix]
            .iter()
            .map(|edge| edge.target)
            .unique()
            .collect()
    }

    /// Outgoing edges of a node, branch selectors included.
    pub fn out_edges(&self, ix: NodeIx) -> &[OutEdge] {
        &self.outgoing[ix]
    }

    /// Removes the first edge from `source` to `target`, regardless of handle.
    ///
    /// Used by switch pruning; nodes already visited are unaffected, only
    /// future frontier expansion is.
    pub fn remove_edge(&mut self, source: NodeIx, target: NodeIx) {
        if let Some(position) = self.outgoing[source]
            .iter()
            .position(|edge| edge.target == target)
        {
            self.outgoing[source].remove(position);
            self.unlink_parent(source, target);
        }
    }

    /// Removes the edge from `source` to `target` carrying exactly `handle`.
    /// Parallel edges with other selectors stay intact.
    pub(crate) fn remove_edge_by_handle(&mut self, source: NodeIx, target: NodeIx, handle: &str) {
        if let Some(position) = self.outgoing[source]
            .iter()
            .position(|edge| edge.target == target && edge.handle.as_deref() == Some(handle))
        {
            self.outgoing[source].remove(position);
            self.unlink_parent(source, target);
        }
    }

    fn unlink_parent(&mut self, source: NodeIx, target: NodeIx) {
        if !self.outgoing[source].iter().any(|edge| edge.target == target) {
            self.incoming[target].retain(|&parent| parent != source);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
