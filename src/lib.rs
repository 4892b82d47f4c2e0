//! # Keiro - Decision Graph Evaluation Engine
//!
//! **Keiro** evaluates a directed acyclic graph of typed computation nodes
//! against a user-supplied input context, producing a result value and a
//! per-node execution trace with timing. Nodes represent inputs, outputs,
//! conditional branches (switches), decision tables and expressions; edges
//! represent data flow, optionally tagged with a branch selector.
//!
//! ## Core Workflow
//!
//! 1.  **Define the graph**: build a [`model::GraphDefinition`] in code or
//!     decode one from the JSON editor format (`nodes` + `edges`).
//! 2.  **Supply a context**: the key-value mapping that `input`-kind nodes
//!     inject into the run.
//! 3.  **Evaluate**: [`engine::Engine::evaluate`] builds and validates the
//!     graph, walks it in dependency order while pruning branches that switch
//!     nodes route away from, and stops at the first `output` node.
//! 4.  **Inspect**: the [`model::GraphResponse`] carries the output node's
//!     flat result mapping, per-node trace entries and `"<N>.NNms"` timings.
//!
//! Expressions (`"x > 0"`, `"sum(a, b) * 2"`) are evaluated by a pluggable
//! capability; the default engine ships a small parser/evaluator with a
//! named-function registry (see [`expr`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> keiro::prelude::Result<()> {
//!     // {"content": {"nodes": [...], "edges": [...]}, "context": {...}}
//!     let body = std::fs::read_to_string("request.json")?;
//!
//!     let engine = Engine::new();
//!     let response = engine.evaluate_json(&body)?;
//!
//!     println!(
//!         "{} in {}",
//!         serde_json::to_string(&response.result)?,
//!         response.performance
//!     );
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod expr;
pub mod graph;
pub mod model;
pub mod prelude;
