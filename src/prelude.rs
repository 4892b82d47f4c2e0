//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the keiro crate. Import this
//! module to get access to the core functionality without having to import
//! each type individually.

// Core evaluation
pub use crate::engine::{Engine, GraphWalker, SchedulingPolicy, Step, flatten, merge_and_flatten};

// Graph model
pub use crate::graph::{DecisionGraph, NodeIx, OutEdge};

// Wire-level data model
pub use crate::model::{
    Context, DecisionTableContent, EdgeDefinition, EvaluationRequest, ExpressionContent,
    ExpressionEntry, GraphDefinition, GraphResponse, NodeDefinition, NodeKind, NodeTrace,
    SwitchContent, SwitchStatement, TableColumn,
};

// Expression capability
pub use crate::expr::{ExpressionEngine, ExpressionFunction, FunctionRegistry, RegistryEngine, Value};

// Error types
pub use crate::error::{EvalError, ExprError, GraphBuildError, HaltReason};

// Hash map type used throughout the crate
pub use ahash::AHashMap;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
