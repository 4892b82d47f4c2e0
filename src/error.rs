use crate::expr::Value;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while building a decision graph from its definition.
#[derive(Error, Debug, Clone)]
pub enum GraphBuildError {
    #[error("Duplicate node id '{0}' in the graph definition")]
    DuplicateNodeId(String),

    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    UnknownEdgeEndpoint { edge_id: String, node_id: String },

    #[error("Node '{0}' not found in the graph")]
    NodeNotFound(String),

    #[error("Adding an edge from '{source_id}' to '{target_id}' would create a cycle")]
    CycleDetected {
        source_id: String,
        target_id: String,
    },
}

/// Why a run stopped without producing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The frontier was exhausted before any output node was visited.
    NoOutputReached,
    /// A switch node matched none of its statements and stopped the run.
    SwitchHalted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::NoOutputReached => {
                write!(f, "no output node was reached before the frontier ran dry")
            }
            HaltReason::SwitchHalted => {
                write!(f, "a switch node matched no statements")
            }
        }
    }
}

/// Errors that can occur during a graph evaluation run.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    #[error(transparent)]
    Build(#[from] GraphBuildError),

    #[error("Failed to parse evaluation request JSON: {0}")]
    BadRequest(String),

    #[error("Graph did not halt: {reason}")]
    DidNotHalt { reason: HaltReason },
}

/// Errors produced while parsing or evaluating a textual expression.
#[derive(Error, Debug, Clone)]
pub enum ExprError {
    #[error("Unexpected character '{found}' at position {position} in expression")]
    UnexpectedChar { position: usize, found: char },

    #[error("Unexpected token '{found}' at position {position} in expression")]
    UnexpectedToken { position: usize, found: String },

    #[error("Expression ended unexpectedly")]
    UnexpectedEnd,

    #[error("Identifier '{0}' not found in the evaluation context")]
    UnknownIdentifier(String),

    #[error("Function '{0}' is not registered")]
    UnknownFunction(String),

    #[error("Function '{function}' expects at least {expected} arguments, but received {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },
}
