//! The expression capability: textual boolean/value expressions evaluated
//! against a flat context.
//!
//! The engine only depends on the [`ExpressionEngine`] contract; the default
//! [`RegistryEngine`] implementation is a small lexer + precedence-climbing
//! parser + tree-walking evaluator with a named-function registry. Supported
//! syntax: number/string/bool/null literals, identifiers (dotted flat keys
//! such as `customer.age` resolve as whole keys), unary `-`/`!`, `+ - * / %`,
//! comparisons, `==`/`!=`, short-circuiting `&&`/`||`, parentheses, and
//! function calls `name(arg, ...)`.

mod eval;
pub mod functions;
mod parser;
mod token;
mod value;

pub use functions::{ExpressionFunction, FunctionRegistry};
pub use value::Value;

use crate::error::ExprError;
use crate::model::Context;

/// Contract for evaluating a textual expression against a flat context.
///
/// Injected into the graph engine so that the evaluator itself stays a
/// replaceable collaborator.
pub trait ExpressionEngine: Send + Sync {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, ExprError>;
}

/// The default expression engine, binding a [`FunctionRegistry`] into every
/// evaluation.
#[derive(Debug, Clone, Default)]
pub struct RegistryEngine {
    functions: FunctionRegistry,
}

impl RegistryEngine {
    pub fn new(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    /// An engine carrying the built-in functions.
    pub fn with_builtins() -> Self {
        Self::new(FunctionRegistry::with_builtins())
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }
}

impl ExpressionEngine for RegistryEngine {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<Value, ExprError> {
        let expr = parser::parse(expression)?;
        eval::evaluate(&expr, context, &self.functions)
    }
}
