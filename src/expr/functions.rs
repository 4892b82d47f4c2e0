use super::value::Value;
use crate::error::ExprError;
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

/// A named callable available to expressions via `name(arg, ...)` syntax.
///
/// Implementations must validate argument count and types and report failures
/// as [`ExprError`] values; a bad argument is a recoverable evaluation error,
/// never a panic.
pub type ExpressionFunction = Arc<dyn Fn(&[Value]) -> Result<Value, ExprError> + Send + Sync>;

/// The set of named functions bound into expression evaluation.
///
/// Construct one registry at process start and share it by reference across
/// evaluation runs; runs only read it. Registering a function mutates the
/// registry and therefore requires external synchronization if it can race
/// with in-flight evaluations.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: AHashMap<String, ExpressionFunction>,
}

impl FunctionRegistry {
    /// An empty registry with no callables.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in functions (`sum`, `mul`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("sum", Arc::new(sum));
        registry.register("mul", Arc::new(mul));
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, function: ExpressionFunction) {
        self.functions.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Option<&ExpressionFunction> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Checks arity and coerces every argument to a number.
fn numeric_args(function: &str, minimum: usize, args: &[Value]) -> Result<Vec<f64>, ExprError> {
    if args.len() < minimum {
        return Err(ExprError::Arity {
            function: function.to_string(),
            expected: minimum,
            found: args.len(),
        });
    }
    args.iter()
        .map(|value| match value {
            Value::Number(n) => Ok(*n),
            other => Err(ExprError::TypeMismatch {
                operation: function.to_string(),
                expected: "Number".to_string(),
                found: other.clone(),
            }),
        })
        .collect()
}

/// Built-in `sum(a, b, ...)`: the sum of all numeric arguments.
pub fn sum(args: &[Value]) -> Result<Value, ExprError> {
    Ok(Value::Number(numeric_args("sum", 2, args)?.iter().sum()))
}

/// Built-in `mul(a, b, ...)`: the product of all numeric arguments.
pub fn mul(args: &[Value]) -> Result<Value, ExprError> {
    Ok(Value::Number(numeric_args("mul", 2, args)?.iter().product()))
}
