use super::functions::FunctionRegistry;
use super::parser::{BinaryOp, Expr, UnaryOp};
use super::value::Value;
use crate::error::ExprError;
use crate::model::Context;

/// Tree-walking evaluation of a parsed expression against a flat context.
pub(super) fn evaluate(
    expr: &Expr,
    context: &Context,
    functions: &FunctionRegistry,
) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => context
            .get(name)
            .map(Value::from_json)
            .ok_or_else(|| ExprError::UnknownIdentifier(name.clone())),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, context, functions)?;
            match (op, value) {
                (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                (UnaryOp::Negate, other) => Err(type_mismatch("-", "Number", other)),
                (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnaryOp::Not, other) => Err(type_mismatch("!", "Bool", other)),
            }
        }
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, context, functions),
        Expr::Call { name, args } => {
            let function = functions
                .get(name)
                .ok_or_else(|| ExprError::UnknownFunction(name.clone()))?;
            let arguments = args
                .iter()
                .map(|arg| evaluate(arg, context, functions))
                .collect::<Result<Vec<_>, _>>()?;
            function(&arguments)
        }
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    context: &Context,
    functions: &FunctionRegistry,
) -> Result<Value, ExprError> {
    // Logical operators short-circuit; the right side of a decided `&&`/`||`
    // is never evaluated, so a missing identifier there cannot fail the run.
    if op == BinaryOp::And || op == BinaryOp::Or {
        let symbol = if op == BinaryOp::And { "&&" } else { "||" };
        let lhs = match evaluate(left, context, functions)? {
            Value::Bool(b) => b,
            other => return Err(type_mismatch(symbol, "Bool", other)),
        };
        if (op == BinaryOp::And && !lhs) || (op == BinaryOp::Or && lhs) {
            return Ok(Value::Bool(lhs));
        }
        return match evaluate(right, context, functions)? {
            Value::Bool(b) => Ok(Value::Bool(b)),
            other => Err(type_mismatch(symbol, "Bool", other)),
        };
    }

    let lhs = evaluate(left, context, functions)?;
    let rhs = evaluate(right, context, functions)?;
    match op {
        BinaryOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            (other, _) => Err(type_mismatch("+", "Number", other)),
        },
        BinaryOp::Subtract => numeric(lhs, rhs, "-", |a, b| a - b),
        BinaryOp::Multiply => numeric(lhs, rhs, "*", |a, b| a * b),
        BinaryOp::Divide => numeric(lhs, rhs, "/", |a, b| a / b),
        BinaryOp::Modulo => numeric(lhs, rhs, "%", |a, b| a % b),
        BinaryOp::Equal => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEqual => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::GreaterThan => comparison(lhs, rhs, ">", |ord| ord == std::cmp::Ordering::Greater),
        BinaryOp::GreaterThanOrEqual => {
            comparison(lhs, rhs, ">=", |ord| ord != std::cmp::Ordering::Less)
        }
        BinaryOp::SmallerThan => comparison(lhs, rhs, "<", |ord| ord == std::cmp::Ordering::Less),
        BinaryOp::SmallerThanOrEqual => {
            comparison(lhs, rhs, "<=", |ord| ord != std::cmp::Ordering::Greater)
        }
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn numeric(
    lhs: Value,
    rhs: Value,
    symbol: &str,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, ExprError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(a, b))),
        (other, _) => Err(type_mismatch(symbol, "Number", other)),
    }
}

fn comparison(
    lhs: Value,
    rhs: Value,
    symbol: &str,
    f: impl Fn(std::cmp::Ordering) -> bool,
) -> Result<Value, ExprError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(
            a.partial_cmp(&b).map(&f).unwrap_or(false),
        )),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Bool(f(a.cmp(&b)))),
        // The left operand fixes the expectation; a comparable left side
        // reports the mismatched right side instead.
        (Value::Number(_), other) => Err(type_mismatch(symbol, "Number", other)),
        (Value::Str(_), other) => Err(type_mismatch(symbol, "String", other)),
        (other, _) => Err(type_mismatch(symbol, "Number or String", other)),
    }
}

fn type_mismatch(operation: &str, expected: &str, found: Value) -> ExprError {
    ExprError::TypeMismatch {
        operation: operation.to_string(),
        expected: expected.to_string(),
        found,
    }
}
