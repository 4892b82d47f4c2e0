use super::token::{Spanned, Token, tokenize};
use super::value::Value;
use crate::error::ExprError;

/// The parsed form of a textual expression.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Literal(Value),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    SmallerThan,
    SmallerThanOrEqual,
    And,
    Or,
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Equal | BinaryOp::NotEqual => 3,
        BinaryOp::GreaterThan
        | BinaryOp::GreaterThanOrEqual
        | BinaryOp::SmallerThan
        | BinaryOp::SmallerThanOrEqual => 4,
        BinaryOp::Add | BinaryOp::Subtract => 5,
        BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 6,
    }
}

fn binary_op(token: &Token) -> Option<BinaryOp> {
    match token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Subtract),
        Token::Star => Some(BinaryOp::Multiply),
        Token::Slash => Some(BinaryOp::Divide),
        Token::Percent => Some(BinaryOp::Modulo),
        Token::Eq => Some(BinaryOp::Equal),
        Token::Neq => Some(BinaryOp::NotEqual),
        Token::Gt => Some(BinaryOp::GreaterThan),
        Token::Ge => Some(BinaryOp::GreaterThanOrEqual),
        Token::Lt => Some(BinaryOp::SmallerThan),
        Token::Le => Some(BinaryOp::SmallerThanOrEqual),
        Token::And => Some(BinaryOp::And),
        Token::Or => Some(BinaryOp::Or),
        _ => None,
    }
}

/// Parses an expression source string into an [`Expr`] tree.
pub(super) fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, cursor: 0 };
    let expr = parser.parse_binary(0)?;
    if let Some(spanned) = parser.peek_spanned() {
        return Err(ExprError::UnexpectedToken {
            position: spanned.position,
            found: spanned.token.to_string(),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
}

impl Parser {
    fn peek_spanned(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn peek(&self) -> Option<&Token> {
        self.peek_spanned().map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Result<Spanned, ExprError> {
        let spanned = self
            .tokens
            .get(self.cursor)
            .cloned()
            .ok_or(ExprError::UnexpectedEnd)?;
        self.cursor += 1;
        Ok(spanned)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        let spanned = self.advance()?;
        if &spanned.token == expected {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                position: spanned.position,
                found: spanned.token.to_string(),
            })
        }
    }

    /// Precedence climbing; left-associative at every level.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek().and_then(binary_op) {
            let level = precedence(op);
            if level < min_precedence {
                break;
            }
            self.cursor += 1;
            let right = self.parse_binary(level + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.cursor += 1;
                Ok(Expr::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(self.parse_unary()?),
                })
            }
            Some(Token::Bang) => {
                self.cursor += 1;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(self.parse_unary()?),
                })
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let spanned = self.advance()?;
        match spanned.token {
            Token::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Bool(b) => Ok(Expr::Literal(Value::Bool(b))),
            Token::Null => Ok(Expr::Literal(Value::Null)),
            Token::LParen => {
                let inner = self.parse_binary(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.cursor += 1;
                    self.parse_call(name)
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            other => Err(ExprError::UnexpectedToken {
                position: spanned.position,
                found: other.to_string(),
            }),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ExprError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.cursor += 1;
            return Ok(Expr::Call { name, args });
        }
        loop {
            args.push(self.parse_binary(0)?);
            let spanned = self.advance()?;
            match spanned.token {
                Token::Comma => continue,
                Token::RParen => break,
                other => {
                    return Err(ExprError::UnexpectedToken {
                        position: spanned.position,
                        found: other.to_string(),
                    });
                }
            }
        }
        Ok(Expr::Call { name, args })
    }
}
