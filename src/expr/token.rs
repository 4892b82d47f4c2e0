use crate::error::ExprError;
use std::fmt;

/// Lexical tokens of the expression language.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Bool(bool),
    Null,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Null => write!(f, "null"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Bang => write!(f, "!"),
            Token::Eq => write!(f, "=="),
            Token::Neq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its byte position in the source, for error reporting.
#[derive(Debug, Clone)]
pub(super) struct Spanned {
    pub position: usize,
    pub token: Token,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

// Dots are part of identifiers: flattened context keys like `customer.age`
// resolve as whole keys, not as field access.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

pub(super) fn tokenize(source: &str) -> Result<Vec<Spanned>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() {
            let mut literal = String::new();
            let mut seen_dot = false;
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() || (d == '.' && !seen_dot) {
                    seen_dot |= d == '.';
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let number = literal
                .parse::<f64>()
                .map_err(|_| ExprError::UnexpectedToken {
                    position,
                    found: literal.clone(),
                })?;
            tokens.push(Spanned {
                position,
                token: Token::Number(number),
            });
            continue;
        }

        if c == '"' || c == '\'' {
            chars.next();
            let mut literal = String::new();
            let mut closed = false;
            for (_, d) in chars.by_ref() {
                if d == c {
                    closed = true;
                    break;
                }
                literal.push(d);
            }
            if !closed {
                return Err(ExprError::UnexpectedEnd);
            }
            tokens.push(Spanned {
                position,
                token: Token::Str(literal),
            });
            continue;
        }

        if is_ident_start(c) {
            let mut name = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if is_ident_continue(d) {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let token = match name.as_str() {
                "true" => Token::Bool(true),
                "false" => Token::Bool(false),
                "null" => Token::Null,
                _ => Token::Ident(name),
            };
            tokens.push(Spanned { position, token });
            continue;
        }

        chars.next();
        let followed_by = |chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, next: char| {
            if matches!(chars.peek(), Some(&(_, d)) if d == next) {
                chars.next();
                true
            } else {
                false
            }
        };
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '!' if followed_by(&mut chars, '=') => Token::Neq,
            '!' => Token::Bang,
            '=' if followed_by(&mut chars, '=') => Token::Eq,
            '<' if followed_by(&mut chars, '=') => Token::Le,
            '<' => Token::Lt,
            '>' if followed_by(&mut chars, '=') => Token::Ge,
            '>' => Token::Gt,
            '&' if followed_by(&mut chars, '&') => Token::And,
            '|' if followed_by(&mut chars, '|') => Token::Or,
            _ => return Err(ExprError::UnexpectedChar { position, found: c }),
        };
        tokens.push(Spanned { position, token });
    }

    Ok(tokens)
}
