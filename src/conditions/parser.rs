// ABOUTME: Recursive-descent parser turning condition tokens into an expression tree
// ABOUTME: Enforces the closed grammar and built-in function allowlist at compile time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;

use pierre_form_core::errors::ExpressionError;

use super::lexer::{Token, TokenKind};

/// Unary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` (sign follows the divisor)
    Rem,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// Built-in functions available to conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Absolute value of one number
    Abs,
    /// Smallest of two or more numbers
    Min,
    /// Largest of two or more numbers
    Max,
}

impl Builtin {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "abs" => Some(Self::Abs),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    /// Name as written in expressions
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Abs => count == 1,
            Self::Min | Self::Max => count >= 2,
        }
    }
}

/// Parsed condition expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// Boolean literal
    Bool(bool),
    /// Context variable reference
    Variable(String),
    /// Unary arithmetic
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Binary arithmetic
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// Comparison chain `a < b <= c`, true only if every link holds
    Compare {
        /// Leftmost operand
        first: Box<Expr>,
        /// Subsequent operator/operand pairs
        rest: Vec<(CompareOp, Expr)>,
    },
    /// Logical negation
    Not(Box<Expr>),
    /// Short-circuit conjunction
    And(Box<Expr>, Box<Expr>),
    /// Short-circuit disjunction
    Or(Box<Expr>, Box<Expr>),
    /// Built-in function call
    Call {
        /// Function
        function: Builtin,
        /// Arguments
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Collect every variable name referenced by the expression
    pub fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Number(_) | Self::Bool(_) => {}
            Self::Variable(name) => {
                names.insert(name.clone());
            }
            Self::Unary { operand, .. } | Self::Not(operand) => operand.collect_variables(names),
            Self::Binary { lhs, rhs, .. } | Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_variables(names);
                rhs.collect_variables(names);
            }
            Self::Compare { first, rest } => {
                first.collect_variables(names);
                for (_, operand) in rest {
                    operand.collect_variables(names);
                }
            }
            Self::Call { args, .. } => {
                for arg in args {
                    arg.collect_variables(names);
                }
            }
        }
    }
}

/// Parse a token stream into an expression tree
///
/// # Errors
///
/// Returns `Syntax` for grammar violations, `UnknownFunction` for calls
/// outside the allowlist, and `Arity` for wrong argument counts.
pub fn parse(tokens: &[Token], source_len: usize) -> Result<Expr, ExpressionError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_len,
    };
    let expr = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(ExpressionError::Syntax {
            position: token.position,
            message: format!("unexpected trailing token {:?}", token.kind),
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    source_len: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_position(&self) -> usize {
        self.peek().map_or(self.source_len, |token| token.position)
    }

    fn error(&self, message: impl Into<String>) -> ExpressionError {
        ExpressionError::Syntax {
            position: self.current_position(),
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ExpressionError> {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_and()?;
        while self.peek_kind() == Some(&TokenKind::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_not()?;
        while self.peek_kind() == Some(&TokenKind::And) {
            self.pos += 1;
            let rhs = self.parse_not()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, ExpressionError> {
        if self.peek_kind() == Some(&TokenKind::Not) {
            self.pos += 1;
            let operand = self.parse_not()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExpressionError> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();

        while let Some(op) = self.peek_kind().and_then(compare_op) {
            self.pos += 1;
            rest.push((op, self.parse_additive()?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek_kind() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        let Some(token) = self.advance().cloned() else {
            return Err(self.error("unexpected end of expression"));
        };

        match token.kind {
            TokenKind::Number(value) => Ok(Expr::Number(value)),
            TokenKind::True => Ok(Expr::Bool(true)),
            TokenKind::False => Ok(Expr::Bool(false)),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if self.peek_kind() == Some(&TokenKind::LParen) {
                    self.pos += 1;
                    self.parse_call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            other => Err(ExpressionError::Syntax {
                position: token.position,
                message: format!("unexpected token {other:?}"),
            }),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, ExpressionError> {
        let function =
            Builtin::parse(&name).ok_or(ExpressionError::UnknownFunction { name: name.clone() })?;

        let mut args = Vec::new();
        if self.peek_kind() != Some(&TokenKind::RParen) {
            loop {
                args.push(self.parse_or()?);
                if self.peek_kind() == Some(&TokenKind::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')' after arguments")?;

        if !function.accepts(args.len()) {
            return Err(ExpressionError::Arity {
                name,
                given: args.len(),
            });
        }
        Ok(Expr::Call { function, args })
    }
}

const fn compare_op(kind: &TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Lt => Some(CompareOp::Lt),
        TokenKind::Le => Some(CompareOp::Le),
        TokenKind::Gt => Some(CompareOp::Gt),
        TokenKind::Ge => Some(CompareOp::Ge),
        TokenKind::EqEq => Some(CompareOp::Eq),
        TokenKind::NotEq => Some(CompareOp::Ne),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse_str(source: &str) -> Result<Expr, ExpressionError> {
        parse(&tokenize(source)?, source.len())
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse_str("a or b and c").unwrap();
        assert!(matches!(expr, Expr::Or(_, ref rhs) if matches!(**rhs, Expr::And(_, _))));
    }

    #[test]
    fn test_chained_comparison_is_single_node() {
        let expr = parse_str("100 <= angle <= 160").unwrap();
        match expr {
            Expr::Compare { rest, .. } => assert_eq!(rest.len(), 2),
            other => panic!("expected comparison chain, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_functions_outside_allowlist() {
        assert_eq!(
            parse_str("round(angle) > 3"),
            Err(ExpressionError::UnknownFunction {
                name: "round".to_owned()
            })
        );
    }

    #[test]
    fn test_checks_builtin_arity() {
        assert!(matches!(
            parse_str("max(angle) > 3"),
            Err(ExpressionError::Arity { given: 1, .. })
        ));
        assert!(parse_str("max(a, b, c) > 3").is_ok());
    }

    #[test]
    fn test_reports_unbalanced_parentheses() {
        assert!(matches!(
            parse_str("(angle > 3"),
            Err(ExpressionError::Syntax { .. })
        ));
        assert!(matches!(
            parse_str("angle > 3)"),
            Err(ExpressionError::Syntax { .. })
        ));
    }

    #[test]
    fn test_collects_variables() {
        let expr = parse_str("abs(left_knee_x - left_ankle_x) > 30 and angle < 90").unwrap();
        let mut names = BTreeSet::new();
        expr.collect_variables(&mut names);
        let names: Vec<_> = names.into_iter().collect();
        assert_eq!(names, vec!["angle", "left_ankle_x", "left_knee_x"]);
    }
}
