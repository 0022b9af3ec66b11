//! Expression AST for the pivot queries.
//!
//! Covers exactly what the generator emits: column references, integer and
//! string literals, aggregate and scalar calls, the area filter's arithmetic
//! and comparisons, and `IN` lists. Rendering is exhaustive over [`Expr`].

use super::dialect::Dialect;
use super::token::{Token, TokenStream};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column` or `table.column`
    Column {
        table: Option<String>,
        column: String,
    },

    Literal(Literal),

    /// `left op right`, parenthesized on output where precedence requires it.
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// `name(args...)`; no arguments renders `name()`.
    Function { name: String, args: Vec<Expr> },

    /// `expr IN (values...)`
    In { expr: Box<Expr>, values: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

/// Binary operators, loosest-binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    Lt,
    Gt,
    Plus,
}

impl BinaryOperator {
    /// SQLite binding strength; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq => 3,
            BinaryOperator::Lt | BinaryOperator::Gt => 4,
            BinaryOperator::Plus => 5,
        }
    }

    /// `a op (b op c)` means the same as `a op b op c`.
    fn is_associative(self) -> bool {
        matches!(
            self,
            BinaryOperator::Or | BinaryOperator::And | BinaryOperator::Plus
        )
    }

    fn token(self) -> Token {
        match self {
            BinaryOperator::Or => Token::Or,
            BinaryOperator::And => Token::And,
            BinaryOperator::Eq => Token::Eq,
            BinaryOperator::Lt => Token::Lt,
            BinaryOperator::Gt => Token::Gt,
            BinaryOperator::Plus => Token::Plus,
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

impl Expr {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { table, column } => {
                if let Some(t) = table {
                    ts.push(Token::Ident(t.clone())).push(Token::Dot);
                }
                ts.push(Token::Ident(column.clone()));
            }

            Expr::Literal(Literal::Int(n)) => {
                ts.push(Token::LitInt(*n));
            }

            Expr::Literal(Literal::String(s)) => {
                ts.push(Token::LitString(s.clone()));
            }

            Expr::BinaryOp { left, op, right } => {
                append_operand(&mut ts, left, *op, false, dialect);
                ts.space().push(op.token()).space();
                append_operand(&mut ts, right, *op, true, dialect);
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()))
                    .lparen()
                    .append_comma_separated(args.iter().map(|arg| arg.to_tokens_for_dialect(dialect)))
                    .rparen();
            }

            // `x IN ()` is rejected by most engines; an empty list matches nothing.
            Expr::In { values, .. } if values.is_empty() => {
                ts.push(Token::False);
            }

            Expr::In { expr, values } => {
                ts.append(&expr.to_tokens_for_dialect(dialect))
                    .space()
                    .push(Token::In)
                    .space()
                    .lparen()
                    .append_comma_separated(values.iter().map(|v| v.to_tokens_for_dialect(dialect)))
                    .rparen();
            }
        }

        ts
    }

    /// Render this expression as SQL text.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

/// Append one side of `parent`, wrapping it when it would otherwise bind
/// to its neighbours differently than the tree says.
fn append_operand(
    ts: &mut TokenStream,
    operand: &Expr,
    parent: BinaryOperator,
    is_right: bool,
    dialect: Dialect,
) {
    let wrap = match operand {
        Expr::BinaryOp { op, .. } => {
            op.precedence() < parent.precedence()
                || (is_right && op.precedence() == parent.precedence() && !parent.is_associative())
        }
        _ => false,
    };

    if wrap {
        ts.lparen();
    }
    ts.append(&operand.to_tokens_for_dialect(dialect));
    if wrap {
        ts.rparen();
    }
}

// =============================================================================
// Constructors
// =============================================================================

pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// `table.column`
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// A single-quoted string literal; quoting is left to the dialect.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// `COUNT()`, the trace processor's row count.
pub fn count_rows() -> Expr {
    func("COUNT", vec![])
}

pub fn sum(expr: Expr) -> Expr {
    func("SUM", vec![expr])
}

pub fn avg(expr: Expr) -> Expr {
    func("AVG", vec![expr])
}

pub fn min(expr: Expr) -> Expr {
    func("MIN", vec![expr])
}

pub fn max(expr: Expr) -> Expr {
    func("MAX", vec![expr])
}

// =============================================================================
// Fluent builders
// =============================================================================

/// Chained construction: `col("ts").add(col("dur")).gt(start)`.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Lt, other.into())
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Plus, other.into())
    }

    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
        }
    }

    /// `expr AS name` for a SELECT list.
    fn alias(self, name: &str) -> crate::sql::query::SelectExpr {
        crate::sql::query::SelectExpr::new(self.into_expr()).with_alias(name)
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}
