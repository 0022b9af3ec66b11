//! SQL generation module.
//!
//! A small type-safe SQL builder used to render the pivot queries:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementation

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, col, count_rows, func, lit_int, lit_str, max, min, sum, table_col, BinaryOperator, Expr,
    ExprExt, Literal,
};
pub use query::{
    FromItem, Join, JoinConstraint, OrderByExpr, Query, SelectExpr, SortDir, TableRef,
};
pub use token::{Layout, Token, TokenStream};
