//! SQL dialect definitions and formatting rules.
//!
//! Generated pivot queries target a single engine: the SQLite-based trace
//! processor. The `SqlDialect` trait keeps the formatting rules in one place
//! so the builders never hard-code quoting or literal syntax.
//!
//! # Usage
//!
//! ```ignore
//! use pivot_query::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Sqlite;
//! assert_eq!(dialect.quote_identifier("name"), "name");
//! assert_eq!(dialect.quote_identifier("group"), "\"group\"");
//! ```

pub mod helpers;
mod sqlite;

pub use sqlite::Sqlite;

/// SQL dialect trait - defines how SQL constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// Single quotes with `''` for escaping; the result is always safe to
    /// embed in generated query text.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a function name.
    ///
    /// Default: rendered verbatim.
    fn format_function_name(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_function_name(&self, name: &str) -> String {
        self.dialect().format_function_name(name)
    }
}
