//! SQLite dialect, as spoken by the trace processor.
//!
//! - Plain identifiers render bare; anything else is double-quoted
//! - `TRUE`/`FALSE` keywords (SQLite 3.23+)
//! - Function names are case-insensitive and kept verbatim

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double_if_needed(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_keyword(b)
    }
}
