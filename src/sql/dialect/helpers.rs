//! Shared helper functions for SQL dialect implementations.

use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Identifiers that can be emitted without quoting.
static PLAIN_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Keywords that would be misparsed as bare identifiers.
const RESERVED: &[&str] = &[
    "all", "and", "as", "asc", "between", "by", "case", "cross", "default", "delete", "desc",
    "distinct", "drop", "else", "end", "except", "exists", "false", "from", "full", "group",
    "having", "in", "index", "inner", "insert", "intersect", "into", "is", "join", "left",
    "like", "limit", "natural", "not", "null", "offset", "on", "or", "order", "outer", "right",
    "select", "set", "table", "then", "true", "union", "update", "using", "values", "when",
    "where", "with",
];

/// Whether `ident` can be emitted bare.
pub fn is_plain_identifier(ident: &str) -> bool {
    PLAIN_IDENT.is_match(ident) && !RESERVED.contains(&ident.to_ascii_lowercase().as_str())
}

/// Quote identifier with double quotes (ANSI style).
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Leave plain identifiers bare, double-quote everything else.
pub fn quote_double_if_needed(ident: &str) -> String {
    if is_plain_identifier(ident) {
        ident.to_string()
    } else {
        quote_double(ident)
    }
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as the TRUE/FALSE keywords.
pub fn format_bool_keyword(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}
