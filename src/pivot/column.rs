//! Queryable columns of the pivot table.
//!
//! A pivot or aggregation column is either a real column of one of the known
//! tables, or an argument extracted from a slice's arg set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::expr::{col, func, lit_str, table_col, Expr};

/// Column holding the id of a row's arg set.
pub const ARG_SET_ID_COLUMN: &str = "arg_set_id";

/// Function extracting a single argument value from an arg set.
pub const EXTRACT_ARG_FUNCTION: &str = "extract_arg";

/// Prefix of the textual form of an argument column (`arg:<key>`).
const ARGUMENT_PREFIX: &str = "arg:";

/// A column of one of the known tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegularColumn {
    pub table: String,
    pub column: String,
}

impl RegularColumn {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// `table.column`, for columns resolved against a joined table.
    pub fn qualified_expression(&self) -> Expr {
        table_col(&self.table, &self.column)
    }
}

/// An argument extracted from the arg set of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArgumentColumn {
    pub argument: String,
}

impl ArgumentColumn {
    pub fn new(argument: &str) -> Self {
        Self {
            argument: argument.into(),
        }
    }
}

/// A queried column: either a real one or an argument.
///
/// Equality is structural: regular columns match on table and column,
/// argument columns on their key, and the two kinds never match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableColumn {
    Regular(RegularColumn),
    Argument(ArgumentColumn),
}

impl TableColumn {
    pub fn regular(table: &str, column: &str) -> Self {
        TableColumn::Regular(RegularColumn::new(table, column))
    }

    pub fn argument(argument: &str) -> Self {
        TableColumn::Argument(ArgumentColumn::new(argument))
    }

    /// Expression selecting this column from the row it belongs to.
    ///
    /// Regular columns render as the bare column name; arguments as an
    /// `extract_arg` call over the unqualified arg set id.
    pub fn expression(&self) -> Expr {
        match self {
            TableColumn::Regular(regular) => col(&regular.column),
            TableColumn::Argument(argument) => extract_argument_expression(&argument.argument, None),
        }
    }

    /// Render [`expression`](Self::expression) as SQL text.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.expression().to_sql(dialect)
    }
}

/// `extract_arg(<table.>arg_set_id, '<argument>')`.
///
/// The key becomes an escaped string literal when the expression is rendered.
pub fn extract_argument_expression(argument: &str, table: Option<&str>) -> Expr {
    let arg_set_id = match table {
        Some(table) => table_col(table, ARG_SET_ID_COLUMN),
        None => col(ARG_SET_ID_COLUMN),
    };
    func(EXTRACT_ARG_FUNCTION, vec![arg_set_id, lit_str(argument)])
}

/// Escape `raw` as a single-quoted SQLite string literal.
pub fn sqlite_string(raw: &str) -> String {
    Dialect::Sqlite.quote_string(raw)
}

impl fmt::Display for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableColumn::Regular(regular) => write!(f, "{}.{}", regular.table, regular.column),
            TableColumn::Argument(argument) => write!(f, "{}{}", ARGUMENT_PREFIX, argument.argument),
        }
    }
}

/// Failure to parse the textual form of a column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnParseError {
    #[error("Empty argument key in column reference '{0}'")]
    EmptyArgument(String),

    #[error("Expected 'table.column' or 'arg:<key>', got '{0}'")]
    Malformed(String),
}

impl FromStr for TableColumn {
    type Err = ColumnParseError;

    /// Parses `table.column` or `arg:<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(argument) = s.strip_prefix(ARGUMENT_PREFIX) {
            if argument.is_empty() {
                return Err(ColumnParseError::EmptyArgument(s.to_string()));
            }
            return Ok(TableColumn::argument(argument));
        }
        match s.split_once('.') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                Ok(TableColumn::regular(table, column))
            }
            _ => Err(ColumnParseError::Malformed(s.to_string())),
        }
    }
}

impl From<RegularColumn> for TableColumn {
    fn from(column: RegularColumn) -> Self {
        TableColumn::Regular(column)
    }
}

impl From<ArgumentColumn> for TableColumn {
    fn from(column: ArgumentColumn) -> Self {
        TableColumn::Argument(column)
    }
}
