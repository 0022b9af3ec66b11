//! Query builder - construct SQL queries with a fluent API.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Layout, Token, TokenStream};

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A named table of the trace processor schema.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.table.clone()));
        ts
    }
}

/// The FROM source: a named table or a derived table.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Table(TableRef),
    /// `(SELECT ...) AS alias`
    Subquery { query: Box<Query>, alias: String },
}

impl FromItem {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        match self {
            FromItem::Table(table) => table.to_tokens(),
            FromItem::Subquery { query, alias } => {
                let mut ts = TokenStream::new();
                ts.lparen()
                    .newline()
                    .indent(1)
                    .append_indented(&query.to_tokens_for_dialect(dialect), 1)
                    .newline()
                    .rparen()
                    .space()
                    .push(Token::As)
                    .space()
                    .push(Token::Ident(alias.clone()));
                ts
            }
        }
    }
}

impl From<TableRef> for FromItem {
    fn from(table: TableRef) -> Self {
        FromItem::Table(table)
    }
}

// =============================================================================
// Joins
// =============================================================================

/// How the joined table is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConstraint {
    /// `ON <expr>`
    On(Expr),
    /// `USING (col, ...)`
    Using(Vec<String>),
}

/// A `LEFT JOIN` clause. Dimension tables are optional for a slice, so
/// every join keeps the unmatched rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub constraint: JoinConstraint,
}

impl Join {
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Left)
            .space()
            .push(Token::Join)
            .space()
            .append(&self.table.to_tokens());

        match &self.constraint {
            JoinConstraint::On(on) => {
                ts.space().push(Token::On).space();
                ts.append(&on.to_tokens_for_dialect(dialect));
            }
            JoinConstraint::Using(columns) => {
                let idents = columns.iter().map(|column| {
                    let mut ident = TokenStream::new();
                    ident.push(Token::Ident(column.clone()));
                    ident
                });
                ts.space()
                    .push(Token::Using)
                    .space()
                    .lparen()
                    .append_comma_separated(idents)
                    .rparen();
            }
        }

        ts
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY item; the direction is always spelled out.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: SortDir::Desc,
        }
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = self.expr.to_tokens_for_dialect(dialect);
        ts.space().push(match self.dir {
            SortDir::Asc => Token::Asc,
            SortDir::Desc => Token::Desc,
        });
        ts
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<FromItem>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Select from a derived table: `FROM (<query>) AS alias`.
    pub fn from_subquery(mut self, query: Query, alias: &str) -> Self {
        self.from = Some(FromItem::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    fn join(mut self, table: TableRef, constraint: JoinConstraint) -> Self {
        self.joins.push(Join { table, constraint });
        self
    }

    /// Add a LEFT JOIN ... ON.
    pub fn left_join(self, table: TableRef, on: Expr) -> Self {
        self.join(table, JoinConstraint::On(on))
    }

    /// Add a LEFT JOIN ... USING (columns).
    pub fn left_join_using(self, table: TableRef, columns: &[&str]) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.join(table, JoinConstraint::Using(columns))
    }

    /// Add a WHERE condition, ANDed with the existing ones. Each condition
    /// keeps its own grouping: an earlier `a OR b` renders as `(a OR b) AND c`.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Render the query, one clause per line and one SELECT item per line.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline()
                .indent(1)
                .append(&item.to_tokens_for_dialect(dialect));
        }

        if let Some(from) = &self.from {
            ts.newline()
                .push(Token::From)
                .space()
                .append(&from.to_tokens_for_dialect(dialect));
        }

        for join in &self.joins {
            ts.newline().append(&join.to_tokens_for_dialect(dialect));
        }

        if let Some(condition) = &self.where_clause {
            ts.newline()
                .push(Token::Where)
                .space()
                .append(&condition.to_tokens_for_dialect(dialect));
        }

        if !self.group_by.is_empty() {
            ts.newline()
                .push(Token::GroupBy)
                .space()
                .append_comma_separated(
                    self.group_by
                        .iter()
                        .map(|key| key.to_tokens_for_dialect(dialect)),
                );
        }

        if !self.order_by.is_empty() {
            ts.newline()
                .push(Token::OrderBy)
                .space()
                .append_comma_separated(
                    self.order_by
                        .iter()
                        .map(|item| item.to_tokens_for_dialect(dialect)),
                );
        }

        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }

    /// Generate SQL string with an explicit whitespace layout.
    pub fn to_sql_with(&self, dialect: Dialect, layout: Layout) -> String {
        self.to_tokens_for_dialect(dialect)
            .serialize_with(dialect, layout)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query using the default dialect.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(Dialect::default()))
    }
}

// =============================================================================
// Tests
// =============================================================================
