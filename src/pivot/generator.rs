//! Pivot table query generation.
//!
//! A pivot table is computed by two nested aggregations:
//!
//! ```text
//! SELECT <joined pivots>, preaggregated.<slice pivots>, <rollups>
//! FROM (
//!   SELECT <slice pivots>, [track_id,] <aggregations>
//!   FROM slice
//!   [WHERE <area filter>]
//!   GROUP BY <slice pivots>[, track_id]
//! ) AS preaggregated
//! [LEFT JOIN thread_track / thread / process]
//! GROUP BY <joined pivots>, preaggregated.<slice pivots>
//! [ORDER BY agg_<i> <dir>]
//! ```
//!
//! The inner query aggregates the slices of each group (and each track when
//! joined pivots need it); the outer query resolves the joined pivots and rolls
//! the partial aggregates up to the requested grouping.

use serde::{Deserialize, Serialize};

use crate::config::GeneratorSettings;
use crate::sql::dialect::Dialect;
use crate::sql::expr::{col, table_col, Expr, ExprExt};
use crate::sql::query::{OrderByExpr, Query, SelectExpr, TableRef};

use super::aggregation::{aggregation_alias, Aggregation};
use super::area::{area_filter, AreaResolver, ResolvedArea};
use super::column::TableColumn;
use super::error::{GeneratorResult, QueryGeneratorError};
use super::schema::{SLICE_TABLE_NAME, TRACK_ID_COLUMN};
use super::state::{PivotTableState, SortCriteria, SortDirection};

/// Describes the columns of a pivot query's result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTableQueryMetadata {
    /// Joined pivots followed by slice pivots, the order of the leading
    /// result columns.
    pub pivot_columns: Vec<TableColumn>,
    /// Aggregations in selection order, following the pivot columns.
    pub aggregation_columns: Vec<Aggregation>,
}

impl PivotTableQueryMetadata {
    /// Result-set column index of the `aggregation_no`-th aggregation.
    pub fn aggregation_index(&self, aggregation_no: usize) -> usize {
        aggregation_index(self.pivot_columns.len(), aggregation_no)
    }

    pub fn column_count(&self) -> usize {
        self.pivot_columns.len() + self.aggregation_columns.len()
    }
}

/// Result-set column index of an aggregation given the number of pivot columns.
pub fn aggregation_index(pivot_columns: usize, aggregation_no: usize) -> usize {
    pivot_columns + aggregation_no
}

/// A generated query together with its result-column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTableQuery {
    pub text: String,
    pub metadata: PivotTableQueryMetadata,
}

/// First-stage query over the slice table.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerQuery {
    pub query: Query,
    /// Names the slice pivots are selected under, without the track id.
    pub group_by_columns: Vec<String>,
}

/// Alias of the `index`-th argument pivot in the inner query.
pub fn pivot_argument_alias(index: usize) -> String {
    format!("pivot_argument_{}", index)
}

/// Build the first-stage aggregation over the slice table.
///
/// Regular pivots are selected and grouped by name. Argument pivots are
/// selected under a `pivot_argument_<k>` alias and grouped by that alias, so
/// the grouping key is exactly the selected column. With `include_track` the
/// track id is selected and grouped on as well, for the outer query to join on.
pub fn generate_inner_query(
    pivots: &[TableColumn],
    aggregations: &[Aggregation],
    include_track: bool,
    area: &ResolvedArea,
    constrain_to_area: bool,
) -> InnerQuery {
    let mut select: Vec<SelectExpr> = Vec::with_capacity(pivots.len() + aggregations.len() + 1);
    let mut group_by_columns = Vec::with_capacity(pivots.len());

    let mut argument_count = 0;
    for column in pivots {
        match column {
            TableColumn::Regular(regular) => {
                select.push(col(&regular.column).into());
                group_by_columns.push(regular.column.clone());
            }
            TableColumn::Argument(_) => {
                let alias = pivot_argument_alias(argument_count);
                argument_count += 1;
                select.push(column.expression().alias(&alias));
                group_by_columns.push(alias);
            }
        }
    }
    if include_track {
        select.push(col(TRACK_ID_COLUMN).into());
    }

    for (i, aggregation) in aggregations.iter().enumerate() {
        select.push(aggregation.expression().alias(&aggregation_alias(i)));
    }

    let mut group_by: Vec<Expr> = group_by_columns.iter().map(|c| col(c)).collect();
    if include_track {
        group_by.push(col(TRACK_ID_COLUMN));
    }

    let mut query = Query::new()
        .select(select)
        .from(TableRef::new(SLICE_TABLE_NAME))
        .group_by(group_by);
    if constrain_to_area {
        query = query.filter(area_filter(area));
    }

    InnerQuery {
        query,
        group_by_columns,
    }
}

/// ORDER BY items for every aggregation over the sorted column.
fn sort_clauses(aggregations: &[Aggregation], criteria: Option<&SortCriteria>) -> Vec<OrderByExpr> {
    let Some(criteria) = criteria else {
        return Vec::new();
    };
    aggregations
        .iter()
        .enumerate()
        .filter(|(_, aggregation)| aggregation.column == criteria.column)
        .map(|(i, _)| {
            let alias = col(&aggregation_alias(i));
            match criteria.order {
                SortDirection::Asc => OrderByExpr::asc(alias),
                SortDirection::Desc => OrderByExpr::desc(alias),
            }
        })
        .collect()
}

/// Generates pivot table queries, resolving selection areas through `R`.
#[derive(Debug)]
pub struct PivotQueryGenerator<'a, R: AreaResolver + ?Sized> {
    resolver: &'a R,
    settings: GeneratorSettings,
    dialect: Dialect,
}

impl<'a, R: AreaResolver + ?Sized> PivotQueryGenerator<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            settings: GeneratorSettings::default(),
            dialect: Dialect::default(),
        }
    }

    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate the pivot table query for `state`.
    ///
    /// Fails before doing any work when the area, the aggregations or the
    /// pivots are missing.
    pub fn generate(&self, state: &PivotTableState) -> GeneratorResult<PivotTableQuery> {
        let area = state
            .selection_area
            .as_ref()
            .ok_or(QueryGeneratorError::MissingArea)?;

        let aggregations = state.selected_aggregations.values();
        if aggregations.is_empty() {
            return Err(QueryGeneratorError::NoAggregations);
        }

        let joined_pivots = &state.selected_pivots;
        let slice_pivots = &state.selected_slice_pivots;
        if joined_pivots.is_empty() && slice_pivots.is_empty() {
            return Err(QueryGeneratorError::NoPivots);
        }

        let resolved = self.resolver.resolve(area);
        let needs_join = !joined_pivots.is_empty();
        let inner_alias = self.settings.inner_alias.as_str();

        let inner = generate_inner_query(
            slice_pivots,
            aggregations,
            needs_join,
            &resolved,
            state.constrain_to_area,
        );

        let prefixed_slice_pivots: Vec<Expr> = inner
            .group_by_columns
            .iter()
            .map(|c| table_col(inner_alias, c))
            .collect();
        let rendered_joined_pivots: Vec<Expr> = joined_pivots
            .iter()
            .map(|p| p.qualified_expression())
            .collect();

        let group_by: Vec<Expr> = rendered_joined_pivots
            .iter()
            .chain(prefixed_slice_pivots.iter())
            .cloned()
            .collect();

        let mut select: Vec<SelectExpr> = group_by.iter().cloned().map(SelectExpr::new).collect();
        for (i, aggregation) in aggregations.iter().enumerate() {
            select.push(
                aggregation
                    .rollup_expression(inner_alias, i)
                    .alias(&aggregation_alias(i)),
            );
        }

        let mut query = Query::new()
            .select(select)
            .from_subquery(inner.query, inner_alias);
        if needs_join {
            query = query
                .left_join(
                    TableRef::new("thread_track"),
                    table_col("thread_track", "id").eq(table_col(inner_alias, TRACK_ID_COLUMN)),
                )
                .left_join_using(TableRef::new("thread"), &["utid"])
                .left_join_using(TableRef::new("process"), &["upid"]);
        }
        let query = query
            .group_by(group_by)
            .order_by(sort_clauses(aggregations, state.sort_criteria.as_ref()));

        tracing::debug!(
            joined_pivots = joined_pivots.len(),
            slice_pivots = slice_pivots.len(),
            aggregations = aggregations.len(),
            sorted = !query.order_by.is_empty(),
            "generated pivot table query"
        );

        let text = query.to_sql_with(self.dialect, self.settings.layout());
        tracing::trace!(sql = %text, "pivot table query text");

        let pivot_columns = joined_pivots
            .iter()
            .cloned()
            .map(TableColumn::Regular)
            .chain(slice_pivots.iter().cloned())
            .collect();

        Ok(PivotTableQuery {
            text,
            metadata: PivotTableQueryMetadata {
                pivot_columns,
                aggregation_columns: aggregations.to_vec(),
            },
        })
    }
}

/// Generate the pivot table query for `state` with default settings.
pub fn generate_query_from_state<R: AreaResolver + ?Sized>(
    state: &PivotTableState,
    resolver: &R,
) -> GeneratorResult<PivotTableQuery> {
    PivotQueryGenerator::new(resolver).generate(state)
}
