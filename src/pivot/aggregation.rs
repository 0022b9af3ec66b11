//! Aggregation functions applied to pivot table columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sql::expr::{avg, count_rows, max, min, sum, table_col, Expr};

use super::column::TableColumn;

/// Reduction applied to a column across the rows of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationFunction {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl AggregationFunction {
    pub const ALL: [AggregationFunction; 5] = [
        AggregationFunction::Count,
        AggregationFunction::Sum,
        AggregationFunction::Min,
        AggregationFunction::Max,
        AggregationFunction::Avg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationFunction::Count => "COUNT",
            AggregationFunction::Sum => "SUM",
            AggregationFunction::Min => "MIN",
            AggregationFunction::Max => "MAX",
            AggregationFunction::Avg => "AVG",
        }
    }

    /// Apply this function to `operand`. COUNT ignores the operand.
    pub fn apply(&self, operand: Expr) -> Expr {
        match self {
            AggregationFunction::Count => count_rows(),
            AggregationFunction::Sum => sum(operand),
            AggregationFunction::Min => min(operand),
            AggregationFunction::Max => max(operand),
            AggregationFunction::Avg => avg(operand),
        }
    }

    /// Function re-aggregating per-group results of `self` at a coarser grouping.
    ///
    /// Partial counts have to be summed; counting them would yield the number
    /// of inner groups instead.
    pub fn outer_rollup(&self) -> AggregationFunction {
        match self {
            AggregationFunction::Count => AggregationFunction::Sum,
            other => *other,
        }
    }
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown aggregation function: '{0}'")]
pub struct UnknownAggregationFunction(pub String);

impl FromStr for AggregationFunction {
    type Err = UnknownAggregationFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregationFunction::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownAggregationFunction(s.to_string()))
    }
}

/// Alias of the `index`-th aggregation, shared by the inner and outer query.
pub fn aggregation_alias(index: usize) -> String {
    format!("agg_{}", index)
}

/// An aggregation function applied to a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(rename = "function")]
    pub aggregation_function: AggregationFunction,
    pub column: TableColumn,
}

impl Aggregation {
    pub fn new(aggregation_function: AggregationFunction, column: TableColumn) -> Self {
        Self {
            aggregation_function,
            column,
        }
    }

    /// Per-group expression over the fact table rows.
    pub fn expression(&self) -> Expr {
        self.aggregation_function.apply(self.column.expression())
    }

    /// Outer-stage expression rolling up `<inner_alias>.agg_<index>`.
    pub fn rollup_expression(&self, inner_alias: &str, index: usize) -> Expr {
        let partial = table_col(inner_alias, &aggregation_alias(index));
        self.aggregation_function.outer_rollup().apply(partial)
    }

    /// Stable identifier used as the key of the selection map.
    pub fn key(&self) -> String {
        format!("{}:{}", self.aggregation_function, self.column)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.aggregation_function, self.column)
    }
}
