//! The pivot table specification the query is generated from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::aggregation::Aggregation;
use super::area::Area;
use super::column::{RegularColumn, TableColumn};

/// Requested order of a sorted aggregation column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn reversed(&self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort the result by the aggregation(s) over `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub column: TableColumn,
    pub order: SortDirection,
}

impl SortCriteria {
    pub fn new(column: TableColumn, order: SortDirection) -> Self {
        Self { column, order }
    }
}

/// Selected aggregations keyed by [`Aggregation::key`], in selection order.
///
/// Re-selecting an existing key replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Aggregation>", into = "Vec<Aggregation>")]
pub struct SelectedAggregations {
    entries: Vec<Aggregation>,
}

impl SelectedAggregations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `aggregation`, returning the one it replaced.
    pub fn insert(&mut self, aggregation: Aggregation) -> Option<Aggregation> {
        let key = aggregation.key();
        match self.entries.iter_mut().find(|a| a.key() == key) {
            Some(existing) => Some(std::mem::replace(existing, aggregation)),
            None => {
                self.entries.push(aggregation);
                None
            }
        }
    }

    /// Deselect the aggregation with `key`.
    pub fn remove(&mut self, key: &str) -> Option<Aggregation> {
        let index = self.entries.iter().position(|a| a.key() == key)?;
        Some(self.entries.remove(index))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|a| a.key() == key)
    }

    pub fn get(&self, key: &str) -> Option<&Aggregation> {
        self.entries.iter().find(|a| a.key() == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aggregation> {
        self.entries.iter()
    }

    /// The aggregations in selection order.
    pub fn values(&self) -> &[Aggregation] {
        &self.entries
    }
}

impl FromIterator<Aggregation> for SelectedAggregations {
    fn from_iter<I: IntoIterator<Item = Aggregation>>(iter: I) -> Self {
        let mut selected = SelectedAggregations::new();
        for aggregation in iter {
            selected.insert(aggregation);
        }
        selected
    }
}

impl From<Vec<Aggregation>> for SelectedAggregations {
    fn from(aggregations: Vec<Aggregation>) -> Self {
        aggregations.into_iter().collect()
    }
}

impl From<SelectedAggregations> for Vec<Aggregation> {
    fn from(selected: SelectedAggregations) -> Self {
        selected.entries
    }
}

/// Pivot table specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotTableState {
    /// Pivots resolved through a join from the slice's track to
    /// thread/process tables.
    pub selected_pivots: Vec<RegularColumn>,
    /// Pivots resolved directly on the slice table.
    pub selected_slice_pivots: Vec<TableColumn>,
    pub selected_aggregations: SelectedAggregations,
    /// Area the query is restricted to. The generator refuses to run without one.
    pub selection_area: Option<Area>,
    /// Apply the area filter to the slice table.
    pub constrain_to_area: bool,
    pub sort_criteria: Option<SortCriteria>,
}

impl Default for PivotTableState {
    fn default() -> Self {
        Self {
            selected_pivots: Vec::new(),
            selected_slice_pivots: Vec::new(),
            selected_aggregations: SelectedAggregations::new(),
            selection_area: None,
            constrain_to_area: true,
            sort_criteria: None,
        }
    }
}

impl PivotTableState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.selection_area = Some(area);
        self
    }

    pub fn with_pivot(mut self, pivot: RegularColumn) -> Self {
        self.selected_pivots.push(pivot);
        self
    }

    pub fn with_slice_pivot(mut self, pivot: TableColumn) -> Self {
        self.selected_slice_pivots.push(pivot);
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.selected_aggregations.insert(aggregation);
        self
    }

    pub fn with_sort(mut self, column: TableColumn, order: SortDirection) -> Self {
        self.sort_criteria = Some(SortCriteria::new(column, order));
        self
    }

    pub fn constrained_to_area(mut self, constrain: bool) -> Self {
        self.constrain_to_area = constrain;
        self
    }

    pub fn pivot_count(&self) -> usize {
        self.selected_pivots.len() + self.selected_slice_pivots.len()
    }
}
