//! Selection areas and the filter restricting slices to them.
//!
//! The UI describes an area in floating-point seconds over a set of tracks.
//! Before a query can be built it is resolved into the engine's integer
//! nanoseconds and the concrete track ids whose slices are selected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::sql::expr::{col, lit_int, Expr, ExprExt};

use super::schema::TRACK_ID_COLUMN;

/// A time range over a set of UI tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub start_sec: f64,
    pub end_sec: f64,
    /// Keys of the UI tracks covered by the selection.
    #[serde(default)]
    pub tracks: Vec<String>,
}

impl Area {
    pub fn new(start_sec: f64, end_sec: f64, tracks: Vec<String>) -> Self {
        Self {
            start_sec,
            end_sec,
            tracks,
        }
    }
}

/// An area resolved to the engine's time unit and track ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArea {
    /// Inclusive window start in nanoseconds.
    pub start_ns: i64,
    /// Exclusive window end in nanoseconds.
    pub end_ns: i64,
    pub track_ids: BTreeSet<i64>,
}

impl ResolvedArea {
    pub fn new(start_ns: i64, end_ns: i64, track_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            start_ns,
            end_ns,
            track_ids: track_ids.into_iter().collect(),
        }
    }
}

/// Converts a UI selection into filter inputs.
pub trait AreaResolver {
    fn resolve(&self, area: &Area) -> ResolvedArea;
}

impl<F> AreaResolver for F
where
    F: Fn(&Area) -> ResolvedArea,
{
    fn resolve(&self, area: &Area) -> ResolvedArea {
        self(area)
    }
}

/// Seconds to integer nanoseconds, rounded to the nearest nanosecond.
pub fn to_ns(seconds: f64) -> i64 {
    (seconds * 1e9).round() as i64
}

/// Resolves areas against a fixed mapping of UI tracks to slice track ids.
///
/// Track keys without a mapping contribute no ids.
#[derive(Debug, Clone, Default)]
pub struct TrackTable {
    tracks: HashMap<String, Vec<i64>>,
}

impl TrackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the slice track ids shown by a UI track.
    pub fn with_track(mut self, key: &str, track_ids: impl IntoIterator<Item = i64>) -> Self {
        self.tracks
            .entry(key.to_string())
            .or_default()
            .extend(track_ids);
        self
    }

    pub fn track_ids(&self, key: &str) -> &[i64] {
        self.tracks.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl AreaResolver for TrackTable {
    fn resolve(&self, area: &Area) -> ResolvedArea {
        ResolvedArea::new(
            to_ns(area.start_sec),
            to_ns(area.end_sec),
            area.tracks
                .iter()
                .flat_map(|key| self.track_ids(key).iter().copied()),
        )
    }
}

/// Predicate keeping slices that overlap the window on one of the area's tracks:
/// `ts + dur > start AND ts < end AND track_id IN (ids)`.
///
/// An empty id set yields a predicate that matches nothing.
pub fn area_filter(area: &ResolvedArea) -> Expr {
    let ids = area.track_ids.iter().map(|id| lit_int(*id)).collect();
    col("ts")
        .add(col("dur"))
        .gt(area.start_ns)
        .and(col("ts").lt(area.end_ns))
        .and(col(TRACK_ID_COLUMN).in_list(ids))
}
