use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::modules::helpers::math::Math;
use crate::modules::models::event::{DriverPace, EventDescriptor, EventPaceTable};

/// reference paces above this percentage are treated as recording anomalies
pub const OUTLIER_CEILING: f64 = 107.0;

/// One driver in one event column. Every value is missing when the driver did not
/// take part in the event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct PaceCell {
    pub lap_seconds: Option<f64>,
    pub pace_pct_field: Option<f64>,
    pub pace_pct_reference: Option<f64>,
}

impl From<&DriverPace> for PaceCell {
    fn from(pace: &DriverPace) -> PaceCell {
        PaceCell {
            lap_seconds: pace.result.best_lap_seconds,
            pace_pct_field: pace.pace_pct_field,
            pace_pct_reference: pace.pace_pct_reference,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub driver_id: String,
    /// one cell per event, in championship order
    pub cells: Vec<PaceCell>,
}

impl ComparisonRow {
    pub fn reference_paces(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.cells.iter().map(|cell| cell.pace_pct_reference)
    }

    /// best reference pace over all events
    pub fn best_pace(&self) -> Option<f64> {
        Math::min_present(self.reference_paces())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImprovementRecord {
    pub driver_id: String,
    pub best_of_first_two: f64,
    pub best_of_last_two: f64,
    /// positive when the driver got faster over the season
    pub improvement: f64,
}

/// Pace of every driver across the events of a championship.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub events: Vec<EventDescriptor>,
    /// sorted by driver id
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// # merge events into a comparison table
    /// outer join the event tables on driver id, in the given championship order.
    ///
    /// ## Arguments
    /// * `tables` - the pace tables of the events that have results, in championship order
    /// * `outlier_ceiling` - reference paces above this value are dropped
    ///
    /// ## Returns
    /// * `Option<ComparisonTable>` - `None` when there are no events to compare
    pub fn build(tables: &[EventPaceTable], outlier_ceiling: f64) -> Option<ComparisonTable> {
        if tables.is_empty() {
            return None;
        }

        let columns = tables.len();
        let mut merged: BTreeMap<String, Vec<Option<PaceCell>>> = BTreeMap::new();

        for (column, table) in tables.iter().enumerate() {
            for pace in &table.drivers {
                let cells = merged
                    .entry(pace.result.driver_id.clone())
                    .or_insert_with(|| vec![None; columns]);
                let cell = PaceCell::from(pace);

                cells[column] = match cells[column] {
                    None => Some(cell),
                    Some(existing) => {
                        warn!(target: "comparison",
                            "driver {} appears more than once in {}, keeping the fastest entry",
                            pace.result.driver_id, table.event.code);
                        Some(faster_cell(existing, cell))
                    }
                };
            }
        }

        let rows = merged
            .into_iter()
            .map(|(driver_id, cells)| ComparisonRow {
                driver_id,
                cells: cells
                    .into_iter()
                    .map(|cell| {
                        let mut cell = cell.unwrap_or_default();
                        cell.pace_pct_reference = cell
                            .pace_pct_reference
                            .filter(|pace| *pace <= outlier_ceiling);
                        cell
                    })
                    .collect(),
            })
            .filter(|row| row.reference_paces().any(|pace| pace.is_some()))
            .collect();

        Some(ComparisonTable {
            events: tables.iter().map(|table| table.event.clone()).collect(),
            rows,
        })
    }

    /// rows ordered by their best reference pace, fastest first
    pub fn display_order(&self) -> Vec<&ComparisonRow> {
        let mut rows: Vec<&ComparisonRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            let a = a.best_pace().unwrap_or(f64::INFINITY);
            let b = b.best_pace().unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });

        rows
    }

    /// # improvement over the season
    /// compare the best reference pace of the first two events with the best of the
    /// last two. Drivers missing from either pair are left out.
    ///
    /// ## Returns
    /// * `Vec<ImprovementRecord>` - biggest improvement first, empty with fewer than two events
    pub fn improvements(&self) -> Vec<ImprovementRecord> {
        let columns = self.events.len();
        if columns < 2 {
            return Vec::new();
        }

        let mut records: Vec<ImprovementRecord> = self
            .rows
            .iter()
            .filter_map(|row| {
                let first = row.cells.get(..2)?;
                let last = row.cells.get(columns - 2..columns)?;
                let first = Math::min_present(first.iter().map(|c| c.pace_pct_reference))?;
                let last = Math::min_present(last.iter().map(|c| c.pace_pct_reference))?;

                Some(ImprovementRecord {
                    driver_id: row.driver_id.clone(),
                    best_of_first_two: first,
                    best_of_last_two: last,
                    improvement: Math::round_float_to_n_decimals(first - last, 2),
                })
            })
            .collect();

        records.sort_by(|a, b| b.improvement.total_cmp(&a.improvement));
        records
    }
}

fn faster_cell(existing: PaceCell, candidate: PaceCell) -> PaceCell {
    let existing_pace = existing.pace_pct_reference.unwrap_or(f64::INFINITY);
    let candidate_pace = candidate.pace_pct_reference.unwrap_or(f64::INFINITY);
    if candidate_pace < existing_pace {
        candidate
    } else {
        existing
    }
}
