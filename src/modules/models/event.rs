use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::modules::helpers::math::Math;
use crate::modules::models::driver::DriverResult;

/// One event column of a championship report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventDescriptor {
    pub code: String,
    pub track: String,
    pub file: PathBuf,
    /// the alien lap in seconds, non-positive when there is none
    pub reference_lap: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriverPace {
    pub result: DriverResult,
    /// percentage of the fastest lap in the field, 100 is the fastest
    pub pace_pct_field: Option<f64>,
    /// percentage of the alien lap, lower is faster
    pub pace_pct_reference: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventPaceTable {
    pub event: EventDescriptor,
    pub drivers: Vec<DriverPace>,
}

impl EventPaceTable {
    /// # compute pace for an event
    /// derive both pace percentages for every driver of the event.
    ///
    /// ## Arguments
    /// * `event` - the event the results belong to
    /// * `results` - the driver results, already filtered to the compared class
    ///
    /// ## Returns
    /// * `Option<EventPaceTable>` - `None` when the event has no drivers
    pub fn new(event: EventDescriptor, results: Vec<DriverResult>) -> Option<EventPaceTable> {
        if results.is_empty() {
            return None;
        }

        let fastest = Math::min_present(results.iter().map(|result| result.best_lap_seconds));
        let reference_lap = event.reference_lap;

        let drivers = results
            .into_iter()
            .map(|result| {
                let lap = result.best_lap_seconds;
                DriverPace {
                    pace_pct_field: field_pace(lap, fastest),
                    pace_pct_reference: reference_pace(lap, reference_lap),
                    result,
                }
            })
            .collect();

        Some(EventPaceTable { event, drivers })
    }
}

/// percentage of the fastest valid lap in the field, 100 for everybody when nobody set one
pub fn field_pace(lap: Option<f64>, fastest: Option<f64>) -> Option<f64> {
    match (lap, fastest) {
        (_, None) => Some(100.0),
        (Some(lap), Some(fastest)) => Some(Math::percentage(fastest, lap)),
        (None, Some(_)) => None,
    }
}

/// percentage of the alien lap, 100 for everybody when there is no alien lap
pub fn reference_pace(lap: Option<f64>, reference_lap: f64) -> Option<f64> {
    if reference_lap <= 0.0 {
        return Some(100.0);
    }

    lap.map(|lap| Math::percentage(lap, reference_lap))
}
