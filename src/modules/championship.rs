use log::{info, warn};

use crate::errors::CustomResult;
use crate::modules::config::ReportDefinition;
use crate::modules::models::comparison::{ComparisonTable, ImprovementRecord};
use crate::modules::models::driver::DriverIdentity;
use crate::modules::models::event::{EventDescriptor, EventPaceTable};
use crate::modules::result_file::ResultFileCache;

/// Comparison of one report, ready to be rendered.
#[derive(Debug, Clone)]
pub struct ChampionshipReport {
    pub definition: ReportDefinition,
    pub comparison: ComparisonTable,
    pub improvements: Vec<ImprovementRecord>,
}

/// # load the pace table of one event
/// parse the event file, keep the entries of the report's class and compute pace.
///
/// ## Returns
/// * `Option<EventPaceTable>` - `None` when the event has no drivers left
pub fn load_event(
    cache: &mut ResultFileCache,
    identity: &DriverIdentity,
    definition: &ReportDefinition,
    event: &EventDescriptor,
) -> CustomResult<Option<EventPaceTable>> {
    let entries = cache.load(&event.file)?;

    let results = entries
        .iter()
        .filter(|entry| match &definition.class {
            Some(class) => class.matches(&entry.car_class),
            None => true,
        })
        .map(|entry| identity.driver_result(entry))
        .collect();

    Ok(EventPaceTable::new(event.clone(), results))
}

/// # build a report
/// load every event of the report in championship order and merge them. Events
/// that are missing, unreadable or empty are logged and left out.
///
/// ## Returns
/// * `Option<ChampionshipReport>` - `None` when no event could be loaded
pub fn build_report(
    cache: &mut ResultFileCache,
    identity: &DriverIdentity,
    definition: &ReportDefinition,
    outlier_ceiling: f64,
) -> Option<ChampionshipReport> {
    info!(target: "championship", "processing {}", definition.title());

    let mut tables = Vec::new();
    for event in &definition.events {
        match load_event(cache, identity, definition, event) {
            Ok(Some(table)) => {
                info!(target: "championship", "loaded {} ({} drivers)", event.track, table.drivers.len());
                tables.push(table);
            }
            Ok(None) => {
                warn!(target: "championship", "no drivers for {} in {}, skipping", definition.section, event.file.display());
            }
            Err(error) => {
                warn!(target: "championship", "skipping {}: {}", event.track, error);
            }
        }
    }

    let comparison = ComparisonTable::build(&tables, outlier_ceiling)?;
    let improvements = comparison.improvements();

    Some(ChampionshipReport {
        definition: definition.clone(),
        comparison,
        improvements,
    })
}
