use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::modules::helpers::lap::LapHelper;
use crate::modules::result_file::ResultEntry;

/// One driver's result in one event, keyed by the canonical driver name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriverResult {
    pub driver_id: String,
    pub raw_name: String,
    pub best_lap_seconds: Option<f64>,
    pub car_class: String,
}

/// # driver identity normalizer
/// turns the names found in result files into the canonical names used to join
/// results across events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverIdentity {
    class_suffixes: Vec<String>,
    aliases: BTreeMap<String, String>,
}

impl DriverIdentity {
    pub fn new(class_suffixes: Vec<String>, aliases: BTreeMap<String, String>) -> DriverIdentity {
        DriverIdentity {
            class_suffixes: class_suffixes
                .into_iter()
                .filter(|suffix| !suffix.is_empty())
                .collect(),
            aliases,
        }
    }

    /// # canonical driver name
    /// cuts the name at each class suffix token found, trims it and applies the
    /// alias table once
    ///
    /// ## Arguments
    /// * `raw_name` - the name as written in the result file
    ///
    /// ## Returns
    /// * `String` - the driver id
    pub fn canonical_name(&self, raw_name: &str) -> String {
        let mut name = raw_name;
        for suffix in &self.class_suffixes {
            if let Some(index) = name.find(suffix.as_str()) {
                name = &name[..index];
            }
        }
        let name = name.trim();

        match self.aliases.get(name) {
            Some(canonical) => canonical.clone(),
            None => name.to_string(),
        }
    }

    pub fn driver_result(&self, entry: &ResultEntry) -> DriverResult {
        DriverResult {
            driver_id: self.canonical_name(&entry.name),
            raw_name: entry.name.clone(),
            best_lap_seconds: LapHelper::parse_lap_time(&entry.best_lap),
            car_class: entry.car_class.clone(),
        }
    }
}
