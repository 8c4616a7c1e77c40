use std::env;
use std::path::{Path, PathBuf};
use std::process;

use dotenvy::dotenv;
use log::{error, warn};

use league_pace_report::modules::config::{default_class_suffixes, LeagueConfig, DEFAULT_CONFIG_PATH};
use league_pace_report::modules::helpers::logging::setup_logging;
use league_pace_report::modules::models::driver::DriverIdentity;
use league_pace_report::modules::models::event::{EventDescriptor, EventPaceTable};
use league_pace_report::modules::result_file::load_result_file;

const USAGE: &str = "usage: inspect_event <results.xml> [alien lap seconds] [class pattern]";

/// aliases come from the league config when there is one
fn identity() -> DriverIdentity {
    let path = env::var("PACE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    match LeagueConfig::load(Path::new(&path)) {
        Ok(config) => config.identity(),
        Err(error) => {
            warn!(target: "inspect_event", "{}, using no aliases", error);
            DriverIdentity::new(default_class_suffixes(), Default::default())
        }
    }
}

fn main() {
    dotenv().ok();
    if let Err(error) = setup_logging() {
        eprintln!("failed to setup logging: {}", error);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let file = match args.first() {
        Some(file) => PathBuf::from(file),
        None => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };
    let reference_lap = match args.get(1).map(|value| value.parse::<f64>()) {
        None => 0.0,
        Some(Ok(reference_lap)) => reference_lap,
        Some(Err(_)) => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };
    let class_pattern = args.get(2).map(|pattern| pattern.to_lowercase());

    let entries = match load_result_file(&file) {
        Ok(entries) => entries,
        Err(error) => {
            error!(target: "inspect_event", "{}", error);
            process::exit(1);
        }
    };

    let identity = identity();
    let results = entries
        .iter()
        .filter(|entry| match &class_pattern {
            Some(pattern) => entry.car_class.to_lowercase().contains(pattern),
            None => true,
        })
        .map(|entry| identity.driver_result(entry))
        .collect();

    let event = EventDescriptor {
        code: file.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default(),
        track: file.display().to_string(),
        file: file.clone(),
        reference_lap,
    };

    match EventPaceTable::new(event, results) {
        Some(table) => match serde_json::to_string_pretty(&table) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                error!(target: "inspect_event", "could not serialize {}: {}", file.display(), error);
                process::exit(1);
            }
        },
        None => warn!(target: "inspect_event", "no drivers in {}", file.display()),
    }
}
