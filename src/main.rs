use std::env;
use std::path::PathBuf;
use std::process;

use dotenvy::dotenv;
use log::{error, info};

use league_pace_report::modules::config::{LeagueConfig, DEFAULT_CONFIG_PATH};
use league_pace_report::modules::helpers::logging::setup_logging;
use league_pace_report::pages::site::generate_site;

fn config_path() -> PathBuf {
    env::args()
        .nth(1)
        .or_else(|| env::var("PACE_CONFIG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn main() {
    dotenv().ok();
    if let Err(error) = setup_logging() {
        eprintln!("failed to setup logging: {}", error);
        process::exit(1);
    }

    let path = config_path();
    let config = match LeagueConfig::load(&path) {
        Ok(config) => config,
        Err(error) => {
            error!(target: "main", "{}", error);
            process::exit(1);
        }
    };

    match generate_site(&config) {
        Ok(pages) => {
            info!(target: "main", "wrote {} pages to {}", pages.len(), config.output_dir.display());
        }
        Err(error) => {
            error!(target: "main", "{}", error);
            process::exit(1);
        }
    }
}
