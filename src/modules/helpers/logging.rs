use std::env;
use std::io;

use dotenvy::dotenv;
use fern::Dispatch;

/// map `LOGGING_LEVEL` to a level filter, defaulting to info
pub fn level_from_str(verbosity: &str) -> log::LevelFilter {
    match verbosity.trim().to_uppercase().as_str() {
        "OFF" => log::LevelFilter::Off,
        "ERROR" => log::LevelFilter::Error,
        "WARN" => log::LevelFilter::Warn,
        "DEBUG" => log::LevelFilter::Debug,
        "TRACE" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    }
}

pub fn setup_logging() -> Result<(), fern::InitError> {
    dotenv().ok();
    let verbosity = env::var("LOGGING_LEVEL").unwrap_or_default();

    let mut base_config = Dispatch::new()
        .level(level_from_str(&verbosity))
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(io::stdout());

    if let Ok(path) = env::var("LOG_FILE") {
        base_config = base_config.chain(fern::log_file(path)?);
    }

    base_config.apply()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::level_from_str;

    #[test]
    fn parses_levels() {
        assert_eq!(level_from_str("OFF"), log::LevelFilter::Off);
        assert_eq!(level_from_str("warn"), log::LevelFilter::Warn);
        assert_eq!(level_from_str(" DEBUG "), log::LevelFilter::Debug);
        assert_eq!(level_from_str(""), log::LevelFilter::Info);
        assert_eq!(level_from_str("verbose"), log::LevelFilter::Info);
    }
}
