use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use inflections::Inflect;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::errors::{CustomResult, InvalidConfigSnafu, ParseConfigSnafu, ReadConfigSnafu};
use crate::modules::models::comparison::OUTLIER_CEILING;
use crate::modules::models::driver::DriverIdentity;
use crate::modules::models::event::EventDescriptor;

pub const DEFAULT_CONFIG_PATH: &str = "config/league.json";
/// reference key used by series without car classes
pub const DEFAULT_REFERENCE: &str = "default";

static EVENT_FILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<stem>.+?)(?:-r)?\.xml$").expect("event file pattern is a valid regex")
});

/// League configuration, read once per run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeagueConfig {
    pub title: String,
    #[serde(default = "default_xml_dir")]
    pub xml_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default = "default_outlier_ceiling")]
    pub outlier_ceiling: f64,
    #[serde(default = "default_chart_range")]
    pub chart_range: [f64; 2],
    #[serde(default = "default_class_suffixes")]
    pub class_suffixes: Vec<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    pub series: Vec<SeriesConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub key: String,
    /// defaults to the key in title case
    #[serde(default)]
    pub name: Option<String>,
    pub dir: PathBuf,
    /// car classes compared separately, empty for single class series
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
    #[serde(default)]
    pub race: Vec<EventConfig>,
    #[serde(default)]
    pub quali: Vec<EventConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassConfig {
    pub key: String,
    pub label: String,
    /// matched case-insensitively against the car class of every entry
    pub pattern: String,
}

impl SeriesConfig {
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.key.to_title_case(),
        }
    }
}

impl ClassConfig {
    pub fn matches(&self, car_class: &str) -> bool {
        car_class
            .to_lowercase()
            .contains(&self.pattern.to_lowercase())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventConfig {
    pub file: String,
    pub track: String,
    #[serde(default)]
    pub code: Option<String>,
    /// alien lap per class key, or under `default`
    #[serde(default)]
    pub reference: BTreeMap<String, f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Race,
    Quali,
}

impl SessionKind {
    pub fn key(&self) -> &'static str {
        match self {
            SessionKind::Race => "race",
            SessionKind::Quali => "quali",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::Race => "Race",
            SessionKind::Quali => "Quali",
        }
    }
}

/// One generated page: one session type of one series, for one class.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportDefinition {
    pub slug: String,
    /// sidebar group, e.g. `Multiclass GT3`
    pub section: String,
    pub session: SessionKind,
    pub class: Option<ClassConfig>,
    pub events: Vec<EventDescriptor>,
}

impl ReportDefinition {
    pub fn page_file(&self) -> String {
        format!("{}.html", self.slug.replace('-', "_"))
    }

    pub fn title(&self) -> String {
        format!("{} {} Pace Data", self.section, self.session.label())
    }
}

fn default_xml_dir() -> PathBuf {
    PathBuf::from("xml")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_outlier_ceiling() -> f64 {
    OUTLIER_CEILING
}

fn default_chart_range() -> [f64; 2] {
    [100.0, OUTLIER_CEILING]
}

/// class suffix stripped from driver names when the config names none
pub fn default_class_suffixes() -> Vec<String> {
    vec!["LMGT3".to_string()]
}

/// # event code from a file name
/// `s3-sc1-r.xml` becomes `sc1`: the extension, the race marker and the season
/// prefix are removed
pub fn derive_event_code(file: &str) -> Option<String> {
    let stem = EVENT_FILE_PATTERN.captures(file)?.name("stem")?.as_str();

    let code = match stem.split_once('-') {
        Some((_, code)) => code,
        None => stem,
    };
    Some(code.to_string())
}

impl LeagueConfig {
    /// # load the league configuration
    /// read and validate the configuration file, then apply the directory overrides
    /// from the environment
    pub fn load(path: &Path) -> CustomResult<LeagueConfig> {
        let json = fs::read_to_string(path).context(ReadConfigSnafu { path })?;
        let mut config = LeagueConfig::parse(&json, path)?;
        config.apply_env_overrides();

        Ok(config)
    }

    pub fn parse(json: &str, path: &Path) -> CustomResult<LeagueConfig> {
        let config: LeagueConfig = serde_json::from_str(json).context(ParseConfigSnafu { path })?;
        config.validate()?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("PACE_XML_DIR") {
            self.xml_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("PACE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    fn validate(&self) -> CustomResult<()> {
        if self.series.is_empty() {
            return InvalidConfigSnafu { message: "no series configured" }.fail();
        }
        if !(self.outlier_ceiling > 0.0) {
            return InvalidConfigSnafu {
                message: format!("outlier_ceiling must be positive, got {}", self.outlier_ceiling),
            }
            .fail();
        }
        if !(self.chart_range[0] < self.chart_range[1]) {
            return InvalidConfigSnafu {
                message: format!("chart_range {:?} is empty", self.chart_range),
            }
            .fail();
        }

        for series in &self.series {
            for (session, events) in [("race", &series.race), ("quali", &series.quali)] {
                let mut codes = HashSet::new();
                for event in events {
                    let code = event_code(event)?;
                    if !codes.insert(code.clone()) {
                        return InvalidConfigSnafu {
                            message: format!("event code {} used twice in {} {}", code, series.key, session),
                        }
                        .fail();
                    }
                }
            }
        }

        let mut slugs = HashSet::new();
        for slot in self.report_slots() {
            let slug = slot.slug();
            if !slugs.insert(slug.clone()) {
                return InvalidConfigSnafu {
                    message: format!("report {} configured twice", slug),
                }
                .fail();
            }
        }

        Ok(())
    }

    pub fn identity(&self) -> DriverIdentity {
        DriverIdentity::new(self.class_suffixes.clone(), self.aliases.clone())
    }

    /// every (series, class, session) combination that has events, in config order
    fn report_slots(&self) -> Vec<ReportSlot<'_>> {
        let mut slots = Vec::new();

        for series in &self.series {
            let classes: Vec<Option<&ClassConfig>> = if series.classes.is_empty() {
                vec![None]
            } else {
                series.classes.iter().map(Some).collect()
            };

            for class in classes {
                for (session, events) in [
                    (SessionKind::Race, &series.race),
                    (SessionKind::Quali, &series.quali),
                ] {
                    if !events.is_empty() {
                        slots.push(ReportSlot { series, class, session, events: events.as_slice() });
                    }
                }
            }
        }

        slots
    }

    /// # expand the configured reports
    /// every series produces a race and a quali report per class (or one of each
    /// for single class series). Sessions without events are skipped.
    pub fn reports(&self) -> CustomResult<Vec<ReportDefinition>> {
        self.report_slots()
            .into_iter()
            .map(|slot| -> CustomResult<ReportDefinition> {
                let events = slot
                    .events
                    .iter()
                    .map(|event| self.event_descriptor(slot.series, slot.class, event))
                    .collect::<CustomResult<Vec<EventDescriptor>>>()?;

                Ok(ReportDefinition {
                    slug: slot.slug(),
                    section: slot.section(),
                    session: slot.session,
                    class: slot.class.cloned(),
                    events,
                })
            })
            .collect()
    }

    fn event_descriptor(
        &self,
        series: &SeriesConfig,
        class: Option<&ClassConfig>,
        event: &EventConfig,
    ) -> CustomResult<EventDescriptor> {
        let key = class.map(|class| class.key.as_str()).unwrap_or(DEFAULT_REFERENCE);
        let reference_lap = match event.reference.get(key).or_else(|| event.reference.get(DEFAULT_REFERENCE)) {
            Some(reference) => *reference,
            None => {
                warn!(target: "config", "no alien lap for {} ({}), pace vs alien will be 100", event.file, key);
                0.0
            }
        };

        Ok(EventDescriptor {
            code: event_code(event)?,
            track: event.track.clone(),
            file: self.xml_dir.join(&series.dir).join(&event.file),
            reference_lap,
        })
    }
}

struct ReportSlot<'a> {
    series: &'a SeriesConfig,
    class: Option<&'a ClassConfig>,
    session: SessionKind,
    events: &'a [EventConfig],
}

impl ReportSlot<'_> {
    fn slug(&self) -> String {
        match self.class {
            Some(class) => format!("{}-{}-{}", self.series.key, class.key, self.session.key()),
            None => format!("{}-{}", self.series.key, self.session.key()),
        }
    }

    fn section(&self) -> String {
        match self.class {
            Some(class) => format!("{} {}", self.series.display_name(), class.label),
            None => self.series.display_name(),
        }
    }
}

fn event_code(event: &EventConfig) -> CustomResult<String> {
    match &event.code {
        Some(code) => Ok(code.clone()),
        None => derive_event_code(&event.file).ok_or_else(|| {
            InvalidConfigSnafu {
                message: format!("cannot derive an event code from {}, set `code`", event.file),
            }
            .build()
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::errors::Error;

    const CONFIG: &str = r#"{
        "title": "Test League",
        "aliases": { "Greg Kach": "Greg Kachadurian" },
        "series": [
            {
                "key": "sprint",
                "name": "Sprint",
                "dir": "sprint",
                "race": [
                    { "file": "s3-sc1-r.xml", "track": "Portimao", "reference": { "default": 103.14 } },
                    { "file": "s3-sc2-r.xml", "track": "Le Mans" }
                ],
                "quali": [
                    { "file": "s3-sc1.xml", "track": "Portimao", "reference": { "default": 103.14 } }
                ]
            },
            {
                "key": "multiclass",
                "dir": "multiclass",
                "classes": [
                    { "key": "p2ur", "label": "P2UR", "pattern": "LMP2_ELMS" },
                    { "key": "gt3", "label": "GT3", "pattern": "GT3" }
                ],
                "race": [
                    { "file": "s3-mc1-r.xml", "track": "Portimao", "reference": { "p2ur": 91.53, "gt3": 103.14 } }
                ]
            }
        ]
    }"#;

    fn config() -> LeagueConfig {
        LeagueConfig::parse(CONFIG, Path::new("league.json")).unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let config = config();
        assert_eq!(config.xml_dir, PathBuf::from("xml"));
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.outlier_ceiling, 107.0);
        assert_eq!(config.chart_range, [100.0, 107.0]);
        assert_eq!(config.class_suffixes, vec!["LMGT3".to_string()]);
    }

    #[test]
    fn default_identity_strips_the_default_suffix() {
        let identity = DriverIdentity::new(default_class_suffixes(), Default::default());
        assert_eq!(identity.canonical_name("Greg Kach LMGT3"), "Greg Kach");
        assert_eq!(config().identity().canonical_name("Greg Kach LMGT3"), "Greg Kachadurian");
    }

    #[test]
    fn reports_expand_per_class_and_session() {
        let slugs: Vec<String> = config().reports().unwrap().into_iter().map(|r| r.slug).collect();
        assert_eq!(
            slugs,
            vec![
                "sprint-race",
                "sprint-quali",
                "multiclass-p2ur-race",
                "multiclass-gt3-race",
            ]
        );
    }

    #[test]
    fn event_descriptors_resolve_codes_paths_and_references() {
        let reports = config().reports().unwrap();

        let sprint = &reports[0];
        assert_eq!(sprint.page_file(), "sprint_race.html");
        assert_eq!(sprint.title(), "Sprint Race Pace Data");
        assert_eq!(sprint.events[0].code, "sc1");
        assert_eq!(sprint.events[0].file, PathBuf::from("xml/sprint/s3-sc1-r.xml"));
        assert_eq!(sprint.events[0].reference_lap, 103.14);
        assert_eq!(sprint.events[1].reference_lap, 0.0);

        // unnamed series fall back to the key
        let gt3 = &reports[3];
        assert_eq!(gt3.section, "Multiclass GT3");
        assert_eq!(gt3.events[0].code, "mc1");
        assert_eq!(gt3.events[0].reference_lap, 103.14);
        assert_eq!(reports[2].events[0].reference_lap, 91.53);
    }

    #[test]
    fn derives_event_codes() {
        assert_eq!(derive_event_code("s3-sc1-r.xml").as_deref(), Some("sc1"));
        assert_eq!(derive_event_code("s3-mc4.xml").as_deref(), Some("mc4"));
        assert_eq!(derive_event_code("round1.xml").as_deref(), Some("round1"));
        assert_eq!(derive_event_code("sc1-r.xml").as_deref(), Some("sc1"));
        assert_eq!(derive_event_code("results.json"), None);
    }

    #[test]
    fn class_filter_is_case_insensitive_substring() {
        let class = ClassConfig {
            key: "gt3".to_string(),
            label: "GT3".to_string(),
            pattern: "GT3".to_string(),
        };
        assert!(class.matches("LMGT3"));
        assert!(class.matches("gt3_pro"));
        assert!(!class.matches("LMP2_ELMS"));
    }

    #[test]
    fn duplicate_event_codes_are_rejected() {
        let json = r#"{ "title": "x", "series": [ { "key": "s", "name": "S", "dir": "s", "race": [
            { "file": "a.xml", "track": "A", "code": "r1" },
            { "file": "b.xml", "track": "B", "code": "r1" } ] } ] }"#;
        let result = LeagueConfig::parse(json, Path::new("league.json"));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn duplicate_report_slugs_are_rejected() {
        let json = r#"{ "title": "x", "series": [
            { "key": "s", "dir": "a", "race": [ { "file": "a.xml", "track": "A" } ] },
            { "key": "s", "dir": "b", "race": [ { "file": "b.xml", "track": "B" } ] } ] }"#;
        let result = LeagueConfig::parse(json, Path::new("league.json"));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    struct WarningLog(Mutex<Vec<String>>);

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.0.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static WARNINGS: WarningLog = WarningLog(Mutex::new(Vec::new()));

    #[test]
    fn missing_alien_lap_is_reported_once() {
        let _ = log::set_logger(&WARNINGS);
        log::set_max_level(log::LevelFilter::Warn);

        let json = r#"{ "title": "x", "series": [ { "key": "s", "dir": "s", "race": [
            { "file": "unreferenced-round.xml", "track": "A" } ] } ] }"#;
        let config = LeagueConfig::parse(json, Path::new("league.json")).unwrap();
        let reports = config.reports().unwrap();
        assert_eq!(reports[0].events[0].reference_lap, 0.0);

        let warnings = WARNINGS.0.lock().unwrap();
        let count = warnings
            .iter()
            .filter(|line| line.contains("unreferenced-round.xml"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn empty_series_list_is_rejected() {
        let result = LeagueConfig::parse(r#"{ "title": "x", "series": [] }"#, Path::new("league.json"));
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn unparseable_config_is_reported() {
        let result = LeagueConfig::parse("{", Path::new("league.json"));
        assert!(matches!(result, Err(Error::ParseConfig { .. })));
    }
}
