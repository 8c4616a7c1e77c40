use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::errors::{
    CustomResult, MalformedXmlSnafu, MissingFileSnafu, MissingSessionSnafu, ReadFileSnafu,
};
use crate::modules::helpers::lap::LapHelper;

/// One `<Driver>` element of a result file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub name: String,
    pub car_type: String,
    pub car_class: String,
    pub car_number: String,
    pub position: String,
    /// `BestLapTime` exactly as found in the file
    pub best_lap_time: String,
    /// best lap as displayed: `M:SS.sss`, the raw value, or `DNF`
    pub best_lap: String,
    pub laps: String,
    pub finish_status: String,
}

impl ResultEntry {
    fn from_fields(mut fields: HashMap<String, String>) -> ResultEntry {
        let mut take = |key: &str, default: &str| {
            fields.remove(key).unwrap_or_else(|| default.to_string())
        };

        let best_lap_time = take("BestLapTime", "");
        ResultEntry {
            name: take("Name", "Unknown"),
            car_type: take("CarType", "Unknown"),
            car_class: take("CarClass", "Unknown"),
            car_number: take("CarNumber", "N/A"),
            position: take("Position", "N/A"),
            best_lap: LapHelper::display_best_lap(&best_lap_time),
            best_lap_time,
            laps: take("Laps", "0"),
            finish_status: take("FinishStatus", ""),
        }
    }
}

const ROOT_DEPTH: usize = 0;
const RESULTS_DEPTH: usize = 1;
const SESSION_DEPTH: usize = 2;
const DRIVER_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

/// Walks the document keeping the drivers of the last session inside the first
/// element below the root.
#[derive(Default)]
struct ResultsParser {
    root_children: usize,
    in_results: bool,
    session: Option<Vec<ResultEntry>>,
    driver: Option<HashMap<String, String>>,
    field: Option<(String, String)>,
}

impl ResultsParser {
    fn open(&mut self, name: &str, depth: usize) {
        match depth {
            ROOT_DEPTH => {}
            RESULTS_DEPTH => {
                self.root_children += 1;
                self.in_results = self.root_children == 1;
            }
            SESSION_DEPTH if self.in_results => self.session = Some(Vec::new()),
            DRIVER_DEPTH if self.in_results && name == "Driver" => {
                self.driver = Some(HashMap::new())
            }
            FIELD_DEPTH if self.driver.is_some() => {
                self.field = Some((name.to_string(), String::new()))
            }
            _ => {}
        }
    }

    fn close(&mut self, depth: usize) {
        match depth {
            RESULTS_DEPTH => self.in_results = false,
            DRIVER_DEPTH => {
                if let (Some(fields), Some(session)) = (self.driver.take(), self.session.as_mut()) {
                    session.push(ResultEntry::from_fields(fields));
                }
            }
            FIELD_DEPTH => {
                if let (Some((name, text)), Some(fields)) = (self.field.take(), self.driver.as_mut()) {
                    // the first element with a given name wins
                    fields.entry(name).or_insert(text);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str, depth: usize) {
        if depth != FIELD_DEPTH + 1 {
            return;
        }
        if let Some((_, value)) = self.field.as_mut() {
            value.push_str(text);
        }
    }
}

/// # parse a result document
/// extract the driver entries of the final session of a result document
///
/// ## Arguments
/// * `xml` - the document
/// * `path` - where the document came from, used in errors
///
/// ## Returns
/// * `Vec<ResultEntry>` - the driver entries in document order
pub fn parse_results(xml: &str, path: &Path) -> CustomResult<Vec<ResultEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut parser = ResultsParser::default();
    let mut depth = 0;

    loop {
        match reader.read_event().context(MalformedXmlSnafu { path })? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                parser.open(&name, depth);
                depth += 1;
            }
            Event::Empty(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                parser.open(&name, depth);
                parser.close(depth);
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                parser.close(depth);
            }
            Event::Text(text) => {
                let text = text.unescape().context(MalformedXmlSnafu { path })?;
                parser.text(&text, depth);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                parser.text(&String::from_utf8_lossy(&data), depth);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    parser.session.ok_or_else(|| MissingSessionSnafu { path }.build())
}

/// # load a result file
///
/// ## Returns
/// * `Vec<ResultEntry>` - the driver entries of the file's final session
pub fn load_result_file(path: &Path) -> CustomResult<Vec<ResultEntry>> {
    if !path.exists() {
        return MissingFileSnafu { path }.fail();
    }

    let bytes = fs::read(path).context(ReadFileSnafu { path })?;
    let xml = match String::from_utf8(bytes) {
        Ok(xml) => xml,
        Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
    };

    parse_results(xml.trim_start_matches('\u{feff}'), path)
}

/// Parsed result files of one run. Multiclass files feed one report per class,
/// so every file is parsed once and reused.
#[derive(Default)]
pub struct ResultFileCache {
    files: HashMap<PathBuf, Vec<ResultEntry>>,
}

impl ResultFileCache {
    pub fn new() -> ResultFileCache {
        ResultFileCache::default()
    }

    pub fn load(&mut self, path: &Path) -> CustomResult<&[ResultEntry]> {
        if !self.files.contains_key(path) {
            let entries = load_result_file(path)?;
            debug!(target: "result_file", "parsed {} driver entries from {}", entries.len(), path.display());
            self.files.insert(path.to_path_buf(), entries);
        }

        Ok(self.files.get(path).map(Vec::as_slice).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    const RESULTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rFactorXML version="1.0">
  <RaceResults>
    <TrackVenue>Autodromo Internacional do Algarve</TrackVenue>
    <Qualify>
      <Driver>
        <Name>Stale Qualifier</Name>
        <BestLapTime>101.000</BestLapTime>
      </Driver>
    </Qualify>
    <Race>
      <Driver>
        <Name>Greg Kach LMGT3</Name>
        <CarType>Porsche 911 GT3 R</CarType>
        <CarClass>GT3</CarClass>
        <CarNumber>12</CarNumber>
        <Position>1</Position>
        <Lap num="1">106.2</Lap>
        <BestLapTime>103.512</BestLapTime>
        <Laps>24</Laps>
        <FinishStatus>Finished Normally</FinishStatus>
      </Driver>
      <Driver>
        <Name>Ross &amp; Co</Name>
        <CarClass><![CDATA[LMP2_ELMS]]></CarClass>
        <BestLapTime/>
        <FinishStatus>DNF</FinishStatus>
      </Driver>
    </Race>
  </RaceResults>
  <Other><Race><Driver><Name>Ignored</Name></Driver></Race></Other>
</rFactorXML>"#;

    #[test]
    fn reads_drivers_of_the_last_session() {
        let entries = parse_results(RESULTS, Path::new("s3-sc1-r.xml")).unwrap();
        assert_eq!(entries.len(), 2);

        let winner = &entries[0];
        assert_eq!(winner.name, "Greg Kach LMGT3");
        assert_eq!(winner.car_type, "Porsche 911 GT3 R");
        assert_eq!(winner.car_class, "GT3");
        assert_eq!(winner.car_number, "12");
        assert_eq!(winner.position, "1");
        assert_eq!(winner.best_lap_time, "103.512");
        assert_eq!(winner.best_lap, "1:43.512");
        assert_eq!(winner.laps, "24");
        assert_eq!(winner.finish_status, "Finished Normally");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let entries = parse_results(RESULTS, Path::new("s3-sc1-r.xml")).unwrap();
        let retired = &entries[1];
        assert_eq!(retired.name, "Ross & Co");
        assert_eq!(retired.car_class, "LMP2_ELMS");
        assert_eq!(retired.car_type, "Unknown");
        assert_eq!(retired.car_number, "N/A");
        assert_eq!(retired.best_lap, "DNF");
        assert_eq!(retired.laps, "0");
    }

    #[test]
    fn document_without_session_is_an_error() {
        let result = parse_results("<rFactorXML><RaceResults/></rFactorXML>", Path::new("x.xml"));
        assert!(matches!(result, Err(Error::MissingSession { .. })));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = parse_results("<rFactorXML><RaceResults><Race></Qualify>", Path::new("x.xml"));
        assert!(matches!(result, Err(Error::MalformedXml { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_result_file(Path::new("does/not/exist.xml"));
        assert!(matches!(result, Err(Error::MissingFile { .. })));
    }
}
