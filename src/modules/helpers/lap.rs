pub struct LapHelper {}

/// marker written by the extractor when a driver has no best lap
pub const DID_NOT_FINISH: &str = "DNF";

impl LapHelper {
    /// # parse a lap time
    /// convert a lap time representation to seconds.
    ///
    /// ### accepted formats
    /// - `M:SS.sss` (minutes and seconds)
    /// - `103.14` (bare seconds)
    ///
    /// ## Returns
    /// * `Option<f64>` - the lap time in seconds, `None` when the representation is empty,
    ///   a DNF marker, unparseable, signed on either side of the `:` or not a positive time
    pub fn parse_lap_time(representation: &str) -> Option<f64> {
        let value = representation.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(DID_NOT_FINISH) {
            return None;
        }

        let seconds = match value.split_once(':') {
            Some((minutes, seconds)) => {
                let (minutes, seconds) = (minutes.trim(), seconds.trim());
                if [minutes, seconds].iter().any(|part| part.starts_with(['-', '+'])) {
                    return None;
                }
                let minutes: f64 = minutes.parse().ok()?;
                let seconds: f64 = seconds.parse().ok()?;
                minutes * 60.0 + seconds
            }
            None => value.parse::<f64>().ok()?,
        };

        if seconds.is_finite() && seconds > 0.0 {
            Some(seconds)
        } else {
            None
        }
    }

    /// # format a lap time
    /// format seconds as `M:SS.sss`, rounded to the millisecond
    pub fn format_lap_time(seconds: f64) -> String {
        let total_millis = (seconds * 1000.0).round().max(0.0) as u64;
        let minutes = total_millis / 60_000;
        let remainder = total_millis % 60_000;

        format!("{}:{:02}.{:03}", minutes, remainder / 1000, remainder % 1000)
    }

    /// # display representation of a raw best lap
    /// numeric values are shown as `M:SS.sss`, anything else is passed through, and an
    /// empty value becomes the DNF marker
    pub fn display_best_lap(raw: &str) -> String {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(seconds) if seconds.is_finite() && seconds > 0.0 => LapHelper::format_lap_time(seconds),
            _ if raw.is_empty() => DID_NOT_FINISH.to_string(),
            _ => raw.to_string(),
        }
    }
}
