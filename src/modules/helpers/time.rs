use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::errors::{CustomResult, FormatSnafu};

lazy_static! {
    // total race time as shown in the classification, e.g. 41:12.345
    static ref TOTAL_TIME_RE: Regex = Regex::new(r"^(\d{1,2}):(\d{1,2})\.(\d{1,6})$").unwrap();
    // lap time as printed on the analysis sheet, e.g. 1'39.894
    static ref LAP_TIME_RE: Regex = Regex::new(r"^(\d{1,2})'(\d{1,2})\.(\d{1,6})$").unwrap();
}

const TOTAL_TIME_FORMAT: &str = "MM:SS.mmm";
const LAP_TIME_FORMAT: &str = "MM'SS.mmm";

#[derive(Clone, Copy, Serialize, PartialEq, Debug)]
pub enum RaceClock {
    /// `MM:SS.mmm` text, expressed in minutes
    Minutes(f64),
    /// `MM'SS.mmm` text, expressed in seconds
    Seconds(f64),
}

/// # parse race clock text
/// the separator decides the unit: `:` gives minutes, `'` gives seconds.
///
/// ## Arguments
/// * `text` - the time as text, may be empty
///
/// ## Returns
/// * `Option<RaceClock>` - `None` when no time was recorded
pub fn parse_race_clock(text: &str) -> CustomResult<Option<RaceClock>> {
    if text.contains('\'') {
        Ok(lap_time_to_seconds(text)?.map(RaceClock::Seconds))
    } else {
        Ok(total_time_to_minutes(text)?.map(RaceClock::Minutes))
    }
}

/// `MM:SS.mmm` to minutes
pub fn total_time_to_minutes(text: &str) -> CustomResult<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (minutes, seconds, micros) = split_clock(&TOTAL_TIME_RE, text, TOTAL_TIME_FORMAT)?;
    let seconds = seconds as f64 + micros as f64 / 1_000_000.0;
    Ok(Some(minutes as f64 + seconds / 60.0))
}

/// `MM'SS.mmm` to seconds
pub fn lap_time_to_seconds(text: &str) -> CustomResult<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (minutes, seconds, micros) = split_clock(&LAP_TIME_RE, text, LAP_TIME_FORMAT)?;
    Ok(Some(
        (minutes * 60 + seconds) as f64 + micros as f64 / 1_000_000.0,
    ))
}

/// # format minutes
/// render minutes as `MM:SS.sss`
pub fn format_minutes(total_minutes: f64) -> String {
    let mut minutes = total_minutes.trunc() as u64;
    let mut seconds = ((total_minutes - total_minutes.trunc()) * 60.0 * 1000.0).round() / 1000.0;
    if seconds >= 60.0 {
        minutes += 1;
        seconds -= 60.0;
    }

    format!("{minutes:02}:{seconds:06.3}")
}

fn split_clock(re: &Regex, text: &str, expected: &str) -> CustomResult<(u64, u64, u64)> {
    let caps = match re.captures(text) {
        Some(caps) => caps,
        None => return FormatSnafu { text, expected }.fail(),
    };

    let minutes = number_at(&caps, 1, text, expected)?;
    let seconds = number_at(&caps, 2, text, expected)?;
    if seconds >= 60 {
        return FormatSnafu { text, expected }.fail();
    }

    // the fraction is read like strptime's %f: right padded to microseconds
    let fraction = &caps[3];
    let micros = format!("{fraction:0<6}");
    let micros = match micros.parse::<u64>() {
        Ok(micros) => micros,
        Err(_) => return FormatSnafu { text, expected }.fail(),
    };

    Ok((minutes, seconds, micros))
}

fn number_at(caps: &Captures, index: usize, text: &str, expected: &str) -> CustomResult<u64> {
    match caps[index].parse::<u64>() {
        Ok(number) => Ok(number),
        Err(_) => FormatSnafu { text, expected }.fail(),
    }
}
