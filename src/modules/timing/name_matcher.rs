use log::debug;
use substring::Substring;

use crate::modules::models::rider::Rider;

/// share of the given name that has to be present in a line
const NAME_PREFIX: f64 = 0.65;
/// share of the upper cased surname that has to be present in a line
const SURNAME_PREFIX: f64 = 0.75;

/// prefix of `word` holding `share` of its characters, rounded down.
/// never shorter than one character, an empty prefix would match any line
pub fn prefix(word: &str, share: f64) -> &str {
    let length = ((word.chars().count() as f64 * share).floor() as usize).max(1);
    word.substring(0, length)
}

struct Pattern {
    full_name: String,
    name: String,
    surname: String,
}

/// Finds roster riders in lines of extracted sheet text.
///
/// Text extraction tends to cut names short or glue them to the next column,
/// so a rider counts as mentioned when a prefix of the given name and a prefix
/// of the upper cased surname both occur in the line.
pub struct RiderMatcher {
    patterns: Vec<Pattern>,
}

impl RiderMatcher {
    pub fn new(roster: &[Rider]) -> RiderMatcher {
        let patterns = roster
            .iter()
            .map(|rider| {
                let surname = rider.surname.to_uppercase();
                Pattern {
                    full_name: rider.full_name(),
                    name: prefix(&rider.name, NAME_PREFIX).to_string(),
                    surname: prefix(&surname, SURNAME_PREFIX).to_string(),
                }
            })
            .collect();

        RiderMatcher { patterns }
    }

    /// full names of the riders mentioned in `line`, roster order
    pub fn mentioned_in<'a>(&'a self, line: &str) -> Vec<&'a str> {
        self.patterns
            .iter()
            .filter(|p| line.contains(p.name.as_str()) && line.contains(p.surname.as_str()))
            .map(|p| p.full_name.as_str())
            .collect()
    }

    /// # discover riders
    /// walk all lines and collect every rider once, in order of first appearance
    ///
    /// ## Arguments
    /// * `lines` - the lines of the extracted text
    ///
    /// ## Returns
    /// * `Vec<String>` - the full names of the riders seen
    pub fn discover_riders<'l, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut riders: Vec<String> = Vec::new();

        for line in lines {
            for rider in self.mentioned_in(line) {
                if !riders.iter().any(|seen| seen == rider) {
                    debug!(target: "timing/name_matcher", "found {} in sheet", rider);
                    riders.push(rider.to_string());
                }
            }
        }

        riders
    }
}
