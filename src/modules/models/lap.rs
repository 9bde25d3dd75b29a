use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, NoMatchSnafu};

/// fields of a lap line in the order the analysis sheet prints them
pub const LAP_LINE_FIELDS: usize = 7;

/// one segmented line of the analysis sheet, not yet parsed
#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct LapLineToken {
    pub time: String,
    pub lap: String,
    pub t1: String,
    pub t2: String,
    pub t3: String,
    pub speed: String,
    pub t4: String,
    pub raw: String,
}

impl LapLineToken {
    /// # tokenize a lap line
    /// split by whitespace into `[time, lap, t1, t2, t3, speed, t4]`.
    /// extra trailing fields are ignored.
    ///
    /// ## Returns
    /// * `Option<LapLineToken>` - `None` when the line has too few fields
    pub fn tokenize(line: &str) -> Option<LapLineToken> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < LAP_LINE_FIELDS {
            return None;
        }

        Some(LapLineToken {
            time: fields[0].to_string(),
            lap: fields[1].to_string(),
            t1: fields[2].to_string(),
            t2: fields[3].to_string(),
            t3: fields[4].to_string(),
            speed: fields[5].to_string(),
            t4: fields[6].to_string(),
            raw: line.to_string(),
        })
    }
}

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct LapRecord {
    pub rider: String,
    pub lap: u32,
    pub laptime_str: String,
    pub laptime_sec: f64,
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub t4: f64,
    pub speed: f64,
    pub constructor: Option<String>,
    pub team: Option<String>,
}

/// all laps of one session, in sheet order
#[derive(Serialize, PartialEq, Debug, Clone, Deserialize, Default)]
pub struct LapTable {
    pub records: Vec<LapRecord>,
}

impl LapTable {
    pub fn new(records: Vec<LapRecord>) -> LapTable {
        LapTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// # laps of a rider
    ///
    /// ## Arguments
    /// * `rider` - the full name of the rider
    ///
    /// ## Returns
    /// * `Vec<&LapRecord>` - the laps, fails with `NoMatchError` when there are none
    pub fn rider_laps(&self, rider: &str) -> CustomResult<Vec<&LapRecord>> {
        let laps: Vec<&LapRecord> = self
            .records
            .iter()
            .filter(|record| record.rider == rider)
            .collect();

        if laps.is_empty() {
            return NoMatchSnafu { rider }.fail();
        }

        Ok(laps)
    }

    /// riders in order of their first lap
    pub fn riders(&self) -> Vec<&str> {
        let mut riders: Vec<&str> = Vec::new();
        for record in &self.records {
            if !riders.contains(&record.rider.as_str()) {
                riders.push(&record.rider);
            }
        }

        riders
    }
}
