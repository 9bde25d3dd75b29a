use std::collections::VecDeque;

use log::{debug, warn};

use crate::errors::{
    CustomResult, FormatSnafu, MalformedLapLineSnafu, ShortTimingDataSnafu,
};
use crate::modules::helpers::time::lap_time_to_seconds;
use crate::modules::models::classification::ClassificationRow;
use crate::modules::models::lap::{LapLineToken, LapRecord, LapTable, LAP_LINE_FIELDS};
use crate::modules::models::rider::Rider;

/// Hands out the lap lines of one rider at a time.
pub trait LapSource {
    /// take the next `count` lap lines for `rider`. fails with
    /// `ShortTimingDataError` without consuming anything when fewer are left.
    fn next_lines_for(&mut self, rider: &str, count: usize) -> CustomResult<Vec<LapLineToken>>;

    /// lines not handed out yet
    fn remaining(&self) -> usize;
}

/// The lap lines of every rider in one pool, in sheet order. Riders get the
/// lines from the front, so the sheet has to list riders in classification order.
pub struct PooledLapSource {
    lines: VecDeque<String>,
}

impl PooledLapSource {
    pub fn new(lines: Vec<String>) -> PooledLapSource {
        PooledLapSource {
            lines: lines.into(),
        }
    }
}

impl LapSource for PooledLapSource {
    fn next_lines_for(&mut self, rider: &str, count: usize) -> CustomResult<Vec<LapLineToken>> {
        if count > self.lines.len() {
            return ShortTimingDataSnafu {
                rider,
                needed: count,
                available: self.lines.len(),
            }
            .fail();
        }

        let mut tokens = Vec::with_capacity(count);
        for (index, line) in self.lines.drain(..count).enumerate() {
            match LapLineToken::tokenize(&line) {
                Some(token) => tokens.push(token),
                None => {
                    return MalformedLapLineSnafu {
                        rider,
                        lap: index + 1,
                        line,
                        reason: format!("expected {LAP_LINE_FIELDS} fields"),
                    }
                    .fail()
                }
            }
        }

        Ok(tokens)
    }

    fn remaining(&self) -> usize {
        self.lines.len()
    }
}

/// How much the lap column of the sheet is trusted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LapValidation {
    /// laps are numbered by position; a differing lap column is only logged
    #[default]
    Positional,
    /// the lap column has to read 1, 2, 3, ... for every rider
    Strict,
}

pub struct LapTableAssembler<'a> {
    roster: &'a [Rider],
    validation: LapValidation,
}

impl<'a> LapTableAssembler<'a> {
    pub fn new(roster: &'a [Rider], validation: LapValidation) -> LapTableAssembler<'a> {
        LapTableAssembler { roster, validation }
    }

    /// # assemble the lap table
    /// every classified rider takes `total_laps` lines from the source, in
    /// classification order. riders without laps take none.
    ///
    /// ## Arguments
    /// * `classification` - the session results, in finishing order
    /// * `source` - the lap lines of the session
    ///
    /// ## Returns
    /// * `LapTable` - one record per consumed line
    pub fn assemble(
        &self,
        classification: &[ClassificationRow],
        source: &mut dyn LapSource,
    ) -> CustomResult<LapTable> {
        let mut records: Vec<LapRecord> = Vec::new();

        for row in classification {
            let quota = row.lap_quota();
            if quota == 0 {
                debug!(target: "timing/assembler", "{} has no laps, skipping", row.rider);
                continue;
            }

            let rider = Rider::find_by_full_name(self.roster, &row.rider);
            if rider.is_none() {
                warn!(target: "timing/assembler", "{} is not on the roster, using classification team", row.rider);
            }

            let tokens = source.next_lines_for(&row.rider, quota)?;
            for (index, token) in tokens.into_iter().enumerate() {
                records.push(self.record(row, index as u32 + 1, token, rider)?);
            }
        }

        debug!(
            target: "timing/assembler",
            "assembled {} laps, {} lines left over",
            records.len(),
            source.remaining()
        );

        Ok(LapTable::new(records))
    }

    fn record(
        &self,
        row: &ClassificationRow,
        lap: u32,
        token: LapLineToken,
        rider: Option<&Rider>,
    ) -> CustomResult<LapRecord> {
        let rider_name = row.rider.as_str();
        if token.lap.parse::<u32>().ok() != Some(lap) {
            if self.validation == LapValidation::Strict {
                return MalformedLapLineSnafu {
                    rider: rider_name,
                    lap: lap as usize,
                    line: token.raw,
                    reason: format!("lap column reads '{}'", token.lap),
                }
                .fail();
            }

            warn!(
                target: "timing/assembler",
                "{} lap {}: sheet says lap '{}'", rider_name, lap, token.lap
            );
        }

        let laptime_sec = match lap_time_to_seconds(&token.time)? {
            Some(seconds) => seconds,
            None => {
                return FormatSnafu {
                    text: token.raw,
                    expected: "a lap time",
                }
                .fail()
            }
        };

        Ok(LapRecord {
            rider: rider_name.to_string(),
            lap,
            laptime_sec,
            t1: number(&token.t1)?,
            t2: number(&token.t2)?,
            t3: number(&token.t3)?,
            t4: number(&token.t4)?,
            speed: number(&token.speed)?,
            laptime_str: token.time,
            constructor: rider
                .and_then(|r| r.constructor.clone())
                .or_else(|| row.constructor.clone()),
            team: rider.and_then(|r| r.team.clone()).or_else(|| row.team.clone()),
        })
    }
}

fn number(text: &str) -> CustomResult<f64> {
    match text.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => FormatSnafu {
            text,
            expected: "a decimal number",
        }
        .fail(),
    }
}
