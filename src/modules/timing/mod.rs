pub mod aggregation;
pub mod assembler;
pub mod name_matcher;
pub mod segmenter;

use log::{info, warn};
use serde::Serialize;

use crate::errors::CustomResult;
use crate::modules::models::classification::{ClassificationRow, GridSlot};
use crate::modules::models::lap::LapTable;
use crate::modules::models::rider::Rider;
use aggregation::{pivot, GroupBy, LapMatrix, PerformanceRow, RiderStats};
use assembler::{LapTableAssembler, LapValidation, PooledLapSource};
use name_matcher::RiderMatcher;
use segmenter::segment_lap_lines;

/// everything derived from one analysis sheet
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct RaceAnalysis {
    pub riders_in_sheet: Vec<String>,
    pub laps: LapTable,
    pub by_rider: LapMatrix,
    pub by_team: LapMatrix,
    pub by_constructor: LapMatrix,
    pub stats: Vec<RiderStats>,
    pub performance: Option<Vec<PerformanceRow>>,
}

/// # analyse a race
/// turn the text of an analysis sheet into the lap table and everything built on it
///
/// ## Arguments
/// * `text` - the text extracted from the sheet
/// * `roster` - the riders of the season
/// * `classification` - the results of the session the sheet belongs to
/// * `grid` - the starting grid. performance rows are only built when given
/// * `validation` - how much the lap column of the sheet is trusted
///
/// ## Returns
/// * `RaceAnalysis` - the laps, pivots and statistics
pub fn analyse_race(
    text: &str,
    roster: &[Rider],
    classification: &[ClassificationRow],
    grid: Option<&[GridSlot]>,
    validation: LapValidation,
) -> CustomResult<RaceAnalysis> {
    let riders_in_sheet = RiderMatcher::new(roster).discover_riders(text.lines());
    for row in classification {
        if row.lap_quota() > 0 && !riders_in_sheet.contains(&row.rider) {
            warn!(target: "timing/analyse_race", "{} is classified but was not found in the sheet", row.rider);
        }
    }

    let mut source = PooledLapSource::new(segment_lap_lines(text));
    let laps = LapTableAssembler::new(roster, validation).assemble(classification, &mut source)?;
    info!(
        target: "timing/analyse_race",
        "{} laps of {} riders assembled", laps.len(), laps.riders().len()
    );

    let stats = aggregation::rider_stats(&laps);
    let performance = grid.map(|grid| aggregation::performance(&stats, classification, grid));

    Ok(RaceAnalysis {
        riders_in_sheet,
        by_rider: pivot(&laps, GroupBy::Rider),
        by_team: pivot(&laps, GroupBy::Team),
        by_constructor: pivot(&laps, GroupBy::Constructor),
        laps,
        stats,
        performance,
    })
}
