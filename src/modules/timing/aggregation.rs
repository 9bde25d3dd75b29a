use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::modules::helpers::math::Math;
use crate::modules::models::classification::{ClassificationRow, GridSlot};
use crate::modules::models::lap::{LapRecord, LapTable};

#[derive(Clone, Copy, Serialize, PartialEq, Eq, Debug)]
pub enum GroupBy {
    Rider,
    Team,
    Constructor,
}

impl GroupBy {
    fn key<'r>(&self, record: &'r LapRecord) -> Option<&'r str> {
        match self {
            GroupBy::Rider => Some(&record.rider),
            GroupBy::Team => record.team.as_deref(),
            GroupBy::Constructor => record.constructor.as_deref(),
        }
    }
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct LapMatrixRow {
    pub lap: u32,
    /// one cell per column, `None` when nobody of that column drove the lap
    pub values: Vec<Option<f64>>,
    pub avg_laptime: Option<f64>,
}

/// lap times with laps as rows and riders, teams or constructors as columns
#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct LapMatrix {
    pub group_by: GroupBy,
    pub columns: Vec<String>,
    pub rows: Vec<LapMatrixRow>,
}

impl LapMatrix {
    pub fn cell(&self, lap: u32, column: &str) -> Option<f64> {
        let column = self.columns.iter().position(|c| c == column)?;
        let row = self.rows.iter().find(|r| r.lap == lap)?;
        row.values[column]
    }
}

/// # pivot the lap table
/// laps that share a cell (two riders of one team) are averaged. records without
/// a team or constructor are left out of those pivots.
///
/// ## Arguments
/// * `table` - the assembled laps
/// * `group_by` - what goes into the columns
///
/// ## Returns
/// * `LapMatrix` - columns sorted by name, rows sorted by lap
pub fn pivot(table: &LapTable, group_by: GroupBy) -> LapMatrix {
    let mut cells: BTreeMap<u32, BTreeMap<&str, Vec<f64>>> = BTreeMap::new();
    let mut columns: Vec<String> = Vec::new();

    for record in &table.records {
        let key = match group_by.key(record) {
            Some(key) => key,
            None => continue,
        };

        if !columns.iter().any(|c| c == key) {
            columns.push(key.to_string());
        }

        cells
            .entry(record.lap)
            .or_default()
            .entry(key)
            .or_default()
            .push(record.laptime_sec);
    }
    columns.sort();

    let rows = cells
        .into_iter()
        .map(|(lap, by_column)| {
            let values: Vec<Option<f64>> = columns
                .iter()
                .map(|c| by_column.get(c.as_str()).and_then(|times| Math::mean(times)))
                .collect();
            let present: Vec<f64> = values.iter().flatten().copied().collect();

            LapMatrixRow {
                lap,
                avg_laptime: Math::mean(&present),
                values,
            }
        })
        .collect();

    LapMatrix {
        group_by,
        columns,
        rows,
    }
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct RiderStats {
    pub rider: String,
    pub team: Option<String>,
    pub constructor: Option<String>,
    pub laps: usize,
    pub min_laptime: f64,
    pub avg_laptime: f64,
    pub std_laptime: Option<f64>,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub std_speed: Option<f64>,
}

/// # rider statistics
/// lap time and speed figures per rider, riders sorted by name. team and
/// constructor are the ones seen on most of the rider's laps.
pub fn rider_stats(table: &LapTable) -> Vec<RiderStats> {
    let mut by_rider: BTreeMap<&str, Vec<&LapRecord>> = BTreeMap::new();
    for record in &table.records {
        by_rider.entry(&record.rider).or_default().push(record);
    }

    by_rider
        .into_iter()
        .filter_map(|(rider, laps)| {
            let times: Vec<f64> = laps.iter().map(|l| l.laptime_sec).collect();
            let speeds: Vec<f64> = laps.iter().map(|l| l.speed).collect();

            Some(RiderStats {
                rider: rider.to_string(),
                team: Math::mode(laps.iter().filter_map(|l| l.team.as_deref())),
                constructor: Math::mode(laps.iter().filter_map(|l| l.constructor.as_deref())),
                laps: laps.len(),
                min_laptime: Math::min(&times)?,
                avg_laptime: Math::mean(&times)?,
                std_laptime: Math::standard_deviation(&times),
                max_speed: Math::max(&speeds)?,
                avg_speed: Math::mean(&speeds)?,
                std_speed: Math::standard_deviation(&speeds),
            })
        })
        .collect()
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct PerformanceRow {
    pub constructor: Option<String>,
    pub team: Option<String>,
    pub rider: String,
    pub grid: Option<u32>,
    pub pos_delta: Option<i64>,
    pub position: Option<u32>,
    pub points: Option<f64>,
    pub laps: Option<u32>,
    pub race_completion: Option<f64>,
    pub gap_first: Option<f64>,
    pub gap_prev: Option<f64>,
    pub min_laptime: f64,
    pub avg_laptime: f64,
    pub delta_avg_laptime: f64,
    pub rel_delta_avg_laptime: f64,
    pub std_laptime: Option<f64>,
    pub delta_std_laptime: Option<f64>,
    pub rel_delta_std_laptime: Option<f64>,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub std_speed: Option<f64>,
    pub pace_speed_index: Option<f64>,
    pub pace_consistency_index: Option<f64>,
    pub performance_index: Option<f64>,
}

fn by_position(a: &Option<u32>, b: &Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// # performance rows
/// compares every rider against the field: pace (mean lap time) and
/// consistency (lap time deviation), both scaled by how much of the race the
/// rider completed, plus the places won or lost against the grid.
///
/// ## Arguments
/// * `stats` - the rider statistics of the race
/// * `classification` - the race results
/// * `grid` - the starting grid
///
/// ## Returns
/// * `Vec<PerformanceRow>` - ordered by finishing position, unclassified riders last
pub fn performance(
    stats: &[RiderStats],
    classification: &[ClassificationRow],
    grid: &[GridSlot],
) -> Vec<PerformanceRow> {
    let mut joined: Vec<(&RiderStats, Option<&ClassificationRow>)> = stats
        .iter()
        .map(|s| (s, classification.iter().find(|row| row.rider == s.rider)))
        .collect();
    joined.sort_by(|(_, a), (_, b)| by_position(&a.and_then(|r| r.position), &b.and_then(|r| r.position)));

    let max_laps = joined
        .iter()
        .filter_map(|(_, row)| row.and_then(|r| r.total_laps))
        .max();
    let field_avg = Math::mean(&stats.iter().map(|s| s.avg_laptime).collect::<Vec<f64>>()).unwrap_or(0.0);
    let field_std = Math::mean(&stats.iter().filter_map(|s| s.std_laptime).collect::<Vec<f64>>());
    let classified = joined
        .iter()
        .filter(|(_, row)| row.and_then(|r| r.position).is_some())
        .count() as i64;

    let mut previous_gap: Option<f64> = None;
    let mut rows = Vec::with_capacity(joined.len());
    for (index, (s, row)) in joined.into_iter().enumerate() {
        let position = row.and_then(|r| r.position);
        let laps = row.and_then(|r| r.total_laps);
        let gap_first = row.and_then(|r| r.gap_first);

        let gap_prev = match (index, gap_first, previous_gap) {
            (0, _, _) => None,
            (_, Some(gap), Some(prev)) => Some((gap - prev).max(0.0)),
            _ => None,
        };
        previous_gap = gap_first;

        let race_completion = match (laps, max_laps) {
            (Some(laps), Some(max)) if max > 0 => {
                Some(Math::round_float_to_n_decimals(laps as f64 / max as f64, 2))
            }
            _ => None,
        };

        let delta_avg_laptime = field_avg - s.avg_laptime;
        let delta_std_laptime = match (field_std, s.std_laptime) {
            (Some(field), Some(std)) => Some(field - std),
            _ => None,
        };
        let rel_delta_std_laptime = match (delta_std_laptime, field_std) {
            (Some(delta), Some(field)) => Some(delta / field * 100.0),
            _ => None,
        };

        let pace_speed_index = race_completion.map(|c| delta_avg_laptime * c);
        let pace_consistency_index = match (delta_std_laptime, race_completion) {
            (Some(delta), Some(c)) => Some(delta * c),
            _ => None,
        };
        let indices: Vec<f64> = [pace_consistency_index, pace_speed_index]
            .into_iter()
            .flatten()
            .collect();

        let grid_slot = grid.iter().find(|g| g.rider == s.rider).map(|g| g.grid);
        let pos_delta = match (grid_slot, position) {
            (Some(g), Some(p)) => Some(g as i64 - p as i64),
            (Some(g), None) => Some(g as i64 - classified),
            (None, _) => None,
        };

        rows.push(PerformanceRow {
            constructor: s.constructor.clone(),
            team: s.team.clone(),
            rider: s.rider.clone(),
            grid: grid_slot,
            pos_delta,
            position,
            points: row.and_then(|r| r.points),
            laps,
            race_completion,
            gap_first,
            gap_prev,
            min_laptime: s.min_laptime,
            avg_laptime: s.avg_laptime,
            delta_avg_laptime,
            rel_delta_avg_laptime: delta_avg_laptime / field_avg * 100.0,
            std_laptime: s.std_laptime,
            delta_std_laptime,
            rel_delta_std_laptime,
            max_speed: s.max_speed,
            avg_speed: s.avg_speed,
            std_speed: s.std_speed,
            pace_speed_index,
            pace_consistency_index,
            performance_index: Math::mean(&indices),
        });
    }

    rows
}
