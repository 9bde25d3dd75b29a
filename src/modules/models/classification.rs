use serde::{Deserialize, Serialize};

/// one finishing record of one rider in one session
#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct ClassificationRow {
    pub rider: String,
    pub position: Option<u32>,
    pub total_laps: Option<u32>,
    pub points: Option<f64>,
    pub gap_first: Option<f64>,
    pub gap_lap: Option<u32>,
    pub average_speed: Option<f64>,
    pub time: Option<String>,
    pub team: Option<String>,
    pub constructor: Option<String>,
}

impl ClassificationRow {
    pub fn new(rider: &str, position: Option<u32>, total_laps: Option<u32>) -> ClassificationRow {
        ClassificationRow {
            rider: rider.to_string(),
            position,
            total_laps,
            points: None,
            gap_first: None,
            gap_lap: None,
            average_speed: None,
            time: None,
            team: None,
            constructor: None,
        }
    }

    /// number of laps the timing sheet holds for this rider
    pub fn lap_quota(&self) -> usize {
        self.total_laps.unwrap_or(0) as usize
    }
}

/// starting position derived from qualifying
#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct GridSlot {
    pub rider: String,
    pub grid: u32,
}

impl GridSlot {
    /// # build the grid from qualifying
    /// Q2 riders first, then Q1. a rider that appears twice keeps the first slot.
    ///
    /// ## Arguments
    /// * `q2` - classification of the second qualifying segment
    /// * `q1` - classification of the first qualifying segment
    ///
    /// ## Returns
    /// * `Vec<GridSlot>` - the grid numbered from 1
    pub fn from_qualifying(q2: &[ClassificationRow], q1: &[ClassificationRow]) -> Vec<GridSlot> {
        let mut grid: Vec<GridSlot> = Vec::new();

        for row in q2.iter().chain(q1.iter()) {
            if grid.iter().any(|slot| slot.rider == row.rider) {
                continue;
            }

            grid.push(GridSlot {
                rider: row.rider.clone(),
                grid: grid.len() as u32 + 1,
            });
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_keeps_first_occurrence() {
        let q2 = vec![
            ClassificationRow::new("Francesco Bagnaia", Some(1), Some(5)),
            ClassificationRow::new("Jorge Martin", Some(2), Some(5)),
        ];
        let q1 = vec![
            ClassificationRow::new("Jorge Martin", Some(1), Some(6)),
            ClassificationRow::new("Marc Marquez", Some(3), Some(6)),
        ];

        let grid = GridSlot::from_qualifying(&q2, &q1);
        let riders: Vec<(&str, u32)> = grid.iter().map(|g| (g.rider.as_str(), g.grid)).collect();
        assert_eq!(
            riders,
            vec![("Francesco Bagnaia", 1), ("Jorge Martin", 2), ("Marc Marquez", 3)]
        );
    }

    #[test]
    fn missing_laps_means_no_quota() {
        assert_eq!(ClassificationRow::new("A", None, None).lap_quota(), 0);
        assert_eq!(ClassificationRow::new("A", Some(1), Some(27)).lap_quota(), 27);
    }
}
