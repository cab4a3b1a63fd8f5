use crate::model::reading::{YearRecord, MONTHS_PER_YEAR};
use crate::model::theme::{Theme, ThemeColors};

/// Everything a renderer needs to draw one year: twelve slots per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub electricity: [Option<f64>; 12],
    pub gas: [Option<f64>; 12],
    pub colors: ThemeColors,
}

impl ChartData {
    /// No month has a reading; renderers skip drawing.
    pub fn is_empty(&self) -> bool {
        self.electricity.iter().all(Option::is_none)
    }

    /// Largest value across both series, for axis bounds.
    pub fn max_value(&self) -> f64 {
        self.electricity
            .iter()
            .chain(self.gas.iter())
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Smallest value across both series, never above zero.
    pub fn min_value(&self) -> f64 {
        self.electricity
            .iter()
            .chain(self.gas.iter())
            .flatten()
            .copied()
            .fold(0.0, f64::min)
    }
}

pub fn chart_data(record: &YearRecord, theme: Theme) -> ChartData {
    let mut electricity = [None; 12];
    let mut gas = [None; 12];

    for month in 0..MONTHS_PER_YEAR {
        if let Some(reading) = record.get(&month) {
            electricity[month as usize] = Some(reading.electricity);
            gas[month as usize] = Some(reading.gas);
        }
    }

    ChartData {
        electricity,
        gas,
        colors: theme.colors(),
    }
}
