use serde::{Deserialize, Serialize};

pub const ELECTRICITY_UNIT: &str = "kWh";
pub const GAS_UNIT: &str = "m³";

/// Aggregates over the months of one year that have a reading.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct YearStats {
    pub total_electricity: f64,
    pub total_gas: f64,
    pub avg_electricity: f64,
    pub avg_gas: f64,
    pub months_recorded: usize,
}

impl YearStats {
    pub fn is_empty(&self) -> bool {
        self.months_recorded == 0
    }
}

/// Two-decimal display with unit, e.g. `300.00 kWh`. Empty years show `0 kWh`.
pub fn format_quantity(value: f64, unit: &str, empty: bool) -> String {
    if empty {
        format!("0 {}", unit)
    } else {
        format!("{:.2} {}", value, unit)
    }
}
