use serde::{Deserialize, Serialize};
use chrono::{DateTime, SubsecRound, Utc};
use std::collections::BTreeMap;

pub const MONTHS_PER_YEAR: u32 = 12;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month's electricity (kWh) and gas (m³) consumption.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reading {
    pub electricity: f64,
    pub gas: f64,

    // Imported documents may omit the timestamp, so it stays optional.
    #[serde(rename = "date", default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Reading {
    pub fn new(electricity: f64, gas: f64) -> Self {
        Self {
            electricity,
            gas,
            recorded_at: Some(Utc::now().trunc_subsecs(3)),
        }
    }
}

/// Readings of one year keyed by month index (0 = January).
pub type YearRecord = BTreeMap<u32, Reading>;

/// Every tracked year.
pub type UsageDataset = BTreeMap<i32, YearRecord>;

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("?")
}

pub fn is_valid_month(month: u32) -> bool {
    month < MONTHS_PER_YEAR
}
