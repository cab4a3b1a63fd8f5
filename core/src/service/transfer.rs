use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, TrackerError};
use crate::model::reading::{is_valid_month, Reading, UsageDataset, YearRecord};
use crate::time::parse_timestamp;

const EXPORT_FILE_PREFIX: &str = "energy-usage-data";

/// Serializes the whole dataset in the persisted shape.
pub fn export_dataset(dataset: &UsageDataset) -> Result<String> {
    Ok(serde_json::to_string(dataset)?)
}

/// `energy-usage-data-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-{}.json", EXPORT_FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Structurally validates a document and converts it into a dataset.
///
/// Stops at the first violation; nothing is returned for partial documents.
pub fn validate_document(text: &str) -> Result<UsageDataset> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TrackerError::invalid_import(format!("Not a JSON document: {}", e)))?;

    let years = value
        .as_object()
        .ok_or_else(|| TrackerError::invalid_import("Invalid data format."))?;

    let mut dataset = UsageDataset::new();
    for (year_key, year_value) in years {
        let year: i32 = year_key.trim().parse().map_err(|_| {
            TrackerError::invalid_import(format!("Year keys must be numbers (got '{}').", year_key))
        })?;

        let months = year_value.as_object().ok_or_else(|| {
            TrackerError::invalid_import(format!("Year data must be an object (year {}).", year))
        })?;

        let mut record = YearRecord::new();
        for (month_key, entry) in months {
            let month = month_key
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|m| is_valid_month(*m))
                .ok_or_else(|| {
                    TrackerError::invalid_import(format!(
                        "Month keys must be numbers between 0 and 11 (year {}, got '{}').",
                        year, month_key
                    ))
                })?;

            let reading = parse_entry(year, month, entry)?;
            if record.insert(month, reading).is_some() {
                return Err(TrackerError::invalid_import(format!(
                    "Duplicate month {} in year {}.",
                    month, year
                )));
            }
        }

        if dataset.insert(year, record).is_some() {
            return Err(TrackerError::invalid_import(format!("Duplicate year {}.", year)));
        }
    }

    Ok(dataset)
}

fn parse_entry(year: i32, month: u32, entry: &Value) -> Result<Reading> {
    let numbers_error = || {
        TrackerError::invalid_import(format!(
            "Electricity and gas must be numbers (year {}, month {}).",
            year, month
        ))
    };

    let fields = entry.as_object().ok_or_else(numbers_error)?;
    let electricity = fields.get("electricity").and_then(Value::as_f64).ok_or_else(numbers_error)?;
    let gas = fields.get("gas").and_then(Value::as_f64).ok_or_else(numbers_error)?;

    let recorded_at = match fields.get("date") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let parsed = raw.as_str().and_then(parse_timestamp);
            if parsed.is_none() {
                warn!(year, month, date = %raw, "ignoring unreadable reading timestamp");
            }
            parsed
        }
    };

    Ok(Reading { electricity, gas, recorded_at })
}

/// Newest year in the dataset, if any.
pub fn latest_year(dataset: &UsageDataset) -> Option<i32> {
    dataset.keys().next_back().copied()
}
