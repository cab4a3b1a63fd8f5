use crate::model::reading::YearRecord;
use crate::model::stats::YearStats;

/// Totals and per-recorded-month averages for one year.
pub fn compute_stats(record: &YearRecord) -> YearStats {
    let months_recorded = record.len();
    if months_recorded == 0 {
        return YearStats::default();
    }

    let total_electricity: f64 = record.values().map(|r| r.electricity).sum();
    let total_gas: f64 = record.values().map(|r| r.gas).sum();

    YearStats {
        total_electricity,
        total_gas,
        avg_electricity: total_electricity / months_recorded as f64,
        avg_gas: total_gas / months_recorded as f64,
        months_recorded,
    }
}
