use enertrack_core::{
    format_quantity, month_name, KeyValueStore, Tracker, ELECTRICITY_UNIT, GAS_UNIT,
};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Electricity (kWh)")]
    electricity: String,
    #[tabled(rename = "Gas (m³)")]
    gas: String,
    #[tabled(rename = "Recorded")]
    recorded: String,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "Electricity")]
    electricity: String,
    #[tabled(rename = "Gas")]
    gas: String,
}

pub fn show_entries<S: KeyValueStore>(tracker: &Tracker<S>) {
    let entries = tracker.entries();
    if entries.is_empty() {
        println!("No entries for {} yet.", tracker.current_year());
        return;
    }

    let rows: Vec<EntryRow> = entries
        .into_iter()
        .map(|(month, reading)| EntryRow {
            month: month_name(month).to_string(),
            electricity: reading.electricity.to_string(),
            gas: reading.gas.to_string(),
            recorded: reading
                .recorded_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("\x1b[1;36m{}\x1b[0m", tracker.current_year());
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

pub fn show_stats<S: KeyValueStore>(tracker: &Tracker<S>) {
    let stats = tracker.stats();
    let empty = stats.is_empty();

    let rows = vec![
        StatsRow {
            label: "Total",
            electricity: format_quantity(stats.total_electricity, ELECTRICITY_UNIT, empty),
            gas: format_quantity(stats.total_gas, GAS_UNIT, empty),
        },
        StatsRow {
            label: "Monthly average",
            electricity: format_quantity(stats.avg_electricity, ELECTRICITY_UNIT, empty),
            gas: format_quantity(stats.avg_gas, GAS_UNIT, empty),
        },
    ];

    println!(
        "\x1b[1;36m{}\x1b[0m ({} month(s) recorded)",
        tracker.current_year(),
        stats.months_recorded
    );
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn show_years<S: KeyValueStore>(tracker: &Tracker<S>) {
    for year in tracker.years() {
        let count = tracker.dataset().get(&year).map(|r| r.len()).unwrap_or(0);
        let marker = if year == tracker.current_year() { "*" } else { " " };
        println!("{} {} ({} reading(s))", marker, year, count);
    }
}
