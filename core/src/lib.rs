pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::{Result, TrackerError};
pub use input::{parse_entry_line, parse_month, parse_reading, parse_year, EntryForm};
pub use model::reading::{month_name, Reading, UsageDataset, YearRecord, MONTH_ABBREVIATIONS, MONTH_NAMES};
pub use model::stats::{format_quantity, YearStats, ELECTRICITY_UNIT, GAS_UNIT};
pub use model::theme::{Theme, ThemeColors};
pub use repository::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use service::chart::ChartData;
pub use service::entry_editor::EditorMode;
pub use service::transfer::export_file_name;
pub use usecase::tracker::{ImportOutcome, Tracker};
