mod report;
mod tui;

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use enertrack_core::repository::DATASET_KEY;
use enertrack_core::time::{current_year, today};
use enertrack_core::{
    export_file_name, parse_month, parse_reading, Config, EntryForm, FileKeyValueStore,
    ImportOutcome, Theme, Tracker, TrackerError,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "enertrack")]
#[command(about = "Track monthly electricity and gas readings", long_about = None)]
struct Cli {
    /// Directory holding the stored data (overrides config.toml)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Year to work on (defaults to the current year)
    #[arg(long, global = true, allow_hyphen_values = true)]
    year: Option<i32>,

    /// Answer yes to every confirmation
    #[arg(long, global = true)]
    yes: bool,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add or overwrite a month's reading (month: jan..dec or 0-11)
    Add {
        month: String,
        #[arg(allow_hyphen_values = true)]
        electricity: String,
        #[arg(allow_hyphen_values = true)]
        gas: String,
    },
    /// Delete a month's reading
    Delete { month: String },
    /// List the readings of the year
    List,
    /// Show totals and averages for the year
    Stats,
    /// List known years
    Years,
    /// Create a year and switch to it
    AddYear { year: String },
    /// Export everything to energy-usage-data-<date>.json
    Export {
        /// Target file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all data with an exported document
    Import { path: PathBuf },
    /// Delete all data
    Clear,
    /// Show or change the theme
    Theme { action: Option<ThemeAction> },
    /// Show the config file, or write one with the defaults
    Config {
        #[arg(long)]
        init: bool,
    },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// The core error behind `err` when it was caused by what the user typed.
fn user_error(err: &anyhow::Error) -> Option<&TrackerError> {
    err.downcast_ref::<TrackerError>().filter(|e| e.is_user_error())
}

fn show_config(data_dir: Option<&PathBuf>, init: bool) -> Result<()> {
    let path = Config::default_path()?;
    if init {
        if Config::init_at(&path)? {
            println!("Wrote default config to {}", path.display());
        } else {
            println!("{} already exists, left unchanged.", path.display());
        }
    }
    let config = Config::load_from(&path)?;
    let data_dir = match data_dir {
        Some(dir) => dir.clone(),
        None => config.resolve_data_dir()?,
    };
    println!("Config file:   {}", path.display());
    println!("Data dir:      {}", data_dir.display());
    println!("Default theme: {}", config.default_theme);
    Ok(())
}

fn main() -> Result<()> {
    match run(Cli::parse()) {
        Err(err) => match user_error(&err) {
            Some(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            None => Err(err),
        },
        ok => ok,
    }
}

fn run(cli: Cli) -> Result<()> {
    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    if !is_tui {
        init_logging(cli.verbose);
    }

    if let Some(Commands::Config { init }) = cli.command {
        return show_config(cli.data_dir.as_ref(), init);
    }

    let config = Config::load()?;
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => config.resolve_data_dir()?,
    };
    debug!(data_dir = %data_dir.display(), "opening storage");
    let backend = FileKeyValueStore::new(&data_dir)?;

    let mut tracker = match Tracker::open(backend.clone(), current_year(), config.default_theme) {
        Ok(tracker) => tracker,
        Err(TrackerError::MalformedPersistedState(msg)) if matches!(cli.command, Some(Commands::Clear)) => {
            println!("Stored data is unreadable ({}).", msg);
            if confirm("Discard it and start over?", cli.yes) {
                backend.discard(DATASET_KEY)?;
                Tracker::open(backend, current_year(), config.default_theme)?;
                println!("All data cleared.");
            }
            return Ok(());
        }
        Err(e @ TrackerError::MalformedPersistedState(_)) => {
            return Err(e).context("Run `enertrack clear` to discard the stored data");
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(year) = cli.year {
        tracker.select_year(year)?;
    }

    match cli.command {
        Some(Commands::Add { month, electricity, gas }) => {
            let form = EntryForm {
                month: Some(parse_month(&month)?),
                electricity: parse_reading(&electricity, "electricity")?,
                gas: parse_reading(&gas, "gas")?,
            };
            let written = tracker.submit_entry(&form)?;
            println!(
                "Reading saved: {} {} (electricity {} kWh, gas {} m³)",
                enertrack_core::month_name(written),
                tracker.current_year(),
                form.electricity,
                form.gas
            );
        }
        Some(Commands::Delete { month }) => {
            let month = parse_month(&month)?;
            if tracker.delete_entry(month, |prompt| confirm(prompt, cli.yes))? {
                println!("Deleted {} {}.", enertrack_core::month_name(month), tracker.current_year());
            }
        }
        Some(Commands::List) => {
            report::show_entries(&tracker);
        }
        Some(Commands::Stats) => {
            report::show_stats(&tracker);
        }
        Some(Commands::Years) => {
            report::show_years(&tracker);
        }
        Some(Commands::AddYear { year }) => {
            let year = tracker.add_year(&year)?;
            println!("Year {} ready.", year);
        }
        Some(Commands::Export { output }) => {
            let file_name = export_file_name(today());
            let path = match output {
                Some(p) if p.is_dir() => p.join(file_name),
                Some(p) => p,
                None => PathBuf::from(file_name),
            };
            fs::write(&path, tracker.export()?)
                .with_context(|| format!("Could not write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        Some(Commands::Import { path }) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            match tracker.import_document(&text, |prompt| confirm(prompt, cli.yes))? {
                ImportOutcome::Imported { years, current_year } => {
                    println!("Data imported successfully! {} year(s), now showing {}.", years, current_year);
                }
                ImportOutcome::Declined => println!("Import cancelled."),
            }
        }
        Some(Commands::Clear) => {
            if tracker.clear(|prompt| confirm(prompt, cli.yes))? {
                println!("All data cleared.");
            }
        }
        Some(Commands::Theme { action }) => {
            let theme = match action {
                None => tracker.theme(),
                Some(ThemeAction::Toggle) => tracker.toggle_theme()?,
                Some(ThemeAction::Light) => {
                    tracker.set_theme(Theme::Light)?;
                    Theme::Light
                }
                Some(ThemeAction::Dark) => {
                    tracker.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("Theme: {}", theme);
        }
        Some(Commands::Config { .. }) => {}
        Some(Commands::Tui) | None => {
            tui::run(tracker)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detects_bad_input() {
        let err = anyhow::Error::from(TrackerError::invalid_input("Month must be 0-11"));
        assert!(user_error(&err).is_some());

        let err = anyhow::Error::from(TrackerError::invalid_import("Year keys must be numbers."));
        assert!(user_error(&err).is_some());
    }

    #[test]
    fn test_user_error_ignores_environment_failures() {
        let err = anyhow::Error::from(TrackerError::MalformedPersistedState("x".into()));
        assert!(user_error(&err).is_none());

        let err = anyhow::Error::from(TrackerError::Storage(io::Error::new(io::ErrorKind::Other, "disk full")));
        assert!(user_error(&err).is_none());

        let err = anyhow::anyhow!("Could not read data.json");
        assert!(user_error(&err).is_none());
    }

    #[test]
    fn test_config_subcommand_parses() {
        let cli = Cli::parse_from(["enertrack", "config", "--init"]);
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }
}
