use tracing::info;

use crate::error::{Result, TrackerError};
use crate::input::EntryForm;
use crate::model::reading::{month_name, Reading, UsageDataset, YearRecord};
use crate::model::stats::YearStats;
use crate::model::theme::Theme;
use crate::repository::KeyValueStore;
use crate::service::chart::{chart_data, ChartData};
use crate::service::entry_editor::{delete_entry, EditorMode, EntryEditor};
use crate::service::navigator::YearNavigator;
use crate::service::stats::compute_stats;
use crate::service::theme::{load_theme, save_theme, toggle_theme};
use crate::service::transfer::{export_dataset, latest_year, validate_document};
use crate::service::usage_store::UsageStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported { years: usize, current_year: i32 },
    Declined,
}

/// Session state behind every UI action: store, selected year, form mode, theme.
pub struct Tracker<S: KeyValueStore> {
    store: UsageStore<S>,
    navigator: YearNavigator,
    editor: EntryEditor,
    theme: Theme,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn open(backend: S, current_year: i32, default_theme: Theme) -> Result<Self> {
        let theme = load_theme(&backend, default_theme)?;
        let store = UsageStore::load(backend, current_year)?;
        Ok(Self {
            store,
            navigator: YearNavigator::new(current_year),
            editor: EntryEditor::new(),
            theme,
        })
    }

    pub fn current_year(&self) -> i32 {
        self.navigator.current_year()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.editor.mode()
    }

    pub fn dataset(&self) -> &UsageDataset {
        self.store.dataset()
    }

    pub fn years(&self) -> Vec<i32> {
        self.store.years()
    }

    pub fn current_record(&self) -> Option<&YearRecord> {
        self.store.year(self.current_year())
    }

    /// Current year's readings, newest month first.
    pub fn entries(&self) -> Vec<(u32, &Reading)> {
        self.current_record()
            .map(|record| record.iter().rev().map(|(m, r)| (*m, r)).collect())
            .unwrap_or_default()
    }

    pub fn change_year(&mut self, delta: i32) -> Result<i32> {
        self.navigator.change_year(&mut self.store, delta)
    }

    pub fn add_year(&mut self, candidate: &str) -> Result<i32> {
        self.navigator.add_year(&mut self.store, candidate)
    }

    pub fn select_year(&mut self, year: i32) -> Result<()> {
        self.navigator.set_year(&mut self.store, year)
    }

    /// Create or update, depending on the editor mode. Returns the month written.
    pub fn submit_entry(&mut self, form: &EntryForm) -> Result<u32> {
        let year = self.current_year();
        self.editor
            .submit(&mut self.store, year, form.month, form.electricity, form.gas)
    }

    pub fn begin_edit(&mut self, month: u32) -> Result<Reading> {
        let year = self.current_year();
        self.editor.begin_edit(&self.store, year, month)
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    /// Deletes the month's reading once `confirm` agrees. `Ok(false)` when declined.
    pub fn delete_entry(&mut self, month: u32, confirm: impl FnOnce(&str) -> bool) -> Result<bool> {
        let year = self.current_year();
        if self.store.reading(year, month).is_none() {
            return Err(TrackerError::invalid_input(format!(
                "No reading for {} {}.",
                month_name(month),
                year
            )));
        }
        if !confirm("Are you sure you want to delete this entry?") {
            return Ok(false);
        }
        delete_entry(&mut self.store, year, month)?;
        Ok(true)
    }

    pub fn stats(&self) -> YearStats {
        self.current_record().map(compute_stats).unwrap_or_default()
    }

    pub fn chart(&self) -> ChartData {
        let empty = YearRecord::new();
        chart_data(self.current_record().unwrap_or(&empty), self.theme)
    }

    pub fn export(&self) -> Result<String> {
        export_dataset(self.store.dataset())
    }

    /// Validates `text`, asks `confirm`, then replaces the whole dataset and
    /// jumps to the newest imported year. Nothing changes on failure or refusal.
    pub fn import_document(
        &mut self,
        text: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<ImportOutcome> {
        let mut imported = validate_document(text)?;
        if !confirm("This will overwrite your current data. Continue?") {
            return Ok(ImportOutcome::Declined);
        }

        let years = imported.len();
        let target = latest_year(&imported).unwrap_or_else(|| self.current_year());
        // Seed the target year before the single write so nothing can fail after it.
        imported.entry(target).or_default();
        self.store.replace(imported)?;
        self.navigator.set_year(&mut self.store, target)?;
        info!(years, current_year = target, "imported usage data");

        Ok(ImportOutcome::Imported { years, current_year: target })
    }

    /// Wipes all readings once `confirm` agrees. The current year is kept, empty.
    pub fn clear(&mut self, confirm: impl FnOnce(&str) -> bool) -> Result<bool> {
        if !confirm("Are you sure you want to delete ALL your energy usage data? This cannot be undone.") {
            return Ok(false);
        }
        let year = self.current_year();
        self.store.clear(year)?;
        self.editor.cancel();
        Ok(true)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = toggle_theme(self.store.backend(), self.theme)?;
        Ok(self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        save_theme(self.store.backend(), theme)?;
        self.theme = theme;
        Ok(())
    }
}
