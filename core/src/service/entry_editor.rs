use crate::error::{Result, TrackerError};
use crate::model::reading::{month_name, Reading};
use crate::repository::KeyValueStore;
use crate::service::usage_store::UsageStore;

/// What the next form submission does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Create,
    Edit { month: u32 },
}

/// Writes `{electricity, gas, now}` into `year`/`month`, replacing any prior reading.
pub fn add_or_update_entry<S: KeyValueStore>(
    store: &mut UsageStore<S>,
    year: i32,
    month: u32,
    electricity: f64,
    gas: f64,
) -> Result<()> {
    if !electricity.is_finite() {
        return Err(TrackerError::invalid_input("Please enter a valid electricity reading."));
    }
    if !gas.is_finite() {
        return Err(TrackerError::invalid_input("Please enter a valid gas reading."));
    }
    store.upsert_reading(year, month, Reading::new(electricity, gas))
}

/// Removes the reading for `year`/`month` if there is one.
pub fn delete_entry<S: KeyValueStore>(
    store: &mut UsageStore<S>,
    year: i32,
    month: u32,
) -> Result<Option<Reading>> {
    store.remove_reading(year, month)
}

/// Form state: creating a new reading or editing one month's reading.
#[derive(Debug, Default)]
pub struct EntryEditor {
    mode: EditorMode,
}

impl EntryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Binds the form to `month` and returns its reading for pre-filling.
    /// Calling it again rebinds to the newer month.
    pub fn begin_edit<S: KeyValueStore>(
        &mut self,
        store: &UsageStore<S>,
        year: i32,
        month: u32,
    ) -> Result<Reading> {
        let reading = store.reading(year, month).cloned().ok_or_else(|| {
            TrackerError::invalid_input(format!("No reading for {} {}.", month_name(month), year))
        })?;
        self.mode = EditorMode::Edit { month };
        Ok(reading)
    }

    pub fn cancel(&mut self) {
        self.mode = EditorMode::Create;
    }

    /// Applies the form. In edit mode the bound month wins over `form_month`.
    /// Success returns to create mode; a rejected submission keeps the mode.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        store: &mut UsageStore<S>,
        year: i32,
        form_month: Option<u32>,
        electricity: f64,
        gas: f64,
    ) -> Result<u32> {
        let month = match self.mode {
            EditorMode::Edit { month } => month,
            EditorMode::Create => {
                form_month.ok_or_else(|| TrackerError::invalid_input("Please choose a month."))?
            }
        };

        add_or_update_entry(store, year, month, electricity, gas)?;
        self.mode = EditorMode::Create;
        Ok(month)
    }
}
