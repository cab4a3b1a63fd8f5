use std::fs;

use enertrack_core::time::today;
use enertrack_core::{
    export_file_name, month_name, parse_entry_line, FileKeyValueStore, ImportOutcome, Reading,
    Tracker, TrackerError,
};
use ratatui::widgets::TableState;

pub enum PendingAction {
    Delete(u32),
    Clear,
    Import(String),
}

pub enum InputMode {
    Normal,
    AddingEntry,
    EditingEntry,
    AddingYear,
    ImportPath,
    Confirming(PendingAction),
}

pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub tracker: Tracker<FileKeyValueStore>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<StatusLine>,
}

impl App {
    pub fn new(tracker: Tracker<FileKeyValueStore>) -> App {
        let mut app = App {
            tracker,
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        };
        app.reset_selection();
        app
    }

    pub fn entries(&self) -> Vec<(u32, &Reading)> {
        self.tracker.entries()
    }

    fn selected_month(&self) -> Option<u32> {
        let i = self.state.selected()?;
        self.entries().get(i).map(|(month, _)| *month)
    }

    fn reset_selection(&mut self) {
        if self.entries().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.entries().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine { text: text.into(), is_error: false });
    }

    fn report(&mut self, err: TrackerError) {
        self.status = Some(StatusLine { text: err.to_string(), is_error: true });
    }

    pub fn next(&mut self) {
        let len = self.entries().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.entries().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn change_year(&mut self, delta: i32) {
        self.tracker.cancel_edit();
        match self.tracker.change_year(delta) {
            Ok(_) => {
                self.status = None;
                self.reset_selection();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn toggle_theme(&mut self) {
        match self.tracker.toggle_theme() {
            Ok(theme) => self.info(format!("Theme: {}", theme)),
            Err(e) => self.report(e),
        }
    }

    pub fn export(&mut self) {
        let path = export_file_name(today());
        let result = self
            .tracker
            .export()
            .and_then(|doc| fs::write(&path, doc).map_err(TrackerError::from));
        match result {
            Ok(()) => self.info(format!("Exported to {}", path)),
            Err(e) => self.report(e),
        }
    }

    fn start_input(&mut self, mode: InputMode, prefill: String) {
        self.cursor_position = prefill.chars().count();
        self.input = prefill;
        self.input_mode = mode;
        self.status = None;
    }

    pub fn enter_add_mode(&mut self) {
        self.tracker.cancel_edit();
        self.start_input(InputMode::AddingEntry, String::new());
    }

    pub fn enter_edit_mode(&mut self) {
        let Some(month) = self.selected_month() else { return };
        match self.tracker.begin_edit(month) {
            Ok(reading) => {
                let prefill = format!("{} {}", reading.electricity, reading.gas);
                self.start_input(InputMode::EditingEntry, prefill);
            }
            Err(e) => self.report(e),
        }
    }

    pub fn enter_year_mode(&mut self) {
        let suggestion = self.tracker.current_year().saturating_add(1).to_string();
        self.start_input(InputMode::AddingYear, suggestion);
    }

    pub fn enter_import_mode(&mut self) {
        self.start_input(InputMode::ImportPath, String::new());
    }

    pub fn request_delete(&mut self) {
        if let Some(month) = self.selected_month() {
            self.input_mode = InputMode::Confirming(PendingAction::Delete(month));
        }
    }

    pub fn request_clear(&mut self) {
        self.input_mode = InputMode::Confirming(PendingAction::Clear);
    }

    pub fn confirm_prompt(&self) -> Option<String> {
        match &self.input_mode {
            InputMode::Confirming(PendingAction::Delete(month)) => Some(format!(
                "Delete the {} {} entry? (y/n)",
                month_name(*month),
                self.tracker.current_year()
            )),
            InputMode::Confirming(PendingAction::Clear) => {
                Some("Delete ALL your energy usage data? This cannot be undone. (y/n)".to_string())
            }
            InputMode::Confirming(PendingAction::Import(_)) => {
                Some("This will overwrite your current data. Continue? (y/n)".to_string())
            }
            _ => None,
        }
    }

    /// Runs the pending action when `accepted`, otherwise drops it.
    pub fn resolve_confirmation(&mut self, accepted: bool) {
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
        let InputMode::Confirming(action) = mode else { return };
        if !accepted {
            self.info("Cancelled.");
            return;
        }

        let result = match action {
            PendingAction::Delete(month) => self
                .tracker
                .delete_entry(month, |_| true)
                .map(|_| format!("Deleted {}.", month_name(month))),
            PendingAction::Clear => self.tracker.clear(|_| true).map(|_| "All data cleared.".to_string()),
            PendingAction::Import(text) => {
                self.tracker.import_document(&text, |_| true).map(|outcome| match outcome {
                    ImportOutcome::Imported { years, .. } => {
                        format!("Data imported successfully! {} year(s).", years)
                    }
                    ImportOutcome::Declined => "Import cancelled.".to_string(),
                })
            }
        };

        match result {
            Ok(msg) => self.info(msg),
            Err(e) => self.report(e),
        }
        self.clamp_selection();
    }

    pub fn exit_input_mode(&mut self) {
        if matches!(self.input_mode, InputMode::EditingEntry) {
            self.tracker.cancel_edit();
        }
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Enter in an input mode. Rejected input keeps the prompt open for correction.
    pub fn submit_command(&mut self) {
        let outcome = match self.input_mode {
            InputMode::AddingEntry | InputMode::EditingEntry => self.submit_entry(),
            InputMode::AddingYear => self.submit_year(),
            InputMode::ImportPath => self.submit_import_path(),
            InputMode::Normal | InputMode::Confirming(_) => return,
        };

        match outcome {
            Ok(Some(next_mode)) => {
                self.input.clear();
                self.cursor_position = 0;
                self.input_mode = next_mode;
            }
            Ok(None) => self.exit_input_mode(),
            Err(e) => self.report(e),
        }
    }

    fn submit_entry(&mut self) -> Result<Option<InputMode>, TrackerError> {
        let form = parse_entry_line(&self.input)?;
        let month = self.tracker.submit_entry(&form)?;
        self.info(format!("Saved {} {}.", month_name(month), self.tracker.current_year()));
        let position = self.entries().iter().position(|(m, _)| *m == month);
        if position.is_some() {
            self.state.select(position);
        }
        Ok(None)
    }

    fn submit_year(&mut self) -> Result<Option<InputMode>, TrackerError> {
        let year = self.tracker.add_year(&self.input)?;
        self.info(format!("Switched to {}.", year));
        self.reset_selection();
        Ok(None)
    }

    fn submit_import_path(&mut self) -> Result<Option<InputMode>, TrackerError> {
        let path = self.input.trim().to_string();
        if path.is_empty() {
            return Err(TrackerError::invalid_input("Please select a file to import."));
        }
        let text = fs::read_to_string(&path)?;
        // Validate up front so a bad file never reaches the confirm prompt.
        enertrack_core::service::transfer::validate_document(&text)?;
        Ok(Some(InputMode::Confirming(PendingAction::Import(text))))
    }
}
