#[cfg(test)]
mod tests {
    use crate::error::TrackerError;
    use crate::input::{parse_entry_line, EntryForm};
    use crate::model::stats::YearStats;
    use crate::model::theme::Theme;
    use crate::repository::{KeyValueStore, MemoryKeyValueStore, DATASET_KEY, THEME_KEY};
    use crate::service::entry_editor::EditorMode;
    use crate::repository::FileKeyValueStore;
    use crate::usecase::tracker::{ImportOutcome, Tracker};
    use std::cell::Cell;
    use std::io;

    fn form(month: u32, electricity: f64, gas: f64) -> EntryForm {
        EntryForm { month: Some(month), electricity, gas }
    }

    /// Memory backend that counts writes and can be told to refuse them.
    #[derive(Default)]
    struct GatedStore {
        inner: MemoryKeyValueStore,
        refuse: Cell<bool>,
        writes: Cell<usize>,
    }

    impl KeyValueStore for GatedStore {
        fn get(&self, key: &str) -> crate::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> crate::Result<()> {
            if self.refuse.get() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full").into());
            }
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> crate::Result<()> {
            self.inner.remove(key)
        }
    }

    fn open(backend: &MemoryKeyValueStore) -> Tracker<&MemoryKeyValueStore> {
        Tracker::open(backend, 2024, Theme::Light).unwrap()
    }

    #[test]
    fn test_stats_scenario() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);

        tracker.submit_entry(&form(0, 100.0, 20.0)).unwrap();
        assert_eq!(
            tracker.stats(),
            YearStats {
                total_electricity: 100.0,
                total_gas: 20.0,
                avg_electricity: 100.0,
                avg_gas: 20.0,
                months_recorded: 1,
            }
        );

        tracker.submit_entry(&form(1, 200.0, 30.0)).unwrap();
        let stats = tracker.stats();
        assert_eq!(stats.total_electricity, 300.0);
        assert_eq!(stats.total_gas, 50.0);
        assert_eq!(stats.avg_electricity, 150.0);
        assert_eq!(stats.avg_gas, 25.0);
    }

    #[test]
    fn test_delete_excludes_from_stats() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 100.0, 20.0)).unwrap();
        tracker.submit_entry(&form(1, 200.0, 30.0)).unwrap();

        assert!(tracker.delete_entry(1, |_| true).unwrap());
        let stats = tracker.stats();
        assert_eq!(stats.total_electricity, 100.0);
        assert_eq!(stats.avg_gas, 20.0);
    }

    #[test]
    fn test_delete_declined_keeps_reading() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(3, 1.0, 1.0)).unwrap();

        assert!(!tracker.delete_entry(3, |_| false).unwrap());
        assert_eq!(tracker.entries().len(), 1);
        assert!(tracker.delete_entry(4, |_| true).is_err());
    }

    #[test]
    fn test_entries_newest_month_first() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        for month in [2, 9, 0] {
            tracker.submit_entry(&form(month, 1.0, 1.0)).unwrap();
        }
        let months: Vec<u32> = tracker.entries().iter().map(|(m, _)| *m).collect();
        assert_eq!(months, vec![9, 2, 0]);
    }

    #[test]
    fn test_add_year_invalid_keeps_current_year() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        let err = tracker.add_year("abc").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert_eq!(tracker.current_year(), 2024);
    }

    #[test]
    fn test_entries_follow_selected_year() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 1.0, 1.0)).unwrap();

        tracker.change_year(1).unwrap();
        assert!(tracker.entries().is_empty());
        assert_eq!(tracker.stats(), YearStats::default());
        assert!(tracker.chart().is_empty());

        tracker.change_year(-1).unwrap();
        assert_eq!(tracker.chart().electricity[0], Some(1.0));
    }

    #[test]
    fn test_edit_through_tracker() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(5, 50.0, 5.0)).unwrap();

        let prefill = tracker.begin_edit(5).unwrap();
        assert_eq!(prefill.gas, 5.0);
        assert_eq!(tracker.editor_mode(), EditorMode::Edit { month: 5 });

        let line = parse_entry_line("55 6").unwrap();
        assert_eq!(tracker.submit_entry(&line).unwrap(), 5);
        assert_eq!(tracker.editor_mode(), EditorMode::Create);
        assert_eq!(tracker.entries()[0].1.electricity, 55.0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 100.0, 20.0)).unwrap();
        tracker.select_year(2022).unwrap();
        tracker.submit_entry(&form(11, 7.5, 1.25)).unwrap();
        let original = tracker.dataset().clone();
        let document = tracker.export().unwrap();

        let other_backend = MemoryKeyValueStore::new();
        let mut other = open(&other_backend);
        other.submit_entry(&form(4, 9.0, 9.0)).unwrap();

        let outcome = other.import_document(&document, |_| true).unwrap();
        assert_eq!(outcome, ImportOutcome::Imported { years: 2, current_year: 2024 });
        assert_eq!(other.dataset(), &original);
    }

    #[test]
    fn test_import_switches_to_newest_year() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        let doc = r#"{"2019":{},"2021":{"0":{"electricity":1,"gas":2}}}"#;

        tracker.import_document(doc, |_| true).unwrap();
        assert_eq!(tracker.current_year(), 2021);
        // Replacement, not merge: the seeded 2024 is gone.
        assert_eq!(tracker.years(), vec![2019, 2021]);

        let persisted = backend.get(DATASET_KEY).unwrap().unwrap();
        assert!(persisted.contains("2021"));
        assert!(!persisted.contains("2024"));
    }

    #[test]
    fn test_import_empty_document_keeps_current_year() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 1.0, 1.0)).unwrap();

        let outcome = tracker.import_document("{}", |_| true).unwrap();
        assert_eq!(outcome, ImportOutcome::Imported { years: 0, current_year: 2024 });
        assert_eq!(tracker.years(), vec![2024]);
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_invalid_import_leaves_dataset_untouched() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 100.0, 20.0)).unwrap();
        let before = tracker.dataset().clone();
        let stored_before = backend.get(DATASET_KEY).unwrap();

        for doc in [
            r#"{"2024":{"12":{"electricity":1,"gas":2}}}"#,
            r#"{"2024":{"-1":{"electricity":1,"gas":2}}}"#,
            r#"{"2024":{"0":{"electricity":1,"gas":"2"}}}"#,
        ] {
            let mut asked = false;
            let err = tracker
                .import_document(doc, |_| {
                    asked = true;
                    true
                })
                .unwrap_err();
            assert!(matches!(err, TrackerError::InvalidImportDocument(_)));
            assert!(!asked, "confirmation must not be requested for invalid documents");
        }

        assert_eq!(tracker.dataset(), &before);
        assert_eq!(backend.get(DATASET_KEY).unwrap(), stored_before);
    }

    #[test]
    fn test_import_declined() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        let outcome = tracker
            .import_document(r#"{"1990":{}}"#, |_| false)
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Declined);
        assert_eq!(tracker.years(), vec![2024]);
    }

    #[test]
    fn test_clear_resets_to_current_year() {
        let backend = MemoryKeyValueStore::new();
        let mut tracker = open(&backend);
        tracker.submit_entry(&form(0, 1.0, 1.0)).unwrap();
        tracker.change_year(-3).unwrap();
        tracker.submit_entry(&form(0, 1.0, 1.0)).unwrap();

        assert!(!tracker.clear(|_| false).unwrap());
        assert_eq!(tracker.years().len(), 2);

        assert!(tracker.clear(|_| true).unwrap());
        assert_eq!(tracker.years(), vec![2021]);
        assert!(tracker.entries().is_empty());
    }

    #[test]
    fn test_reopen_restores_state() {
        let backend = MemoryKeyValueStore::new();
        {
            let mut tracker = open(&backend);
            tracker.submit_entry(&form(7, 70.0, 7.0)).unwrap();
            tracker.toggle_theme().unwrap();
        }

        let tracker = open(&backend);
        assert_eq!(tracker.entries()[0].0, 7);
        assert_eq!(tracker.theme(), Theme::Dark);
        assert_eq!(tracker.chart().colors, Theme::Dark.colors());
        assert_eq!(backend.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_storage_fails_to_open() {
        let backend = MemoryKeyValueStore::with_entry(DATASET_KEY, "[1,2,3]");
        let err = Tracker::open(&backend, 2024, Theme::Light).err().unwrap();
        assert!(matches!(err, TrackerError::MalformedPersistedState(_)));
    }

    #[test]
    fn test_failed_import_write_keeps_session() {
        let backend = GatedStore::default();
        let mut tracker = Tracker::open(&backend, 2024, Theme::Light).unwrap();
        tracker.submit_entry(&form(3, 30.0, 3.0)).unwrap();
        let before = tracker.dataset().clone();

        backend.refuse.set(true);
        let doc = r#"{"2019":{"0":{"electricity":1,"gas":2}}}"#;
        let err = tracker.import_document(doc, |_| true).unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(tracker.dataset(), &before);
        assert_eq!(tracker.current_year(), 2024);

        assert!(tracker.clear(|_| true).is_err());
        assert_eq!(tracker.dataset(), &before);
    }

    #[test]
    fn test_import_persists_with_a_single_write() {
        let backend = GatedStore::default();
        let mut tracker = Tracker::open(&backend, 2024, Theme::Light).unwrap();
        let writes_before = backend.writes.get();

        tracker.import_document("{}", |_| true).unwrap();
        assert_eq!(backend.writes.get(), writes_before + 1);
        assert_eq!(tracker.years(), vec![2024]);
    }

    #[test]
    fn test_discarding_unreadable_file_store_reopens_fresh() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = FileKeyValueStore::new(temp_dir.path()).unwrap();
        std::fs::write(backend.path(), "{truncated").unwrap();

        let err = Tracker::open(&backend, 2024, Theme::Light).err().unwrap();
        assert!(matches!(err, TrackerError::MalformedPersistedState(_)));

        backend.discard(DATASET_KEY).unwrap();
        let tracker = Tracker::open(&backend, 2024, Theme::Light).unwrap();
        assert_eq!(tracker.years(), vec![2024]);
        assert!(tracker.entries().is_empty());
    }
}
