use crate::error::Result;
use crate::input::parse_year;
use crate::repository::KeyValueStore;
use crate::service::usage_store::UsageStore;

/// The year the user is looking at.
#[derive(Debug, Clone)]
pub struct YearNavigator {
    current_year: i32,
}

impl YearNavigator {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Moves by `delta` years. There is no floor: year 0 and negative years are reachable.
    pub fn change_year<S: KeyValueStore>(
        &mut self,
        store: &mut UsageStore<S>,
        delta: i32,
    ) -> Result<i32> {
        let target = self.current_year.saturating_add(delta);
        self.set_year(store, target)?;
        Ok(target)
    }

    /// Switches to a user-typed year; it must be a positive integer.
    pub fn add_year<S: KeyValueStore>(
        &mut self,
        store: &mut UsageStore<S>,
        candidate: &str,
    ) -> Result<i32> {
        let year = parse_year(candidate)?;
        self.set_year(store, year)?;
        Ok(year)
    }

    pub fn set_year<S: KeyValueStore>(&mut self, store: &mut UsageStore<S>, year: i32) -> Result<()> {
        store.ensure_year(year)?;
        self.current_year = year;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::repository::MemoryKeyValueStore;

    #[test]
    fn test_change_year_creates_year() {
        let backend = MemoryKeyValueStore::new();
        let mut store = UsageStore::load(&backend, 2024).unwrap();
        let mut nav = YearNavigator::new(2024);

        assert_eq!(nav.change_year(&mut store, -1).unwrap(), 2023);
        assert_eq!(nav.change_year(&mut store, 2).unwrap(), 2025);
        assert_eq!(store.years(), vec![2023, 2024, 2025]);
    }

    #[test]
    fn test_change_year_has_no_floor() {
        let backend = MemoryKeyValueStore::new();
        let mut store = UsageStore::load(&backend, 1).unwrap();
        let mut nav = YearNavigator::new(1);
        nav.change_year(&mut store, -1).unwrap();
        nav.change_year(&mut store, -1).unwrap();
        assert_eq!(nav.current_year(), -1);
    }

    #[test]
    fn test_add_year_rejects_garbage() {
        let backend = MemoryKeyValueStore::new();
        let mut store = UsageStore::load(&backend, 2024).unwrap();
        let mut nav = YearNavigator::new(2024);

        let err = nav.add_year(&mut store, "abc").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert!(nav.add_year(&mut store, "0").is_err());
        assert_eq!(nav.current_year(), 2024);
        assert_eq!(store.years(), vec![2024]);
    }

    #[test]
    fn test_add_year_switches() {
        let backend = MemoryKeyValueStore::new();
        let mut store = UsageStore::load(&backend, 2024).unwrap();
        let mut nav = YearNavigator::new(2024);
        assert_eq!(nav.add_year(&mut store, "2031").unwrap(), 2031);
        assert_eq!(nav.current_year(), 2031);
        assert!(store.year(2031).is_some());
    }
}
