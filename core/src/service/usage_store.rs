use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::model::reading::{is_valid_month, Reading, UsageDataset, YearRecord};
use crate::repository::{KeyValueStore, DATASET_KEY};
use crate::service::transfer::{export_dataset, validate_document};

/// The in-memory dataset and the backend it is mirrored to.
///
/// Every mutating method writes the full dataset back before returning.
pub struct UsageStore<S: KeyValueStore> {
    backend: S,
    data: UsageDataset,
}

impl<S: KeyValueStore> UsageStore<S> {
    /// Restores the stored dataset, or seeds `{ current_year: {} }` when none exists.
    ///
    /// A stored blob that fails validation is reported as
    /// `MalformedPersistedState` and left in place.
    pub fn load(backend: S, current_year: i32) -> Result<Self> {
        let data = match backend.get(DATASET_KEY)? {
            Some(blob) => validate_document(&blob).map_err(|e| match e {
                TrackerError::InvalidImportDocument(msg) => TrackerError::MalformedPersistedState(msg),
                other => other,
            })?,
            None => {
                info!(current_year, "no stored usage data, starting fresh");
                UsageDataset::new()
            }
        };
        debug!(years = data.len(), "loaded usage data");

        let mut store = Self { backend, data };
        store.ensure_year(current_year)?;
        Ok(store)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn dataset(&self) -> &UsageDataset {
        &self.data
    }

    pub fn year(&self, year: i32) -> Option<&YearRecord> {
        self.data.get(&year)
    }

    pub fn reading(&self, year: i32, month: u32) -> Option<&Reading> {
        self.data.get(&year).and_then(|record| record.get(&month))
    }

    pub fn years(&self) -> Vec<i32> {
        self.data.keys().copied().collect()
    }

    /// Inserts an empty record for `year` if missing. Returns whether it did.
    pub fn ensure_year(&mut self, year: i32) -> Result<bool> {
        if self.data.contains_key(&year) {
            return Ok(false);
        }
        let mut candidate = self.data.clone();
        candidate.insert(year, YearRecord::new());
        self.commit(candidate)?;
        info!(year, "created year");
        Ok(true)
    }

    pub fn upsert_reading(&mut self, year: i32, month: u32, reading: Reading) -> Result<()> {
        if !is_valid_month(month) {
            return Err(TrackerError::invalid_input(format!(
                "Month index must be between 0 and 11, got {}",
                month
            )));
        }
        let mut candidate = self.data.clone();
        candidate.entry(year).or_default().insert(month, reading);
        self.commit(candidate)
    }

    pub fn remove_reading(&mut self, year: i32, month: u32) -> Result<Option<Reading>> {
        let mut candidate = self.data.clone();
        let removed = candidate.get_mut(&year).and_then(|record| record.remove(&month));
        self.commit(candidate)?;
        Ok(removed)
    }

    /// Swaps in a whole new dataset; nothing of the old one is kept.
    pub fn replace(&mut self, data: UsageDataset) -> Result<()> {
        self.commit(data)
    }

    /// Drops everything and reseeds an empty `current_year`.
    pub fn clear(&mut self, current_year: i32) -> Result<()> {
        let mut candidate = UsageDataset::new();
        candidate.insert(current_year, YearRecord::new());
        self.commit(candidate)?;
        info!(current_year, "cleared usage data");
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        Self::persist(&self.backend, &self.data)
    }

    /// Writes `candidate` to the backend and only then adopts it in memory.
    fn commit(&mut self, candidate: UsageDataset) -> Result<()> {
        Self::persist(&self.backend, &candidate)?;
        self.data = candidate;
        Ok(())
    }

    fn persist(backend: &S, data: &UsageDataset) -> Result<()> {
        let blob = export_dataset(data)?;
        backend.set(DATASET_KEY, &blob)?;
        debug!(years = data.len(), "saved usage data");
        Ok(())
    }
}
