//! Debounced persistence of the canvas record.
//!
//! Every edit marks the manager dirty and restarts the quiet interval. The host
//! polls [`AutoSaveManager::maybe_save`]; a save happens once no edit has
//! arrived for the whole debounce window. A failed save leaves the manager dirty
//! and restarts the window, so the retry happens one debounce interval later.

use super::{CanvasRecord, Storage, StorageResult};
use crate::config::EditorConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default quiet interval before saving.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    debounce: Duration,
    last_edit: Option<Instant>,
    last_save: Option<Instant>,
    dirty: bool,
    record_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            last_edit: None,
            last_save: None,
            dirty: false,
            record_id: None,
        }
    }

    /// Manager using the configured debounce interval.
    pub fn from_config(storage: Arc<S>, config: &EditorConfig) -> Self {
        Self::new(storage).with_debounce(config.autosave_debounce())
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Record an edit; restarts the quiet interval.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.last_edit = Some(Instant::now());
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Key used for saving. Falls back to the record name when unset.
    pub fn set_record_id(&mut self, id: Option<String>) {
        self.record_id = id;
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Whether the debounce window has passed at `now`.
    pub fn should_save_at(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_edit {
            Some(edit) => now.saturating_duration_since(edit) >= self.debounce,
            None => true,
        }
    }

    /// Save if dirty and quiet for the debounce window. Returns true if saved.
    pub async fn maybe_save(&mut self, record: &CanvasRecord) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(record).await?;
        Ok(true)
    }

    /// Save immediately.
    pub async fn save(&mut self, record: &CanvasRecord) -> StorageResult<()> {
        let id = self.record_id.clone().unwrap_or_else(|| record.name.clone());
        if let Err(e) = self.storage.save(&id, record).await {
            log::error!("autosave of '{}' failed: {}", id, e);
            self.last_edit = Some(Instant::now());
            return Err(e);
        }
        log::info!("saved canvas '{}'", id);
        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(())
    }

    /// Load a record and make it the save target.
    pub async fn load(&mut self, id: &str) -> StorageResult<CanvasRecord> {
        let record = self.storage.load(id).await?;
        self.record_id = Some(id.to_string());
        self.dirty = false;
        self.last_edit = None;
        Ok(record)
    }

    pub async fn list(&self) -> StorageResult<Vec<String>> {
        self.storage.list().await
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BoxFuture, MemoryStorage, StorageError, block_on};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Storage that fails while `fail` is set.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail: AtomicBool,
    }

    impl Storage for FlakyStorage {
        fn save(&self, id: &str, record: &CanvasRecord) -> BoxFuture<'_, StorageResult<()>> {
            if self.fail.load(Ordering::SeqCst) {
                return Box::pin(async { Err(StorageError::Io("disk full".into())) });
            }
            self.inner.save(id, record)
        }
        fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
            self.inner.load(id)
        }
        fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
            self.inner.delete(id)
        }
        fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
            self.inner.list()
        }
        fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
            self.inner.exists(id)
        }
    }

    #[test]
    fn test_clean_manager_does_not_save() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert_eq!(manager.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_debounce_from_config() {
        let config = EditorConfig::from_json(r#"{ "autosave_debounce_ms": 1200 }"#).unwrap();
        let mut manager = AutoSaveManager::from_config(Arc::new(MemoryStorage::new()), &config);
        assert_eq!(manager.debounce(), Duration::from_millis(1200));
        manager.mark_dirty();
        let now = Instant::now();
        assert!(!manager.should_save_at(now + Duration::from_millis(500)));
        assert!(manager.should_save_at(now + Duration::from_millis(1200)));
    }

    #[test]
    fn test_debounce_window() {
        let mut manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));
        manager.mark_dirty();
        let now = Instant::now();
        assert!(!manager.should_save_at(now));
        assert!(manager.should_save_at(now + Duration::from_millis(500)));
    }

    #[test]
    fn test_maybe_save_waits_for_quiet_interval() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone()).with_debounce(Duration::from_secs(60));
        let record = CanvasRecord::new("draft");
        manager.mark_dirty();
        assert!(!block_on(manager.maybe_save(&record)).unwrap());
        assert!(!block_on(storage.exists("draft")).unwrap());

        manager.set_debounce(Duration::ZERO);
        assert!(block_on(manager.maybe_save(&record)).unwrap());
        assert!(!manager.is_dirty());
        assert!(block_on(storage.exists("draft")).unwrap());
    }

    #[test]
    fn test_failed_save_stays_dirty_and_retries() {
        let storage = Arc::new(FlakyStorage::default());
        storage.fail.store(true, Ordering::SeqCst);
        let mut manager = AutoSaveManager::new(storage.clone()).with_debounce(Duration::ZERO);
        manager.set_record_id(Some("canvas-1".into()));
        let record = CanvasRecord::new("draft");

        manager.mark_dirty();
        assert!(block_on(manager.maybe_save(&record)).is_err());
        assert!(manager.is_dirty());
        assert!(manager.should_save());

        storage.fail.store(false, Ordering::SeqCst);
        assert!(block_on(manager.maybe_save(&record)).unwrap());
        assert!(!manager.is_dirty());
        assert!(block_on(storage.exists("canvas-1")).unwrap());
    }

    #[test]
    fn test_load_sets_target() {
        let storage = Arc::new(MemoryStorage::new());
        block_on(storage.save("saved", &CanvasRecord::new("Saved"))).unwrap();
        let mut manager = AutoSaveManager::new(storage);
        let record = block_on(manager.load("saved")).unwrap();
        assert_eq!(record.name, "Saved");
        assert_eq!(manager.record_id(), Some("saved"));
        assert!(!manager.is_dirty());
    }
}
