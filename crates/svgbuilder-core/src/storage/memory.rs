//! In-memory storage backend.

use super::{BoxFuture, CanvasRecord, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// Volatile storage for tests and sessions that never touch disk.
#[derive(Default)]
pub struct MemoryStorage {
    records: RwLock<HashMap<String, CanvasRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, record: &CanvasRecord) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let record = record.clone();
        Box::pin(async move {
            self.records.write().map_err(lock_error)?.insert(id, record);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<CanvasRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            let records = self.records.read().map_err(lock_error)?;
            records.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.records.write().map_err(lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let records = self.records.read().map_err(lock_error)?;
            Ok(records.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move { Ok(self.records.read().map_err(lock_error)?.contains_key(&id)) })
    }
}
