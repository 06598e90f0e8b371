use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::row::SlotRow;
use super::ViewError;

/// In-memory row storage. Rows are kept as serialized bytes so the
/// store's surface matches what a table- or document-backed
/// implementation would offer; the view deserializes on read.
#[derive(Clone, Default)]
pub struct SlotRowStore {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl SlotRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(slot_id: &str, participant_id: &str) -> String {
        format!("{}-{}", slot_id, participant_id)
    }

    /// Insert or overwrite the row for its (slot, participant) key.
    pub fn upsert(&self, row: &SlotRow) -> Result<(), ViewError> {
        let bytes = serde_json::to_vec(row).map_err(|e| ViewError::Serde(e.to_string()))?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| ViewError::Storage("write"))?;
        storage.insert(row.key(), bytes);
        Ok(())
    }

    pub fn get(
        &self,
        slot_id: &str,
        participant_id: &str,
    ) -> Result<Option<SlotRow>, ViewError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| ViewError::Storage("read"))?;
        storage
            .get(&Self::make_key(slot_id, participant_id))
            .map(|bytes| {
                serde_json::from_slice(bytes).map_err(|e| ViewError::Serde(e.to_string()))
            })
            .transpose()
    }

    /// All rows matching a predicate.
    pub fn find<F>(&self, predicate: F) -> Result<Vec<SlotRow>, ViewError>
    where
        F: Fn(&SlotRow) -> bool,
    {
        let storage = self
            .storage
            .read()
            .map_err(|_| ViewError::Storage("read"))?;
        let mut rows = Vec::new();
        for bytes in storage.values() {
            let row: SlotRow =
                serde_json::from_slice(bytes).map_err(|e| ViewError::Serde(e.to_string()))?;
            if predicate(&row) {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
