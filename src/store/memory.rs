use super::{Cursor, NewTranslation, Page, RecordStore, StoreError, TranslationRecord, PAGE_SIZE};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

/// Record store kept in process memory.
///
/// Nothing survives a restart. Ids start at 1 and increase by one per
/// record; allocation and insertion happen under the same write lock.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<i64, TranslationRecord>,
    last_id: i64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, new: NewTranslation) -> Result<i64, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.records.insert(id, new.into_record(id));
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TranslationRecord>, StoreError> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn list(&self, cursor: Option<&Cursor>) -> Result<Page, StoreError> {
        let lower = match cursor {
            Some(cursor) => Bound::Excluded(cursor.last_id()?),
            None => Bound::Unbounded,
        };

        let inner = self.inner.read().await;
        let rows = inner
            .records
            .range((lower, Bound::Unbounded))
            .take(PAGE_SIZE + 1)
            .map(|(_, record)| record.clone())
            .collect();

        Ok(Page::from_rows(rows))
    }
}
