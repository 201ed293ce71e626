use crate::error::AppError;
use crate::i18n::{RequestValidator, NO_ERRORS};
use crate::store::{Cursor, NewTranslation, Page, RecordStore, TranslationRecord};
use crate::translation::TranslationProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Validates, translates and stores translation requests; serves reads.
///
/// The provider and store are injected so tests can substitute fakes.
#[derive(Clone)]
pub struct TranslationService {
    provider: Arc<dyn TranslationProvider>,
    store: Arc<dyn RecordStore>,
}

impl TranslationService {
    pub fn new(provider: Arc<dyn TranslationProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { provider, store }
    }

    /// Validate the request, translate the text and persist the record.
    ///
    /// Each step runs only if the previous one succeeded, so a failed
    /// translation never leaves a record behind. Returns the new record's id.
    pub async fn create_translation(
        &self,
        text: &Value,
        source: &Value,
        target: &Value,
    ) -> Result<i64, AppError> {
        let request = RequestValidator::validate(text, source, target).inspect_err(|e| {
            debug!("Rejected translation request: {}", e);
        })?;

        debug!(
            "Accepted translation request {} -> {}: {}",
            request.source, request.target, NO_ERRORS
        );
        let translated = self
            .provider
            .translate(&request.text, &request.source, &request.target)
            .await?;

        let id = self
            .store
            .create(NewTranslation {
                text: request.text,
                source: request.source,
                target: request.target,
                translated,
            })
            .await?;

        info!("Created translation {}", id);
        Ok(id)
    }

    pub async fn get_translation(&self, id: i64) -> Result<TranslationRecord, AppError> {
        self.store.get_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list_translations(&self, cursor: Option<&Cursor>) -> Result<Page, AppError> {
        Ok(self.store.list(cursor).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ValidationError;
    use crate::store::{MemoryRecordStore, StoreError, PAGE_SIZE};
    use crate::translation::ProviderError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that "translates" by tagging the text with the language pair
    #[derive(Default)]
    struct TaggingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationProvider for TaggingProvider {
        async fn translate(
            &self,
            text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("[{}->{}] {}", source, target, text))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl TranslationProvider for FailingProvider {
        async fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, ProviderError> {
            Err(ProviderError::InvalidResponse("provider down".to_string()))
        }
    }

    fn service_with(provider: Arc<dyn TranslationProvider>) -> (TranslationService, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        let service = TranslationService::new(provider, store.clone());
        (service, store)
    }

    // ==================== create_translation Tests ====================

    #[tokio::test]
    async fn test_create_then_get_echoes_input() {
        let (service, _store) = service_with(Arc::new(TaggingProvider::default()));

        let id = service
            .create_translation(&json!("hello"), &json!("EN"), &json!("Fr"))
            .await
            .expect("Should create");

        let record = service.get_translation(id).await.expect("Should exist");
        assert_eq!(record.id, id);
        assert_eq!(record.text, "hello");
        assert_eq!(record.source, "en");
        assert_eq!(record.target, "fr");
        assert_eq!(record.translated, "[en->fr] hello");
    }

    #[tokio::test]
    async fn test_invalid_request_skips_provider_and_store() {
        let provider = Arc::new(TaggingProvider::default());
        let (service, store) = service_with(provider.clone());

        let err = service
            .create_translation(&json!(""), &json!("xx"), &json!("fr"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::TextEmpty)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_provider_failure_persists_nothing() {
        let (service, store) = service_with(Arc::new(FailingProvider));

        let err = service
            .create_translation(&json!("hello"), &json!("en"), &json!("fr"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Provider(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_provider_receives_lowercased_codes() {
        let (service, _store) = service_with(Arc::new(TaggingProvider::default()));

        let id = service
            .create_translation(&json!("hi"), &json!("ZH-TW"), &json!("EN"))
            .await
            .unwrap();

        let record = service.get_translation(id).await.unwrap();
        assert_eq!(record.translated, "[zh-tw->en] hi");
    }

    // ==================== get_translation Tests ====================

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (service, _store) = service_with(Arc::new(TaggingProvider::default()));
        let err = service.get_translation(12345).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    // ==================== list_translations Tests ====================

    #[tokio::test]
    async fn test_list_pages_through_created_records() {
        let (service, _store) = service_with(Arc::new(TaggingProvider::default()));
        for n in 0..8 {
            service
                .create_translation(&json!(format!("text {}", n)), &json!("en"), &json!("it"))
                .await
                .unwrap();
        }

        let first = service.list_translations(None).await.unwrap();
        assert_eq!(first.items.len(), PAGE_SIZE);
        let cursor = first.next_cursor.expect("More pages");

        let second = service.list_translations(Some(&cursor)).await.unwrap();
        assert_eq!(second.items.len(), 3);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.items[0].text, "text 5");
    }

    #[tokio::test]
    async fn test_list_with_bad_cursor_is_invalid_cursor() {
        let (service, _store) = service_with(Arc::new(TaggingProvider::default()));
        let err = service
            .list_translations(Some(&Cursor::new("garbage!")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCursor));
    }

    #[test]
    fn test_store_error_conversion_keeps_database_errors_opaque() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::Store(_)));
    }
}
