use super::{Cursor, NewTranslation, Page, RecordStore, StoreError, TranslationRecord, PAGE_SIZE};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

type RecordRow = (i64, String, String, String, String);

fn into_record((id, text, source, target, translated): RecordRow) -> TranslationRecord {
    TranslationRecord {
        id,
        text,
        source,
        target,
        translated,
    }
}

/// Record store backed by a PostgreSQL `translations` table.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Connect to the database and create the table if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the table if needed.
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS translations (
                id BIGSERIAL PRIMARY KEY,
                text TEXT NOT NULL,
                source TEXT NOT NULL,
                target TEXT NOT NULL,
                translated TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        info!("✓ Translations table ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, new: NewTranslation) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO translations (text, source, target, translated)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&new.text)
        .bind(&new.source)
        .bind(&new.target)
        .bind(&new.translated)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TranslationRecord>, StoreError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT id, text, source, target, translated FROM translations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_record))
    }

    async fn list(&self, cursor: Option<&Cursor>) -> Result<Page, StoreError> {
        let after = cursor.map(Cursor::last_id).transpose()?;

        // One extra row tells us whether another page follows
        let rows: Vec<RecordRow> = sqlx::query_as(
            "SELECT id, text, source, target, translated
             FROM translations
             WHERE $1::BIGINT IS NULL OR id > $1
             ORDER BY id ASC
             LIMIT $2",
        )
        .bind(after)
        .bind((PAGE_SIZE + 1) as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::from_rows(rows.into_iter().map(into_record).collect()))
    }
}
