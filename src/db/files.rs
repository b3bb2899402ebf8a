use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::StoreError;
use crate::models::file::{NewUploadedFile, UploadedFile};

/// Persistent table of upload metadata. Listing is newest first.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn create(&self, new_file: NewUploadedFile) -> Result<UploadedFile, StoreError>;

    async fn list(&self) -> Result<Vec<UploadedFile>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<UploadedFile>, StoreError>;
}

pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn create(&self, new_file: NewUploadedFile) -> Result<UploadedFile, StoreError> {
        let now = Utc::now();

        let file = sqlx::query_as::<_, UploadedFile>(
            "INSERT INTO uploaded_files (original_name, remote_url, file_size, content_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, original_name, remote_url, file_size, content_type, created_at, updated_at",
        )
        .bind(&new_file.original_name)
        .bind(&new_file.remote_url)
        .bind(new_file.file_size)
        .bind(&new_file.content_type)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    async fn list(&self) -> Result<Vec<UploadedFile>, StoreError> {
        let files = sqlx::query_as::<_, UploadedFile>(
            "SELECT id, original_name, remote_url, file_size, content_type, created_at, updated_at \
             FROM uploaded_files ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }

    async fn get(&self, id: i64) -> Result<Option<UploadedFile>, StoreError> {
        let file = sqlx::query_as::<_, UploadedFile>(
            "SELECT id, original_name, remote_url, file_size, content_type, created_at, updated_at \
             FROM uploaded_files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }
}
