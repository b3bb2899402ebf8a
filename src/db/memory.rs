use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{FileStore, StoreError};
use crate::models::file::{NewUploadedFile, UploadedFile};

/// In-process store for handler tests. Each insert is stamped one second
/// after the previous one so ordering is deterministic.
#[derive(Default)]
pub struct MemoryFileStore {
    files: Mutex<Vec<UploadedFile>>,
    fail_writes: bool,
}

impl MemoryFileStore {
    pub fn failing() -> Self {
        Self {
            files: Mutex::default(),
            fail_writes: true,
        }
    }

    pub fn count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create(&self, new_file: NewUploadedFile) -> Result<UploadedFile, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut files = self.files.lock().unwrap();
        let index = files.len() as i64;
        let created_at = Utc::now() + Duration::seconds(index);
        let file = UploadedFile {
            id: index + 1,
            original_name: new_file.original_name,
            remote_url: new_file.remote_url,
            file_size: new_file.file_size,
            content_type: new_file.content_type,
            created_at,
            updated_at: created_at,
        };
        files.push(file.clone());
        Ok(file)
    }

    async fn list(&self) -> Result<Vec<UploadedFile>, StoreError> {
        let mut files = self.files.lock().unwrap().clone();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(files)
    }

    async fn get(&self, id: i64) -> Result<Option<UploadedFile>, StoreError> {
        Ok(self.files.lock().unwrap().iter().find(|f| f.id == id).cloned())
    }
}
