use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_ORIGINAL_NAME_LEN: usize = 255;
pub const MAX_CONTENT_TYPE_LEN: usize = 100;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub id: i64,
    pub original_name: String,
    pub remote_url: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadedFile {
    /// Size in megabytes rounded to two decimals, `None` when the size is unknown.
    pub fn file_size_mb(&self) -> Option<f64> {
        self.file_size
            .map(|size| (size as f64 / BYTES_PER_MB * 100.0).round() / 100.0)
    }
}

impl fmt::Display for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.original_name,
            self.created_at.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Fields written on insert. `remote_url` only ever comes from the hosting provider.
#[derive(Debug, Clone)]
pub struct NewUploadedFile {
    pub original_name: String,
    pub remote_url: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
}

impl NewUploadedFile {
    pub fn new(
        original_name: &str,
        remote_url: String,
        file_size: usize,
        content_type: &str,
    ) -> Self {
        Self {
            original_name: truncate_chars(original_name, MAX_ORIGINAL_NAME_LEN),
            remote_url,
            file_size: i64::try_from(file_size).ok(),
            content_type: Some(truncate_chars(content_type, MAX_CONTENT_TYPE_LEN)),
        }
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Public projection of a record, shared by the create, list and retrieve responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedFileResponse {
    pub id: i64,
    pub original_name: String,
    pub remote_url: String,
    pub file_size: Option<i64>,
    pub file_size_mb: Option<f64>,
    pub content_type: Option<String>,
    pub upload_date: DateTime<Utc>,
}

impl From<&UploadedFile> for UploadedFileResponse {
    fn from(file: &UploadedFile) -> Self {
        Self {
            id: file.id,
            original_name: file.original_name.clone(),
            remote_url: file.remote_url.clone(),
            file_size: file.file_size,
            file_size_mb: file.file_size_mb(),
            content_type: file.content_type.clone(),
            upload_date: file.created_at,
        }
    }
}
