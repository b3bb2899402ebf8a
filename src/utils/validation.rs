use actix_multipart::Multipart;
use futures_util::StreamExt;
use thiserror::Error;
use validator::{Validate, ValidationError};

pub const FILE_FIELD: &str = "file";
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Error, PartialEq)]
pub enum FileRejection {
    #[error("No file was submitted.")]
    MissingFile,
    #[error("The submitted file is empty.")]
    EmptyFile,
    #[error("File size cannot exceed 10MB")]
    FileTooLarge,
    #[error("File type '{0}' is not supported. Allowed types: {allowed}", allowed = ALLOWED_CONTENT_TYPES.join(", "))]
    UnsupportedType(String),
    #[error("The submitted data was not a file: {0}")]
    Malformed(String),
}

/// A file taken from the `file` multipart field. `size` counts every byte
/// received, `data` holds at most `MAX_FILE_SIZE` of them.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct FilePayload {
    pub name: String,
    #[validate(custom = "validate_content_type")]
    pub content_type: String,
    pub size: usize,
    pub data: Vec<u8>,
}

#[cfg(test)]
impl FilePayload {
    pub fn new(name: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
            data,
        }
    }
}

fn validate_content_type(content_type: &str) -> Result<(), ValidationError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(ValidationError::new("unsupported_content_type"));
    }
    Ok(())
}

/// Applies the size and type policy. The declared content type is trusted as-is.
pub fn validate_file(file: Option<FilePayload>) -> Result<FilePayload, FileRejection> {
    let file = file.ok_or(FileRejection::MissingFile)?;

    if file.size == 0 {
        return Err(FileRejection::EmptyFile);
    }

    if file.size > MAX_FILE_SIZE {
        return Err(FileRejection::FileTooLarge);
    }

    file.validate()
        .map_err(|_| FileRejection::UnsupportedType(file.content_type.clone()))?;

    Ok(file)
}

/// Reads the first field named `file` that carries a filename out of a multipart
/// body. Other fields, and `file` parts sent as plain form values, are skipped.
pub async fn read_file_field(mut payload: Multipart) -> Result<Option<FilePayload>, FileRejection> {
    let mut file = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|err| FileRejection::Malformed(err.to_string()))?;

        if file.is_some() || field.content_disposition().get_name() != Some(FILE_FIELD) {
            continue;
        }

        let name = match field.content_disposition().get_filename() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();

        let mut data = Vec::new();
        let mut size = 0usize;
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|err| FileRejection::Malformed(err.to_string()))?;
            size += chunk.len();
            let room = MAX_FILE_SIZE.saturating_sub(data.len());
            data.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }

        file = Some(FilePayload {
            name,
            content_type,
            size,
            data,
        });
    }

    Ok(file)
}
