use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::{debug, error, info, warn};

use crate::db::FileStore;
use crate::errors::AppError;
use crate::models::envelope::Envelope;
use crate::models::file::{NewUploadedFile, UploadedFileResponse};
use crate::utils::cloudinary::{UploadGateway, UploadOutcome};
use crate::utils::validation::{read_file_field, validate_file};

pub async fn upload_file(
    store: web::Data<dyn FileStore>,
    gateway: web::Data<dyn UploadGateway>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file = read_file_field(payload)
        .await
        .and_then(validate_file)
        .map_err(|rejection| {
            debug!("Rejected upload: {}", rejection);
            AppError::from(rejection)
        })?;

    let asset = match gateway.upload(&file).await {
        UploadOutcome::Uploaded(asset) => asset,
        UploadOutcome::TransportError(cause) => {
            warn!("Cloudinary upload of {} failed: {}", file.name, cause);
            return Err(AppError::Gateway(cause));
        }
        UploadOutcome::NoUrl => {
            warn!("Cloudinary returned no secure URL for {}", file.name);
            return Err(AppError::NoUrlReturned);
        }
    };

    let new_file = NewUploadedFile::new(
        &file.name,
        asset.secure_url.clone(),
        file.size,
        &file.content_type,
    );

    // Single write attempt. On failure the remote asset stays orphaned.
    match store.create(new_file).await {
        Ok(record) => {
            info!(
                "Stored upload {} as {} {}",
                record,
                asset.resource_type.as_deref().unwrap_or("asset"),
                asset.public_id.as_deref().unwrap_or("-")
            );
            Ok(HttpResponse::Created().json(Envelope::created(
                "File uploaded successfully",
                UploadedFileResponse::from(&record),
            )))
        }
        Err(err) => {
            error!(
                "Upload error: {} (remote asset {} has no record)",
                err, asset.secure_url
            );
            Err(AppError::Persistence(err.to_string()))
        }
    }
}

pub async fn list_files(store: web::Data<dyn FileStore>) -> Result<HttpResponse, AppError> {
    let files = store.list().await?;
    let data: Vec<UploadedFileResponse> = files.iter().map(UploadedFileResponse::from).collect();

    Ok(HttpResponse::Ok().json(Envelope::list(data)))
}

pub async fn get_file(
    store: web::Data<dyn FileStore>,
    id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    let file = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No uploaded file with id {}", id)))?;

    Ok(HttpResponse::Ok().json(Envelope::item(UploadedFileResponse::from(&file))))
}
