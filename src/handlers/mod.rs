pub mod file;

use actix_web::web;

pub const UPLOADS_PATH: &str = "/api/upload/file-uploads";

/// Route table for the upload API, applied once when the `App` is built.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(UPLOADS_PATH)
            .route(web::post().to(file::upload_file))
            .route(web::get().to(file::list_files)),
    )
    .service(
        web::resource(format!("{UPLOADS_PATH}/{{id}}"))
            .route(web::get().to(file::get_file)),
    );
}
