mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use crate::config::Config;
use crate::db::{FileStore, PgFileStore};
use crate::utils::cloudinary::{CloudinaryGateway, UploadGateway};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .map_err(|err| {
            error!("Failed to prepare the database: {}", err);
            std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
        })?;

    let gateway = CloudinaryGateway::new(config.cloudinary.clone()).map_err(|err| {
        error!("Failed to build the Cloudinary client: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;

    let store: Arc<dyn FileStore> = Arc::new(PgFileStore::new(pool));
    let gateway: Arc<dyn UploadGateway> = Arc::new(gateway);
    let store = web::Data::from(store);
    let gateway = web::Data::from(gateway);

    info!(
        "Starting server at {} (Cloudinary cloud {})",
        config.bind_address, config.cloudinary.cloud_name
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(gateway.clone())
            .configure(handlers::configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
