use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chat_core::Config;
use chat_llm::OpenAiCompatProvider;
use chat_pipeline::ChatService;
use log::{error, info};
use plant_catalog::FileCatalog;
use turn_store::FileTurnStore;

use crate::controllers::chat_controller;

const DEFAULT_WORKER_COUNT: usize = 4;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1").configure(chat_controller::config));
}

fn build_service(app_data_dir: &Path) -> Result<ChatService, String> {
    let store = Arc::new(FileTurnStore::new(app_data_dir.join("turns")));
    let catalog = Arc::new(FileCatalog::new(app_data_dir.join("collection.json")));

    let config = Config::new();
    let provider = OpenAiCompatProvider::from_config(&config)
        .map_err(|e| format!("Failed to configure LLM provider: {e}"))?;

    Ok(ChatService::new(store, catalog, Arc::new(provider)))
}

pub async fn run(app_data_dir: PathBuf, port: u16) -> Result<(), String> {
    info!("Starting web service...");

    let service = web::Data::new(build_service(&app_data_dir)?);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(format!("127.0.0.1:{port}"))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Listening on http://127.0.0.1:{port}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
