//! Cardio Predict API server
//!
//! Main entry point: loads configuration, probes the database once to pick
//! a storage backend, then serves the prediction API.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use cardio_predict::ai::GroqClient;
use cardio_predict::api::{self, AppState};
use cardio_predict::config;
use cardio_predict::db::{self, FileStore, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load()?;

    // The backend is fixed here for the lifetime of the process. A database
    // outage after startup does not trigger another probe.
    let backend = match config.mongo_uri.as_deref() {
        Some(uri) => match db::mongo::probe(uri).await {
            Some(store) => StorageBackend::Mongo(store),
            None => {
                warn!(
                    storage_file = %config.storage_file.display(),
                    "all MongoDB connection attempts failed, falling back to local JSON storage"
                );
                StorageBackend::LocalFile(FileStore::new(config.storage_file.clone()))
            }
        },
        None => {
            warn!(
                storage_file = %config.storage_file.display(),
                "MONGO_URI not set, using local JSON storage"
            );
            StorageBackend::LocalFile(FileStore::new(config.storage_file.clone()))
        }
    };
    info!(backend = backend.kind(), "storage backend selected");

    let state = web::Data::new(AppState {
        backend,
        llm: GroqClient::new(config.groq_api_key.clone()),
    });

    info!(port = config.port, "starting heart disease prediction API");
    info!("endpoints: GET /api/health, POST /api/predict, GET /api/predictions, GET /api/sample-data");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Permissive CORS for the browser frontend
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    Ok(())
}
