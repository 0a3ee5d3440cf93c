use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use truck_loads::api::{self, AppState};
use truck_loads::middlewares::RequestLogger;
use truck_loads::{AppConfig, CatalogHandle, CityCoordinates};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // El catálogo se carga una sola vez al arrancar
    let loader = config.catalog.loader();
    let catalog = match loader.load() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Error loading loads data: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()));
        }
    };
    info!("Loaded {} loads from {}", catalog.len(), catalog.source());

    let state = web::Data::new(
        AppState::new(CatalogHandle::new(catalog), loader, config.suggestions.clone())
            .with_enricher(Arc::new(CityCoordinates)),
    );

    let (host, port) = config.bind_address();
    info!("Server is running on {}:{} with {} workers", host, port, config.server.workers);

    let allowed_origins = config.server.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(api::cors(&allowed_origins))
            .wrap(RequestLogger)
            .app_data(state.clone())
            .configure(api::config)
    })
    .workers(config.server.workers)
    .bind((host, port))?
    .run()
    .await
}
