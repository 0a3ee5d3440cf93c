use crate::loads::{
    CatalogHandle, CatalogLoader, LoadPlanner, NoEnrichment, RankedRoutes, RouteEnricher,
    SuggestionConfig, SuggestionError, SuggestionQuery, SuggestionSummary,
};
use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Estado compartido por todos los workers. El catálogo se inyecta aquí,
/// no vive en una variable global.
pub struct AppState {
    pub catalog: CatalogHandle,
    pub loader: CatalogLoader,
    pub suggestions: SuggestionConfig,
    pub enricher: Arc<dyn RouteEnricher>,
}

impl AppState {
    pub fn new(catalog: CatalogHandle, loader: CatalogLoader, suggestions: SuggestionConfig) -> Self {
        Self {
            catalog,
            loader,
            suggestions,
            enricher: Arc::new(NoEnrichment),
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn RouteEnricher>) -> Self {
        self.enricher = enricher;
        self
    }
}

#[derive(Serialize)]
struct SuggestionResponse<'a> {
    success: bool,
    data: RankedRoutes<'a>,
    summary: SuggestionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    enrichment: Option<Value>,
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({
        "error": "Internal server error",
        "details": { "message": message }
    }))
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let catalog = state.catalog.snapshot();

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Server is running",
        "catalog": {
            "loads": catalog.len(),
            "cities": catalog.cities().len(),
            "source": catalog.source(),
            "loaded_at": catalog.loaded_at(),
        }
    }))
}

pub async fn load_suggestions(
    state: web::Data<AppState>,
    query: web::Query<SuggestionQuery>,
) -> impl Responder {
    let catalog = state.catalog.snapshot();
    let planner = LoadPlanner::new(&catalog, &state.suggestions);

    let ranked = match planner.suggest(&query) {
        Ok(ranked) => ranked,
        Err(SuggestionError::Validation(message)) => {
            return HttpResponse::BadRequest().json(json!({ "error": message }));
        }
        Err(e @ SuggestionError::Internal(_)) => {
            error!("Error getting load suggestions: {}", e);
            return internal_error(&e.to_string());
        }
    };

    // la decoración es opcional: si falla se responde igual
    let enrichment = match state.enricher.enrich(&catalog, &query, &ranked) {
        Ok(enrichment) => enrichment,
        Err(e) => {
            warn!("Enrichment failed, returning plain routes: {}", e);
            None
        }
    };

    let response = SuggestionResponse {
        success: true,
        summary: SuggestionSummary::from(&ranked),
        data: ranked,
        enrichment,
    };
    HttpResponse::Ok().json(&response)
}

/// Vuelve a leer el catálogo y lo sustituye entero. Si la carga falla se
/// conserva el catálogo anterior.
pub async fn reload_catalog(state: web::Data<AppState>) -> impl Responder {
    let loader = state.loader.clone();

    let loaded = match web::block(move || loader.load()).await {
        Ok(result) => result,
        Err(e) => {
            error!("Catalog reload task failed: {}", e);
            return internal_error(&e.to_string());
        }
    };

    match loaded {
        Ok(catalog) => {
            let loads = catalog.len();
            let source = catalog.source().to_string();
            state.catalog.replace(catalog);
            info!("Catalog reloaded: {} loads from {}", loads, source);
            HttpResponse::Ok().json(json!({
                "success": true,
                "loads": loads,
                "source": source,
            }))
        }
        Err(e) => {
            error!("Error reloading catalog: {}", e);
            internal_error(&e.to_string())
        }
    }
}
