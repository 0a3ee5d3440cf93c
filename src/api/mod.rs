use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web;

pub mod handlers;
use handlers::{health, load_suggestions, reload_catalog};

pub use handlers::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/loads/suggestions", web::get().to(load_suggestions))
            .route("/catalog/reload", web::post().to(reload_catalog)),
    );
}

/// Sin orígenes configurados se acepta cualquiera, como el cliente de mapas
/// en desarrollo.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin().send_wildcard();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::fixtures::{load, portugal_load_catalog};
    use crate::loads::{
        CatalogHandle, CatalogLoader, CityCoordinates, EnrichmentError, LoadCatalog,
        RankedRoutes, RouteEnricher, SameCityPolicy, SuggestionConfig, SuggestionQuery,
    };
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::io::Write;
    use std::sync::Arc;

    fn state_with(catalog: LoadCatalog, suggestions: SuggestionConfig) -> web::Data<AppState> {
        web::Data::new(AppState::new(
            CatalogHandle::new(catalog),
            CatalogLoader::new("/nonexistent/generated_loads.json"),
            suggestions,
        ))
    }

    fn state() -> web::Data<AppState> {
        state_with(portugal_load_catalog(), SuggestionConfig::default())
    }

    async fn get_json(state: web::Data<AppState>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(App::new().app_data(state).configure(config)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_cors_allows_any_origin_by_default() {
        let app = test::init_service(
            App::new().wrap(cors(&[])).app_data(state()).configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/loads/suggestions?currentCity=Porto")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn test_cors_restricted_to_configured_origins() {
        let origins = vec!["https://maps.example.pt".to_string()];
        let app = test::init_service(
            App::new().wrap(cors(&origins)).app_data(state()).configure(config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://maps.example.pt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://maps.example.pt"
        );
    }

    #[actix_web::test]
    async fn test_health() {
        let (status, body) = get_json(state(), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["catalog"]["loads"], 12);
        assert_eq!(body["catalog"]["source"], "fixtures");
    }

    #[actix_web::test]
    async fn test_suggestions_direct_and_connecting() {
        let (status, body) = get_json(
            state(),
            "/api/loads/suggestions?currentCity=Porto&destinationCity=Lisboa",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let data = &body["data"];
        assert_eq!(data["total_routes_found"], 4);
        assert_eq!(data["direct_routes_found"], 2);
        assert_eq!(data["connecting_routes_found"], 2);
        assert_eq!(data["route_types"]["direct"], 2);
        assert_eq!(data["route_types"]["connecting"], 2);

        let routes = data["routes"].as_array().unwrap();
        let types: Vec<&str> = routes.iter().map(|r| r["type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["Direct", "Direct", "Connecting", "Connecting"]);
        assert_eq!(routes[0]["id"], "L0001");
        assert_eq!(routes[2]["total_distance"], 325.0);
        assert_eq!(routes[2]["connection_city"], "Coimbra");
        assert_eq!(routes[2]["urgent"], true);

        assert_eq!(
            body["summary"]["message"],
            "Found 2 direct routes and 2 connecting routes"
        );
        assert_eq!(body["summary"]["has_connecting_routes"], true);
        assert!(body.get("enrichment").is_none());
    }

    #[actix_web::test]
    async fn test_suggestions_without_destination() {
        let (status, body) =
            get_json(state(), "/api/loads/suggestions?currentCity=coimbra").await;

        assert_eq!(status, StatusCode::OK);
        let routes = body["data"]["routes"].as_array().unwrap();
        assert_eq!(routes.len(), 3);
        assert!(routes.iter().all(|r| r["type"] == "Direct"));
        assert_eq!(body["data"]["connecting_routes_found"], 0);
    }

    #[actix_web::test]
    async fn test_suggestions_capped_at_five() {
        let loads = (0..9)
            .map(|i| load(&format!("D{}", i), "Porto", "Lisboa", 300.0))
            .collect();
        let state = state_with(LoadCatalog::new(loads, "test"), SuggestionConfig::default());

        let (status, body) = get_json(state, "/api/loads/suggestions?currentCity=Porto").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["routes"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"]["total_routes_found"], 9);
        assert_eq!(body["summary"]["total_options"], 9);
    }

    #[actix_web::test]
    async fn test_unknown_city_is_empty_success() {
        let (status, body) = get_json(
            state(),
            "/api/loads/suggestions?currentCity=CityX&destinationCity=CityY",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["routes"].as_array().unwrap().len(), 0);
        assert_eq!(body["data"]["total_routes_found"], 0);
    }

    #[actix_web::test]
    async fn test_missing_current_city() {
        let (status, body) =
            get_json(state(), "/api/loads/suggestions?destinationCity=Lisboa").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Current city is required");

        let (status, _) = get_json(state(), "/api/loads/suggestions?currentCity=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_same_city_rejected_when_configured() {
        let suggestions = SuggestionConfig {
            same_city_policy: SameCityPolicy::Reject,
            ..SuggestionConfig::default()
        };
        let (status, _) = get_json(
            state_with(portugal_load_catalog(), suggestions),
            "/api/loads/suggestions?currentCity=Porto&destinationCity=porto",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_catalog_is_server_error() {
        let catalog = LoadCatalog::new(vec![load("A1", "Porto", "Lisboa", f64::INFINITY)], "test");
        let (status, body) = get_json(
            state_with(catalog, SuggestionConfig::default()),
            "/api/loads/suggestions?currentCity=Porto",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("data").is_none());
    }

    struct FailingEnricher;

    impl RouteEnricher for FailingEnricher {
        fn enrich(
            &self,
            _catalog: &LoadCatalog,
            _query: &SuggestionQuery,
            _routes: &RankedRoutes<'_>,
        ) -> Result<Option<Value>, EnrichmentError> {
            Err(EnrichmentError::Unavailable("model offline".into()))
        }
    }

    #[actix_web::test]
    async fn test_enrichment_is_optional() {
        let failing = web::Data::new(
            AppState::new(
                CatalogHandle::new(portugal_load_catalog()),
                CatalogLoader::new("/nonexistent/generated_loads.json"),
                SuggestionConfig::default(),
            )
            .with_enricher(Arc::new(FailingEnricher)),
        );
        let (status, body) = get_json(
            failing,
            "/api/loads/suggestions?currentCity=Porto&destinationCity=Faro",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["connecting_routes_found"], 3);
        assert!(body.get("enrichment").is_none());

        let mut cities = std::collections::BTreeMap::new();
        cities.insert("faro".to_string(), crate::loads::GeoPoint::new(37.0193, -7.9304));
        let with_coordinates = web::Data::new(
            AppState::new(
                CatalogHandle::new(portugal_load_catalog().with_cities(cities)),
                CatalogLoader::new("/nonexistent/generated_loads.json"),
                SuggestionConfig::default(),
            )
            .with_enricher(Arc::new(CityCoordinates)),
        );
        let (_, body) = get_json(
            with_coordinates,
            "/api/loads/suggestions?currentCity=Porto&destinationCity=Faro",
        )
        .await;
        assert_eq!(body["enrichment"]["city_coordinates"]["faro"]["lat"], 37.0193);
    }

    #[actix_web::test]
    async fn test_reload_replaces_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"active_loads": [
                {{"id": "N1", "type": "Food", "weight": 100, "from": "Faro", "to": "Beja", "distance": 150}}
            ]}}"#
        )
        .unwrap();

        let state = web::Data::new(AppState::new(
            CatalogHandle::new(portugal_load_catalog()),
            CatalogLoader::new(file.path()),
            SuggestionConfig::default(),
        ));
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post().uri("/api/catalog/reload").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.catalog.snapshot().len(), 1);

        let req = test::TestRequest::get()
            .uri("/api/loads/suggestions?currentCity=Faro")
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["routes"][0]["id"], "N1");
    }

    #[actix_web::test]
    async fn test_failed_reload_keeps_catalog() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(config)).await;

        let req = test::TestRequest::post().uri("/api/catalog/reload").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.catalog.snapshot().source(), "fixtures");
    }
}
