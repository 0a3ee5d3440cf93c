use super::_structs::{GeoPoint, RankedRoutes, SuggestionQuery};
use super::catalog::LoadCatalog;
use super::normalize::normalize_city;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Enrichment unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed enrichment: {0}")]
    Malformed(String),
}

/// Decora un resultado ya calculado. Un fallo aquí nunca invalida la
/// consulta: el handler registra el error y responde sin decoración.
pub trait RouteEnricher: Send + Sync {
    fn enrich(
        &self,
        catalog: &LoadCatalog,
        query: &SuggestionQuery,
        routes: &RankedRoutes<'_>,
    ) -> Result<Option<Value>, EnrichmentError>;
}

pub struct NoEnrichment;

impl RouteEnricher for NoEnrichment {
    fn enrich(
        &self,
        _catalog: &LoadCatalog,
        _query: &SuggestionQuery,
        _routes: &RankedRoutes<'_>,
    ) -> Result<Option<Value>, EnrichmentError> {
        Ok(None)
    }
}

/// Coordenadas de cada ciudad que aparece en las rutas mostradas, para
/// pintar marcadores sin que el cliente tenga su propia tabla de ciudades.
/// Usa la tabla `cities` del catálogo y, si falta, la ubicación de la carga.
pub struct CityCoordinates;

impl CityCoordinates {
    fn locate(catalog: &LoadCatalog, city: &str, from_load: Option<GeoPoint>) -> Option<GeoPoint> {
        catalog.city_location(city).or(from_load)
    }
}

impl RouteEnricher for CityCoordinates {
    fn enrich(
        &self,
        catalog: &LoadCatalog,
        _query: &SuggestionQuery,
        routes: &RankedRoutes<'_>,
    ) -> Result<Option<Value>, EnrichmentError> {
        if routes.routes.is_empty() {
            return Ok(None);
        }

        let mut coordinates: BTreeMap<String, GeoPoint> = BTreeMap::new();
        for route in &routes.routes {
            for leg in route.legs() {
                for (city, location) in [(&leg.from, leg.from_location), (&leg.to, leg.to_location)] {
                    let key = normalize_city(city);
                    if coordinates.contains_key(&key) {
                        continue;
                    }
                    if let Some(point) = Self::locate(catalog, city, location) {
                        coordinates.insert(key, point);
                    }
                }
            }
        }

        let value = serde_json::to_value(&coordinates)
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;
        Ok(Some(json!({ "city_coordinates": value })))
    }
}
