use super::_structs::{GeoPoint, Load};
use super::normalize::normalize_city;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Catálogo inmutable de cargas. Se reemplaza entero, nunca se parchea.
#[derive(Debug, Clone)]
pub struct LoadCatalog {
    loads: Vec<Load>,
    cities: BTreeMap<String, GeoPoint>,
    source: String,
    loaded_at: DateTime<Utc>,
}

impl LoadCatalog {
    pub fn new(loads: Vec<Load>, source: &str) -> Self {
        Self {
            loads,
            cities: BTreeMap::new(),
            source: source.to_string(),
            loaded_at: Utc::now(),
        }
    }

    /// Las claves de ciudad se guardan normalizadas.
    pub fn with_cities(mut self, cities: BTreeMap<String, GeoPoint>) -> Self {
        self.cities = cities
            .into_iter()
            .map(|(name, point)| (normalize_city(&name), point))
            .collect();
        self
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    pub fn cities(&self) -> &BTreeMap<String, GeoPoint> {
        &self.cities
    }

    pub fn city_location(&self, city: &str) -> Option<GeoPoint> {
        self.cities.get(&normalize_city(city)).copied()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Referencia compartida al catálogo vigente. Los lectores toman una
/// instantánea (`Arc`) y nunca ven un catálogo a medio actualizar.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<LoadCatalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: LoadCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<LoadCatalog> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Sustituye el catálogo y devuelve el anterior.
    pub fn replace(&self, catalog: LoadCatalog) -> Arc<LoadCatalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        info!(
            "Replacing catalog {} ({} loads) with {} ({} loads)",
            guard.source(),
            guard.len(),
            next.source(),
            next.len()
        );
        std::mem::replace(&mut *guard, next)
    }
}
