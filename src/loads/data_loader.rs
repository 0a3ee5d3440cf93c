use super::_structs::{GeoPoint, Load};
use super::catalog::LoadCatalog;
use geo::HaversineDistance;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("No catalog could be loaded (primary: {primary}; fallback: {fallback})")]
    NoCatalog { primary: String, fallback: String },
}

/// Archivo de catálogo generado: solo se leen `active_loads` y `cities`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    active_loads: Vec<LoadRecord>,
    #[serde(default)]
    cities: BTreeMap<String, GeoPoint>,
}

/// Registro tal como viene en disco; `distance` puede faltar si hay coordenadas.
#[derive(Debug, Deserialize)]
struct LoadRecord {
    id: String,
    #[serde(rename = "type")]
    load_type: String,
    #[serde(default)]
    cargo: String,
    weight: f64,
    from: String,
    to: String,
    distance: Option<f64>,
    #[serde(default)]
    urgent: bool,
    estimated_time: Option<f64>,
    delivery_window: Option<String>,
    value: Option<String>,
    #[serde(rename = "fromLocation")]
    from_location: Option<GeoPoint>,
    #[serde(rename = "toLocation")]
    to_location: Option<GeoPoint>,
}

impl LoadRecord {
    fn into_load(self) -> Result<Load, LoaderError> {
        let distance = match (self.distance, self.from_location, self.to_location) {
            (Some(distance), _, _) => distance,
            (None, Some(from), Some(to)) => {
                let distance = great_circle_km(from, to);
                debug!("Load {} has no distance, using {} km", self.id, distance);
                distance
            }
            _ => {
                return Err(LoaderError::InvalidData(format!(
                    "load {} has neither distance nor coordinates",
                    self.id
                )))
            }
        };

        let load = Load {
            id: self.id,
            load_type: self.load_type,
            cargo: self.cargo,
            weight: self.weight,
            from: self.from,
            to: self.to,
            distance,
            urgent: self.urgent,
            estimated_time: self.estimated_time,
            delivery_window: self.delivery_window,
            value: self.value,
            from_location: self.from_location,
            to_location: self.to_location,
        };
        load.validate()?;
        Ok(load)
    }
}

/// Distancia de círculo máximo en km, redondeada como la genera el script de datos.
fn great_circle_km(from: GeoPoint, to: GeoPoint) -> f64 {
    (from.to_point().haversine_distance(&to.to_point()) / 1000.0).round()
}

trait Validate {
    fn validate(&self) -> Result<(), LoaderError>;
}

impl Validate for GeoPoint {
    fn validate(&self) -> Result<(), LoaderError> {
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(LoaderError::InvalidData(format!(
                "invalid coordinates ({}, {})",
                self.lat, self.lng
            )));
        }
        Ok(())
    }
}

impl Validate for Load {
    fn validate(&self) -> Result<(), LoaderError> {
        if self.id.trim().is_empty() {
            return Err(LoaderError::InvalidData("load without id".into()));
        }
        if self.from.trim().is_empty() || self.to.trim().is_empty() {
            return Err(LoaderError::InvalidData(format!("load {} has an empty city", self.id)));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(LoaderError::InvalidData(format!(
                "load {} has a non-positive weight",
                self.id
            )));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(LoaderError::InvalidData(format!(
                "load {} has an invalid distance",
                self.id
            )));
        }
        for point in [self.from_location, self.to_location].iter().flatten() {
            point.validate()?;
        }
        Ok(())
    }
}

/// Proveedor del catálogo: archivo generado con respaldo en la plantilla.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    primary: PathBuf,
    fallback: Option<PathBuf>,
}

impl CatalogLoader {
    pub fn new<P: AsRef<Path>>(primary: P) -> Self {
        Self {
            primary: primary.as_ref().to_path_buf(),
            fallback: None,
        }
    }

    pub fn with_fallback<P: AsRef<Path>>(mut self, fallback: P) -> Self {
        self.fallback = Some(fallback.as_ref().to_path_buf());
        self
    }

    /// Carga el archivo principal y, si falla, la plantilla de respaldo.
    pub fn load(&self) -> Result<LoadCatalog, LoaderError> {
        let primary_error = match Self::load_file(&self.primary) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => e,
        };

        error!("Error loading loads data from {}: {}", self.primary.display(), primary_error);

        let Some(fallback) = &self.fallback else {
            return Err(primary_error);
        };

        warn!("Using template data from {} as fallback", fallback.display());
        Self::load_file(fallback).map_err(|fallback_error| LoaderError::NoCatalog {
            primary: primary_error.to_string(),
            fallback: fallback_error.to_string(),
        })
    }

    /// Carga y valida un único archivo de catálogo.
    pub fn load_file(path: &Path) -> Result<LoadCatalog, LoaderError> {
        info!("Loading {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let file: CatalogFile = serde_json::from_reader(reader)?;

        let mut seen = HashSet::new();
        let loads = file
            .active_loads
            .into_iter()
            .map(|record| {
                let load = record.into_load()?;
                if !seen.insert(load.id.clone()) {
                    return Err(LoaderError::InvalidData(format!("duplicated load id {}", load.id)));
                }
                Ok(load)
            })
            .collect::<Result<Vec<_>, LoaderError>>()?;

        for point in file.cities.values() {
            point.validate()?;
        }

        info!("Loaded {} loads from {}", loads.len(), path.display());
        Ok(LoadCatalog::new(loads, &path.display().to_string()).with_cities(file.cities))
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    pub fn fallback(&self) -> Option<&Path> {
        self.fallback.as_deref()
    }
}
