use super::{
    _structs::{RankedRoutes, SuggestionQuery},
    catalog::LoadCatalog,
    matcher::{MatchError, RouteMatcher},
    normalize::normalize_city,
    ranker::{rank, RESULT_CAP},
};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("{0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MatchError> for SuggestionError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::MissingCurrentCity => SuggestionError::Validation(err.to_string()),
            MatchError::MalformedLoad { .. } => SuggestionError::Internal(err.to_string()),
        }
    }
}

/// Qué hacer cuando origen y destino son la misma ciudad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameCityPolicy {
    /// Se devuelve lo que salga del emparejamiento (p. ej. viajes de ida y vuelta).
    #[default]
    Allow,
    Reject,
}

impl FromStr for SameCityPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "allow" => Ok(SameCityPolicy::Allow),
            "reject" => Ok(SameCityPolicy::Reject),
            other => Err(format!("unknown same city policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub result_cap: usize,
    pub same_city_policy: SameCityPolicy,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            result_cap: RESULT_CAP,
            same_city_policy: SameCityPolicy::Allow,
        }
    }
}

/// Orquesta una consulta: validación, emparejamiento y ordenación sobre un
/// catálogo inyectado.
pub struct LoadPlanner<'a> {
    catalog: &'a LoadCatalog,
    config: &'a SuggestionConfig,
}

impl<'a> LoadPlanner<'a> {
    pub fn new(catalog: &'a LoadCatalog, config: &'a SuggestionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn suggest(&self, query: &SuggestionQuery) -> Result<RankedRoutes<'a>, SuggestionError> {
        let current_city = query
            .current_city
            .as_deref()
            .filter(|city| !city.trim().is_empty())
            .ok_or_else(|| SuggestionError::Validation("Current city is required".into()))?;

        let destination_city = query
            .destination_city
            .as_deref()
            .filter(|city| !city.trim().is_empty());

        if let Some(destination) = destination_city {
            if self.config.same_city_policy == SameCityPolicy::Reject
                && normalize_city(destination) == normalize_city(current_city)
            {
                warn!("Rejected query with identical origin and destination: {}", current_city);
                return Err(SuggestionError::Validation(
                    "Destination city must differ from current city".into(),
                ));
            }
        }

        info!(
            "Searching loads from {} to {}",
            current_city,
            destination_city.unwrap_or("any destination")
        );

        let matches = RouteMatcher::new(self.catalog.loads(), self.config.result_cap)
            .find_routes(current_city, destination_city)?;
        let ranked = rank(matches.direct, matches.connecting, self.config.result_cap);

        debug!(
            "Returning {} of {} routes ({} direct, {} connecting)",
            ranked.routes.len(),
            ranked.total_routes_found,
            ranked.direct_routes_found,
            ranked.connecting_routes_found
        );

        Ok(ranked)
    }
}
