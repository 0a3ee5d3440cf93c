use super::_structs::{ConnectingRoute, Load};
use super::normalize::normalize_city;
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("Current city is required")]
    MissingCurrentCity,
    #[error("Malformed load {id}: {reason}")]
    MalformedLoad { id: String, reason: String },
}

/// Coincidencias sin ordenar ni recortar; las conectadas ya vienen ordenadas
/// por distancia total.
#[derive(Debug, Default)]
pub struct RouteMatches<'a> {
    pub direct: Vec<&'a Load>,
    pub connecting: Vec<ConnectingRoute<'a>>,
}

pub struct RouteMatcher<'a> {
    loads: &'a [Load],
    result_cap: usize,
}

impl<'a> RouteMatcher<'a> {
    /// `result_cap` decide cuándo hace falta buscar rutas con conexión:
    /// solo si hay menos directas que el límite.
    pub fn new(loads: &'a [Load], result_cap: usize) -> Self {
        Self { loads, result_cap }
    }

    /// Busca rutas directas y, si hace falta, rutas con una parada intermedia.
    pub fn find_routes(
        &self,
        current_city: &str,
        destination_city: Option<&str>,
    ) -> Result<RouteMatches<'a>, MatchError> {
        let origin = normalize_city(current_city);
        if origin.is_empty() {
            return Err(MatchError::MissingCurrentCity);
        }

        let destination = destination_city
            .map(normalize_city)
            .filter(|city| !city.is_empty());

        let direct = self.direct_matches(&origin, destination.as_deref())?;

        let connecting = match destination.as_deref() {
            Some(destination) if direct.len() < self.result_cap => {
                self.connecting_matches(&origin, destination, &direct)?
            }
            _ => Vec::new(),
        };

        debug!(
            "Matched {} direct and {} connecting routes from {}",
            direct.len(),
            connecting.len(),
            origin
        );

        Ok(RouteMatches { direct, connecting })
    }

    /// Sin destino, toda carga que sale de `origin` cuenta como directa.
    fn direct_matches(
        &self,
        origin: &str,
        destination: Option<&str>,
    ) -> Result<Vec<&'a Load>, MatchError> {
        self.loads
            .iter()
            .filter(|load| normalize_city(&load.from) == origin)
            .filter(|load| destination.map_or(true, |dest| normalize_city(&load.to) == dest))
            .map(checked_load)
            .collect()
    }

    /// Búsqueda en anchura de profundidad exactamente dos: primer tramo desde
    /// `origin`, segundo tramo hasta `destination`. Todas las combinaciones
    /// por ciudad intermedia, sin deduplicar cargas.
    fn connecting_matches(
        &self,
        origin: &str,
        destination: &str,
        direct: &[&'a Load],
    ) -> Result<Vec<ConnectingRoute<'a>>, MatchError> {
        let visited: HashSet<String> = direct
            .iter()
            .map(|load| normalize_city(&load.from))
            .collect();
        let by_origin = self.index_by_origin();

        let visited = &visited;
        let by_origin = &by_origin;

        let pairs = self
            .loads
            .iter()
            .filter(|first| normalize_city(&first.from) == origin)
            .filter_map(move |first| {
                let via = normalize_city(&first.to);
                if visited.contains(&via) {
                    return None;
                }
                by_origin.get(&via).map(|seconds| (first, seconds))
            })
            .flat_map(move |(first, seconds)| {
                seconds
                    .iter()
                    .filter(move |second| normalize_city(&second.to) == destination)
                    .map(move |second| (first, *second))
            });

        let mut routes = pairs
            .map(|(first, second)| {
                Ok(ConnectingRoute::new(checked_load(first)?, checked_load(second)?))
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        // sort_by_key es estable: los empates conservan el orden del catálogo
        routes.sort_by_key(|route| OrderedFloat(route.total_distance));

        Ok(routes)
    }

    /// Índice ciudad de origen → cargas que salen de ella, sobre todo el catálogo.
    fn index_by_origin(&self) -> HashMap<String, Vec<&'a Load>> {
        let mut index: HashMap<String, Vec<&'a Load>> = HashMap::new();
        for load in self.loads {
            index.entry(normalize_city(&load.from)).or_default().push(load);
        }
        index
    }
}

fn checked_load(load: &Load) -> Result<&Load, MatchError> {
    if !load.distance.is_finite() || load.distance < 0.0 {
        warn!("Load {} has an invalid distance: {}", load.id, load.distance);
        return Err(MatchError::MalformedLoad {
            id: load.id.clone(),
            reason: format!("invalid distance {}", load.distance),
        });
    }
    Ok(load)
}
