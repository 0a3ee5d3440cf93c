use geo::Point;
use serde::{Deserialize, Serialize};

/// Par de coordenadas tal como vienen en el catálogo (`{lat, lng}`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// geo usa (x, y) = (longitud, latitud)
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// Carga individual del catálogo. Nunca se modifica después de cargarla.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Load {
    pub id: String,
    #[serde(rename = "type")]
    pub load_type: String,
    #[serde(default)]
    pub cargo: String,
    pub weight: f64,
    pub from: String,
    pub to: String,
    pub distance: f64,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "fromLocation", default, skip_serializing_if = "Option::is_none")]
    pub from_location: Option<GeoPoint>,
    #[serde(rename = "toLocation", default, skip_serializing_if = "Option::is_none")]
    pub to_location: Option<GeoPoint>,
}

impl Load {
    /// Constructor mínimo, útil para catálogos de prueba.
    pub fn new(id: &str, from: &str, to: &str, distance: f64) -> Self {
        Self {
            id: id.to_string(),
            load_type: "General".to_string(),
            cargo: String::new(),
            weight: 1000.0,
            from: from.to_string(),
            to: to.to_string(),
            distance,
            urgent: false,
            estimated_time: None,
            delivery_window: None,
            value: None,
            from_location: None,
            to_location: None,
        }
    }

    pub fn with_urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn with_estimated_time(mut self, hours: f64) -> Self {
        self.estimated_time = Some(hours);
        self
    }

    pub fn with_locations(mut self, from: GeoPoint, to: GeoPoint) -> Self {
        self.from_location = Some(from);
        self.to_location = Some(to);
        self
    }
}

/// Ruta directa: una sola carga. La categoría de la carga se emite como
/// `load_type` para no chocar con la etiqueta `type` de [`RouteResult`].
#[derive(Debug, Clone, Serialize)]
pub struct DirectRoute<'a> {
    #[serde(skip)]
    load: &'a Load,
    pub id: &'a str,
    pub load_type: &'a str,
    pub cargo: &'a str,
    pub weight: f64,
    pub from: &'a str,
    pub to: &'a str,
    pub distance: f64,
    pub urgent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_window: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a str>,
    #[serde(rename = "fromLocation", skip_serializing_if = "Option::is_none")]
    pub from_location: Option<GeoPoint>,
    #[serde(rename = "toLocation", skip_serializing_if = "Option::is_none")]
    pub to_location: Option<GeoPoint>,
}

impl<'a> DirectRoute<'a> {
    pub fn load(&self) -> &'a Load {
        self.load
    }
}

impl<'a> From<&'a Load> for DirectRoute<'a> {
    fn from(load: &'a Load) -> Self {
        Self {
            load,
            id: &load.id,
            load_type: &load.load_type,
            cargo: &load.cargo,
            weight: load.weight,
            from: &load.from,
            to: &load.to,
            distance: load.distance,
            urgent: load.urgent,
            estimated_time: load.estimated_time,
            delivery_window: load.delivery_window.as_deref(),
            value: load.value.as_deref(),
            from_location: load.from_location,
            to_location: load.to_location,
        }
    }
}

/// Ruta con una parada intermedia. Vive solo durante la consulta y
/// referencia las cargas del catálogo en lugar de copiarlas.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectingRoute<'a> {
    pub first_leg: &'a Load,
    pub second_leg: &'a Load,
    pub total_distance: f64,
    pub total_time: Option<f64>,
    pub connection_city: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    pub urgent: bool,
}

impl<'a> ConnectingRoute<'a> {
    pub fn new(first_leg: &'a Load, second_leg: &'a Load) -> Self {
        let total_time = match (first_leg.estimated_time, second_leg.estimated_time) {
            (Some(first), Some(second)) => Some(first + second),
            _ => None,
        };

        Self {
            first_leg,
            second_leg,
            total_distance: first_leg.distance + second_leg.distance,
            total_time,
            connection_city: &first_leg.to,
            from: &first_leg.from,
            to: &second_leg.to,
            urgent: first_leg.urgent || second_leg.urgent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RouteResult<'a> {
    Direct(DirectRoute<'a>),
    Connecting(ConnectingRoute<'a>),
}

impl<'a> RouteResult<'a> {
    pub fn is_direct(&self) -> bool {
        matches!(self, RouteResult::Direct(_))
    }

    pub fn from_city(&self) -> &'a str {
        match self {
            RouteResult::Direct(route) => route.from,
            RouteResult::Connecting(route) => route.from,
        }
    }

    pub fn to_city(&self) -> &'a str {
        match self {
            RouteResult::Direct(route) => route.to,
            RouteResult::Connecting(route) => route.to,
        }
    }

    pub fn total_distance(&self) -> f64 {
        match self {
            RouteResult::Direct(route) => route.distance,
            RouteResult::Connecting(route) => route.total_distance,
        }
    }

    /// Cargas reales que componen la ruta, en orden de recorrido.
    pub fn legs(&self) -> Vec<&'a Load> {
        match self {
            RouteResult::Direct(route) => vec![route.load()],
            RouteResult::Connecting(route) => vec![route.first_leg, route.second_leg],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RouteTypeCounts {
    pub direct: usize,
    pub connecting: usize,
}

/// Resultado ya ordenado y recortado. Los contadores `*_found` se calculan
/// sobre los conjuntos completos; `route_types` cuenta lo que se muestra.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRoutes<'a> {
    pub routes: Vec<RouteResult<'a>>,
    pub total_routes_found: usize,
    pub direct_routes_found: usize,
    pub connecting_routes_found: usize,
    pub route_types: RouteTypeCounts,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestionSummary {
    pub message: String,
    pub total_options: usize,
    pub has_direct_routes: bool,
    pub has_connecting_routes: bool,
}

impl From<&RankedRoutes<'_>> for SuggestionSummary {
    fn from(ranked: &RankedRoutes<'_>) -> Self {
        Self {
            message: format!(
                "Found {} direct routes and {} connecting routes",
                ranked.direct_routes_found, ranked.connecting_routes_found
            ),
            total_options: ranked.total_routes_found,
            has_direct_routes: ranked.direct_routes_found > 0,
            has_connecting_routes: ranked.connecting_routes_found > 0,
        }
    }
}

/// Parámetros de consulta tal como llegan por HTTP.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionQuery {
    pub current_city: Option<String>,
    pub destination_city: Option<String>,
}

impl SuggestionQuery {
    pub fn new(current_city: &str, destination_city: Option<&str>) -> Self {
        Self {
            current_city: Some(current_city.to_string()),
            destination_city: destination_city.map(str::to_string),
        }
    }
}
