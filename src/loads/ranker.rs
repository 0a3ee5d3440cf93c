use super::_structs::{ConnectingRoute, DirectRoute, Load, RankedRoutes, RouteResult, RouteTypeCounts};

/// Máximo de rutas devueltas por consulta.
pub const RESULT_CAP: usize = 5;

/// Etiqueta, concatena (directas primero) y recorta a `cap` rutas.
///
/// Las directas nunca se desplazan por conexiones más cortas. Los contadores
/// `*_found` salen de los conjuntos completos, antes de recortar.
pub fn rank<'a>(
    direct: Vec<&'a Load>,
    connecting: Vec<ConnectingRoute<'a>>,
    cap: usize,
) -> RankedRoutes<'a> {
    let direct_routes_found = direct.len();
    let connecting_routes_found = connecting.len();

    let routes: Vec<RouteResult<'a>> = direct
        .into_iter()
        .map(|load| RouteResult::Direct(DirectRoute::from(load)))
        .chain(connecting.into_iter().map(RouteResult::Connecting))
        .take(cap)
        .collect();

    let shown_direct = routes.iter().filter(|route| route.is_direct()).count();
    let route_types = RouteTypeCounts {
        direct: shown_direct,
        connecting: routes.len() - shown_direct,
    };

    RankedRoutes {
        routes,
        total_routes_found: direct_routes_found + connecting_routes_found,
        direct_routes_found,
        connecting_routes_found,
        route_types,
    }
}
