/// Clave canónica de una ciudad: minúsculas y espacios convertidos en `_`.
///
/// Los espacios al inicio y al final se descartan y cada tramo de espacios
/// internos cuenta como uno solo, así "Viana do  Castelo" y "viana_do_castelo"
/// producen la misma clave. Tabuladores, saltos de línea y cualquier otro
/// espacio en blanco Unicode se tratan igual que el espacio.
pub fn normalize_city(city: &str) -> String {
    city.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
