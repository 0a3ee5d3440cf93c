//! Catálogos de prueba compartidos por los tests del módulo.

use super::_structs::Load;
use super::catalog::LoadCatalog;

pub fn load(id: &str, from: &str, to: &str, distance: f64) -> Load {
    Load::new(id, from, to, distance)
}

/// Pequeño catálogo con ciudades portuguesas:
/// - Porto -> Lisboa: 2 directas (L0001, L0011) y 2 con conexión.
/// - Porto -> Faro: 0 directas y 3 con conexión.
/// - Coimbra: exactamente 3 cargas salientes.
/// - Beja: ninguna carga saliente.
pub fn portugal_catalog() -> Vec<Load> {
    vec![
        load("L0001", "Porto", "Lisboa", 313.0),
        load("L0002", "Porto", "Braga", 55.0),
        load("L0003", "Braga", "Lisboa", 365.0),
        load("L0004", "Porto", "Coimbra", 120.0),
        load("L0005", "Lisboa", "Faro", 278.0),
        load("L0006", "Coimbra", "Lisboa", 205.0).with_urgent(true),
        load("L0007", "Coimbra", "Faro", 400.0),
        load("L0008", "Coimbra", "Viseu", 85.0),
        load("L0009", "Viseu", "Porto", 100.0),
        load("L0010", "Lisboa", "Beja", 178.0),
        load("L0011", "Porto", "Lisboa", 313.0).with_urgent(true),
        load("L0012", "Setubal", "Faro", 245.0),
    ]
}

pub fn portugal_load_catalog() -> LoadCatalog {
    LoadCatalog::new(portugal_catalog(), "fixtures")
}
