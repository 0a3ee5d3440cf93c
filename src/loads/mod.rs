pub mod _structs;
pub mod catalog;
pub mod data_loader;
pub mod enrichment;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod ranker;

#[cfg(test)]
pub(crate) mod fixtures;

pub use _structs::*;
pub use catalog::{CatalogHandle, LoadCatalog};
pub use data_loader::{CatalogLoader, LoaderError};
pub use enrichment::{CityCoordinates, EnrichmentError, NoEnrichment, RouteEnricher};
pub use index::{LoadPlanner, SameCityPolicy, SuggestionConfig, SuggestionError};
pub use matcher::{MatchError, RouteMatcher, RouteMatches};
pub use normalize::normalize_city;
pub use ranker::{rank, RESULT_CAP};
